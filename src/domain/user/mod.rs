//! User domain types.
//!
//! `UserRecord` is the authenticated-user record owned by the session store
//! while logged in. A serialized copy is mirrored into the persistence
//! adapter so the session survives process restarts; the serde field names
//! match the backend's wire shape so the mirror round-trips unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Role / permission level granted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
    Member,
    Admin,
}

/// The authoritative record of "who is logged in".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub permission_level: PermissionLevel,
    /// School year / class group, e.g. "B2 G1".
    pub grade: String,
    pub city: String,
    /// Whether the account is enrolled in the BTS track.
    pub bts: bool,
    pub is_active: bool,
    /// Communication preference: receive informational mails.
    pub has_information_mails: bool,
}

impl UserRecord {
    /// Returns the user's full display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// A single named-field mutation applied to the live user and its
/// persisted mirror.
///
/// Modeled as an enum so the store and the persistence adapter apply the
/// exact same change without stringly-typed field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserParameter {
    /// Toggle the informational-mails preference.
    InformationMails(bool),
}

impl UserParameter {
    /// Applies this parameter change to a user record.
    pub fn apply_to(&self, user: &mut UserRecord) {
        match *self {
            UserParameter::InformationMails(value) => user.has_information_mails = value,
        }
    }
}

/// Full-profile update payload sent to the gateway (admin edit form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub permission_level: PermissionLevel,
    pub grade: String,
    pub city: String,
    pub bts: bool,
    pub is_active: bool,
}
