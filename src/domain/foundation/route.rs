//! Route value object for navigation side effects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An application route the navigator can move the user to.
///
/// Routes are opaque absolute paths; the core only distinguishes them by
/// equality. Well-known destinations are exposed as constructors so call
/// sites never spell raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    /// Creates a route from a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Default landing route after a successful login.
    pub fn dashboard() -> Self {
        Self::new("/dashboard")
    }

    /// Route of the login form.
    pub fn login() -> Self {
        Self::new("/login")
    }

    /// Route of the password-reset form.
    pub fn password_reset() -> Self {
        Self::new("/password-reset")
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
