//! Session Keeper - client-side session lifecycle manager
//!
//! Owns the authenticated-user record, drives the login / verify / refresh /
//! logout transition sequence, and keeps the in-memory session synchronized
//! with a durable local mirror. All side effects go through injected ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
