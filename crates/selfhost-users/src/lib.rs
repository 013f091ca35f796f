//! Users client and data models for the NODA Self-host API.
//!
//! Includes group membership updates, per-user rate limits and API token
//! management.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::UsersClient;
pub use models::{CreateUserRequest, CreatedUserToken, UpdateUserRequest, User, UserToken};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
