//! Groups client and data models for the NODA Self-host API.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::GroupsClient;
pub use models::{Group, GroupRequest};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
