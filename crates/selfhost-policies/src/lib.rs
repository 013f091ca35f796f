//! Policies client and data models for the NODA Self-host API.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::PoliciesClient;
pub use models::{CreatePolicyRequest, Policy, PolicyListParams, UpdatePolicyRequest};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
