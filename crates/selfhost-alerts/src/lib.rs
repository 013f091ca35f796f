//! Alerts client and data models for the NODA Self-host API.
//!
//! Provides typed structures and an asynchronous client for listing, raising,
//! updating and removing alerts.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::AlertsClient;
pub use models::{Alert, AlertListParams, CreateAlertRequest, CreatedAlert, UpdateAlertRequest};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
