//! Datasets client and data models for the NODA Self-host API.
//!
//! Besides the usual metadata operations, datasets expose their stored content
//! as raw bytes via [`DatasetsClient::get_dataset_raw_content`].

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::DatasetsClient;
pub use models::{CreateDatasetRequest, Dataset, UpdateDatasetRequest};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
