//! Things client and data models for the NODA Self-host API.
//!
//! Things are the physical or logical entities (devices, buildings, rooms)
//! that datasets and timeseries are attached to.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ThingsClient;
pub use models::{CreateThingRequest, Thing, ThingListParams, UpdateThingRequest};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
