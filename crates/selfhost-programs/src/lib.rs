//! Programs client and data models for the NODA Self-host API.
//!
//! Programs are routines, modules and webhooks executed by the platform.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ProgramsClient;
pub use models::{CreateProgramRequest, Program, ProgramListParams, UpdateProgramRequest};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
