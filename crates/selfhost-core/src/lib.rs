//! # selfhost-core
//!
//! Core types and utilities for working with the NODA Self-host API.
//!
//! This crate provides the session, request dispatch and error handling shared
//! by every resource family client.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code classification
//! - [`auth`] - Credential exchange and the authorization header slot
//! - [`client`] - Request dispatch and response decoding
//! - [`config`] - Client configuration and environment fallback
//! - [`query`] - Ordered query parameter builder
//! - [`resource`] - Family-bound endpoints and the CRUD operation trait
//! - [`types`] - Resource families and timestamp helpers
//! - [`uuid`] - Strongly-typed identifiers for Self-host resources

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod resource;
pub mod types;
pub mod uuid;

// Re-export commonly used types
pub use auth::{AuthSession, Session, SessionProvider};
pub use client::{ApiResponse, Dispatcher, RawContent, RequestSpec, ResponseBody};
pub use config::{Credentials, SelfHostConfig};
pub use error::{Error, ErrorKind, PlatformError, Result, TransportError};
pub use query::QueryParams;
pub use resource::{ListParams, ResourceEndpoint, ResourceOperations};
pub use types::ResourceFamily;
