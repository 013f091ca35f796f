//! Client for the NODA Self-host API.
//!
//! [`SelfHostClient`] establishes one authenticated session and exposes every
//! resource family (alerts, datasets, groups, policies, programs, things,
//! timeseries and users) through it.
//!
//! ```no_run
//! use selfhost_client::{ListParams, SelfHostClient};
//!
//! # async fn run() -> selfhost_client::Result<()> {
//! let client = SelfHostClient::builder()
//!     .base_url("https://selfhost.example.com")
//!     .password("domain", "access-key")
//!     .build()
//!     .await?;
//!
//! for group in client.list_groups(&ListParams::default()).await? {
//!     println!("{}", group.name);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;

pub use client::{SelfHostClient, SelfHostClientBuilder};

pub use selfhost_alerts as alerts;
pub use selfhost_datasets as datasets;
pub use selfhost_groups as groups;
pub use selfhost_policies as policies;
pub use selfhost_programs as programs;
pub use selfhost_things as things;
pub use selfhost_timeseries as timeseries;
pub use selfhost_users as users;

pub use selfhost_core::{
    Credentials, Error, ErrorKind, ListParams, PlatformError, RawContent, SelfHostConfig,
    TransportError,
};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
