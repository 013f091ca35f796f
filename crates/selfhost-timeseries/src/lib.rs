//! Timeseries client and data models for the NODA Self-host API.
//!
//! Covers timeseries metadata, reading and writing data points for a single
//! series, and the multi-series `tsquery` endpoint.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::TimeseriesClient;
pub use models::{
    CreateTimeseriesRequest, DataPoint, DeleteTimeseriesDataParams, MultiTimeseriesQuery,
    Timeseries, TimeseriesData, TimeseriesDataQuery, TimeseriesListParams, UpdateTimeseriesRequest,
};

/// Convenient result alias that reuses the shared Self-host error type.
pub type Result<T> = selfhost_core::Result<T>;
