//! Timeseries and data point models.

use chrono::{DateTime, Utc};
use selfhost_core::query::QueryParams;
use selfhost_core::types::format_timestamp;
use selfhost_core::uuid::{ThingUuid, TimeseriesUuid, UserUuid};
use serde::{Deserialize, Serialize};

/// Filters supported by the `timeseries` list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimeseriesListParams {
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Timeseries carrying these tags.
    pub tags: Vec<String>,
}

impl TimeseriesListParams {
    /// Convert the filters into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("limit", self.limit);
        params.push_opt("offset", self.offset);
        params.push_each("tags", &self.tags);
        params
    }
}

/// Timeseries metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timeseries {
    /// Timeseries UUID.
    pub uuid: TimeseriesUuid,
    /// Thing the timeseries belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_uuid: Option<ThingUuid>,
    /// Creating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserUuid>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SI unit of the values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub si_unit: Option<String>,
    /// Lower bound of accepted values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    /// Upper bound of accepted values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for creating a timeseries.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTimeseriesRequest {
    /// Name.
    pub name: String,
    /// SI unit.
    pub si_unit: String,
    /// Owning thing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_uuid: Option<ThingUuid>,
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateTimeseriesRequest {
    /// Create a payload with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, si_unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            si_unit: si_unit.into(),
            ..Self::default()
        }
    }

    /// Attach to a thing.
    #[must_use]
    pub fn with_thing(mut self, thing_uuid: ThingUuid) -> Self {
        self.thing_uuid = Some(thing_uuid);
        self
    }

    /// Set accepted value bounds.
    #[must_use]
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = Some(lower);
        self.upper_bound = Some(upper);
        self
    }
}

/// Partial update for a timeseries.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateTimeseriesRequest {
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SI unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub si_unit: Option<String>,
    /// Owning thing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_uuid: Option<ThingUuid>,
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A single measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    /// Value.
    pub v: f64,
    /// Timestamp, RFC 3339.
    pub ts: String,
}

impl DataPoint {
    /// Point with an explicit timestamp string.
    #[must_use]
    pub fn new(v: f64, ts: impl Into<String>) -> Self {
        Self { v, ts: ts.into() }
    }

    /// Point at a UTC instant, rendered as RFC 3339 with millisecond precision.
    #[must_use]
    pub fn at(v: f64, ts: &DateTime<Utc>) -> Self {
        Self {
            v,
            ts: ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

/// Data of one timeseries in a multi-series query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesData {
    /// Timeseries UUID.
    pub uuid: TimeseriesUuid,
    /// Data points.
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// Range and shaping options for reading data points.
///
/// `start` and `end` are passed through verbatim; use
/// [`TimeseriesDataQuery::between`] to render them from `chrono` instants.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimeseriesDataQuery {
    /// Range start.
    pub start: String,
    /// Range end.
    pub end: String,
    /// Convert values to this unit.
    pub unit: Option<String>,
    /// Only values greater than or equal to this.
    pub ge: Option<i64>,
    /// Only values less than or equal to this.
    pub le: Option<i64>,
    /// Down-sampling precision (e.g. `hour`).
    pub precision: Option<String>,
    /// Aggregate applied per precision bucket (e.g. `avg`).
    pub aggregate: Option<String>,
    /// Time zone used for bucketing.
    pub timezone: Option<String>,
}

impl TimeseriesDataQuery {
    /// Query between two verbatim timestamps.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Self::default()
        }
    }

    /// Query between two UTC instants, formatted as `YYYY-MM-DDTHH:MM:SS`.
    #[must_use]
    pub fn between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Self {
        Self::new(format_timestamp(start), format_timestamp(end))
    }

    /// Convert values to `unit`.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Down-sample to `precision` using `aggregate`.
    #[must_use]
    pub fn with_aggregate(mut self, precision: impl Into<String>, aggregate: impl Into<String>) -> Self {
        self.precision = Some(precision.into());
        self.aggregate = Some(aggregate.into());
        self
    }

    /// Bucket in the given time zone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Append the query to `params`.
    pub fn push_into(&self, params: &mut QueryParams) {
        params.push("start", &self.start);
        params.push("end", &self.end);
        params.push_opt("unit", self.unit.as_deref());
        params.push_opt("ge", self.ge);
        params.push_opt("le", self.le);
        params.push_opt("precision", self.precision.as_deref());
        params.push_opt("aggregate", self.aggregate.as_deref());
        params.push_opt("timezone", self.timezone.as_deref());
    }

    /// Convert into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.push_into(&mut params);
        params
    }
}

/// Range of data points to delete.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteTimeseriesDataParams {
    /// Range start.
    pub start: String,
    /// Range end.
    pub end: String,
    /// Only values greater than or equal to this.
    pub ge: Option<i64>,
    /// Only values less than or equal to this.
    pub le: Option<i64>,
}

impl DeleteTimeseriesDataParams {
    /// Delete everything between two verbatim timestamps.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Self::default()
        }
    }

    /// Convert into query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("start", &self.start);
        params.push("end", &self.end);
        params.push_opt("ge", self.ge);
        params.push_opt("le", self.le);
        params
    }
}

/// Read data from several timeseries at once (`tsquery`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MultiTimeseriesQuery {
    /// Timeseries to read; one `uuids` pair each.
    pub uuids: Vec<TimeseriesUuid>,
    /// Range and shaping options shared by all series.
    pub range: TimeseriesDataQuery,
}

impl MultiTimeseriesQuery {
    /// Query `uuids` over `range`.
    #[must_use]
    pub fn new(uuids: Vec<TimeseriesUuid>, range: TimeseriesDataQuery) -> Self {
        Self { uuids, range }
    }

    /// Convert into query parameters, `uuids` first.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_each("uuids", &self.uuids);
        self.range.push_into(&mut params);
        params
    }
}
