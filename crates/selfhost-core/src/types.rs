//! Core Self-host domain types.
//!
//! This module enumerates the resource families exposed by the platform and
//! provides the textual timestamp format used in timeseries queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default API version segment prepended to every resource path.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Textual timestamp layout accepted by timeseries queries (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Resource families exposed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFamily {
    /// Alerts raised by things and programs
    Alerts,
    /// Stored data sets
    Datasets,
    /// User groups
    Groups,
    /// Access policies attached to groups
    Policies,
    /// Routines, modules and webhooks
    Programs,
    /// Registered things (devices, buildings, ...)
    Things,
    /// Timeseries and their data points
    Timeseries,
    /// Platform users and their tokens
    Users,
}

impl ResourceFamily {
    /// Returns the family name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Alerts => "alerts",
            Self::Datasets => "datasets",
            Self::Groups => "groups",
            Self::Policies => "policies",
            Self::Programs => "programs",
            Self::Things => "things",
            Self::Timeseries => "timeseries",
            Self::Users => "users",
        }
    }

    /// Path prefix of the family relative to the versioned API root.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.name()
    }
}

impl std::fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Render a UTC instant as `YYYY-MM-DDTHH:MM:SS`.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_family_names() {
        assert_eq!(ResourceFamily::Alerts.name(), "alerts");
        assert_eq!(ResourceFamily::Timeseries.path(), "timeseries");
        assert_eq!(ResourceFamily::Things.to_string(), "things");
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2022, 2, 4, 13, 50, 54).unwrap();
        assert_eq!(format_timestamp(&at), "2022-02-04T13:50:54");
    }
}
