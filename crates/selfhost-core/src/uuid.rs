//! Strongly-typed identifiers for Self-host resources.
//!
//! Identifiers are kept as the exact strings the server hands out, so an
//! identifier always round-trips verbatim into request paths. Wrapping them per
//! resource prevents passing a thing UUID where a timeseries UUID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed identifier wrapper types.
macro_rules! uuid_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier exactly as given.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Creates a new random UUID (v4).
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Converts into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Parses a strictly valid UUID from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is not a valid UUID.
            pub fn parse_str(input: &str) -> Result<Self> {
                validate_uuid(input).map(|uuid| Self(uuid.to_string()))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

uuid_type!(AlertUuid, "Alert UUID");
uuid_type!(DatasetUuid, "Dataset UUID");
uuid_type!(GroupUuid, "Group UUID");
uuid_type!(PolicyUuid, "Policy UUID");
uuid_type!(ProgramUuid, "Program UUID");
uuid_type!(ThingUuid, "Thing UUID");
uuid_type!(TimeseriesUuid, "Timeseries UUID");
uuid_type!(UserUuid, "User UUID");
uuid_type!(TokenUuid, "User token UUID");

/// Validates a UUID string.
///
/// # Errors
///
/// Returns an error if the string is not a valid UUID.
pub fn validate_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| Error::InvalidUuid(s.to_string()))
}
