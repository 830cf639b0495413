//! Strongly-typed ID wrappers for all entity types
//!
//! New IDs are random UUIDs, but any non-empty string is accepted so that
//! records created by older versions (which used timestamp strings) keep
//! their identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short form used in terminal listings
            pub fn short(&self) -> &str {
                self.0.get(..8).unwrap_or(&self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(concat!(stringify!($name), " cannot be empty").to_string());
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

define_id!(EntryId);
define_id!(ProjectId);
define_id!(ProjectEntryId);
define_id!(FileId);
define_id!(LinkId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let id1 = ProjectId::new();
        let id2 = ProjectId::new();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn test_legacy_id_round_trip() {
        let json = "\"1700000000000\"";
        let id: EntryId = serde_json::from_str(json).unwrap();
        assert_eq!(id.as_str(), "1700000000000");
        assert_eq!(serde_json::to_string(&id).unwrap(), json);
    }

    #[test]
    fn test_short() {
        let id = FileId::from("abcdef0123456789");
        assert_eq!(id.short(), "abcdef01");

        let tiny = FileId::from("42");
        assert_eq!(tiny.short(), "42");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!("  ".parse::<LinkId>().is_err());
        assert_eq!("abc".parse::<LinkId>().unwrap().as_str(), "abc");
    }
}
