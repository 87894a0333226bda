//! Strongly-typed identifiers for domain entities.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }
    };
}

define_id!(PipelineId, "pip");
define_id!(JobId, "job");
define_id!(BuildId, "bld");
define_id!(EventId, "evt");
define_id!(UserId, "usr");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_id_display() {
        let id = BuildId::new();
        let s = id.to_string();
        assert!(s.starts_with("bld_"));
    }

    #[test]
    fn test_build_id_parse() {
        let id = BuildId::new();
        let s = id.to_string();
        let parsed: BuildId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_without_prefix() {
        let id = EventId::new();
        let parsed: EventId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
