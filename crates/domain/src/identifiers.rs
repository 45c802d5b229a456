//! Strongly-typed identifier types for the benchmark scoring domain.
//!
//! Configurations, problems and instances are named by the external solving
//! stage (usually after directory or file names). The engine treats these names
//! as opaque keys: they are compared and ordered lexicographically, never
//! parsed. Separate newtypes prevent accidentally mixing a configuration name
//! with an instance name.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from any string-like value
            #[inline]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the underlying name
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert to the underlying name
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }
    };
}

define_id!(
    ConfigurationId,
    "Identifier of one solver parameterization (e.g. a search-heuristic triple)"
);

define_id!(ProblemId, "Identifier of a problem, i.e. a group of instances");

define_id!(
    InstanceId,
    "Identifier of one problem instance (model plus data), unique within its problem"
);

/// Fully qualified instance identity: the problem it belongs to and its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceKey {
    /// Owning problem
    pub problem: ProblemId,
    /// Instance name within the problem
    pub instance: InstanceId,
}

impl InstanceKey {
    /// Create a new instance key
    pub fn new(problem: impl Into<ProblemId>, instance: impl Into<InstanceId>) -> Self {
        Self {
            problem: problem.into(),
            instance: instance.into(),
        }
    }
}

impl Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.problem, self.instance)
    }
}

/// Identity of one solver run: a configuration applied to an instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunKey {
    /// Instance the run solved
    pub instance: InstanceKey,
    /// Configuration used for the run
    pub configuration: ConfigurationId,
}

impl RunKey {
    /// Create a new run key
    pub fn new(configuration: impl Into<ConfigurationId>, instance: InstanceKey) -> Self {
        Self {
            instance,
            configuration: configuration.into(),
        }
    }
}

impl Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.configuration, self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        let id1 = ConfigurationId::new("dom_min_luby");
        let id2: ConfigurationId = "dom_min_luby".into();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_id_from_string() {
        let id: InstanceId = "ft10".parse().unwrap();
        assert_eq!(id.as_str(), "ft10");
        assert_eq!(id.to_string(), "ft10");
    }

    #[test]
    fn test_id_serialization() {
        let id = ProblemId::new("jobshop");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"jobshop\"");
        let deserialized: ProblemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_instance_key_ordering() {
        let a = InstanceKey::new("jobshop", "ft06");
        let b = InstanceKey::new("jobshop", "ft10");
        let c = InstanceKey::new("knapsack", "a");
        assert!(a < b);
        assert!(b < c);
        assert_eq!(b.to_string(), "jobshop/ft10");
    }

    #[test]
    fn test_run_key_display() {
        let key = RunKey::new("dom_min_luby", InstanceKey::new("jobshop", "ft10"));
        assert_eq!(key.to_string(), "dom_min_luby@jobshop/ft10");
    }
}
