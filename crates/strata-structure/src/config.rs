use serde::{Deserialize, Serialize};
use strata_types::DEFAULT_MAX_NAME_LEN;

use crate::error::{StructureError, StructureResult};

/// Configuration for a [`DataStructure`](crate::DataStructure).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Run the full invariant audit after every structural mutation.
    /// Violations are logged at `error` level and trip a debug assertion.
    pub verify_invariants: bool,
    /// Upper bound on object name length, in bytes.
    pub max_name_len: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            verify_invariants: false,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl StructureConfig {
    /// A configuration that audits the graph after every mutation.
    pub fn verifying() -> Self {
        Self {
            verify_invariants: true,
            ..Default::default()
        }
    }

    /// Parse from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> StructureResult<Self> {
        toml::from_str(input).map_err(|e| StructureError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StructureConfig::default();
        assert!(!config.verify_invariants);
        assert_eq!(config.max_name_len, DEFAULT_MAX_NAME_LEN);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = StructureConfig::from_toml_str("verify_invariants = true").unwrap();
        assert!(config.verify_invariants);
        assert_eq!(config.max_name_len, DEFAULT_MAX_NAME_LEN);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = StructureConfig::from_toml_str("max_name_len = \"long\"").unwrap_err();
        assert!(matches!(err, StructureError::Config(_)));
    }
}
