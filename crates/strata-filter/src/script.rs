//! TOML pipeline scripts.
//!
//! A script is a list of `[[step]]` tables. Each names a registered filter
//! with `filter = "..."`; every other key in the table is passed to the
//! filter as an argument. An optional `[structure]` table configures the
//! store the script runs against.
//!
//! ```toml
//! [structure]
//! verify_invariants = true
//!
//! [[step]]
//! filter = "create_group"
//! path = "Foo"
//!
//! [[step]]
//! filter = "create_array"
//! path = "Foo/values"
//! data_type = "float32"
//! tuple_count = 10
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_structure::StructureConfig;
use tracing::debug;

use crate::arguments::Arguments;
use crate::error::{FilterError, FilterResult};
use crate::pipeline::Pipeline;
use crate::registry::FilterRegistry;

/// One `[[step]]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub filter: String,
    #[serde(flatten)]
    pub arguments: BTreeMap<String, toml::Value>,
}

impl ScriptStep {
    /// The step's arguments as filter arguments.
    pub fn to_arguments(&self) -> FilterResult<Arguments> {
        self.arguments
            .iter()
            .map(|(name, value)| {
                serde_json::to_value(value)
                    .map(|v| (name.clone(), v))
                    .map_err(|e| FilterError::Script(format!("argument '{name}': {e}")))
            })
            .collect()
    }
}

/// A parsed pipeline script.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineScript {
    #[serde(default)]
    pub structure: Option<StructureConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

impl PipelineScript {
    pub fn from_toml_str(input: &str) -> FilterResult<Self> {
        toml::from_str(input).map_err(|e| FilterError::Script(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> FilterResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| FilterError::Script(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded pipeline script");
        Self::from_toml_str(&input)
    }

    /// The store configuration named by the script, or the default.
    pub fn structure_config(&self) -> StructureConfig {
        self.structure.clone().unwrap_or_default()
    }

    /// Resolve every step's filter through `registry`.
    pub fn build(&self, registry: &FilterRegistry) -> FilterResult<Pipeline> {
        let mut pipeline = Pipeline::new();
        for step in &self.steps {
            pipeline.push(registry.create(&step.filter)?, step.to_arguments()?);
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use strata_structure::{DataPath, DataStructure};

    const SCRIPT: &str = r#"
[structure]
verify_invariants = true

[[step]]
filter = "create_group"
path = "Foo"

[[step]]
filter = "create_array"
path = "Foo/values"
data_type = "int32"
component_shape = [3]
tuple_count = 4
fill = 2
"#;

    #[test]
    fn parses_steps_and_structure() {
        let script = PipelineScript::from_toml_str(SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[1].filter, "create_array");
        assert!(script.structure_config().verify_invariants);

        let args = script.steps[1].to_arguments().unwrap();
        assert_eq!(args.usize_list("component_shape").unwrap(), vec![3]);
        assert_eq!(args.usize("tuple_count").unwrap(), 4);
    }

    #[test]
    fn builds_and_runs() {
        let script = PipelineScript::from_toml_str(SCRIPT).unwrap();
        let pipeline = script.build(&FilterRegistry::with_builtin_filters()).unwrap();
        let mut data = DataStructure::with_config(script.structure_config());
        pipeline.execute(&mut data).unwrap();

        let id = data.get_id(&DataPath::new(["Foo", "values"])).unwrap();
        let store = data.array::<i32>(id).unwrap();
        assert_eq!(store.tuple_size(), 3);
        assert_eq!(store.tuple_count(), 4);
        assert!(store.iter().all(|v| *v == 2));
    }

    #[test]
    fn unknown_filter_fails_to_build() {
        let script = PipelineScript::from_toml_str("[[step]]\nfilter = \"nope\"\n").unwrap();
        assert!(matches!(
            script.build(&FilterRegistry::with_builtin_filters()),
            Err(FilterError::UnknownFilter(_))
        ));
    }

    #[test]
    fn missing_structure_table_uses_defaults() {
        let script = PipelineScript::from_toml_str("").unwrap();
        assert!(script.steps.is_empty());
        assert_eq!(script.structure_config(), StructureConfig::default());
    }

    #[test]
    fn malformed_script_is_a_script_error() {
        assert!(matches!(
            PipelineScript::from_toml_str("[[step]]\npath = \"Foo\"\n"),
            Err(FilterError::Script(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();
        let script = PipelineScript::from_path(file.path()).unwrap();
        assert_eq!(script.steps.len(), 2);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            PipelineScript::from_path(missing),
            Err(FilterError::Script(_))
        ));
    }
}
