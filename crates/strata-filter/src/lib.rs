//! Filter runtime for Strata.
//!
//! A filter is a named unit of work over a [`DataStructure`]. Each filter
//! declares its parameters, can be preflighted (checked without changing the
//! store), and refuses to execute when its preflight reports errors. Filters
//! are looked up by name in a [`FilterRegistry`] and chained into a
//! [`Pipeline`], usually loaded from a TOML [`PipelineScript`].
//!
//! # Quick Start
//!
//! ```rust
//! use strata_filter::{FilterRegistry, PipelineScript};
//! use strata_structure::{DataPath, DataStructure};
//!
//! let script = PipelineScript::from_toml_str(r#"
//!     [[step]]
//!     filter = "create_group"
//!     path = "Foo"
//! "#).unwrap();
//! let pipeline = script.build(&FilterRegistry::with_builtin_filters()).unwrap();
//! let mut data = DataStructure::new();
//! pipeline.execute(&mut data).unwrap();
//! assert!(data.get_id(&DataPath::new(["Foo"])).is_some());
//! ```
//!
//! [`DataStructure`]: strata_structure::DataStructure

pub mod arguments;
pub mod error;
pub mod filter;
pub mod filters;
pub mod parameter;
pub mod pipeline;
pub mod registry;
pub mod script;

// Re-exports for convenience.
pub use arguments::Arguments;
pub use error::{FilterError, FilterResult};
pub use filter::{Filter, Preflight};
pub use parameter::{Parameter, ParameterKind};
pub use pipeline::{Pipeline, PipelineReport, StepReport};
pub use registry::{FilterInfo, FilterRegistry};
pub use script::{PipelineScript, ScriptStep};
