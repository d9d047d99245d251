use serde::{Deserialize, Serialize};
use strata_structure::DataStructure;
use tracing::warn;

use crate::arguments::Arguments;
use crate::error::{FilterError, FilterResult};
use crate::parameter::Parameter;

// ---------------------------------------------------------------------------
// Preflight
// ---------------------------------------------------------------------------

/// Messages collected while checking a filter against a data structure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preflight {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Preflight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no errors were reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Append another report's messages to this one.
    pub fn merge(&mut self, other: Preflight) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }
}

// ---------------------------------------------------------------------------
// Filter trait
// ---------------------------------------------------------------------------

/// A unit of work over a data structure.
///
/// Implementors declare their [`Parameter`]s and supply `preflight_impl` and
/// `execute_impl`. The provided [`preflight`](Self::preflight) resolves the
/// raw arguments first: unknown names become warnings, absent arguments take
/// their defaults or become errors, and every value is checked against its
/// parameter kind. `preflight_impl` only runs on a clean resolution and
/// always sees the resolved arguments.
///
/// The trait is object-safe and `Send + Sync` so filters can be stored in a
/// `Vec<Box<dyn Filter>>`.
pub trait Filter: Send + Sync {
    /// Stable identifier used by the registry and scripts.
    fn name(&self) -> &str;

    fn human_name(&self) -> &str;

    fn parameters(&self) -> Vec<Parameter>;

    /// Check that the filter could run against `data` without changing it.
    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight>;

    /// Apply the filter.
    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()>;

    /// Resolve `args` against the declared parameters.
    fn resolve_arguments(&self, args: &Arguments) -> (Arguments, Preflight) {
        let params = self.parameters();
        let mut report = Preflight::new();
        let mut resolved = Arguments::new();

        for (name, value) in args.iter() {
            if params.iter().any(|p| p.name == name) {
                resolved.insert(name, value.clone());
            } else {
                report.warn(format!(
                    "input contained \"{name}\" which is not an accepted argument name"
                ));
            }
        }

        for param in &params {
            if !resolved.contains(&param.name) {
                match &param.default {
                    Some(default) => resolved.insert(param.name.clone(), default.clone()),
                    None if param.required => {
                        report.error(format!("missing required argument \"{}\"", param.name));
                        continue;
                    }
                    None => continue,
                }
            }
            if let Some(value) = resolved.get(&param.name) {
                if let Err(reason) = param.kind.check(value) {
                    report.error(format!("argument \"{}\": {reason}", param.name));
                }
            }
        }
        (resolved, report)
    }

    /// Resolve arguments, then run `preflight_impl` if they are sound.
    fn preflight(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let (resolved, mut report) = self.resolve_arguments(args);
        if !report.is_valid() {
            return Ok(report);
        }
        report.merge(self.preflight_impl(data, &resolved)?);
        Ok(report)
    }

    /// Preflight, then execute. Refuses to touch `data` if preflight
    /// reported errors. Returns the preflight warnings on success.
    fn execute(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<Vec<String>> {
        let report = self.preflight(data, args)?;
        if !report.is_valid() {
            warn!(filter = self.name(), errors = ?report.errors, "preflight rejected filter");
            return Err(FilterError::Preflight {
                filter: self.name().to_string(),
                errors: report.errors,
            });
        }
        let (resolved, _) = self.resolve_arguments(args);
        self.execute_impl(data, &resolved)?;
        Ok(report.warnings)
    }
}
