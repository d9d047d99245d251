use std::time::{Duration, Instant};

use serde::Serialize;
use strata_structure::DataStructure;
use tracing::{debug, info, warn};

use crate::arguments::Arguments;
use crate::error::FilterResult;
use crate::filter::{Filter, Preflight};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Recorded result of one pipeline step.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub filter: String,
    pub preflight: Preflight,
    /// Wall-clock time the step took.
    pub elapsed: Duration,
}

/// Per-step results of a pipeline run, in step order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PipelineReport {
    pub steps: Vec<StepReport>,
}

impl PipelineReport {
    /// Returns `true` if no step reported an error.
    pub fn is_valid(&self) -> bool {
        self.steps.iter().all(|s| s.preflight.is_valid())
    }

    pub fn warning_count(&self) -> usize {
        self.steps.iter().map(|s| s.preflight.warnings.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.steps.iter().map(|s| s.preflight.errors.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

struct Step {
    filter: Box<dyn Filter>,
    arguments: Arguments,
}

/// An ordered list of filters with their arguments.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the end of the pipeline.
    pub fn push(&mut self, filter: Box<dyn Filter>, arguments: Arguments) {
        self.steps.push(Step { filter, arguments });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step filter names in order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.filter.name()).collect()
    }

    /// Check every step without touching `data`.
    ///
    /// Steps run against a private clone of the store, so each step sees what
    /// the earlier steps would have produced. Checking stops at the first step
    /// that reports errors or fails to apply.
    pub fn preflight(&self, data: &DataStructure) -> FilterResult<PipelineReport> {
        let mut scratch = data.clone();
        let mut report = PipelineReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            let start = Instant::now();
            let mut preflight = step.filter.preflight(&scratch, &step.arguments)?;
            if preflight.is_valid() {
                let (resolved, _) = step.filter.resolve_arguments(&step.arguments);
                if let Err(e) = step.filter.execute_impl(&mut scratch, &resolved) {
                    preflight.error(e.to_string());
                }
            }
            let valid = preflight.is_valid();
            report.steps.push(StepReport {
                index,
                filter: step.filter.name().to_string(),
                preflight,
                elapsed: start.elapsed(),
            });
            if !valid {
                debug!(index, filter = step.filter.name(), "pipeline preflight stopped");
                break;
            }
        }
        Ok(report)
    }

    /// Execute every step in order against `data`.
    ///
    /// The run is **fail-fast**: the first step that fails stops the run and
    /// its error is returned. Steps already applied stay applied.
    pub fn execute(&self, data: &mut DataStructure) -> FilterResult<PipelineReport> {
        let mut report = PipelineReport::default();
        for (index, step) in self.steps.iter().enumerate() {
            let start = Instant::now();
            let warnings = step.filter.execute(data, &step.arguments).map_err(|e| {
                warn!(index, filter = step.filter.name(), error = %e, "pipeline step failed");
                e
            })?;
            for warning in &warnings {
                warn!(index, filter = step.filter.name(), "{warning}");
            }
            info!(index, filter = step.filter.name(), "pipeline step executed");
            report.steps.push(StepReport {
                index,
                filter: step.filter.name().to_string(),
                preflight: Preflight {
                    warnings,
                    errors: Vec::new(),
                },
                elapsed: start.elapsed(),
            });
        }
        Ok(report)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.filter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::filters::{CreateGroupFilter, RemoveFilter};
    use strata_structure::DataPath;

    fn group(path: &str) -> (Box<dyn Filter>, Arguments) {
        (Box::new(CreateGroupFilter), Arguments::new().with("path", path))
    }

    fn pipeline(steps: Vec<(Box<dyn Filter>, Arguments)>) -> Pipeline {
        let mut p = Pipeline::new();
        for (filter, args) in steps {
            p.push(filter, args);
        }
        p
    }

    #[test]
    fn preflight_sees_earlier_steps_and_leaves_store_untouched() {
        let p = pipeline(vec![group("Foo"), group("Foo/Bar")]);
        let data = DataStructure::new();
        let report = p.preflight(&data).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.steps.len(), 2);
        assert!(data.is_empty());
    }

    #[test]
    fn preflight_stops_at_first_invalid_step() {
        let p = pipeline(vec![group("Foo/Bar"), group("Foo")]);
        let report = p.preflight(&DataStructure::new()).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn execute_applies_in_order() {
        let p = pipeline(vec![group("Foo"), group("Foo/Bar")]);
        let mut data = DataStructure::new();
        let report = p.execute(&mut data).unwrap();
        assert_eq!(report.steps.len(), 2);
        assert!(data.get_id(&DataPath::new(["Foo", "Bar"])).is_some());
    }

    #[test]
    fn execute_is_fail_fast() {
        let mut steps = vec![group("Foo")];
        let remove: Box<dyn Filter> = Box::new(RemoveFilter);
        steps.push((remove, Arguments::new().with("path", "Missing")));
        steps.push(group("Later"));
        let p = pipeline(steps);

        let mut data = DataStructure::new();
        let err = p.execute(&mut data).unwrap_err();
        assert!(matches!(err, FilterError::Preflight { .. }));
        assert_eq!(data.len(), 1);
        assert!(data.get_id(&DataPath::new(["Later"])).is_none());
    }
}
