use strata_structure::DataStructure;

use crate::arguments::Arguments;
use crate::error::FilterResult;
use crate::filter::{Filter, Preflight};
use crate::filters::require_existing;
use crate::parameter::{Parameter, ParameterKind};

/// Removes an object from every parent and cascades into its children.
pub struct RemoveFilter;

impl Filter for RemoveFilter {
    fn name(&self) -> &str {
        "remove"
    }

    fn human_name(&self) -> &str {
        "Delete Data Object"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::required("path", ParameterKind::Path, "object to remove")]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        let path = args.path("path")?;
        if let Some(id) = require_existing(data, &path, &mut report) {
            let edges = data.parents_of(id).len() + usize::from(data.is_root(id));
            if edges > 1 {
                let others = edges - 1;
                report.warn(format!(
                    "{path} is also contained by {others} other parent(s); removing it everywhere"
                ));
            }
        }
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        data.remove_data_at(&args.path("path")?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_structure::DataPath;

    #[test]
    fn removes_everywhere_and_warns_about_sharing() {
        let mut data = DataStructure::new();
        let foo = data.create_group("Foo", None).unwrap();
        let a = data.create_group("A", Some(foo)).unwrap();
        let b = data.create_group("B", Some(foo)).unwrap();
        let x = data.create_group("X", Some(a)).unwrap();
        data.add_additional_parent(x, b).unwrap();

        let args = Arguments::new().with("path", "Foo/A/X");
        let warnings = RemoveFilter.execute(&mut data, &args).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(!data.contains(x));
        assert!(data.get_id(&DataPath::new(["Foo", "B", "X"])).is_none());
    }

    #[test]
    fn single_parent_removal_has_no_warning() {
        let mut data = DataStructure::new();
        let foo = data.create_group("Foo", None).unwrap();
        data.create_group("Bar", Some(foo)).unwrap();
        let args = Arguments::new().with("path", "Foo/Bar");
        let report = RemoveFilter.preflight(&data, &args).unwrap();
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn preflight_on_deeply_shared_graph_is_cheap() {
        // Every rung is contained by both groups of the rung above, so the
        // tip is reachable through 2^32 name paths.
        let mut data = DataStructure::new();
        let root = data.create_group("Root", None).unwrap();
        let mut rung = vec![root];
        for level in 0..32 {
            let a = data.create_group(format!("A{level}"), Some(rung[0])).unwrap();
            let b = data.create_group(format!("B{level}"), Some(rung[0])).unwrap();
            if let Some(other) = rung.get(1) {
                data.add_additional_parent(a, *other).unwrap();
                data.add_additional_parent(b, *other).unwrap();
            }
            rung = vec![a, b];
        }
        let tip = data.create_group("Tip", Some(rung[0])).unwrap();
        data.add_additional_parent(tip, rung[1]).unwrap();

        let path = data.primary_path(tip).unwrap();
        let args = Arguments::new().with("path", path.to_string());
        let report = RemoveFilter.preflight(&data, &args).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("1 other parent"));

        RemoveFilter.execute(&mut data, &args).unwrap();
        assert!(!data.contains(tip));
        assert!(data.audit().is_valid());
    }

    #[test]
    fn missing_target_fails_preflight() {
        let report = RemoveFilter
            .preflight(&DataStructure::new(), &Arguments::new().with("path", "Nope"))
            .unwrap();
        assert_eq!(report.errors, vec!["Nope does not exist".to_string()]);
    }
}
