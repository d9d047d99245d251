use strata_structure::DataStructure;

use crate::arguments::Arguments;
use crate::error::FilterResult;
use crate::filter::{Filter, Preflight};
use crate::filters::{require_existing, resolve};
use crate::parameter::{Parameter, ParameterKind};

/// Makes an existing object reachable from a second group.
pub struct AddParentFilter;

impl Filter for AddParentFilter {
    fn name(&self) -> &str {
        "add_parent"
    }

    fn human_name(&self) -> &str {
        "Add Parent Group"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::required("child", ParameterKind::Path, "object to share"),
            Parameter::required("parent", ParameterKind::Path, "group to add it to"),
        ]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        let child = require_existing(data, &args.path("child")?, &mut report);
        let parent = require_existing(data, &args.path("parent")?, &mut report);
        if let (Some(child), Some(parent)) = (child, parent) {
            if let Err(e) = data.check_insert(parent, child) {
                report.error(e.to_string());
            }
        }
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let child = resolve(data, &args.path("child")?)?;
        let parent = resolve(data, &args.path("parent")?)?;
        data.add_additional_parent(child, parent)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_structure::DataPath;

    fn sample() -> DataStructure {
        let mut data = DataStructure::new();
        let foo = data.create_group("Foo", None).unwrap();
        let bar1 = data.create_group("Bar1", Some(foo)).unwrap();
        data.create_group("Bar2", Some(foo)).unwrap();
        data.create_group("Bazz", Some(bar1)).unwrap();
        data
    }

    #[test]
    fn shares_child() {
        let mut data = sample();
        let args = Arguments::new()
            .with("child", "Foo/Bar1/Bazz")
            .with("parent", "Foo/Bar2");
        AddParentFilter.execute(&mut data, &args).unwrap();
        assert_eq!(
            data.get_id(&DataPath::new(["Foo", "Bar1", "Bazz"])),
            data.get_id(&DataPath::new(["Foo", "Bar2", "Bazz"]))
        );
    }

    #[test]
    fn cycle_is_reported_in_preflight() {
        let data = sample();
        let args = Arguments::new().with("child", "Foo").with("parent", "Foo/Bar1/Bazz");
        let report = AddParentFilter.preflight(&data, &args).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("cycle"));
    }

    #[test]
    fn missing_paths_are_reported() {
        let data = sample();
        let args = Arguments::new().with("child", "Nope").with("parent", "Also/Nope");
        let report = AddParentFilter.preflight(&data, &args).unwrap();
        assert_eq!(report.errors.len(), 2);
    }
}
