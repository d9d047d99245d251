use strata_structure::DataStructure;

use crate::arguments::Arguments;
use crate::error::FilterResult;
use crate::filter::{Filter, Preflight};
use crate::filters::{require_existing, resolve};
use crate::parameter::{Parameter, ParameterKind};

/// Renames an object under every parent at once.
pub struct RenameFilter;

impl Filter for RenameFilter {
    fn name(&self) -> &str {
        "rename"
    }

    fn human_name(&self) -> &str {
        "Rename Data Object"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::required("path", ParameterKind::Path, "object to rename"),
            Parameter::required("new_name", ParameterKind::String, "its new name"),
        ]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        if let Some(id) = require_existing(data, &args.path("path")?, &mut report) {
            if let Err(e) = data.check_rename(id, args.string("new_name")?) {
                report.error(e.to_string());
            }
        }
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let id = resolve(data, &args.path("path")?)?;
        data.rename(id, args.string("new_name")?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_structure::DataPath;

    #[test]
    fn renames_and_rejects_collisions() {
        let mut data = DataStructure::new();
        let foo = data.create_group("Foo", None).unwrap();
        let a = data.create_group("A", Some(foo)).unwrap();
        data.create_group("B", Some(foo)).unwrap();

        let taken = Arguments::new().with("path", "Foo/A").with("new_name", "B");
        assert!(!RenameFilter.preflight(&data, &taken).unwrap().is_valid());

        let ok = Arguments::new().with("path", "Foo/A").with("new_name", "C");
        RenameFilter.execute(&mut data, &ok).unwrap();
        assert_eq!(data.get_id(&DataPath::new(["Foo", "C"])), Some(a));
    }

    #[test]
    fn invalid_name_is_reported() {
        let mut data = DataStructure::new();
        data.create_group("Foo", None).unwrap();
        let args = Arguments::new().with("path", "Foo").with("new_name", "a/b");
        assert!(!RenameFilter.preflight(&data, &args).unwrap().is_valid());
    }
}
