use strata_structure::DataStructure;

use crate::arguments::Arguments;
use crate::error::FilterResult;
use crate::filter::{Filter, Preflight};
use crate::filters::{check_new_target, creation_site, require_existing, resolve};
use crate::parameter::{Parameter, ParameterKind};

/// Copies an object to a new path, with or without its subtree.
pub struct CopyObjectFilter;

impl Filter for CopyObjectFilter {
    fn name(&self) -> &str {
        "copy_object"
    }

    fn human_name(&self) -> &str {
        "Copy Data Object"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::required("source", ParameterKind::Path, "object to copy"),
            Parameter::required("destination", ParameterKind::Path, "path of the copy"),
            Parameter::optional("deep", ParameterKind::Bool, true, "copy the whole subtree"),
        ]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        require_existing(data, &args.path("source")?, &mut report);
        check_new_target(data, &args.path("destination")?, &mut report);
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let source = resolve(data, &args.path("source")?)?;
        let destination = args.path("destination")?;
        let (parent, name) = creation_site(data, &destination)?;
        if args.bool("deep")? {
            data.deep_copy(source, name, parent)?;
        } else {
            data.shallow_copy(source, name, parent)?;
        }
        Ok(())
    }
}
