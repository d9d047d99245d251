use strata_payload::Payload;
use strata_structure::{DataStructure, StructureError};

use crate::arguments::Arguments;
use crate::error::FilterResult;
use crate::filter::{Filter, Preflight};
use crate::filters::{require_existing, resolve};
use crate::parameter::{Parameter, ParameterKind};

/// Sets every element of an existing array to one value.
pub struct FillArrayFilter;

impl Filter for FillArrayFilter {
    fn name(&self) -> &str {
        "fill_array"
    }

    fn human_name(&self) -> &str {
        "Fill Data Array"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::required("path", ParameterKind::Path, "array to fill"),
            Parameter::required("value", ParameterKind::Number, "value for every element"),
        ]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        let path = args.path("path")?;
        if let Some(id) = require_existing(data, &path, &mut report) {
            let is_array = data
                .get_data(id)
                .and_then(|o| o.payload())
                .and_then(Payload::as_array)
                .is_some();
            if !is_array {
                report.error(format!("{path} is not an array"));
            }
        }
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let id = resolve(data, &args.path("path")?)?;
        let value = args.f64("value")?;
        let array = data
            .payload_mut(id)
            .and_then(Payload::as_array_mut)
            .ok_or(StructureError::NotALeaf(id))?;
        array.fill_f64(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_payload::DataStore;

    #[test]
    fn fills_typed_array() {
        let mut data = DataStructure::new();
        let id = data
            .create_array("a", DataStore::<u16>::new(2, 3).unwrap(), None)
            .unwrap();
        FillArrayFilter
            .execute(&mut data, &Arguments::new().with("path", "a").with("value", 7))
            .unwrap();
        assert!(data.array::<u16>(id).unwrap().iter().all(|v| *v == 7));
    }

    #[test]
    fn group_is_not_an_array() {
        let mut data = DataStructure::new();
        data.create_group("g", None).unwrap();
        let report = FillArrayFilter
            .preflight(&data, &Arguments::new().with("path", "g").with("value", 1))
            .unwrap();
        assert_eq!(report.errors, vec!["g is not an array".to_string()]);
    }
}
