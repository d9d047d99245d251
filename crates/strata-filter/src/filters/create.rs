use serde_json::json;
use strata_payload::{ArrayData, ScalarValue};
use strata_structure::DataStructure;

use crate::arguments::Arguments;
use crate::error::{FilterError, FilterResult};
use crate::filter::{Filter, Preflight};
use crate::filters::{check_new_target, creation_site};
use crate::parameter::{Parameter, ParameterKind};

/// Creates an empty group.
pub struct CreateGroupFilter;

impl Filter for CreateGroupFilter {
    fn name(&self) -> &str {
        "create_group"
    }

    fn human_name(&self) -> &str {
        "Create Group"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::required("path", ParameterKind::Path, "path of the new group")]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        check_new_target(data, &args.path("path")?, &mut report);
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let path = args.path("path")?;
        let (parent, name) = creation_site(data, &path)?;
        data.create_group(name, parent)?;
        Ok(())
    }
}

/// Creates a tuple array filled with a constant.
///
/// `component_shape` gives the shape of one tuple; the tuple size is the
/// product of its entries.
pub struct CreateArrayFilter;

fn tuple_size(shape: &[usize]) -> FilterResult<usize> {
    if shape.is_empty() || shape.contains(&0) {
        return Err(FilterError::invalid(
            "component_shape",
            "every component dimension must be at least 1",
        ));
    }
    shape
        .iter()
        .try_fold(1usize, |size, dim| size.checked_mul(*dim))
        .ok_or_else(|| FilterError::invalid("component_shape", "tuple size overflows"))
}

impl Filter for CreateArrayFilter {
    fn name(&self) -> &str {
        "create_array"
    }

    fn human_name(&self) -> &str {
        "Create Data Array"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::required("path", ParameterKind::Path, "path of the new array"),
            Parameter::optional("data_type", ParameterKind::DataType, "float32", "element type"),
            Parameter::optional(
                "component_shape",
                ParameterKind::IntegerList,
                json!([1]),
                "shape of one tuple",
            ),
            Parameter::required("tuple_count", ParameterKind::Integer, "number of tuples"),
            Parameter::optional("fill", ParameterKind::Number, 0, "initial value of every element"),
        ]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        check_new_target(data, &args.path("path")?, &mut report);
        let tuple_count = args.usize("tuple_count")?;
        match tuple_size(&args.usize_list("component_shape")?) {
            Ok(size) if size.checked_mul(tuple_count).is_none() => report.error(
                FilterError::invalid("tuple_count", "array length overflows").to_string(),
            ),
            Ok(_) => {}
            Err(e) => report.error(e.to_string()),
        }
        if tuple_count == 0 {
            report.warn("array has no tuples");
        }
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let path = args.path("path")?;
        let size = tuple_size(&args.usize_list("component_shape")?)?;
        let mut array = ArrayData::new(args.data_type("data_type")?, size, args.usize("tuple_count")?)?;
        array.fill_f64(args.f64("fill")?);
        let (parent, name) = creation_site(data, &path)?;
        data.create_leaf(name, array, parent)?;
        Ok(())
    }
}

/// Creates a single typed value.
pub struct CreateScalarFilter;

impl Filter for CreateScalarFilter {
    fn name(&self) -> &str {
        "create_scalar"
    }

    fn human_name(&self) -> &str {
        "Create Scalar Value"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::required("path", ParameterKind::Path, "path of the new value"),
            Parameter::optional("data_type", ParameterKind::DataType, "float64", "value type"),
            Parameter::optional("value", ParameterKind::Number, 0, "the value"),
        ]
    }

    fn preflight_impl(&self, data: &DataStructure, args: &Arguments) -> FilterResult<Preflight> {
        let mut report = Preflight::new();
        check_new_target(data, &args.path("path")?, &mut report);
        Ok(report)
    }

    fn execute_impl(&self, data: &mut DataStructure, args: &Arguments) -> FilterResult<()> {
        let path = args.path("path")?;
        let value = ScalarValue::from_f64(args.data_type("data_type")?, args.f64("value")?);
        let (parent, name) = creation_site(data, &path)?;
        data.create_leaf(name, value, parent)?;
        Ok(())
    }
}
