//! Built-in structural filters.

pub mod copy;
pub mod create;
pub mod fill;
pub mod remove;
pub mod rename;
pub mod reparent;

pub use copy::CopyObjectFilter;
pub use create::{CreateArrayFilter, CreateGroupFilter, CreateScalarFilter};
pub use fill::FillArrayFilter;
pub use remove::RemoveFilter;
pub use rename::RenameFilter;
pub use reparent::AddParentFilter;

use strata_structure::{DataId, DataPath, DataStructure, StructureError};
use strata_types::validate_object_name;

use crate::error::{FilterError, FilterResult};
use crate::filter::Preflight;
use crate::registry::FilterRegistry;

pub(crate) fn register_builtins(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(CreateGroupFilter));
    registry.register(|| Box::new(CreateArrayFilter));
    registry.register(|| Box::new(CreateScalarFilter));
    registry.register(|| Box::new(AddParentFilter));
    registry.register(|| Box::new(RenameFilter));
    registry.register(|| Box::new(RemoveFilter));
    registry.register(|| Box::new(FillArrayFilter));
    registry.register(|| Box::new(CopyObjectFilter));
}

/// Record an error unless `path` resolves.
pub(crate) fn require_existing(
    data: &DataStructure,
    path: &DataPath,
    report: &mut Preflight,
) -> Option<DataId> {
    let id = data.get_id(path);
    if id.is_none() {
        report.error(format!("{path} does not exist"));
    }
    id
}

/// Record errors unless a new object could be created at `path`: the parent
/// must be an existing group (or the path a single name), the name must be
/// valid, and no sibling may already hold it.
pub(crate) fn check_new_target(data: &DataStructure, path: &DataPath, report: &mut Preflight) {
    let Some(name) = path.target_name() else {
        report.error("path must not be empty");
        return;
    };
    if let Err(e) = validate_object_name(name, data.config().max_name_len) {
        report.error(e.to_string());
        return;
    }
    if data.get_id(path).is_some() {
        report.error(format!("{path} already exists"));
        return;
    }
    if let Some(parent) = path.parent().filter(|p| !p.is_empty()) {
        match data.get_data_by_path(&parent) {
            None => report.error(format!("parent {parent} does not exist")),
            Some(object) if !object.is_group() => {
                report.error(format!("parent {parent} is not a group"))
            }
            Some(_) => {}
        }
    }
}

/// Parent group and local name for creating an object at `path`.
pub(crate) fn creation_site<'a>(
    data: &DataStructure,
    path: &'a DataPath,
) -> FilterResult<(Option<DataId>, &'a str)> {
    let name = path
        .target_name()
        .ok_or_else(|| FilterError::invalid("path", "path must not be empty"))?;
    let parent = match path.parent().filter(|p| !p.is_empty()) {
        Some(parent) => Some(
            data.get_id(&parent)
                .ok_or(StructureError::PathNotFound(parent))?,
        ),
        None => None,
    };
    Ok((parent, name))
}

/// Resolve `path` or fail with `PathNotFound`.
pub(crate) fn resolve(data: &DataStructure, path: &DataPath) -> FilterResult<DataId> {
    data.get_id(path)
        .ok_or_else(|| StructureError::PathNotFound(path.clone()).into())
}
