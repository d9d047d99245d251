//! Foundation types for Strata.
//!
//! This crate provides the identity and naming primitives used by every other
//! Strata crate.
//!
//! # Key Types
//!
//! - [`DataId`] — Opaque identifier of a data object within one store
//! - [`IdRegistry`] — Issues identifiers and tracks which ones are live
//! - [`validate_object_name`] — Naming rules shared by groups and paths

pub mod error;
pub mod id;
pub mod names;

pub use error::TypeError;
pub use id::{DataId, IdRegistry};
pub use names::{validate_object_name, DEFAULT_MAX_NAME_LEN, PATH_SEPARATOR};
