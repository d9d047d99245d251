//! Leaf payloads for the Strata object store.
//!
//! A leaf data object carries a [`Payload`]: either a fixed-shape array of
//! tuples ([`ArrayData`], backed by a typed [`DataStore`]) or a single
//! [`ScalarValue`]. The object store never interprets payload contents; it
//! only duplicates payloads by value when objects or whole stores are copied.
//!
//! # Element Types
//!
//! The set of element types is closed and listed by [`DataType`]. Each Rust
//! element type implements [`Element`], which maps it to its `DataType` and
//! to the matching [`ArrayData`] / [`ScalarValue`] variant.

pub mod array;
pub mod data_type;
pub mod error;
pub mod payload;
pub mod scalar;
pub mod store;

pub use array::ArrayData;
pub use data_type::{DataType, Element};
pub use error::{PayloadError, PayloadResult};
pub use payload::Payload;
pub use scalar::ScalarValue;
pub use store::DataStore;
