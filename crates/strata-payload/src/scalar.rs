use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data_type::{DataType, Element};
use crate::error::{PayloadError, PayloadResult};

/// A single typed value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScalarValue {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
}

impl ScalarValue {
    /// Wrap a typed value.
    pub fn new<T: Element>(value: T) -> Self {
        value.into_scalar()
    }

    /// Build a scalar of the given type from an `f64`.
    pub fn from_f64(data_type: DataType, value: f64) -> Self {
        match data_type {
            DataType::Int8 => Self::Int8(Element::from_f64(value)),
            DataType::UInt8 => Self::UInt8(Element::from_f64(value)),
            DataType::Int16 => Self::Int16(Element::from_f64(value)),
            DataType::UInt16 => Self::UInt16(Element::from_f64(value)),
            DataType::Int32 => Self::Int32(Element::from_f64(value)),
            DataType::UInt32 => Self::UInt32(Element::from_f64(value)),
            DataType::Int64 => Self::Int64(Element::from_f64(value)),
            DataType::UInt64 => Self::UInt64(Element::from_f64(value)),
            DataType::Float32 => Self::Float32(Element::from_f64(value)),
            DataType::Float64 => Self::Float64(Element::from_f64(value)),
            DataType::Bool => Self::Bool(Element::from_f64(value)),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::UInt8(_) => DataType::UInt8,
            Self::Int16(_) => DataType::Int16,
            Self::UInt16(_) => DataType::UInt16,
            Self::Int32(_) => DataType::Int32,
            Self::UInt32(_) => DataType::UInt32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt64(_) => DataType::UInt64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Bool(_) => DataType::Bool,
        }
    }

    /// The value, if it has element type `T`.
    pub fn get<T: Element>(&self) -> PayloadResult<T> {
        T::from_scalar(self).ok_or(PayloadError::TypeMismatch {
            expected: T::DATA_TYPE,
            found: self.data_type(),
        })
    }

    /// Replace the value. The element type must stay the same.
    pub fn set<T: Element>(&mut self, value: T) -> PayloadResult<()> {
        if T::DATA_TYPE != self.data_type() {
            return Err(PayloadError::TypeMismatch {
                expected: self.data_type(),
                found: T::DATA_TYPE,
            });
        }
        *self = value.into_scalar();
        Ok(())
    }

    pub fn to_f64(&self) -> f64 {
        match *self {
            Self::Int8(v) => v.to_f64(),
            Self::UInt8(v) => v.to_f64(),
            Self::Int16(v) => v.to_f64(),
            Self::UInt16(v) => v.to_f64(),
            Self::Int32(v) => v.to_f64(),
            Self::UInt32(v) => v.to_f64(),
            Self::Int64(v) => v.to_f64(),
            Self::UInt64(v) => v.to_f64(),
            Self::Float32(v) => v.to_f64(),
            Self::Float64(v) => v,
            Self::Bool(v) => v.to_f64(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            other => write!(f, "{}", other.to_f64() as i128),
        }
    }
}
