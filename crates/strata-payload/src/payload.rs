use serde::{Deserialize, Serialize};

use crate::array::ArrayData;
use crate::data_type::DataType;
use crate::scalar::ScalarValue;

/// The data carried by a leaf object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Array(ArrayData),
    Scalar(ScalarValue),
}

impl Payload {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Array(array) => array.data_type(),
            Self::Scalar(scalar) => scalar.data_type(),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayData> {
        match self {
            Self::Array(array) => Some(array),
            Self::Scalar(_) => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayData> {
        match self {
            Self::Array(array) => Some(array),
            Self::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::Array(_) => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarValue> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::Array(_) => None,
        }
    }

    /// Short description for listings, e.g. `float32[3x10]` or
    /// `scalar int32 = 6`.
    pub fn summary(&self) -> String {
        match self {
            Self::Array(array) => format!(
                "{}[{}x{}]",
                array.data_type(),
                array.tuple_size(),
                array.tuple_count()
            ),
            Self::Scalar(scalar) => format!("scalar {} = {scalar}", scalar.data_type()),
        }
    }
}

impl From<ArrayData> for Payload {
    fn from(array: ArrayData) -> Self {
        Self::Array(array)
    }
}

impl From<ScalarValue> for Payload {
    fn from(scalar: ScalarValue) -> Self {
        Self::Scalar(scalar)
    }
}
