use std::fmt::Display;

use serde::Serialize;

/// Scalar kind of one channel's raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    String,
    DateTime,
    /// packed intermediate aggregate state
    Binary,
    Unknown,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
