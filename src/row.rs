use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::data_types::DataType;
use crate::{PlanError, PlanResult};

/// Raw value held by one channel of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    DateTime(String),
    Binary(Vec<u8>),
}

// Floats hash by bit pattern so equal values land in the same bucket.
// NaN never equals itself, so a NaN key is never found again.
impl Eq for Datum {}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Datum::Null => {}
            Datum::Boolean(v) => v.hash(state),
            Datum::Int64(v) => v.hash(state),
            Datum::Float64(v) => v.to_bits().hash(state),
            Datum::String(v) => v.hash(state),
            Datum::DateTime(v) => v.hash(state),
            Datum::Binary(v) => v.hash(state),
        }
    }
}

impl Datum {
    pub fn data_type(&self) -> DataType {
        match self {
            Datum::Null => DataType::Unknown,
            Datum::Boolean(_) => DataType::Boolean,
            Datum::Int64(_) => DataType::Int64,
            Datum::Float64(_) => DataType::Float64,
            Datum::String(_) => DataType::String,
            Datum::DateTime(_) => DataType::DateTime,
            Datum::Binary(_) => DataType::Binary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Datum::Int64(v) => Some(*v as f64),
            Datum::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Total order used by sort comparators. Nulls sort first, mixed kinds
    /// order by kind so comparison never fails mid-sort.
    pub fn sort_key_cmp(&self, other: &Datum) -> Ordering {
        match (self, other) {
            (Datum::Null, Datum::Null) => Ordering::Equal,
            (Datum::Boolean(l), Datum::Boolean(r)) => l.cmp(r),
            (Datum::Int64(l), Datum::Int64(r)) => l.cmp(r),
            (Datum::Float64(l), Datum::Float64(r)) => l.total_cmp(r),
            (Datum::String(l), Datum::String(r)) => l.cmp(r),
            (Datum::DateTime(l), Datum::DateTime(r)) => l.cmp(r),
            (Datum::Binary(l), Datum::Binary(r)) => l.cmp(r),
            (l, r) => Self::kind_rank(l).cmp(&Self::kind_rank(r)),
        }
    }

    fn kind_rank(datum: &Datum) -> u8 {
        match datum {
            Datum::Null => 0,
            Datum::Boolean(_) => 1,
            Datum::Int64(_) => 2,
            Datum::Float64(_) => 3,
            Datum::String(_) => 4,
            Datum::DateTime(_) => 5,
            Datum::Binary(_) => 6,
        }
    }
}

impl Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Null => write!(f, "null"),
            Datum::Boolean(v) => write!(f, "{v}"),
            Datum::Int64(v) => write!(f, "{v}"),
            Datum::Float64(v) => write!(f, "{v}"),
            Datum::String(v) => write!(f, "{v}"),
            Datum::DateTime(v) => write!(f, "{v}"),
            Datum::Binary(v) => write!(f, "{v:02x?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    fields: Vec<Datum>,
}

impl Row {
    pub fn new(fields: Vec<Datum>) -> Self {
        Row { fields }
    }

    /// Row of `width` null fields, for null-extending unmatched outer-join
    /// probes.
    pub fn nulls(width: usize) -> Self {
        Row {
            fields: vec![Datum::Null; width],
        }
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn get_field(&self, channel: usize) -> PlanResult<Datum> {
        match self.fields.get(channel) {
            Some(datum) => Ok(datum.clone()),
            None => Err(PlanError::Unknown(format!(
                "channel {channel} out of bound for row of width {}",
                self.fields.len()
            ))),
        }
    }

    pub fn field(&self, channel: usize) -> Option<&Datum> {
        self.fields.get(channel)
    }

    pub fn concat(left: &Row, right: &Row) -> Row {
        let mut fields = Vec::with_capacity(left.fields.len() + right.fields.len());
        fields.extend_from_slice(&left.fields);
        fields.extend_from_slice(&right.fields);
        Row { fields }
    }
}
