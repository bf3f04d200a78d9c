use std::cmp::Ordering;

use crate::{
    expressions::{BinaryOp, UnaryOp},
    row::Datum,
    PlanError::InterpretingError,
    PlanResult,
};

pub fn gt_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    cmp_impl(&left, &right).map(|o| Datum::Boolean(o.is_gt()))
}

pub fn gte_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    cmp_impl(&left, &right).map(|o| Datum::Boolean(o.is_ge()))
}

pub fn eq_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    cmp_impl(&left, &right).map(|o| Datum::Boolean(o.is_eq()))
}

pub fn lt_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    cmp_impl(&left, &right).map(|o| Datum::Boolean(o.is_lt()))
}

pub fn lte_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    cmp_impl(&left, &right).map(|o| Datum::Boolean(o.is_le()))
}

/// Comparison between two non-null datums of the same kind.
pub fn cmp_impl(left: &Datum, right: &Datum) -> PlanResult<Ordering> {
    match (left, right) {
        (Datum::Boolean(l), Datum::Boolean(r)) => Ok(l.cmp(r)),
        (Datum::Int64(l), Datum::Int64(r)) => Ok(l.cmp(r)),
        (Datum::Float64(l), Datum::Float64(r)) => Ok(l.total_cmp(r)),
        (Datum::String(l), Datum::String(r)) => Ok(l.cmp(r)),
        (Datum::DateTime(l), Datum::DateTime(r)) => Ok(l.cmp(r)),
        (left, right) => Err(InterpretingError(format!(
            "comparison not implemented for {left:?} and {right:?}"
        ))),
    }
}

pub fn and_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    match (left, right) {
        (Datum::Boolean(l), Datum::Boolean(r)) => Ok(Datum::Boolean(l && r)),
        (left, right) => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?} and {:?}",
            BinaryOp::And,
            left,
            right
        ))),
    }
}

pub fn or_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    match (left, right) {
        (Datum::Boolean(l), Datum::Boolean(r)) => Ok(Datum::Boolean(l || r)),
        (left, right) => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?} and {:?}",
            BinaryOp::Or,
            left,
            right
        ))),
    }
}

pub fn not_impl(input: Datum) -> PlanResult<Datum> {
    match input {
        Datum::Boolean(v) => Ok(Datum::Boolean(!v)),
        input => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?}",
            UnaryOp::Not,
            input
        ))),
    }
}
