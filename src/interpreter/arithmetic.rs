use crate::{
    expressions::{BinaryOp, UnaryOp},
    row::Datum,
    PlanError::InterpretingError,
    PlanResult,
};

pub fn plus_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    match (left, right) {
        (Datum::Int64(l), Datum::Int64(r)) => Ok(Datum::Int64(l + r)),
        (Datum::Float64(l), Datum::Float64(r)) => Ok(Datum::Float64(l + r)),
        (left, right) => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?} and {:?}",
            BinaryOp::Plus,
            left,
            right
        ))),
    }
}

pub fn minus_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    match (left, right) {
        (Datum::Int64(l), Datum::Int64(r)) => Ok(Datum::Int64(l - r)),
        (Datum::Float64(l), Datum::Float64(r)) => Ok(Datum::Float64(l - r)),
        (left, right) => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?} and {:?}",
            BinaryOp::Minus,
            left,
            right
        ))),
    }
}

pub fn divide_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    match (left, right) {
        (Datum::Int64(_), Datum::Int64(0)) => {
            Err(InterpretingError("division by zero".to_string()))
        }
        (Datum::Int64(l), Datum::Int64(r)) => Ok(Datum::Int64(l / r)),
        (Datum::Float64(l), Datum::Float64(r)) => Ok(Datum::Float64(l / r)),
        (left, right) => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?} and {:?}",
            BinaryOp::Divide,
            left,
            right
        ))),
    }
}

pub fn multiply_impl(left: Datum, right: Datum) -> PlanResult<Datum> {
    match (left, right) {
        (Datum::Int64(l), Datum::Int64(r)) => Ok(Datum::Int64(l * r)),
        (Datum::Float64(l), Datum::Float64(r)) => Ok(Datum::Float64(l * r)),
        (left, right) => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?} and {:?}",
            BinaryOp::Multiply,
            left,
            right
        ))),
    }
}

pub fn negative_impl(input: Datum) -> PlanResult<Datum> {
    match input {
        Datum::Int64(v) => Ok(Datum::Int64(-v)),
        Datum::Float64(v) => Ok(Datum::Float64(-v)),
        input => Err(InterpretingError(format!(
            "{:?} operator not implemented for {:?}",
            UnaryOp::Neg,
            input
        ))),
    }
}
