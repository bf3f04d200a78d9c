mod arithmetic;
mod booleans;

use crate::{
    expressions::{BinaryOp, Expression, UnaryOp},
    row::{Datum, Row},
    PlanError, PlanResult,
};

use self::{
    arithmetic::{divide_impl, minus_impl, multiply_impl, negative_impl},
    booleans::{and_impl, eq_impl, gt_impl, gte_impl, lt_impl, lte_impl, not_impl, or_impl},
};

pub use self::arithmetic::plus_impl;
pub use self::booleans::cmp_impl;

pub struct Interpreter {}

impl Interpreter {
    /// Evaluate a bound expression against one row. Null operands propagate
    /// to a null result before any operator runs.
    pub fn eval(expr: &Expression, row: &Row) -> PlanResult<Datum> {
        match expr {
            Expression::Literal(datum) => Ok(datum.clone()),
            Expression::SymbolRef(symbol) => Err(PlanError::InterpretingError(format!(
                "trying to evaluate unbound symbol {symbol}"
            ))),
            Expression::ChannelRef { channel, .. } => row.get_field(*channel),
            Expression::BinaryOp { op, left, right } => {
                let (left, right) = (Self::eval(left, row)?, Self::eval(right, row)?);
                if left.is_null() || right.is_null() {
                    return Ok(Datum::Null);
                }
                match op {
                    BinaryOp::Plus => plus_impl(left, right),
                    BinaryOp::Minus => minus_impl(left, right),
                    BinaryOp::Divide => divide_impl(left, right),
                    BinaryOp::Multiply => multiply_impl(left, right),
                    BinaryOp::Gt => gt_impl(left, right),
                    BinaryOp::Gte => gte_impl(left, right),
                    BinaryOp::Eq => eq_impl(left, right),
                    BinaryOp::Lt => lt_impl(left, right),
                    BinaryOp::Lte => lte_impl(left, right),
                    BinaryOp::And => and_impl(left, right),
                    BinaryOp::Or => or_impl(left, right),
                }
            }
            Expression::UnaryOp { op, input } => {
                let input = Self::eval(input, row)?;
                if input.is_null() {
                    return Ok(Datum::Null);
                }
                match op {
                    UnaryOp::Not => not_impl(input),
                    UnaryOp::Neg => negative_impl(input),
                }
            }
        }
    }
}
