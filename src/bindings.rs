use std::collections::HashMap;

use crate::data_types::DataType;
use crate::expressions::Expression;
use crate::interpreter::Interpreter;
use crate::row::{Datum, Row};
use crate::symbols::{Channel, ChannelMapping, Symbol};
use crate::{PlanError, PlanResult};

/// Declared type of every symbol in the query, supplied by the analyzer.
pub type SymbolTypes = HashMap<Symbol, DataType>;

/// Compiled projection: either a direct copy of one input channel or an
/// interpreted expression whose symbol references were rewritten to channels
/// at bind time.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionFunction {
    SingleColumn {
        channel: Channel,
        data_type: DataType,
    },
    Interpreted {
        expr: Expression,
        data_type: DataType,
    },
}

impl ProjectionFunction {
    pub fn single_column(channel: Channel, data_type: DataType) -> Self {
        ProjectionFunction::SingleColumn { channel, data_type }
    }

    pub fn project(&self, row: &Row) -> PlanResult<Datum> {
        match self {
            ProjectionFunction::SingleColumn { channel, .. } => row.get_field(*channel),
            ProjectionFunction::Interpreted { expr, .. } => Interpreter::eval(expr, row),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ProjectionFunction::SingleColumn { data_type, .. } => *data_type,
            ProjectionFunction::Interpreted { data_type, .. } => *data_type,
        }
    }
}

/// Compiled predicate: constant-true pass-through or a bound expression.
/// A null predicate result filters the row out.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterFunction {
    True,
    Interpreted(Expression),
}

impl FilterFunction {
    pub fn matches(&self, row: &Row) -> PlanResult<bool> {
        match self {
            FilterFunction::True => Ok(true),
            FilterFunction::Interpreted(expr) => match Interpreter::eval(expr, row)? {
                Datum::Boolean(v) => Ok(v),
                Datum::Null => Ok(false),
                other => Err(PlanError::InterpretingError(format!(
                    "filter evaluated to non-boolean value {other}"
                ))),
            },
        }
    }
}

/// Bare column references skip the interpreter entirely.
pub fn bind_projection(
    expr: &Expression,
    output_type: DataType,
    mapping: &ChannelMapping,
    types: &SymbolTypes,
) -> PlanResult<ProjectionFunction> {
    match expr {
        Expression::SymbolRef(symbol) => Ok(ProjectionFunction::SingleColumn {
            channel: mapping.channel(symbol)?,
            data_type: output_type,
        }),
        Expression::ChannelRef { channel, .. } => Ok(ProjectionFunction::SingleColumn {
            channel: *channel,
            data_type: output_type,
        }),
        other => Ok(ProjectionFunction::Interpreted {
            expr: bind_expression(other, mapping, types)?,
            data_type: output_type,
        }),
    }
}

pub fn bind_predicate(
    expr: &Expression,
    mapping: &ChannelMapping,
    types: &SymbolTypes,
) -> PlanResult<FilterFunction> {
    Ok(FilterFunction::Interpreted(bind_expression(
        expr, mapping, types,
    )?))
}

/// Rewrite every symbol reference to its channel, failing on symbols the
/// mapping does not cover.
pub fn bind_expression(
    expr: &Expression,
    mapping: &ChannelMapping,
    types: &SymbolTypes,
) -> PlanResult<Expression> {
    match expr {
        Expression::Literal(_) | Expression::ChannelRef { .. } => Ok(expr.clone()),
        Expression::SymbolRef(symbol) => Ok(Expression::ChannelRef {
            channel: mapping.channel(symbol)?,
            data_type: types.get(symbol).copied().unwrap_or(DataType::Unknown),
        }),
        Expression::BinaryOp { op, left, right } => Ok(Expression::BinaryOp {
            op: *op,
            left: Box::new(bind_expression(left, mapping, types)?),
            right: Box::new(bind_expression(right, mapping, types)?),
        }),
        Expression::UnaryOp { op, input } => Ok(Expression::UnaryOp {
            op: *op,
            input: Box::new(bind_expression(input, mapping, types)?),
        }),
    }
}
