use std::fmt::Display;

use crate::data_types::DataType;
use crate::row::Datum;
use crate::symbols::{Channel, Symbol};

/// Scalar expression tree. Plans arrive with `SymbolRef` leaves; the binder
/// rewrites those to `ChannelRef` before any row is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Datum),
    SymbolRef(Symbol),
    ChannelRef {
        channel: Channel,
        data_type: DataType,
    },
    BinaryOp {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOp,
        input: Box<Expression>,
    },
}

impl Expression {
    pub fn symbol(name: impl Into<String>) -> Expression {
        Expression::SymbolRef(Symbol::new(name))
    }

    pub fn literal(datum: Datum) -> Expression {
        Expression::Literal(datum)
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, input: Expression) -> Expression {
        Expression::UnaryOp {
            op,
            input: Box::new(input),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Expression::Literal(datum) => datum.data_type(),
            Expression::SymbolRef(_) => DataType::Unknown,
            Expression::ChannelRef { data_type, .. } => *data_type,
            Expression::BinaryOp { op, left, .. } => {
                if op.is_boolean_op() {
                    DataType::Boolean
                } else {
                    left.data_type()
                }
            }
            Expression::UnaryOp { op, input } => match op {
                UnaryOp::Not => DataType::Boolean,
                UnaryOp::Neg => input.data_type(),
            },
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(datum) => datum.fmt(f),
            Expression::SymbolRef(symbol) => symbol.fmt(f),
            Expression::ChannelRef { channel, .. } => write!(f, "#{channel}"),
            Expression::BinaryOp { op, left, right } => write!(f, "({left} {op} {right})"),
            Expression::UnaryOp { op, input } => write!(f, "{op} {input}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Divide,
    Multiply,
    Gt,
    Gte,
    Eq,
    Lt,
    Lte,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_boolean_op(&self) -> bool {
        matches!(
            self,
            BinaryOp::Gt
                | BinaryOp::Gte
                | BinaryOp::Eq
                | BinaryOp::Lt
                | BinaryOp::Lte
                | BinaryOp::And
                | BinaryOp::Or
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Plus => "+".fmt(f),
            BinaryOp::Minus => "-".fmt(f),
            BinaryOp::Divide => "/".fmt(f),
            BinaryOp::Multiply => "*".fmt(f),
            BinaryOp::Gt => ">".fmt(f),
            BinaryOp::Gte => ">=".fmt(f),
            BinaryOp::Eq => "=".fmt(f),
            BinaryOp::Lt => "<".fmt(f),
            BinaryOp::Lte => "<=".fmt(f),
            BinaryOp::And => "AND".fmt(f),
            BinaryOp::Or => "OR".fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => "NOT".fmt(f),
            UnaryOp::Neg => "-".fmt(f),
        }
    }
}
