use std::collections::HashMap;
use std::fmt::Display;

use crate::aggregates::Step;
use crate::expressions::Expression;
use crate::metadata::FunctionHandle;
use crate::sources::{ColumnHandle, TableHandle};
use crate::symbols::Symbol;

/// Identity of a plan node, unique within one fragment. Join providers are
/// registered under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanNodeId(String);

impl PlanNodeId {
    pub fn new(id: impl Into<String>) -> Self {
        PlanNodeId(id.into())
    }
}

impl Display for PlanNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrdering {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    /// unmatched probe rows survive, null-extended across the build columns
    LeftOuter,
}

/// One aggregate output: the resolved function and its argument expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub function: FunctionHandle,
    pub args: Vec<Expression>,
}

/// Logical plan tree as handed over by the analyzer: already validated and
/// typed, immutable during compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    TableScan {
        table: TableHandle,
        output_symbols: Vec<Symbol>,
        assignments: HashMap<Symbol, ColumnHandle>,
    },
    Project {
        /// output symbol and the expression producing it, in declared order
        outputs: Vec<(Symbol, Expression)>,
        child: Box<LogicalPlan>,
    },
    Filter {
        predicate: Expression,
        child: Box<LogicalPlan>,
    },
    Output {
        /// result column name and the symbol backing it, in declared order
        columns: Vec<(String, Symbol)>,
        child: Box<LogicalPlan>,
    },
    Aggregation {
        aggregates: Vec<(Symbol, AggregateCall)>,
        group_by: Vec<Symbol>,
        step: Step,
        child: Box<LogicalPlan>,
    },
    Limit {
        count: usize,
        child: Box<LogicalPlan>,
    },
    TopN {
        count: usize,
        order_by: Vec<(Symbol, SortOrdering)>,
        child: Box<LogicalPlan>,
    },
    Sort {
        order_by: Vec<(Symbol, SortOrdering)>,
        child: Box<LogicalPlan>,
    },
    Exchange {
        source_fragment_id: String,
        output_symbols: Vec<Symbol>,
    },
    Join {
        id: PlanNodeId,
        kind: JoinKind,
        /// restricted to one equality between a probe and a build symbol
        criteria: Expression,
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
    },
    /// Fragment boundary: output handed to the transport layer, never
    /// pull-compiled locally.
    Sink { child: Box<LogicalPlan> },
}

impl LogicalPlan {
    /// Ordered output symbols this node declares; parents resolve channels
    /// against this sequence.
    pub fn output_symbols(&self) -> Vec<Symbol> {
        match self {
            LogicalPlan::TableScan { output_symbols, .. } => output_symbols.clone(),
            LogicalPlan::Project { outputs, .. } => {
                outputs.iter().map(|(symbol, _)| symbol.clone()).collect()
            }
            LogicalPlan::Filter { child, .. } => child.output_symbols(),
            LogicalPlan::Output { columns, .. } => {
                columns.iter().map(|(_, symbol)| symbol.clone()).collect()
            }
            LogicalPlan::Aggregation {
                aggregates,
                group_by,
                ..
            } => group_by
                .iter()
                .cloned()
                .chain(aggregates.iter().map(|(symbol, _)| symbol.clone()))
                .collect(),
            LogicalPlan::Limit { child, .. } => child.output_symbols(),
            LogicalPlan::TopN { child, .. } => child.output_symbols(),
            LogicalPlan::Sort { child, .. } => child.output_symbols(),
            LogicalPlan::Exchange { output_symbols, .. } => output_symbols.clone(),
            LogicalPlan::Join { left, right, .. } => {
                let mut symbols = left.output_symbols();
                symbols.extend(right.output_symbols());
                symbols
            }
            LogicalPlan::Sink { child } => child.output_symbols(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LogicalPlan::TableScan { .. } => "TableScan",
            LogicalPlan::Project { .. } => "Project",
            LogicalPlan::Filter { .. } => "Filter",
            LogicalPlan::Output { .. } => "Output",
            LogicalPlan::Aggregation { .. } => "Aggregation",
            LogicalPlan::Limit { .. } => "Limit",
            LogicalPlan::TopN { .. } => "TopN",
            LogicalPlan::Sort { .. } => "Sort",
            LogicalPlan::Exchange { .. } => "Exchange",
            LogicalPlan::Join { .. } => "Join",
            LogicalPlan::Sink { .. } => "Sink",
        }
    }
}
