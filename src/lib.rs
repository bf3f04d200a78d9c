pub mod aggregates;
pub mod bindings;
pub mod data_types;
mod errors;
pub mod events;
pub mod expressions;
pub mod interpreter;
pub mod logical_plans;
pub mod metadata;
pub mod physical_plans;
pub mod planner;
pub mod row;
pub mod sources;
pub mod stats;
pub mod symbols;

pub use errors::*;
pub use planner::LocalExecutionPlanner;

use serde::Serialize;

use crate::row::Row;

/// Materialized output of one executed plan.
#[derive(Debug, PartialEq, Serialize)]
pub struct ResultSet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn empty() -> Self {
        ResultSet {
            headers: vec![],
            rows: vec![],
        }
    }

    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        ResultSet { headers, rows }
    }
}
