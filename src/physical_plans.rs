mod aggregation;
mod csv_scan;
mod filter_project;
mod hash_aggregation;
mod hash_join;
mod inmem_scan;
mod limit;
mod sort;
mod top_n;

use std::any::Any;

use crate::{errors::PlanResult, row::Row};

pub use aggregation::Aggregation;
pub use csv_scan::{CsvScan, CsvSplitReader};
pub use filter_project::FilterAndProject;
pub use hash_aggregation::HashAggregation;
pub use hash_join::{HashJoin, JoinHash, JoinHashFactory, JoinHashProvider};
pub use inmem_scan::InMemScan;
pub use limit::Limit;
pub use sort::Sort;
pub use top_n::TopN;

/// Pull-based operator over rows. Exhausted operators stay exhausted;
/// restarting a query means compiling a fresh plan.
pub trait PhysicalPlan {
    /// Setup this plan node, e.g. prepare some resources etc.
    fn setup(&mut self) -> PlanResult<()>;
    /// Acting like an iterator to get the next row if present.
    fn next(&mut self) -> PlanResult<Option<Row>>;
    /// Width of the rows this operator emits.
    fn channel_count(&self) -> usize;
    /// Concrete operator behind the trait object, for callers that need
    /// to look through pass-throughs.
    fn as_any(&self) -> &dyn Any;
}

/// Set up, then pull until exhausted.
pub fn drain(plan: &mut dyn PhysicalPlan) -> PlanResult<Vec<Row>> {
    plan.setup()?;
    let mut rows = Vec::new();
    while let Some(row) = plan.next()? {
        rows.push(row);
    }
    Ok(rows)
}
