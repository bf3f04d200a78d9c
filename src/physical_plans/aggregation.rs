use std::any::Any;

use crate::{
    aggregates::{Accumulator, BoundAggregate},
    row::Row,
    PlanResult,
};

use super::PhysicalPlan;

/// Aggregation without grouping. Drains the child into one accumulator per
/// bound aggregate and emits exactly one row, even over empty input.
pub struct Aggregation {
    aggregates: Vec<BoundAggregate>,
    child: Box<dyn PhysicalPlan>,
    done: bool,
}

impl Aggregation {
    pub fn new(aggregates: Vec<BoundAggregate>, child: Box<dyn PhysicalPlan>) -> Self {
        Self {
            aggregates,
            child,
            done: false,
        }
    }
}

impl PhysicalPlan for Aggregation {
    fn setup(&mut self) -> PlanResult<()> {
        self.child.setup()
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        if self.done {
            return Ok(None);
        }
        let mut accumulators: Vec<Box<dyn Accumulator>> = self
            .aggregates
            .iter()
            .map(|aggregate| aggregate.new_accumulator())
            .collect();
        while let Some(row) = self.child.next()? {
            for (aggregate, accumulator) in
                self.aggregates.iter().zip(accumulators.iter_mut())
            {
                aggregate.add(accumulator.as_mut(), &row)?;
            }
        }
        let mut fields = Vec::with_capacity(self.aggregates.len());
        for (aggregate, accumulator) in self.aggregates.iter().zip(accumulators.iter()) {
            fields.push(aggregate.output(accumulator.as_ref())?);
        }
        self.done = true;
        Ok(Some(Row::new(fields)))
    }

    fn channel_count(&self) -> usize {
        self.aggregates.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
