use std::any::Any;
use std::collections::{hash_map, HashMap};

use crate::{
    aggregates::{Accumulator, BoundAggregate},
    row::{Datum, Row},
    PlanError, PlanResult,
};

use super::PhysicalPlan;

/// Hash-grouped aggregation on a single group channel. Null group keys form
/// one group of their own. Each output row carries the group key first,
/// then one field per bound aggregate in declared order.
pub struct HashAggregation {
    group_channel: usize,
    aggregates: Vec<BoundAggregate>,
    child: Box<dyn PhysicalPlan>,
    buffers: Option<HashMap<Datum, Vec<Box<dyn Accumulator>>>>,
    iter: Option<hash_map::IntoIter<Datum, Vec<Box<dyn Accumulator>>>>,
}

impl HashAggregation {
    pub fn new(
        group_channel: usize,
        aggregates: Vec<BoundAggregate>,
        child: Box<dyn PhysicalPlan>,
    ) -> Self {
        Self {
            group_channel,
            aggregates,
            child,
            buffers: Some(HashMap::new()),
            iter: None,
        }
    }

    fn pull(&mut self) -> PlanResult<()> {
        let buffers = self
            .buffers
            .as_mut()
            .ok_or_else(|| PlanError::Unknown("should never happen".to_string()))?;
        // pulling
        while let Some(row) = self.child.next()? {
            let key = row.get_field(self.group_channel)?;
            match buffers.get_mut(&key) {
                Some(accumulators) => {
                    Self::process(&self.aggregates, &row, accumulators)?;
                }
                None => {
                    let mut accumulators = self
                        .aggregates
                        .iter()
                        .map(|aggregate| aggregate.new_accumulator())
                        .collect::<Vec<_>>();
                    Self::process(&self.aggregates, &row, &mut accumulators)?;
                    buffers.insert(key, accumulators);
                }
            };
        }
        self.iter = self.buffers.take().map(|buffers| buffers.into_iter());
        Ok(())
    }

    fn process(
        aggregates: &[BoundAggregate],
        input: &Row,
        accumulators: &mut [Box<dyn Accumulator>],
    ) -> PlanResult<()> {
        for (aggregate, accumulator) in aggregates.iter().zip(accumulators.iter_mut()) {
            aggregate.add(accumulator.as_mut(), input)?;
        }
        Ok(())
    }

    fn try_push(&mut self) -> PlanResult<Option<Row>> {
        let iter = self
            .iter
            .as_mut()
            .ok_or_else(|| PlanError::Unknown("should never happen".to_string()))?;
        match iter.next() {
            None => Ok(None),
            Some((key, accumulators)) => {
                let mut fields = Vec::with_capacity(1 + self.aggregates.len());
                fields.push(key);
                for (aggregate, accumulator) in
                    self.aggregates.iter().zip(accumulators.iter())
                {
                    fields.push(aggregate.output(accumulator.as_ref())?);
                }
                Ok(Some(Row::new(fields)))
            }
        }
    }
}

impl PhysicalPlan for HashAggregation {
    fn setup(&mut self) -> PlanResult<()> {
        self.child.setup()
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        if self.iter.is_none() {
            self.pull()?;
        }
        self.try_push()
    }

    fn channel_count(&self) -> usize {
        1 + self.aggregates.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
