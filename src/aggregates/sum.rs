use crate::interpreter::plus_impl;
use crate::row::{Datum, Row};
use crate::symbols::Channel;
use crate::PlanResult;

use super::Accumulator;

/// Running sum over one channel. Partial sums merge with the same addition,
/// so the intermediate state is just the sum so far.
pub struct SumAccumulator {
    channel: Channel,
    sum: Option<Datum>,
}

impl SumAccumulator {
    pub fn new(channel: Channel) -> Self {
        SumAccumulator { channel, sum: None }
    }

    fn accumulate(&mut self, value: Datum) -> PlanResult<()> {
        if value.is_null() {
            return Ok(());
        }
        self.sum = Some(match self.sum.take() {
            None => value,
            Some(sum) => plus_impl(sum, value)?,
        });
        Ok(())
    }
}

impl Accumulator for SumAccumulator {
    fn add_input(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        self.accumulate(value)
    }

    fn add_intermediate(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        self.accumulate(value)
    }

    fn intermediate(&self) -> PlanResult<Datum> {
        Ok(self.sum.clone().unwrap_or(Datum::Null))
    }

    fn final_value(&self) -> PlanResult<Datum> {
        Ok(self.sum.clone().unwrap_or(Datum::Null))
    }
}
