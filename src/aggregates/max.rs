use std::cmp::Ordering;

use crate::interpreter::cmp_impl;
use crate::row::{Datum, Row};
use crate::symbols::Channel;
use crate::PlanResult;

use super::Accumulator;

/// Running maximum over one channel; partial maximums merge the same way.
pub struct MaxAccumulator {
    channel: Channel,
    max: Option<Datum>,
}

impl MaxAccumulator {
    pub fn new(channel: Channel) -> Self {
        MaxAccumulator { channel, max: None }
    }

    fn accumulate(&mut self, value: Datum) -> PlanResult<()> {
        if value.is_null() {
            return Ok(());
        }
        self.max = Some(match self.max.take() {
            None => value,
            Some(max) => {
                if cmp_impl(&value, &max)? == Ordering::Greater {
                    value
                } else {
                    max
                }
            }
        });
        Ok(())
    }
}

impl Accumulator for MaxAccumulator {
    fn add_input(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        self.accumulate(value)
    }

    fn add_intermediate(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        self.accumulate(value)
    }

    fn intermediate(&self) -> PlanResult<Datum> {
        Ok(self.max.clone().unwrap_or(Datum::Null))
    }

    fn final_value(&self) -> PlanResult<Datum> {
        Ok(self.max.clone().unwrap_or(Datum::Null))
    }
}
