use std::cmp::Ordering;

use crate::interpreter::cmp_impl;
use crate::row::{Datum, Row};
use crate::symbols::Channel;
use crate::PlanResult;

use super::Accumulator;

/// Running minimum over one channel; partial minimums merge the same way.
pub struct MinAccumulator {
    channel: Channel,
    min: Option<Datum>,
}

impl MinAccumulator {
    pub fn new(channel: Channel) -> Self {
        MinAccumulator { channel, min: None }
    }

    fn accumulate(&mut self, value: Datum) -> PlanResult<()> {
        if value.is_null() {
            return Ok(());
        }
        self.min = Some(match self.min.take() {
            None => value,
            Some(min) => {
                if cmp_impl(&value, &min)? == Ordering::Less {
                    value
                } else {
                    min
                }
            }
        });
        Ok(())
    }
}

impl Accumulator for MinAccumulator {
    fn add_input(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        self.accumulate(value)
    }

    fn add_intermediate(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        self.accumulate(value)
    }

    fn intermediate(&self) -> PlanResult<Datum> {
        Ok(self.min.clone().unwrap_or(Datum::Null))
    }

    fn final_value(&self) -> PlanResult<Datum> {
        Ok(self.min.clone().unwrap_or(Datum::Null))
    }
}
