use crate::row::{Datum, Row};
use crate::symbols::Channel;
use crate::{PlanError, PlanResult};

use super::Accumulator;

/// Non-null count over one channel. The intermediate state is a partial
/// count, merged by addition.
pub struct CountAccumulator {
    channel: Channel,
    count: i64,
}

impl CountAccumulator {
    pub fn new(channel: Channel) -> Self {
        CountAccumulator { channel, count: 0 }
    }
}

impl Accumulator for CountAccumulator {
    fn add_input(&mut self, row: &Row) -> PlanResult<()> {
        if !row.get_field(self.channel)?.is_null() {
            self.count += 1;
        }
        Ok(())
    }

    fn add_intermediate(&mut self, row: &Row) -> PlanResult<()> {
        match row.get_field(self.channel)? {
            Datum::Int64(partial) => {
                self.count += partial;
                Ok(())
            }
            Datum::Null => Ok(()),
            other => Err(PlanError::InterpretingError(format!(
                "count intermediate state must be Int64, got {other:?}"
            ))),
        }
    }

    fn intermediate(&self) -> PlanResult<Datum> {
        Ok(Datum::Int64(self.count))
    }

    fn final_value(&self) -> PlanResult<Datum> {
        Ok(Datum::Int64(self.count))
    }
}
