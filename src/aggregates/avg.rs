use crate::row::{Datum, Row};
use crate::symbols::Channel;
use crate::{PlanError, PlanResult};

use super::Accumulator;

/// Average needs two running values, so its intermediate state is the sum and
/// count packed into one 16-byte binary datum (f64 sum, u64 count, both
/// little endian).
pub struct AvgAccumulator {
    channel: Channel,
    sum: f64,
    count: u64,
}

impl AvgAccumulator {
    pub fn new(channel: Channel) -> Self {
        AvgAccumulator {
            channel,
            sum: 0.0,
            count: 0,
        }
    }

    fn unpack(bytes: &[u8]) -> PlanResult<(f64, u64)> {
        if bytes.len() != 16 {
            return Err(PlanError::InterpretingError(format!(
                "avg intermediate state must be 16 bytes, got {}",
                bytes.len()
            )));
        }
        let mut sum = [0u8; 8];
        sum.copy_from_slice(&bytes[..8]);
        let mut count = [0u8; 8];
        count.copy_from_slice(&bytes[8..]);
        Ok((f64::from_le_bytes(sum), u64::from_le_bytes(count)))
    }
}

impl Accumulator for AvgAccumulator {
    fn add_input(&mut self, row: &Row) -> PlanResult<()> {
        let value = row.get_field(self.channel)?;
        if value.is_null() {
            return Ok(());
        }
        match value.to_f64() {
            Some(v) => {
                self.sum += v;
                self.count += 1;
                Ok(())
            }
            None => Err(PlanError::InterpretingError(format!(
                "avg not implemented for {value:?}"
            ))),
        }
    }

    fn add_intermediate(&mut self, row: &Row) -> PlanResult<()> {
        match row.get_field(self.channel)? {
            Datum::Binary(bytes) => {
                let (sum, count) = Self::unpack(&bytes)?;
                self.sum += sum;
                self.count += count;
                Ok(())
            }
            Datum::Null => Ok(()),
            other => Err(PlanError::InterpretingError(format!(
                "avg intermediate state must be Binary, got {other:?}"
            ))),
        }
    }

    fn intermediate(&self) -> PlanResult<Datum> {
        let mut bytes = Vec::with_capacity(16);
        bytes.extend_from_slice(&self.sum.to_le_bytes());
        bytes.extend_from_slice(&self.count.to_le_bytes());
        Ok(Datum::Binary(bytes))
    }

    fn final_value(&self) -> PlanResult<Datum> {
        if self.count == 0 {
            Ok(Datum::Null)
        } else {
            Ok(Datum::Float64(self.sum / self.count as f64))
        }
    }
}
