use std::any::Any;

use crate::{row::Row, PlanResult};

use super::PhysicalPlan;

/// Scan over rows already buffered in memory, optionally narrowing each
/// row to a subset of its channels.
pub struct InMemScan {
    data: Vec<Row>,
    channels: Option<Vec<usize>>,
    width: usize,
    next: usize,
}

impl InMemScan {
    /// Emit only `channels` of each buffered row, in that order.
    pub fn projected(data: Vec<Row>, channels: Vec<usize>) -> Self {
        let width = channels.len();
        Self {
            data,
            channels: Some(channels),
            width,
            next: 0,
        }
    }

    /// Emit buffered rows as they are laid out.
    pub fn raw(data: Vec<Row>, width: usize) -> Self {
        Self {
            data,
            channels: None,
            width,
            next: 0,
        }
    }
}

impl PhysicalPlan for InMemScan {
    // FIXME: avoid copying data for snapshot reading
    fn setup(&mut self) -> PlanResult<()> {
        Ok(())
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        if self.next >= self.data.len() {
            return Ok(None);
        }
        let row = &self.data[self.next];
        self.next += 1;
        match &self.channels {
            None => Ok(Some(row.clone())),
            Some(channels) => {
                let mut fields = Vec::with_capacity(channels.len());
                for channel in channels {
                    fields.push(row.get_field(*channel)?);
                }
                Ok(Some(Row::new(fields)))
            }
        }
    }

    fn channel_count(&self) -> usize {
        self.width
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
