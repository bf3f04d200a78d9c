use std::any::Any;

use crate::{
    row::{Datum, Row},
    PlanError, PlanResult,
};

use super::PhysicalPlan;

const MAX_BUFFERED_ROWS: usize = 1_000_000;

/// Fully materializing single-channel sort. The child is drained and
/// ordered before the first row comes out, so the buffer is capped.
pub struct Sort {
    sort_channel: usize,
    ascending: bool,
    output_channels: Vec<usize>,
    child: Box<dyn PhysicalPlan>,
    acc_buffer: Option<Vec<(Datum, Row)>>,
    output_buffer: Option<Box<dyn Iterator<Item = Row>>>,
}

impl Sort {
    pub fn new(
        sort_channel: usize,
        ascending: bool,
        output_channels: Vec<usize>,
        child: Box<dyn PhysicalPlan>,
    ) -> Self {
        Self {
            sort_channel,
            ascending,
            output_channels,
            child,
            acc_buffer: Some(vec![]),
            output_buffer: None,
        }
    }

    fn try_pull(&mut self) -> PlanResult<()> {
        if let Some(buffer) = &mut self.acc_buffer {
            // drain child outputs, keeping the sort key alongside each row
            while let Some(row) = self.child.next()? {
                if buffer.len() >= MAX_BUFFERED_ROWS {
                    return Err(PlanError::ResourceExhausted(format!(
                        "sort buffer exceeded {MAX_BUFFERED_ROWS} rows"
                    )));
                }
                let key = row.get_field(self.sort_channel)?;
                buffer.push((key, row));
            }

            if self.ascending {
                buffer.sort_by(|left, right| left.0.sort_key_cmp(&right.0));
            } else {
                buffer.sort_by(|left, right| right.0.sort_key_cmp(&left.0));
            }

            // move on to push stage, narrowed to the output channels
            let mut rows = Vec::with_capacity(buffer.len());
            for (_key, row) in buffer.iter() {
                let mut fields = Vec::with_capacity(self.output_channels.len());
                for channel in &self.output_channels {
                    fields.push(row.get_field(*channel)?);
                }
                rows.push(Row::new(fields));
            }
            self.acc_buffer = None;
            self.output_buffer = Some(Box::new(rows.into_iter()));
        }
        Ok(())
    }

    fn try_push(&mut self) -> PlanResult<Option<Row>> {
        if let Some(iter) = &mut self.output_buffer {
            Ok(iter.next())
        } else {
            Err(PlanError::Unknown("should never happen".to_string()))
        }
    }
}

impl PhysicalPlan for Sort {
    fn setup(&mut self) -> PlanResult<()> {
        self.child.setup()
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        self.try_pull()?;
        self.try_push()
    }

    fn channel_count(&self) -> usize {
        self.output_channels.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
