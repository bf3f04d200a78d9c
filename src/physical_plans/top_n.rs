use std::any::Any;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{
    row::{Datum, Row},
    PlanError, PlanResult,
};

use super::PhysicalPlan;

/// One buffered candidate. Orders so that the heap's max is the row that
/// falls out first when a better candidate arrives.
struct HeapEntry {
    key: Datum,
    row: Row,
    ascending: bool,
}

impl HeapEntry {
    fn rank(&self, other: &Self) -> Ordering {
        let ordering = self.key.sort_key_cmp(&other.key);
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.rank(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

/// Keeps only the `count` best rows under the declared ordering, never
/// buffering more than that many rows at once.
pub struct TopN {
    count: usize,
    sort_channel: usize,
    ascending: bool,
    output_channels: Vec<usize>,
    child: Box<dyn PhysicalPlan>,
    acc_buffer: Option<BinaryHeap<HeapEntry>>,
    output_buffer: Option<Box<dyn Iterator<Item = Row>>>,
}

impl TopN {
    pub fn new(
        count: usize,
        sort_channel: usize,
        ascending: bool,
        output_channels: Vec<usize>,
        child: Box<dyn PhysicalPlan>,
    ) -> Self {
        Self {
            count,
            sort_channel,
            ascending,
            output_channels,
            child,
            acc_buffer: Some(BinaryHeap::new()),
            output_buffer: None,
        }
    }

    fn try_pull(&mut self) -> PlanResult<()> {
        if let Some(heap) = &mut self.acc_buffer {
            while let Some(row) = self.child.next()? {
                let key = row.get_field(self.sort_channel)?;
                let entry = HeapEntry {
                    key,
                    row,
                    ascending: self.ascending,
                };
                if heap.len() < self.count {
                    heap.push(entry);
                } else if let Some(worst) = heap.peek() {
                    if entry.rank(worst) == Ordering::Less {
                        heap.pop();
                        heap.push(entry);
                    }
                }
            }

            // best-to-worst, narrowed to the output channels
            let entries = std::mem::take(heap).into_sorted_vec();
            let mut rows = Vec::with_capacity(entries.len());
            for entry in entries {
                let mut fields = Vec::with_capacity(self.output_channels.len());
                for channel in &self.output_channels {
                    fields.push(entry.row.get_field(*channel)?);
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

impl PhysicalPlan for TopN {
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
