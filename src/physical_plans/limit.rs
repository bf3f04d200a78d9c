use std::any::Any;

use crate::{row::Row, PlanResult};

use super::PhysicalPlan;

/// Forwards at most `count` rows from the child, then stops pulling.
pub struct Limit {
    count: usize,
    child: Box<dyn PhysicalPlan>,
    pos: usize,
}

impl Limit {
    pub fn new(count: usize, child: Box<dyn PhysicalPlan>) -> Self {
        Self {
            count,
            child,
            pos: 0,
        }
    }
}

impl PhysicalPlan for Limit {
    fn setup(&mut self) -> PlanResult<()> {
        self.child.setup()
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        if self.pos >= self.count {
            return Ok(None);
        }
        match self.child.next()? {
            Some(row) => {
                self.pos += 1;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
