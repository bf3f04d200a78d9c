use std::any::Any;

use crate::{
    bindings::{FilterFunction, ProjectionFunction},
    row::Row,
    PlanResult,
};

use super::PhysicalPlan;

/// Fused filter and projection over one child. Rows failing the filter are
/// dropped; surviving rows are rebuilt one projection per output channel.
pub struct FilterAndProject {
    filter: FilterFunction,
    projections: Vec<ProjectionFunction>,
    child: Box<dyn PhysicalPlan>,
}

impl FilterAndProject {
    pub fn new(
        filter: FilterFunction,
        projections: Vec<ProjectionFunction>,
        child: Box<dyn PhysicalPlan>,
    ) -> Self {
        Self {
            filter,
            projections,
            child,
        }
    }
}

impl PhysicalPlan for FilterAndProject {
    fn setup(&mut self) -> PlanResult<()> {
        self.child.setup()
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        while let Some(row) = self.child.next()? {
            if !self.filter.matches(&row)? {
                continue;
            }
            let mut fields = Vec::with_capacity(self.projections.len());
            for projection in &self.projections {
                fields.push(projection.project(&row)?);
            }
            return Ok(Some(Row::new(fields)));
        }
        Ok(None)
    }

    fn channel_count(&self) -> usize {
        self.projections.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
