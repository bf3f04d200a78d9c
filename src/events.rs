use std::io::Write;

use serde::Serialize;

use crate::{PlanError, PlanResult};

/// Accepts one event object at a time.
pub trait EventPoster<T> {
    fn post(&mut self, event: T) -> PlanResult<()>;
}

/// Produces events by handing them to a poster, one at a time.
pub trait EventGenerator<T> {
    fn generate(&self, poster: &mut dyn EventPoster<T>) -> PlanResult<()>;
}

/// Generator over a batch of already-materialized events.
pub struct StaticEventGenerator<T: Clone> {
    events: Vec<T>,
}

impl<T: Clone> StaticEventGenerator<T> {
    pub fn new(events: Vec<T>) -> Self {
        Self { events }
    }
}

impl<T: Clone> EventGenerator<T> for StaticEventGenerator<T> {
    fn generate(&self, poster: &mut dyn EventPoster<T>) -> PlanResult<()> {
        for event in &self.events {
            poster.post(event.clone())?;
        }
        Ok(())
    }
}

/// Streams everything a generator posts into one JSON array on `out`.
pub struct JsonEventWriter;

struct JsonPoster<'a, W: Write> {
    out: &'a mut W,
    first: bool,
}

impl<'a, T: Serialize, W: Write> EventPoster<T> for JsonPoster<'a, W> {
    fn post(&mut self, event: T) -> PlanResult<()> {
        if self.first {
            self.first = false;
        } else {
            self.out
                .write_all(b",")
                .map_err(|e| PlanError::Unknown(format!("event write failed: {e}")))?;
        }
        serde_json::to_writer(&mut *self.out, &event)
            .map_err(|e| PlanError::Unknown(format!("event serialization failed: {e}")))
    }
}

impl JsonEventWriter {
    pub fn write_events<T, W>(generator: &dyn EventGenerator<T>, out: &mut W) -> PlanResult<()>
    where
        T: Serialize,
        W: Write,
    {
        out.write_all(b"[")
            .map_err(|e| PlanError::Unknown(format!("event write failed: {e}")))?;
        let mut poster = JsonPoster {
            out: &mut *out,
            first: true,
        };
        generator.generate(&mut poster)?;
        out.write_all(b"]")
            .map_err(|e| PlanError::Unknown(format!("event write failed: {e}")))?;
        out.flush()
            .map_err(|e| PlanError::Unknown(format!("event flush failed: {e}")))
    }
}

/// Posted once per finished query by whoever ran the plan.
#[derive(Debug, Clone, Serialize)]
pub struct QueryCompletionEvent {
    pub query_id: String,
    pub output_rows: usize,
    pub wall_millis: u64,
}
