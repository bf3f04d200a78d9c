mod avg;
mod count;
mod max;
mod min;
mod sum;

pub use avg::AvgAccumulator;
pub use count::CountAccumulator;
pub use max::MaxAccumulator;
pub use min::MinAccumulator;
pub use sum::SumAccumulator;

use std::rc::Rc;

use crate::bindings::SymbolTypes;
use crate::data_types::DataType;
use crate::expressions::Expression;
use crate::logical_plans::AggregateCall;
use crate::metadata::{AggregateInput, FunctionRegistry};
use crate::row::{Datum, Row};
use crate::symbols::ChannelMapping;
use crate::{PlanError, PlanResult};

/// Which portion of a distributed aggregation this node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// consume raw input, emit mergeable intermediate state
    Partial,
    /// consume intermediate state, emit the final value
    Final,
    /// both in one pass
    Single,
}

/// Stateful accumulator for one aggregate call. Raw input rows arrive through
/// `add_input`, partial states produced upstream through `add_intermediate`.
pub trait Accumulator {
    fn add_input(&mut self, row: &Row) -> PlanResult<()>;

    fn add_intermediate(&mut self, row: &Row) -> PlanResult<()>;

    fn intermediate(&self) -> PlanResult<Datum>;

    fn final_value(&self) -> PlanResult<Datum>;
}

pub type AccumulatorFactory = Rc<dyn Fn() -> Box<dyn Accumulator>>;

/// An aggregate call bound to its argument channels plus the execution step,
/// cheap to instantiate once per group.
#[derive(Clone)]
pub struct BoundAggregate {
    factory: AccumulatorFactory,
    step: Step,
    intermediate_type: DataType,
    final_type: DataType,
}

impl BoundAggregate {
    pub fn new(
        factory: AccumulatorFactory,
        step: Step,
        intermediate_type: DataType,
        final_type: DataType,
    ) -> Self {
        BoundAggregate {
            factory,
            step,
            intermediate_type,
            final_type,
        }
    }

    pub fn new_accumulator(&self) -> Box<dyn Accumulator> {
        (self.factory)()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn add(&self, accumulator: &mut dyn Accumulator, row: &Row) -> PlanResult<()> {
        match self.step {
            Step::Partial | Step::Single => accumulator.add_input(row),
            Step::Final => accumulator.add_intermediate(row),
        }
    }

    pub fn output(&self, accumulator: &dyn Accumulator) -> PlanResult<Datum> {
        match self.step {
            Step::Partial => accumulator.intermediate(),
            Step::Final | Step::Single => accumulator.final_value(),
        }
    }

    pub fn output_type(&self) -> DataType {
        match self.step {
            Step::Partial => self.intermediate_type,
            Step::Final | Step::Single => self.final_type,
        }
    }
}

/// Bind one aggregate call against the child's channel mapping. Every
/// argument must be a bare symbol the mapping can resolve.
pub fn bind_aggregate(
    call: &AggregateCall,
    mapping: &ChannelMapping,
    step: Step,
    registry: &FunctionRegistry,
    types: &SymbolTypes,
) -> PlanResult<BoundAggregate> {
    let mut inputs = Vec::with_capacity(call.args.len());
    for arg in &call.args {
        match arg {
            Expression::SymbolRef(symbol) => inputs.push(AggregateInput {
                channel: mapping.channel(symbol)?,
                data_type: types.get(symbol).copied().unwrap_or(DataType::Unknown),
            }),
            other => {
                return Err(PlanError::UnsupportedShape(format!(
                    "aggregate argument must be a bare symbol reference, got {other}"
                )))
            }
        }
    }
    let function = registry.get_function(&call.function)?;
    let bound = function.bind(&inputs)?;
    Ok(BoundAggregate::new(
        bound.factory,
        step,
        bound.intermediate_type,
        bound.final_type,
    ))
}
