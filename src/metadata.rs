use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::aggregates::{
    Accumulator, AccumulatorFactory, AvgAccumulator, CountAccumulator, MaxAccumulator,
    MinAccumulator, SumAccumulator,
};
use crate::data_types::DataType;
use crate::symbols::Channel;
use crate::{PlanError, PlanResult};

/// Identifier the analyzer assigned to a resolved function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionHandle {
    name: String,
}

impl FunctionHandle {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionHandle { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for FunctionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One aggregate argument after channel resolution.
#[derive(Debug, Clone, Copy)]
pub struct AggregateInput {
    pub channel: Channel,
    pub data_type: DataType,
}

/// Accumulator factory plus its output types, produced by binding a
/// descriptor to concrete argument channels.
pub struct BoundFunction {
    pub factory: AccumulatorFactory,
    pub intermediate_type: DataType,
    pub final_type: DataType,
}

type FunctionBinder = Rc<dyn Fn(&[AggregateInput]) -> PlanResult<BoundFunction>>;

/// Descriptor for one registered aggregate function.
#[derive(Clone)]
pub struct AggregateFunction {
    name: String,
    binder: FunctionBinder,
}

impl AggregateFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bind(&self, inputs: &[AggregateInput]) -> PlanResult<BoundFunction> {
        (self.binder)(inputs)
    }
}

/// Resolves function handles to aggregate descriptors.
pub struct FunctionRegistry {
    functions: HashMap<String, AggregateFunction>,
}

impl FunctionRegistry {
    /// Registry with the built-in aggregates: count, sum, min, max, avg.
    pub fn standard() -> Self {
        let mut registry = FunctionRegistry {
            functions: HashMap::new(),
        };
        registry.register(
            "count",
            Rc::new(|inputs| {
                let input = single_input("count", inputs)?;
                Ok(BoundFunction {
                    factory: Rc::new(move || {
                        Box::new(CountAccumulator::new(input.channel)) as Box<dyn Accumulator>
                    }),
                    intermediate_type: DataType::Int64,
                    final_type: DataType::Int64,
                })
            }),
        );
        registry.register(
            "sum",
            Rc::new(|inputs| {
                let input = single_input("sum", inputs)?;
                Ok(BoundFunction {
                    factory: Rc::new(move || {
                        Box::new(SumAccumulator::new(input.channel)) as Box<dyn Accumulator>
                    }),
                    intermediate_type: input.data_type,
                    final_type: input.data_type,
                })
            }),
        );
        registry.register(
            "min",
            Rc::new(|inputs| {
                let input = single_input("min", inputs)?;
                Ok(BoundFunction {
                    factory: Rc::new(move || {
                        Box::new(MinAccumulator::new(input.channel)) as Box<dyn Accumulator>
                    }),
                    intermediate_type: input.data_type,
                    final_type: input.data_type,
                })
            }),
        );
        registry.register(
            "max",
            Rc::new(|inputs| {
                let input = single_input("max", inputs)?;
                Ok(BoundFunction {
                    factory: Rc::new(move || {
                        Box::new(MaxAccumulator::new(input.channel)) as Box<dyn Accumulator>
                    }),
                    intermediate_type: input.data_type,
                    final_type: input.data_type,
                })
            }),
        );
        registry.register(
            "avg",
            Rc::new(|inputs| {
                let input = single_input("avg", inputs)?;
                Ok(BoundFunction {
                    factory: Rc::new(move || {
                        Box::new(AvgAccumulator::new(input.channel)) as Box<dyn Accumulator>
                    }),
                    intermediate_type: DataType::Binary,
                    final_type: DataType::Float64,
                })
            }),
        );
        registry
    }

    fn register(&mut self, name: &str, binder: FunctionBinder) {
        self.functions.insert(
            name.to_string(),
            AggregateFunction {
                name: name.to_string(),
                binder,
            },
        );
    }

    pub fn get_function(&self, handle: &FunctionHandle) -> PlanResult<&AggregateFunction> {
        self.functions.get(handle.name()).ok_or_else(|| {
            PlanError::Unknown(format!("function {} is not registered", handle.name()))
        })
    }
}

fn single_input(name: &str, inputs: &[AggregateInput]) -> PlanResult<AggregateInput> {
    match inputs {
        [input] => Ok(*input),
        _ => Err(PlanError::UnsupportedShape(format!(
            "{name} takes exactly one argument, got {}",
            inputs.len()
        ))),
    }
}
