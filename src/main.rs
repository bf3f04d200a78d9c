use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use planck::data_types::DataType;
use planck::events::{JsonEventWriter, QueryCompletionEvent, StaticEventGenerator};
use planck::expressions::{BinaryOp, Expression};
use planck::logical_plans::{AggregateCall, LogicalPlan, SortOrdering};
use planck::metadata::FunctionHandle;
use planck::physical_plans::drain;
use planck::row::{Datum, Row};
use planck::sources::{ColumnHandle, LocalSourceProvider, TableHandle, TableSplit};
use planck::symbols::Symbol;
use planck::{aggregates::Step, LocalExecutionPlanner, ResultSet};

/// Compiles and runs a small grouped-aggregation query over a built-in
/// table, printing the result set as JSON.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let orders = TableHandle::new("orders");
    let provider = LocalSourceProvider::new();
    provider.register_table(
        orders.clone(),
        vec![
            Row::new(vec![
                Datum::String("apples".to_string()),
                Datum::Int64(10),
                Datum::Float64(12.5),
            ]),
            Row::new(vec![
                Datum::String("pears".to_string()),
                Datum::Int64(4),
                Datum::Float64(3.0),
            ]),
            Row::new(vec![
                Datum::String("apples".to_string()),
                Datum::Int64(1),
                Datum::Float64(1.25),
            ]),
            Row::new(vec![
                Datum::String("pears".to_string()),
                Datum::Int64(20),
                Datum::Float64(15.0),
            ]),
        ],
    )?;

    let item = Symbol::new("item");
    let quantity = Symbol::new("quantity");
    let total = Symbol::new("total_quantity");

    let scan = LogicalPlan::TableScan {
        table: orders.clone(),
        output_symbols: vec![item.clone(), quantity.clone()],
        assignments: HashMap::from([
            (
                item.clone(),
                ColumnHandle::new("item", 0, DataType::String),
            ),
            (
                quantity.clone(),
                ColumnHandle::new("quantity", 1, DataType::Int64),
            ),
        ]),
    };
    let filtered = LogicalPlan::Filter {
        predicate: Expression::binary(
            BinaryOp::Gt,
            Expression::symbol("quantity"),
            Expression::literal(Datum::Int64(2)),
        ),
        child: Box::new(scan),
    };
    let aggregated = LogicalPlan::Aggregation {
        aggregates: vec![(
            total.clone(),
            AggregateCall {
                function: FunctionHandle::new("sum"),
                args: vec![Expression::symbol("quantity")],
            },
        )],
        group_by: vec![item.clone()],
        step: Step::Single,
        child: Box::new(filtered),
    };
    let sorted = LogicalPlan::Sort {
        order_by: vec![(total.clone(), SortOrdering::Descending)],
        child: Box::new(aggregated),
    };
    let output = LogicalPlan::Output {
        columns: vec![
            ("item".to_string(), item.clone()),
            ("total_quantity".to_string(), total.clone()),
        ],
        child: Box::new(sorted),
    };

    let types = HashMap::from([
        (item, DataType::String),
        (quantity, DataType::Int64),
        (total, DataType::Int64),
    ]);
    let planner = LocalExecutionPlanner::new(Arc::new(provider), types)
        .with_table_splits(HashMap::from([(
            orders.clone(),
            TableSplit::InMemory { table: orders },
        )]));

    log::debug!("compiling plan rooted at {}", output.type_name());
    let started = Instant::now();
    let mut plan = planner.compile(&output)?;
    let rows = drain(plan.as_mut())?;
    let wall_millis = started.elapsed().as_millis() as u64;

    let result = ResultSet::new(
        vec!["item".to_string(), "total_quantity".to_string()],
        rows,
    );
    println!("{}", serde_json::to_string(&result)?);

    let events = StaticEventGenerator::new(vec![QueryCompletionEvent {
        query_id: "demo".to_string(),
        output_rows: result.rows.len(),
        wall_millis,
    }]);
    JsonEventWriter::write_events(&events, &mut std::io::stderr())?;
    eprintln!();
    Ok(())
}
