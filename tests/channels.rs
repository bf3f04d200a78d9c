use std::collections::HashMap;
use std::sync::Arc;

use planck::aggregates::Step;
use planck::data_types::DataType;
use planck::expressions::{BinaryOp, Expression};
use planck::logical_plans::{AggregateCall, LogicalPlan};
use planck::metadata::FunctionHandle;
use planck::physical_plans::PhysicalPlan;
use planck::row::{Datum, Row};
use planck::sources::{
    ColumnHandle, ExchangeSource, LocalSourceProvider, TableHandle, TableSplit,
};
use planck::symbols::{ChannelMapping, Symbol};
use planck::{LocalExecutionPlanner, PlanError};

fn single_table_planner(
    table: &TableHandle,
    rows: Vec<Row>,
    types: HashMap<Symbol, DataType>,
) -> LocalExecutionPlanner {
    let provider = LocalSourceProvider::new();
    provider.register_table(table.clone(), rows).unwrap();
    LocalExecutionPlanner::new(Arc::new(provider), types).with_table_splits(HashMap::from([(
        table.clone(),
        TableSplit::InMemory {
            table: table.clone(),
        },
    )]))
}

#[test]
fn resolves_symbols_in_declared_order() {
    let symbols = vec![Symbol::new("a"), Symbol::new("b"), Symbol::new("c")];
    let mapping = ChannelMapping::resolve(&symbols);
    assert_eq!(mapping.len(), 3);
    assert_eq!(mapping.channel(&Symbol::new("a")), Ok(0));
    assert_eq!(mapping.channel(&Symbol::new("b")), Ok(1));
    assert_eq!(mapping.channel(&Symbol::new("c")), Ok(2));
}

#[test]
fn rejects_symbols_outside_the_mapping() {
    let mapping = ChannelMapping::resolve(&[Symbol::new("a"), Symbol::new("b")]);
    assert!(matches!(
        mapping.channel(&Symbol::new("missing")),
        Err(PlanError::UnresolvedSymbol(_))
    ));
}

#[test]
fn compiled_operators_report_declared_widths() {
    let table = TableHandle::new("metrics");
    let key = Symbol::new("key");
    let value = Symbol::new("value");
    let types = HashMap::from([
        (key.clone(), DataType::String),
        (value.clone(), DataType::Int64),
    ]);
    let planner = single_table_planner(
        &table,
        vec![Row::new(vec![
            Datum::String("a".to_owned()),
            Datum::Int64(1),
        ])],
        types,
    );

    let scan = LogicalPlan::TableScan {
        table: table.clone(),
        output_symbols: vec![key.clone(), value.clone()],
        assignments: HashMap::from([
            (key.clone(), ColumnHandle::new("key", 0, DataType::String)),
            (
                value.clone(),
                ColumnHandle::new("value", 1, DataType::Int64),
            ),
        ]),
    };
    let filtered = LogicalPlan::Filter {
        predicate: Expression::binary(
            BinaryOp::Gt,
            Expression::symbol("value"),
            Expression::literal(Datum::Int64(0)),
        ),
        child: Box::new(scan.clone()),
    };
    let limited = LogicalPlan::Limit {
        count: 10,
        child: Box::new(filtered),
    };
    let plan = planner.compile(&limited).unwrap();
    assert_eq!(plan.channel_count(), 2);

    let aggregated = LogicalPlan::Aggregation {
        aggregates: vec![(
            Symbol::new("total"),
            AggregateCall {
                function: FunctionHandle::new("sum"),
                args: vec![Expression::symbol("value")],
            },
        )],
        group_by: vec![key],
        step: Step::Single,
        child: Box::new(scan),
    };
    let plan = planner.compile(&aggregated).unwrap();
    assert_eq!(plan.channel_count(), 2);
}

#[test]
fn exchange_operators_carry_the_upstream_width() {
    let source = ExchangeSource {
        fragment_id: "stage-1".to_owned(),
        width: 3,
        rows: vec![Row::new(vec![
            Datum::Int64(1),
            Datum::Int64(2),
            Datum::Int64(3),
        ])],
    };
    let planner = LocalExecutionPlanner::new(Arc::new(LocalSourceProvider::new()), HashMap::new())
        .with_exchange_sources(HashMap::from([("stage-1".to_owned(), source)]));

    let exchange = LogicalPlan::Exchange {
        source_fragment_id: "stage-1".to_owned(),
        output_symbols: vec![Symbol::new("x"), Symbol::new("y"), Symbol::new("z")],
    };
    let plan = planner.compile(&exchange).unwrap();
    assert_eq!(plan.channel_count(), 3);
}

#[test]
fn scan_declaring_an_unassigned_symbol_fails() {
    let table = TableHandle::new("metrics");
    let planner = single_table_planner(&table, vec![], HashMap::new());
    let scan = LogicalPlan::TableScan {
        table,
        output_symbols: vec![Symbol::new("ghost")],
        assignments: HashMap::new(),
    };
    assert!(matches!(
        planner.compile(&scan),
        Err(PlanError::UnresolvedSymbol(_))
    ));
}
