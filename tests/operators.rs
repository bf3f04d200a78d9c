use std::collections::HashMap;
use std::sync::Arc;

use planck::data_types::DataType;
use planck::expressions::{BinaryOp, Expression};
use planck::logical_plans::{LogicalPlan, SortOrdering};
use planck::physical_plans::{drain, InMemScan, PhysicalPlan};
use planck::row::{Datum, Row};
use planck::sources::{ColumnHandle, LocalSourceProvider, TableHandle, TableSplit};
use planck::symbols::Symbol;
use planck::LocalExecutionPlanner;

fn int_rows(values: &[i64]) -> Vec<Row> {
    values
        .iter()
        .map(|v| Row::new(vec![Datum::Int64(*v)]))
        .collect()
}

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

fn number_scan(table: &TableHandle) -> LogicalPlan {
    LogicalPlan::TableScan {
        table: table.clone(),
        output_symbols: vec![Symbol::new("n")],
        assignments: HashMap::from([(
            Symbol::new("n"),
            ColumnHandle::new("n", 0, DataType::Int64),
        )]),
    }
}

fn pair_scan(table: &TableHandle) -> LogicalPlan {
    LogicalPlan::TableScan {
        table: table.clone(),
        output_symbols: vec![Symbol::new("a"), Symbol::new("b")],
        assignments: HashMap::from([
            (Symbol::new("a"), ColumnHandle::new("a", 0, DataType::Int64)),
            (Symbol::new("b"), ColumnHandle::new("b", 1, DataType::Int64)),
        ]),
    }
}

fn number_types() -> HashMap<Symbol, DataType> {
    HashMap::from([(Symbol::new("n"), DataType::Int64)])
}

fn pair_types() -> HashMap<Symbol, DataType> {
    HashMap::from([
        (Symbol::new("a"), DataType::Int64),
        (Symbol::new("b"), DataType::Int64),
    ])
}

#[test]
fn top_n_keeps_the_best_rows_in_declared_order() {
    let table = TableHandle::new("numbers");
    let planner = single_table_planner(&table, int_rows(&[5, 1, 4, 1, 3, 2]), number_types());

    let ascending = LogicalPlan::TopN {
        count: 3,
        order_by: vec![(Symbol::new("n"), SortOrdering::Ascending)],
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&ascending).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[1, 1, 2]));

    let descending = LogicalPlan::TopN {
        count: 3,
        order_by: vec![(Symbol::new("n"), SortOrdering::Descending)],
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&descending).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[5, 4, 3]));
}

#[test]
fn top_n_with_fewer_rows_than_requested_returns_them_all() {
    let table = TableHandle::new("numbers");
    let planner = single_table_planner(&table, int_rows(&[2, 1]), number_types());

    let top = LogicalPlan::TopN {
        count: 10,
        order_by: vec![(Symbol::new("n"), SortOrdering::Ascending)],
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&top).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[1, 2]));
}

#[test]
fn sort_orders_the_full_input() {
    let table = TableHandle::new("numbers");
    let planner = single_table_planner(&table, int_rows(&[3, 1, 2]), number_types());

    let ascending = LogicalPlan::Sort {
        order_by: vec![(Symbol::new("n"), SortOrdering::Ascending)],
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&ascending).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[1, 2, 3]));

    let descending = LogicalPlan::Sort {
        order_by: vec![(Symbol::new("n"), SortOrdering::Descending)],
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&descending).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[3, 2, 1]));
}

#[test]
fn limit_caps_the_emitted_rows_without_reordering() {
    let table = TableHandle::new("numbers");
    let planner = single_table_planner(&table, int_rows(&[4, 3, 2, 1]), number_types());

    let limited = LogicalPlan::Limit {
        count: 2,
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&limited).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[4, 3]));

    let generous = LogicalPlan::Limit {
        count: 100,
        child: Box::new(number_scan(&table)),
    };
    let mut plan = planner.compile(&generous).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), int_rows(&[4, 3, 2, 1]));
}

#[test]
fn filter_drops_non_matching_and_null_predicate_rows() {
    let table = TableHandle::new("pairs");
    let rows = vec![
        Row::new(vec![Datum::Int64(1), Datum::Int64(10)]),
        Row::new(vec![Datum::Int64(2), Datum::Null]),
        Row::new(vec![Datum::Int64(3), Datum::Int64(30)]),
    ];
    let planner = single_table_planner(&table, rows, pair_types());

    let filtered = LogicalPlan::Filter {
        predicate: Expression::binary(
            BinaryOp::Gt,
            Expression::symbol("b"),
            Expression::literal(Datum::Int64(15)),
        ),
        child: Box::new(pair_scan(&table)),
    };
    let mut plan = planner.compile(&filtered).unwrap();
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![Row::new(vec![Datum::Int64(3), Datum::Int64(30)])]
    );
}

#[test]
fn project_evaluates_expressions_per_row() {
    let table = TableHandle::new("pairs");
    let rows = vec![
        Row::new(vec![Datum::Int64(1), Datum::Int64(10)]),
        Row::new(vec![Datum::Int64(2), Datum::Null]),
    ];
    let planner = single_table_planner(&table, rows, pair_types());

    let projected = LogicalPlan::Project {
        outputs: vec![
            (
                Symbol::new("total"),
                Expression::binary(
                    BinaryOp::Plus,
                    Expression::symbol("a"),
                    Expression::symbol("b"),
                ),
            ),
            (Symbol::new("a"), Expression::symbol("a")),
        ],
        child: Box::new(pair_scan(&table)),
    };
    let mut plan = planner.compile(&projected).unwrap();
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![
            Row::new(vec![Datum::Int64(11), Datum::Int64(1)]),
            Row::new(vec![Datum::Null, Datum::Int64(2)]),
        ]
    );
}

#[test]
fn output_in_child_order_passes_the_child_through() {
    let table = TableHandle::new("pairs");
    let rows = vec![Row::new(vec![Datum::Int64(1), Datum::Int64(10)])];
    let planner = single_table_planner(&table, rows, pair_types());

    let output = LogicalPlan::Output {
        columns: vec![
            ("a".to_owned(), Symbol::new("a")),
            ("b".to_owned(), Symbol::new("b")),
        ],
        child: Box::new(pair_scan(&table)),
    };
    let plan = planner.compile(&output).unwrap();
    assert!(plan.as_any().downcast_ref::<InMemScan>().is_some());
}

#[test]
fn output_reordering_columns_inserts_a_projection() {
    let table = TableHandle::new("pairs");
    let rows = vec![
        Row::new(vec![Datum::Int64(1), Datum::Int64(10)]),
        Row::new(vec![Datum::Int64(2), Datum::Int64(20)]),
    ];
    let planner = single_table_planner(&table, rows, pair_types());

    let output = LogicalPlan::Output {
        columns: vec![
            ("b".to_owned(), Symbol::new("b")),
            ("a".to_owned(), Symbol::new("a")),
        ],
        child: Box::new(pair_scan(&table)),
    };
    let plan = planner.compile(&output).unwrap();
    assert!(plan.as_any().downcast_ref::<InMemScan>().is_none());

    let mut plan = plan;
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![
            Row::new(vec![Datum::Int64(10), Datum::Int64(1)]),
            Row::new(vec![Datum::Int64(20), Datum::Int64(2)]),
        ]
    );
}

#[test]
fn unimplemented_nodes_are_named_in_the_error() {
    let table = TableHandle::new("numbers");
    let planner = single_table_planner(&table, int_rows(&[1]), number_types());

    let sink = LogicalPlan::Sink {
        child: Box::new(number_scan(&table)),
    };
    match planner.compile(&sink).err() {
        Some(planck::PlanError::UnimplementedPlanNode(name)) => assert_eq!(name, "Sink"),
        other => panic!("expected UnimplementedPlanNode, got {other:?}"),
    }
}
