use std::collections::HashMap;
use std::sync::Arc;

use planck::data_types::DataType;
use planck::logical_plans::LogicalPlan;
use planck::physical_plans::drain;
use planck::row::{Datum, Row};
use planck::sources::{
    ColumnHandle, ExchangeSource, LocalSourceProvider, TableHandle, TableSplit,
};
use planck::symbols::Symbol;
use planck::{LocalExecutionPlanner, PlanError};

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

fn two_table_provider() -> Arc<LocalSourceProvider> {
    let provider = Arc::new(LocalSourceProvider::new());
    provider
        .register_table(
            TableHandle::new("alpha"),
            vec![Row::new(vec![Datum::Int64(1)])],
        )
        .unwrap();
    provider
        .register_table(
            TableHandle::new("beta"),
            vec![Row::new(vec![Datum::Int64(2)])],
        )
        .unwrap();
    provider
}

fn number_types() -> HashMap<Symbol, DataType> {
    HashMap::from([(Symbol::new("n"), DataType::Int64)])
}

#[test]
fn global_split_wins_over_the_table_map() {
    let alpha = TableHandle::new("alpha");
    let beta = TableHandle::new("beta");
    let planner = LocalExecutionPlanner::new(two_table_provider(), number_types())
        .with_split(TableSplit::InMemory {
            table: alpha.clone(),
        })
        .with_table_splits(HashMap::from([(
            beta.clone(),
            TableSplit::InMemory {
                table: beta.clone(),
            },
        )]));

    // the scan names beta, but the global split points at alpha
    let mut plan = planner.compile(&number_scan(&beta)).unwrap();
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![Row::new(vec![Datum::Int64(1)])]
    );
}

#[test]
fn per_table_splits_serve_their_own_scans() {
    let alpha = TableHandle::new("alpha");
    let beta = TableHandle::new("beta");
    let planner = LocalExecutionPlanner::new(two_table_provider(), number_types())
        .with_table_splits(HashMap::from([
            (
                alpha.clone(),
                TableSplit::InMemory {
                    table: alpha.clone(),
                },
            ),
            (
                beta.clone(),
                TableSplit::InMemory {
                    table: beta.clone(),
                },
            ),
        ]));

    let mut plan = planner.compile(&number_scan(&alpha)).unwrap();
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![Row::new(vec![Datum::Int64(1)])]
    );
    let mut plan = planner.compile(&number_scan(&beta)).unwrap();
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![Row::new(vec![Datum::Int64(2)])]
    );
}

#[test]
fn scan_without_any_split_fails() {
    let beta = TableHandle::new("beta");
    let planner = LocalExecutionPlanner::new(two_table_provider(), number_types());
    assert!(matches!(
        planner.compile(&number_scan(&beta)).err(),
        Some(PlanError::MissingSplit(message)) if message.contains("beta")
    ));
}

#[test]
fn unknown_exchange_fragment_lists_available_sources() {
    let source = ExchangeSource {
        fragment_id: "stage-2".to_owned(),
        width: 1,
        rows: vec![Row::new(vec![Datum::Int64(7)])],
    };
    let planner =
        LocalExecutionPlanner::new(Arc::new(LocalSourceProvider::new()), HashMap::new())
            .with_exchange_sources(HashMap::from([("stage-2".to_owned(), source)]));

    let exchange = LogicalPlan::Exchange {
        source_fragment_id: "stage-9".to_owned(),
        output_symbols: vec![Symbol::new("n")],
    };
    assert_eq!(
        planner.compile(&exchange).err(),
        Some(PlanError::MissingExchangeSource {
            fragment_id: "stage-9".to_owned(),
            available: vec!["stage-2".to_owned()],
        })
    );
}

#[test]
fn exchange_rows_pass_through_as_delivered() {
    let rows = vec![
        Row::new(vec![Datum::Int64(3), Datum::String("c".to_owned())]),
        Row::new(vec![Datum::Int64(1), Datum::String("a".to_owned())]),
    ];
    let source = ExchangeSource {
        fragment_id: "stage-2".to_owned(),
        width: 2,
        rows: rows.clone(),
    };
    let planner =
        LocalExecutionPlanner::new(Arc::new(LocalSourceProvider::new()), HashMap::new())
            .with_exchange_sources(HashMap::from([("stage-2".to_owned(), source)]));

    let exchange = LogicalPlan::Exchange {
        source_fragment_id: "stage-2".to_owned(),
        output_symbols: vec![Symbol::new("n"), Symbol::new("s")],
    };
    let mut plan = planner.compile(&exchange).unwrap();
    assert_eq!(drain(plan.as_mut()).unwrap(), rows);
}

#[test]
fn csv_split_reads_typed_columns_in_declared_order() {
    let orders = TableHandle::new("csv_orders");
    let planner =
        LocalExecutionPlanner::new(Arc::new(LocalSourceProvider::new()), HashMap::new())
            .with_table_splits(HashMap::from([(
                orders.clone(),
                TableSplit::CsvFile {
                    table: orders.clone(),
                    path: "tests/assets/orders.csv".to_owned(),
                },
            )]));

    let scan = LogicalPlan::TableScan {
        table: orders,
        output_symbols: vec![Symbol::new("user"), Symbol::new("amount")],
        assignments: HashMap::from([
            (
                Symbol::new("user"),
                ColumnHandle::new("userId", 2, DataType::String),
            ),
            (
                Symbol::new("amount"),
                ColumnHandle::new("amount", 1, DataType::Float64),
            ),
        ]),
    };
    let mut plan = planner.compile(&scan).unwrap();
    assert_eq!(
        drain(plan.as_mut()).unwrap(),
        vec![
            Row::new(vec![Datum::String("101".to_owned()), Datum::Float64(30.5)]),
            Row::new(vec![Datum::String("102".to_owned()), Datum::Null]),
            Row::new(vec![
                Datum::String("103".to_owned()),
                Datum::Float64(12.25)
            ]),
        ]
    );
}
