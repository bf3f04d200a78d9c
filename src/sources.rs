use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

use crate::data_types::DataType;
use crate::physical_plans::{CsvScan, InMemScan, PhysicalPlan};
use crate::row::Row;
use crate::{PlanError, PlanResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableHandle {
    name: String,
}

impl TableHandle {
    pub fn new(name: impl Into<String>) -> Self {
        TableHandle { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for TableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Position and declared type of one column inside its table's native
/// layout. Scans read handles in the order the plan asks for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHandle {
    pub name: String,
    pub index: usize,
    pub data_type: DataType,
}

impl ColumnHandle {
    pub fn new(name: impl Into<String>, index: usize, data_type: DataType) -> Self {
        ColumnHandle {
            name: name.into(),
            index,
            data_type,
        }
    }
}

/// Concrete unit of scannable data backing one TableScan leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSplit {
    InMemory { table: TableHandle },
    CsvFile { table: TableHandle, path: String },
}

impl TableSplit {
    pub fn table(&self) -> &TableHandle {
        match self {
            TableSplit::InMemory { table } => table,
            TableSplit::CsvFile { table, .. } => table,
        }
    }
}

/// Rows already received from an upstream fragment. How they got here is the
/// transport layer's business.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSource {
    pub fragment_id: String,
    pub width: usize,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanFragmentSource {
    Table(TableSplit),
    Exchange(ExchangeSource),
}

/// Turns a fragment source plus the ordered column list to read into a leaf
/// operator. Exchanges arrive already laid out, so their column list is
/// empty.
pub trait PlanFragmentSourceProvider {
    fn create_data_stream(
        &self,
        source: &PlanFragmentSource,
        columns: &[ColumnHandle],
    ) -> PlanResult<Box<dyn PhysicalPlan>>;
}

/// Registry of in-memory tables; also serves CSV file splits and buffered
/// exchange sources.
#[derive(Default)]
pub struct LocalSourceProvider {
    tables: Arc<RwLock<HashMap<TableHandle, Vec<Row>>>>,
}

impl LocalSourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_table(&self, table: TableHandle, rows: Vec<Row>) -> PlanResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| PlanError::StorageEngine("table registry lock poisoned".to_string()))?;
        tables.insert(table, rows);
        Ok(())
    }
}

impl PlanFragmentSourceProvider for LocalSourceProvider {
    fn create_data_stream(
        &self,
        source: &PlanFragmentSource,
        columns: &[ColumnHandle],
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        match source {
            PlanFragmentSource::Table(TableSplit::InMemory { table }) => {
                let tables = self.tables.read().map_err(|_| {
                    PlanError::StorageEngine("table registry lock poisoned".to_string())
                })?;
                let rows = tables
                    .get(table)
                    .ok_or_else(|| {
                        PlanError::StorageEngine(format!("table {table} is not registered"))
                    })?
                    .clone();
                let channels = columns.iter().map(|column| column.index).collect();
                Ok(Box::new(InMemScan::projected(rows, channels)))
            }
            PlanFragmentSource::Table(TableSplit::CsvFile { path, .. }) => {
                Ok(Box::new(CsvScan::new(path.clone(), columns.to_vec())))
            }
            PlanFragmentSource::Exchange(exchange) => Ok(Box::new(InMemScan::raw(
                exchange.rows.clone(),
                exchange.width,
            ))),
        }
    }
}
