use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    aggregates::{bind_aggregate, Step},
    bindings::{bind_predicate, bind_projection, FilterFunction, ProjectionFunction, SymbolTypes},
    data_types::DataType,
    expressions::{BinaryOp, Expression},
    logical_plans::{AggregateCall, JoinKind, LogicalPlan, PlanNodeId, SortOrdering},
    metadata::FunctionRegistry,
    physical_plans::{
        Aggregation, FilterAndProject, HashAggregation, HashJoin, JoinHashFactory, Limit,
        PhysicalPlan, Sort, TopN,
    },
    sources::{
        ColumnHandle, ExchangeSource, PlanFragmentSource, PlanFragmentSourceProvider, TableHandle,
        TableSplit,
    },
    stats::OperatorStats,
    symbols::{ChannelMapping, Symbol},
    PlanError, PlanResult,
};

/// Compiles logical plans into physical operator trees for one worker.
///
/// The compiler recurses top-down over the logical tree and builds physical
/// nodes as it unwinds, so each physical node wraps an already-compiled
/// child. A fresh [`ChannelMapping`] is resolved at every node boundary
/// because each node declares its own output layout.
pub struct LocalExecutionPlanner {
    source_provider: Arc<dyn PlanFragmentSourceProvider>,
    registry: FunctionRegistry,
    types: SymbolTypes,
    split: Option<TableSplit>,
    table_splits: HashMap<TableHandle, TableSplit>,
    exchange_sources: HashMap<String, ExchangeSource>,
    stats: Arc<OperatorStats>,
    join_hashes: JoinHashFactory,
}

impl LocalExecutionPlanner {
    pub fn new(source_provider: Arc<dyn PlanFragmentSourceProvider>, types: SymbolTypes) -> Self {
        Self {
            source_provider,
            registry: FunctionRegistry::standard(),
            types,
            split: None,
            table_splits: HashMap::new(),
            exchange_sources: HashMap::new(),
            stats: Arc::new(OperatorStats::new()),
            join_hashes: JoinHashFactory::new(),
        }
    }

    /// One split serving every table scan in the fragment. Takes precedence
    /// over the per-table map when both are present.
    pub fn with_split(mut self, split: TableSplit) -> Self {
        self.split = Some(split);
        self
    }

    pub fn with_table_splits(mut self, table_splits: HashMap<TableHandle, TableSplit>) -> Self {
        self.table_splits = table_splits;
        self
    }

    pub fn with_exchange_sources(
        mut self,
        exchange_sources: HashMap<String, ExchangeSource>,
    ) -> Self {
        self.exchange_sources = exchange_sources;
        self
    }

    pub fn stats(&self) -> Arc<OperatorStats> {
        self.stats.clone()
    }

    /// Compile one logical plan into a physical operator tree. All failures
    /// happen here, before the first row is pulled; no partial tree is
    /// handed back.
    pub fn compile(&self, node: &LogicalPlan) -> PlanResult<Box<dyn PhysicalPlan>> {
        match node {
            LogicalPlan::TableScan {
                table,
                output_symbols,
                assignments,
            } => self.compile_table_scan(table, output_symbols, assignments),
            LogicalPlan::Project { outputs, child } => self.compile_project(outputs, child),
            LogicalPlan::Filter { predicate, child } => self.compile_filter(predicate, child),
            LogicalPlan::Output { columns, child } => self.compile_output(columns, child),
            LogicalPlan::Aggregation {
                aggregates,
                group_by,
                step,
                child,
            } => self.compile_aggregation(aggregates, group_by, *step, child),
            LogicalPlan::Limit { count, child } => {
                Ok(Box::new(Limit::new(*count, self.compile(child)?)))
            }
            LogicalPlan::TopN {
                count,
                order_by,
                child,
            } => self.compile_top_n(*count, order_by, child),
            LogicalPlan::Sort { order_by, child } => self.compile_sort(order_by, child),
            LogicalPlan::Exchange {
                source_fragment_id, ..
            } => self.compile_exchange(source_fragment_id),
            LogicalPlan::Join {
                id,
                kind,
                criteria,
                left,
                right,
            } => self.compile_join(id, *kind, criteria, left, right),
            other @ LogicalPlan::Sink { .. } => Err(PlanError::UnimplementedPlanNode(
                other.type_name().to_string(),
            )),
        }
    }

    fn compile_table_scan(
        &self,
        table: &TableHandle,
        output_symbols: &[Symbol],
        assignments: &HashMap<Symbol, ColumnHandle>,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        // column handles ordered by the scan's declared outputs, so channel i
        // carries output symbol i
        let mut columns = Vec::with_capacity(output_symbols.len());
        for symbol in output_symbols {
            let column = assignments.get(symbol).ok_or_else(|| {
                PlanError::UnresolvedSymbol(format!(
                    "scan of table {table} declares output {symbol} without a column assignment"
                ))
            })?;
            columns.push(column.clone());
        }
        let split = match (&self.split, self.table_splits.get(table)) {
            (Some(split), _) => split.clone(),
            (None, Some(split)) => split.clone(),
            (None, None) => return Err(PlanError::MissingSplit(table.to_string())),
        };
        self.source_provider
            .create_data_stream(&PlanFragmentSource::Table(split), &columns)
    }

    fn compile_project(
        &self,
        outputs: &[(Symbol, Expression)],
        child: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let source = self.compile(child)?;
        let mapping = ChannelMapping::resolve(&child.output_symbols());
        let mut projections = Vec::with_capacity(outputs.len());
        for (symbol, expr) in outputs {
            projections.push(bind_projection(
                expr,
                self.symbol_type(symbol),
                &mapping,
                &self.types,
            )?);
        }
        Ok(Box::new(FilterAndProject::new(
            FilterFunction::True,
            projections,
            source,
        )))
    }

    fn compile_filter(
        &self,
        predicate: &Expression,
        child: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let source = self.compile(child)?;
        let child_symbols = child.output_symbols();
        let mapping = ChannelMapping::resolve(&child_symbols);
        let filter = bind_predicate(predicate, &mapping, &self.types)?;
        let projections = self.identity_projections(&child_symbols, &mapping)?;
        Ok(Box::new(FilterAndProject::new(filter, projections, source)))
    }

    fn compile_output(
        &self,
        columns: &[(String, Symbol)],
        child: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let source = self.compile(child)?;
        let child_symbols = child.output_symbols();
        let result_symbols: Vec<Symbol> =
            columns.iter().map(|(_name, symbol)| symbol.clone()).collect();
        if result_symbols == child_symbols {
            // already in output layout, pass the child through untouched
            return Ok(source);
        }
        let mapping = ChannelMapping::resolve(&child_symbols);
        let projections = self.identity_projections(&result_symbols, &mapping)?;
        Ok(Box::new(FilterAndProject::new(
            FilterFunction::True,
            projections,
            source,
        )))
    }

    fn compile_aggregation(
        &self,
        aggregates: &[(Symbol, AggregateCall)],
        group_by: &[Symbol],
        step: Step,
        child: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let source = self.compile(child)?;
        let mapping = ChannelMapping::resolve(&child.output_symbols());
        let mut bound = Vec::with_capacity(aggregates.len());
        for (_symbol, call) in aggregates {
            bound.push(bind_aggregate(
                call,
                &mapping,
                step,
                &self.registry,
                &self.types,
            )?);
        }
        match group_by {
            [] => Ok(Box::new(Aggregation::new(bound, source))),
            [group_symbol] => {
                let group_channel = mapping.channel(group_symbol)?;
                Ok(Box::new(HashAggregation::new(group_channel, bound, source)))
            }
            more => Err(PlanError::UnsupportedShape(format!(
                "grouped aggregation supports exactly one group-by symbol, got {}",
                more.len()
            ))),
        }
    }

    fn compile_top_n(
        &self,
        count: usize,
        order_by: &[(Symbol, SortOrdering)],
        child: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let source = self.compile(child)?;
        let child_symbols = child.output_symbols();
        let mapping = ChannelMapping::resolve(&child_symbols);
        let (sort_channel, ascending) = Self::single_sort_key(order_by, &mapping)?;
        let output_channels = Self::declared_channels(&child_symbols, &mapping)?;
        Ok(Box::new(TopN::new(
            count,
            sort_channel,
            ascending,
            output_channels,
            source,
        )))
    }

    fn compile_sort(
        &self,
        order_by: &[(Symbol, SortOrdering)],
        child: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let source = self.compile(child)?;
        let child_symbols = child.output_symbols();
        let mapping = ChannelMapping::resolve(&child_symbols);
        let (sort_channel, ascending) = Self::single_sort_key(order_by, &mapping)?;
        let output_channels = Self::declared_channels(&child_symbols, &mapping)?;
        Ok(Box::new(Sort::new(
            sort_channel,
            ascending,
            output_channels,
            source,
        )))
    }

    fn compile_exchange(&self, source_fragment_id: &str) -> PlanResult<Box<dyn PhysicalPlan>> {
        let exchange = self
            .exchange_sources
            .get(source_fragment_id)
            .ok_or_else(|| {
                let mut available: Vec<String> =
                    self.exchange_sources.keys().cloned().collect();
                available.sort();
                PlanError::MissingExchangeSource {
                    fragment_id: source_fragment_id.to_string(),
                    available,
                }
            })?;
        self.source_provider
            .create_data_stream(&PlanFragmentSource::Exchange(exchange.clone()), &[])
    }

    fn compile_join(
        &self,
        id: &PlanNodeId,
        kind: JoinKind,
        criteria: &Expression,
        left: &LogicalPlan,
        right: &LogicalPlan,
    ) -> PlanResult<Box<dyn PhysicalPlan>> {
        let (first, second) = match criteria {
            Expression::BinaryOp {
                op: BinaryOp::Eq,
                left,
                right,
            } => match (left.as_ref(), right.as_ref()) {
                (Expression::SymbolRef(first), Expression::SymbolRef(second)) => (first, second),
                _ => {
                    return Err(PlanError::UnsupportedShape(format!(
                        "join criteria must compare two bare symbols, got {criteria}"
                    )))
                }
            },
            other => {
                return Err(PlanError::UnsupportedShape(format!(
                    "join criteria must be a single symbol equality, got {other}"
                )))
            }
        };

        let left_symbols = left.output_symbols();
        let right_symbols = right.output_symbols();
        let left_mapping = ChannelMapping::resolve(&left_symbols);
        let right_mapping = ChannelMapping::resolve(&right_symbols);

        // whichever compared symbol is absent from the left subtree names
        // the build side's key
        let (probe_symbol, build_symbol) = if left_mapping.contains(first) {
            (first, second)
        } else {
            (second, first)
        };
        let probe_channel = left_mapping.channel(probe_symbol)?;
        let build_channel = right_mapping.channel(build_symbol)?;

        let provider = self.join_hashes.get_or_build(
            id,
            build_channel,
            right_symbols.len(),
            self.stats.clone(),
            || self.compile(right),
        )?;
        let probe = self.compile(left)?;
        Ok(Box::new(HashJoin::new(
            probe,
            probe_channel,
            provider,
            kind == JoinKind::LeftOuter,
        )))
    }

    fn identity_projections(
        &self,
        symbols: &[Symbol],
        mapping: &ChannelMapping,
    ) -> PlanResult<Vec<ProjectionFunction>> {
        symbols
            .iter()
            .map(|symbol| {
                let channel = mapping.channel(symbol)?;
                Ok(ProjectionFunction::single_column(
                    channel,
                    self.symbol_type(symbol),
                ))
            })
            .collect()
    }

    fn single_sort_key(
        order_by: &[(Symbol, SortOrdering)],
        mapping: &ChannelMapping,
    ) -> PlanResult<(usize, bool)> {
        match order_by {
            [(symbol, ordering)] => {
                let channel = mapping.channel(symbol)?;
                Ok((channel, *ordering == SortOrdering::Ascending))
            }
            more => Err(PlanError::UnsupportedShape(format!(
                "ordering supports exactly one sort symbol, got {}",
                more.len()
            ))),
        }
    }

    fn declared_channels(
        symbols: &[Symbol],
        mapping: &ChannelMapping,
    ) -> PlanResult<Vec<usize>> {
        symbols.iter().map(|symbol| mapping.channel(symbol)).collect()
    }

    fn symbol_type(&self, symbol: &Symbol) -> DataType {
        self.types.get(symbol).copied().unwrap_or(DataType::Unknown)
    }
}
