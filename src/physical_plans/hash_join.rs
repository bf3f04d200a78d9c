use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::{
    logical_plans::PlanNodeId,
    row::{Datum, Row},
    stats::OperatorStats,
    PlanError, PlanResult,
};

use super::PhysicalPlan;

/// Read-only hash index over the build side's output, keyed by the build
/// channel. Null keys are never indexed and never match.
pub struct JoinHash {
    index: HashMap<Datum, Vec<Row>>,
    build_width: usize,
    indexed_rows: usize,
}

impl JoinHash {
    fn build(
        build_channel: usize,
        build_width: usize,
        mut source: Box<dyn PhysicalPlan>,
    ) -> PlanResult<Self> {
        source.setup()?;
        let mut index: HashMap<Datum, Vec<Row>> = HashMap::new();
        let mut indexed_rows = 0;
        while let Some(row) = source.next()? {
            let key = row.get_field(build_channel)?;
            if key.is_null() {
                continue;
            }
            index.entry(key).or_default().push(row);
            indexed_rows += 1;
        }
        Ok(Self {
            index,
            build_width,
            indexed_rows,
        })
    }

    pub fn matches(&self, key: &Datum) -> Option<&[Row]> {
        if key.is_null() {
            return None;
        }
        self.index.get(key).map(|rows| rows.as_slice())
    }

    pub fn build_width(&self) -> usize {
        self.build_width
    }

    pub fn indexed_rows(&self) -> usize {
        self.indexed_rows
    }
}

enum ProviderState {
    Pending(Option<Box<dyn PhysicalPlan>>),
    Built(Arc<JoinHash>),
}

/// Lazily-built hash table shared by every probe pipeline of one join node.
/// The first probe to ask runs the blocking build; later probes reuse it.
pub struct JoinHashProvider {
    node_id: PlanNodeId,
    build_channel: usize,
    build_width: usize,
    state: Mutex<ProviderState>,
    stats: Arc<OperatorStats>,
}

impl JoinHashProvider {
    fn new(
        node_id: PlanNodeId,
        build_channel: usize,
        build_width: usize,
        build_source: Box<dyn PhysicalPlan>,
        stats: Arc<OperatorStats>,
    ) -> Self {
        Self {
            node_id,
            build_channel,
            build_width,
            state: Mutex::new(ProviderState::Pending(Some(build_source))),
            stats,
        }
    }

    pub fn build_width(&self) -> usize {
        self.build_width
    }

    /// The built hash table, materializing the build side on first use.
    pub fn hash(&self) -> PlanResult<Arc<JoinHash>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_e| PlanError::Unknown("join hash state lock poisoned".to_string()))?;
        let source = match &mut *state {
            ProviderState::Built(hash) => return Ok(hash.clone()),
            ProviderState::Pending(source) => source.take().ok_or_else(|| {
                PlanError::Unknown("join hash build re-entered after failure".to_string())
            })?,
        };
        let hash = Arc::new(JoinHash::build(
            self.build_channel,
            self.build_width,
            source,
        )?);
        self.stats.record_hash_build(hash.indexed_rows());
        log::debug!(
            "built join hash for node {}: {} rows indexed",
            self.node_id,
            hash.indexed_rows()
        );
        *state = ProviderState::Built(hash.clone());
        Ok(hash)
    }
}

/// Registry handing out one provider per join node, so that two probe
/// pipelines compiled against the same node share one build.
#[derive(Default)]
pub struct JoinHashFactory {
    providers: Mutex<HashMap<PlanNodeId, Arc<JoinHashProvider>>>,
}

impl JoinHashFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The provider registered for `node_id`, compiling the build side only
    /// the first time the node is seen.
    pub fn get_or_build(
        &self,
        node_id: &PlanNodeId,
        build_channel: usize,
        build_width: usize,
        stats: Arc<OperatorStats>,
        compile_build_side: impl FnOnce() -> PlanResult<Box<dyn PhysicalPlan>>,
    ) -> PlanResult<Arc<JoinHashProvider>> {
        if let Some(provider) = self.lock_providers()?.get(node_id) {
            return Ok(provider.clone());
        }
        // compile outside the lock: the build side may hold nested joins
        // that come back through this registry
        let build_source = compile_build_side()?;
        let provider = Arc::new(JoinHashProvider::new(
            node_id.clone(),
            build_channel,
            build_width,
            build_source,
            stats,
        ));
        let mut providers = self.lock_providers()?;
        let registered = providers.entry(node_id.clone()).or_insert(provider);
        Ok(registered.clone())
    }

    fn lock_providers(
        &self,
    ) -> PlanResult<std::sync::MutexGuard<'_, HashMap<PlanNodeId, Arc<JoinHashProvider>>>> {
        self.providers
            .lock()
            .map_err(|_e| PlanError::Unknown("join provider registry lock poisoned".to_string()))
    }
}

/// Probe-side hash join. Each probe row is joined against the shared build
/// index; inner joins drop misses, outer joins null-extend them.
pub struct HashJoin {
    probe: Box<dyn PhysicalPlan>,
    probe_channel: usize,
    provider: Arc<JoinHashProvider>,
    outer: bool,
    hash: Option<Arc<JoinHash>>,
    pending: VecDeque<Row>,
}

impl HashJoin {
    pub fn new(
        probe: Box<dyn PhysicalPlan>,
        probe_channel: usize,
        provider: Arc<JoinHashProvider>,
        outer: bool,
    ) -> Self {
        Self {
            probe,
            probe_channel,
            provider,
            outer,
            hash: None,
            pending: VecDeque::new(),
        }
    }
}

impl PhysicalPlan for HashJoin {
    fn setup(&mut self) -> PlanResult<()> {
        self.probe.setup()
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        // blocking build phase, once per operator
        let hash = match &self.hash {
            Some(hash) => hash.clone(),
            None => {
                let hash = self.provider.hash()?;
                self.hash = Some(hash.clone());
                hash
            }
        };
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Ok(Some(row));
            }
            let probe_row = match self.probe.next()? {
                Some(row) => row,
                None => return Ok(None),
            };
            let key = probe_row.get_field(self.probe_channel)?;
            match hash.matches(&key) {
                Some(build_rows) => {
                    for build_row in build_rows {
                        self.pending.push_back(Row::concat(&probe_row, build_row));
                    }
                }
                None => {
                    if self.outer {
                        let nulls = Row::nulls(hash.build_width());
                        return Ok(Some(Row::concat(&probe_row, &nulls)));
                    }
                }
            }
        }
    }

    fn channel_count(&self) -> usize {
        self.probe.channel_count() + self.provider.build_width()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
