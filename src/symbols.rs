use std::collections::HashMap;
use std::fmt::Display;

use crate::{PlanError, PlanResult};

/// Logical, query-scoped column identifier. Two symbols are the same column
/// exactly when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Position of a column within one operator's output row.
pub type Channel = usize;

/// Symbol layout of a single operator boundary: symbol `i` of the declared
/// output sequence owns channel `i`. Rebuilt per node, never shared between
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelMapping {
    channels: HashMap<Symbol, Channel>,
}

impl ChannelMapping {
    /// Callers must not declare duplicate output symbols; when they do, which
    /// channel wins is unspecified.
    pub fn resolve(output_symbols: &[Symbol]) -> ChannelMapping {
        let channels = output_symbols
            .iter()
            .enumerate()
            .map(|(channel, symbol)| (symbol.clone(), channel))
            .collect();
        ChannelMapping { channels }
    }

    pub fn channel(&self, symbol: &Symbol) -> PlanResult<Channel> {
        match self.channels.get(symbol) {
            Some(channel) => Ok(*channel),
            None => Err(PlanError::UnresolvedSymbol(symbol.name().to_string())),
        }
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.channels.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
