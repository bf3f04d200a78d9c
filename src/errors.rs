use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// logical node variant the local planner does not execute
    UnimplementedPlanNode(String),
    /// plan shape beyond what the physical layer supports
    UnsupportedShape(String),
    /// table scan with neither a global split nor a per-table entry
    MissingSplit(String),
    MissingExchangeSource {
        fragment_id: String,
        available: Vec<String>,
    },
    /// symbol reference outside the current channel mapping
    UnresolvedSymbol(String),
    InterpretingError(String),
    StorageEngine(String),
    ResourceExhausted(String),
    Unknown(String),
}

pub type PlanResult<T> = Result<T, PlanError>;

impl Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::UnimplementedPlanNode(node) => {
                write!(f, "plan node not yet implemented: {node}")
            }
            PlanError::UnsupportedShape(detail) => {
                write!(f, "unsupported plan shape: {detail}")
            }
            PlanError::MissingSplit(table) => {
                write!(f, "no split available for table {table}")
            }
            PlanError::MissingExchangeSource {
                fragment_id,
                available,
            } => {
                write!(
                    f,
                    "exchange source for fragment {fragment_id} was not found: available sources {available:?}"
                )
            }
            PlanError::UnresolvedSymbol(symbol) => {
                write!(f, "unresolved symbol: {symbol}")
            }
            PlanError::InterpretingError(detail) => write!(f, "interpreting error: {detail}"),
            PlanError::StorageEngine(detail) => write!(f, "storage engine error: {detail}"),
            PlanError::ResourceExhausted(detail) => write!(f, "resource exhausted: {detail}"),
            PlanError::Unknown(detail) => write!(f, "unknown error: {detail}"),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<std::io::Error> for PlanError {
    fn from(e: std::io::Error) -> Self {
        PlanError::StorageEngine(e.to_string())
    }
}
