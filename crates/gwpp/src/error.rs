use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Path has {len} node(s); a saturated arc needs at least 2")]
    EmptyPath { len: usize },

    #[error("No path from {from} to {to}")]
    Unreachable { from: String, to: String },

    #[error("No convergence after {iterations} iteration(s); the network may contain a cycle")]
    CycleSuspected { iterations: usize },

    #[error("Unknown node: {node}")]
    MissingNode { node: String },

    #[error("Missing arc: {from} -> {to}")]
    MissingArc { from: String, to: String },

    #[error("Negative length {length} on arc {from} -> {to}")]
    NegativeLength { from: String, to: String, length: f64 },

    #[error("Shortest-path oracle took {elapsed:?} (deadline {deadline:?})")]
    OracleDeadline { elapsed: Duration, deadline: Duration },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub(crate) fn missing_arc(from: &str, to: &str) -> Self {
        Self::MissingArc {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
