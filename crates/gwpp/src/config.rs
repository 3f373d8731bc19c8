use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Knobs for a contraction solve.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolveOptions {
    /// Iteration budget; `None` means `arc_count + 1`.
    pub max_iterations: Option<usize>,
    /// Per-call oracle deadline in milliseconds.
    pub oracle_deadline_ms: Option<u64>,
    /// Use [`crate::Dijkstra::strict`], which forces the non-negativity shift.
    pub strict_oracle: bool,
}

impl SolveOptions {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_oracle_deadline_ms(mut self, millis: u64) -> Self {
        self.oracle_deadline_ms = Some(millis);
        self
    }

    pub fn with_strict_oracle(mut self, strict: bool) -> Self {
        self.strict_oracle = strict;
        self
    }

    pub fn oracle_deadline(&self) -> Option<Duration> {
        self.oracle_deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == Some(0) {
            return Err(Error::invalid("max_iterations must be at least 1"));
        }
        Ok(())
    }
}
