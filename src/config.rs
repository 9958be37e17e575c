//! Search configuration for earliest-arrival queries.

use std::time::Duration;

/// Configuration parameters for an earliest-arrival search.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Wall-clock budget for a single run. `None` lets the search run to completion.
    pub deadline: Option<Duration>,
}

impl SearchConfig {
    pub fn new(deadline: Option<Duration>) -> Self {
        Self { deadline }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
