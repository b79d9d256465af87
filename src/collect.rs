//! Bounded query collection.
//!
//! [`SolutionCollector`] turns an engine's one-at-a-time solution iterator
//! into a fully materialized [`SolutionSet`] under a hard per-call deadline.
//! Terminal outcomes are classified precisely: exhaustion is `Ok` (an empty
//! set is a valid success), deadline expiry is [`QueryError::Timeout`], and
//! anything the engine reports is [`QueryError::Engine`] with the engine's
//! diagnostic attached.
//!
//! Partial-result policy: solutions gathered before a timeout or fault are
//! discarded. The caller receives a complete set or a classified failure,
//! never a truncated set labeled success.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cancel::CancelToken;
use crate::engine::{LogicEngine, Solution};
use crate::error::{EngineFault, QueryError};

/// Default per-query time budget.
pub const DEFAULT_QUERY_BUDGET: Duration = Duration::from_secs(15);

/// The finite, ordered solutions of one completed query execution.
///
/// Order is the engine's enumeration order. Serializes as a JSON array of
/// binding objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
}

impl SolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, solution: Solution) {
        self.solutions.push(solution);
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }
}

impl IntoIterator for SolutionSet {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

/// Drives a query to completion under a time budget.
///
/// The deadline is derived per call (`now + budget`); nothing is shared
/// across invocations.
#[derive(Debug, Clone)]
pub struct SolutionCollector {
    budget: Duration,
}

impl Default for SolutionCollector {
    fn default() -> Self {
        Self {
            budget: DEFAULT_QUERY_BUDGET,
        }
    }
}

impl SolutionCollector {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Materialize every solution of `query`, in enumeration order.
    ///
    /// The engine-side iterator is dropped on every exit path, so engine
    /// resources are released whether the query completes, times out, or
    /// faults.
    pub fn collect(
        &self,
        engine: &dyn LogicEngine,
        query: &str,
    ) -> Result<SolutionSet, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let started = Instant::now();
        let cancel = CancelToken::with_deadline(started + self.budget);
        tracing::debug!(
            query_len = query.len(),
            budget_ms = self.budget.as_millis() as u64,
            "collecting solutions"
        );

        let mut iter = engine
            .solve(query, cancel.clone())
            .map_err(|fault| self.classify(fault))?;

        let mut set = SolutionSet::new();
        loop {
            // The engine checks the token inside its search loop; this check
            // covers engines that only notice cancellation between solutions.
            if cancel.is_cancelled() {
                tracing::warn!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    discarded = set.len(),
                    "query timed out"
                );
                return Err(QueryError::Timeout {
                    budget: self.budget,
                });
            }
            match iter.next_solution() {
                Ok(Some(solution)) => set.push(solution),
                Ok(None) => break,
                Err(fault) => {
                    let err = self.classify(fault);
                    if matches!(err, QueryError::Timeout { .. }) {
                        tracing::warn!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            discarded = set.len(),
                            "query timed out mid-search"
                        );
                    }
                    return Err(err);
                }
            }
        }

        tracing::debug!(
            solutions = set.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query complete"
        );
        Ok(set)
    }

    fn classify(&self, fault: EngineFault) -> QueryError {
        match fault {
            EngineFault::Cancelled => QueryError::Timeout {
                budget: self.budget,
            },
            fault => QueryError::Engine { fault },
        }
    }
}
