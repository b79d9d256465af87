//! Engine collaborator contract.
//!
//! heka does not implement query resolution; it drives an engine that does.
//! This module pins down exactly what that engine must provide: a cancellable
//! solution iterator ([`LogicEngine::solve`]), program loading
//! ([`LogicEngine::consult`]), and an optional predicate-enumeration
//! capability ([`LogicEngine::predicate_index`]).
//!
//! The enumeration capability is deliberately an explicit trait rather than
//! any form of reach-into-internals introspection: an engine that does not
//! implement it reports `None` and the catalog fails fast with a clean
//! `Unsupported` error.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cancel::CancelToken;
use crate::catalog::PredicateIndex;
use crate::error::EngineFault;

/// One bound term value, rendered by the engine.
///
/// The service layer treats term text as opaque: it never parses or
/// interprets it, only carries it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    pub fn new(rendered: impl Into<String>) -> Self {
        Self(rendered.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One satisfying variable-binding assignment for a query.
///
/// Bindings keep the order in which the engine bound them; variable names
/// are unique within a solution. Serializes as an ordered JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    bindings: Vec<(String, Term)>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable. Re-binding an already-present name replaces its term.
    pub fn bind(&mut self, var: impl Into<String>, term: Term) {
        let var = var.into();
        match self.bindings.iter_mut().find(|(name, _)| *name == var) {
            Some((_, existing)) => *existing = term,
            None => self.bindings.push((var, term)),
        }
    }

    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, term)| term)
    }

    /// Bindings in engine binding order.
    pub fn bindings(&self) -> &[(String, Term)] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for (var, term) in &self.bindings {
            map.serialize_entry(var, term)?;
        }
        map.end()
    }
}

/// Engine-side solution iterator for one query execution.
///
/// Implementations hold whatever engine resources the search needs and must
/// release them in `Drop` — the collector drops the iterator on every exit
/// path, including timeout and fault.
pub trait Solutions {
    /// Advance to the next solution.
    ///
    /// `Ok(None)` means the search is exhausted (a valid outcome even when no
    /// solution was ever produced). A fault is terminal: the collector will
    /// not call `next_solution` again after an `Err`.
    fn next_solution(&mut self) -> Result<Option<Solution>, EngineFault>;
}

/// The logic-programming engine heka drives.
///
/// The engine owns the knowledge base, the only state that persists across
/// invocations. heka adds no locking of its own: implementations must either
/// synchronize internal access themselves or be deployed behind a
/// one-call-at-a-time policy.
pub trait LogicEngine: Send + Sync {
    /// Open a solution iterator for `query`.
    ///
    /// The engine must check `cancel` inside its search loop (not only
    /// between solutions) and report [`EngineFault::Cancelled`] when it
    /// trips mid-search.
    fn solve<'a>(
        &'a self,
        query: &str,
        cancel: CancelToken,
    ) -> Result<Box<dyn Solutions + 'a>, EngineFault>;

    /// Execute a program against the knowledge base.
    ///
    /// Clauses take effect as they are processed; on a mid-program fault the
    /// engine keeps whatever was already asserted.
    fn consult(&self, program: &str) -> Result<(), EngineFault>;

    /// Predicate-enumeration capability, if this engine supports it.
    fn predicate_index(&self) -> Option<&dyn PredicateIndex> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_keep_insertion_order() {
        let mut solution = Solution::new();
        solution.bind("Z", Term::from("1"));
        solution.bind("A", Term::from("2"));
        solution.bind("M", Term::from("3"));

        let names: Vec<&str> = solution
            .bindings()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn rebinding_replaces_in_place() {
        let mut solution = Solution::new();
        solution.bind("X", Term::from("a"));
        solution.bind("Y", Term::from("b"));
        solution.bind("X", Term::from("c"));

        assert_eq!(solution.len(), 2);
        assert_eq!(solution.get("X"), Some(&Term::from("c")));
        assert_eq!(solution.bindings()[0].0, "X");
    }

    #[test]
    fn solution_serializes_as_ordered_object() {
        let mut solution = Solution::new();
        solution.bind("Who", Term::from("socrates"));
        solution.bind("What", Term::from("mortal"));

        let json = serde_json::to_string(&solution).unwrap();
        assert_eq!(json, r#"{"Who":"socrates","What":"mortal"}"#);
    }

    #[test]
    fn empty_solution_serializes_as_empty_object() {
        let json = serde_json::to_string(&Solution::new()).unwrap();
        assert_eq!(json, "{}");
    }
}
