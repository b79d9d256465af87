//! Point-in-time predicate snapshots.
//!
//! Snapshots go through the engine's explicit [`PredicateIndex`] capability.
//! An engine that does not expose the capability gets a clean `Unsupported`
//! error — there is no fallback that digs into engine internals.

use serde::Serialize;

use crate::engine::LogicEngine;
use crate::error::{CatalogError, EngineFault};

/// Identifier of one registered predicate: name plus arity.
///
/// Displays in the engine-native `name/arity` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PredicateDescriptor {
    pub name: String,
    pub arity: usize,
}

impl PredicateDescriptor {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

impl std::fmt::Display for PredicateDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Predicate-enumeration capability an engine may implement.
pub trait PredicateIndex {
    /// List the currently registered predicates, in whatever order the
    /// engine yields them. The order is implementation-defined and not
    /// guaranteed stable across calls if the knowledge base is concurrently
    /// mutated.
    fn predicates(&self) -> Result<Vec<PredicateDescriptor>, EngineFault>;
}

/// Capture a point-in-time list of the engine's registered predicates.
///
/// The snapshot is not live: the knowledge base may be mutated the moment
/// this returns.
pub fn snapshot(engine: &dyn LogicEngine) -> Result<Vec<PredicateDescriptor>, CatalogError> {
    let index = engine.predicate_index().ok_or(CatalogError::Unsupported)?;
    let descriptors = index
        .predicates()
        .map_err(|fault| CatalogError::Engine { fault })?;
    tracing::debug!(predicates = descriptors.len(), "predicate snapshot taken");
    Ok(descriptors)
}
