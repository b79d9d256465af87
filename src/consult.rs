//! Program loading against the shared knowledge base.
//!
//! No per-call deadline is imposed: loading is bounded by program size, not
//! search space. Semantics are at-least-applied — the engine keeps whatever
//! clauses it asserted before a failing directive, and no rollback is
//! attempted here.

use crate::engine::LogicEngine;
use crate::error::ConsultError;

/// Execute `program` against the engine's knowledge base.
///
/// `Ok(())` means the whole program was applied. On a fault, clauses
/// processed before the failing one remain asserted; re-running a corrected
/// program is the caller's decision, not this layer's.
pub fn apply(engine: &dyn LogicEngine, program: &str) -> Result<(), ConsultError> {
    let program = program.trim();
    if program.is_empty() {
        return Err(ConsultError::EmptyProgram);
    }

    tracing::debug!(program_len = program.len(), "loading program");
    engine
        .consult(program)
        .map_err(|fault| ConsultError::Engine { fault })?;
    tracing::info!(program_len = program.len(), "program loaded");
    Ok(())
}
