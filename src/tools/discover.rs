//! Discover tool: list the engine's registered predicates.

use crate::catalog;
use crate::engine::LogicEngine;
use crate::error::HekaResult;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolSignature};

/// Snapshot the engine's registered predicates, one `name/arity` per line.
///
/// Requires the engine's predicate-enumeration capability; an engine without
/// it gets an `Unsupported` error, not a best-effort guess.
pub struct DiscoverTool;

impl Tool for DiscoverTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "discover".into(),
            description: "Show the predicates currently registered in the logic engine.".into(),
            parameters: vec![],
        }
    }

    fn execute(&self, engine: &dyn LogicEngine, _input: ToolInput) -> HekaResult<ToolOutput> {
        let descriptors = catalog::snapshot(engine)?;
        if descriptors.is_empty() {
            return Ok(ToolOutput::text("no predicates registered"));
        }
        let lines: Vec<String> = descriptors.iter().map(|d| d.to_string()).collect();
        Ok(ToolOutput::text(lines.join("\n")))
    }
}
