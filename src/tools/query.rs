//! Query tool: run a query under a time budget, return all solutions.

use std::time::Duration;

use crate::collect::SolutionCollector;
use crate::engine::LogicEngine;
use crate::error::{HekaResult, ToolError};
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};

/// Run a query against the engine and render every solution as a JSON array
/// of binding objects. `[]` means the query completed with no solutions; a
/// timeout or engine fault is a structured error, never an empty success.
pub struct QueryTool {
    collector: SolutionCollector,
}

impl QueryTool {
    /// Query tool with the default time budget.
    pub fn new() -> Self {
        Self {
            collector: SolutionCollector::default(),
        }
    }

    /// Query tool with a custom per-call budget.
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            collector: SolutionCollector::new(budget),
        }
    }
}

impl Default for QueryTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for QueryTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "query".into(),
            description: "Query the logic engine and return all solutions.".into(),
            parameters: vec![ToolParam {
                name: "query".into(),
                description: "The query to execute.".into(),
                required: true,
            }],
        }
    }

    fn execute(&self, engine: &dyn LogicEngine, input: ToolInput) -> HekaResult<ToolOutput> {
        let query = input.require_non_empty("query", "query")?;
        let set = self.collector.collect(engine, query)?;
        let rendered = serde_json::to_string(&set).map_err(|e| ToolError::Render {
            tool: "query".into(),
            message: e.to_string(),
        })?;
        Ok(ToolOutput::text(rendered))
    }
}
