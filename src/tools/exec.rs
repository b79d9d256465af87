//! Exec tool: load a program into the engine's knowledge base.

use crate::consult;
use crate::engine::LogicEngine;
use crate::error::HekaResult;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};

/// Execute a program against the shared knowledge base.
///
/// At-least-applied: on a mid-program fault, clauses asserted before the
/// failing one remain in the knowledge base and the fault is reported.
pub struct ExecTool;

impl Tool for ExecTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "exec".into(),
            description: "Execute a program against the logic engine's knowledge base.".into(),
            parameters: vec![ToolParam {
                name: "program".into(),
                description: "The program to execute.".into(),
                required: true,
            }],
        }
    }

    fn execute(&self, engine: &dyn LogicEngine, input: ToolInput) -> HekaResult<ToolOutput> {
        let program = input.require_non_empty("program", "exec")?;
        consult::apply(engine, program)?;
        Ok(ToolOutput::text("program executed successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConsultError, HekaError};
    use crate::fixture::FactEngine;

    #[test]
    fn confirms_successful_load() {
        let engine = FactEngine::new();
        let out = ExecTool
            .execute(
                &engine,
                ToolInput::new().with_param("program", "likes(alice, logic)."),
            )
            .unwrap();
        assert_eq!(out.text, "program executed successfully");
    }

    #[test]
    fn fault_propagates_with_engine_diagnostic() {
        let engine = FactEngine::new();
        let err = ExecTool
            .execute(&engine, ToolInput::new().with_param("program", "p(a"))
            .unwrap_err();
        assert!(matches!(
            err,
            HekaError::Consult(ConsultError::Engine { .. })
        ));
    }

    #[test]
    fn missing_program_param_rejected() {
        let engine = FactEngine::new();
        let err = ExecTool.execute(&engine, ToolInput::new()).unwrap_err();
        assert!(matches!(err, HekaError::Tool(_)));
    }
}
