//! Tool seam toward the transport collaborator.
//!
//! Each operation the service exposes is a [`Tool`]: a signature the
//! transport reads to declare its schema, plus an execute method driven with
//! pre-validated string parameters. The [`ToolRegistry`] is the dispatch
//! boundary — transport framing, request IDs, and capability negotiation all
//! stay on the far side of it.
//!
//! Argument handling is shape-checked here, never assumed: a missing or
//! empty required parameter is an `InvalidArgument`-class error raised
//! before the engine is touched.

use std::collections::HashMap;

use crate::engine::LogicEngine;
use crate::error::{HekaResult, ToolError};

/// Description of a tool's interface.
#[derive(Debug, Clone)]
pub struct ToolSignature {
    /// Unique name of the tool.
    pub name: String,
    /// What this tool does.
    pub description: String,
    /// Parameters the tool accepts.
    pub parameters: Vec<ToolParam>,
}

/// A single parameter in a tool's signature.
#[derive(Debug, Clone)]
pub struct ToolParam {
    /// Parameter name.
    pub name: String,
    /// What this parameter controls.
    pub description: String,
    /// Whether this parameter must be provided.
    pub required: bool,
}

/// Input to a tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    params: HashMap<String, String>,
}

impl ToolInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a required parameter, erroring if absent.
    pub fn require(&self, name: &str, tool_name: &str) -> Result<&str, ToolError> {
        self.get(name).ok_or_else(|| ToolError::MissingParam {
            tool: tool_name.into(),
            param: name.into(),
        })
    }

    /// Get a required parameter that must be non-empty after trimming.
    pub fn require_non_empty(&self, name: &str, tool_name: &str) -> Result<&str, ToolError> {
        let value = self.require(name, tool_name)?.trim();
        if value.is_empty() {
            return Err(ToolError::EmptyParam {
                tool: tool_name.into(),
                param: name.into(),
            });
        }
        Ok(value)
    }
}

/// Output from a tool execution: the caller-visible text payload.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One operation exposed to the transport collaborator.
pub trait Tool: Send + Sync {
    /// Describe this tool's interface.
    fn signature(&self) -> ToolSignature;

    /// Execute the tool with the given input against the engine.
    fn execute(&self, engine: &dyn LogicEngine, input: ToolInput) -> HekaResult<ToolOutput>;
}

/// Registry of available tools; the surface a dispatcher drives.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. If a tool with the same name exists, it is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let sig = tool.signature();
        self.tools.insert(sig.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    /// List all registered tool signatures.
    pub fn list(&self) -> Vec<ToolSignature> {
        self.tools.values().map(|t| t.signature()).collect()
    }

    /// Execute a tool by name.
    pub fn execute(
        &self,
        name: &str,
        input: ToolInput,
        engine: &dyn LogicEngine,
    ) -> HekaResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool { name: name.into() })?;
        tracing::debug!(tool = name, "dispatching tool call");
        tool.execute(engine, input)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HekaError;
    use crate::fixture::FactEngine;

    struct EchoTool;
    impl Tool for EchoTool {
        fn signature(&self) -> ToolSignature {
            ToolSignature {
                name: "echo".into(),
                description: "Echo a parameter back".into(),
                parameters: vec![ToolParam {
                    name: "text".into(),
                    description: "Text to echo".into(),
                    required: true,
                }],
            }
        }
        fn execute(&self, _engine: &dyn LogicEngine, input: ToolInput) -> HekaResult<ToolOutput> {
            let text = input.require_non_empty("text", "echo")?;
            Ok(ToolOutput::text(text))
        }
    }

    #[test]
    fn register_and_list() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].name, "echo");
    }

    #[test]
    fn unknown_tool_is_a_dispatch_error() {
        let registry = ToolRegistry::new();
        let engine = FactEngine::new();
        let err = registry
            .execute("nonexistent", ToolInput::new(), &engine)
            .unwrap_err();
        assert!(matches!(
            err,
            HekaError::Tool(ToolError::UnknownTool { .. })
        ));
    }

    #[test]
    fn missing_required_param_rejected() {
        let registry = {
            let mut r = ToolRegistry::new();
            r.register(Box::new(EchoTool));
            r
        };
        let engine = FactEngine::new();
        let err = registry
            .execute("echo", ToolInput::new(), &engine)
            .unwrap_err();
        assert!(matches!(
            err,
            HekaError::Tool(ToolError::MissingParam { .. })
        ));
    }

    #[test]
    fn empty_required_param_rejected() {
        let input = ToolInput::new().with_param("text", "   ");
        let err = EchoTool
            .execute(&FactEngine::new(), input)
            .unwrap_err();
        assert!(matches!(err, HekaError::Tool(ToolError::EmptyParam { .. })));
    }

    #[test]
    fn input_builder_roundtrip() {
        let input = ToolInput::new()
            .with_param("query", "p(X)")
            .with_param("other", "y");
        assert_eq!(input.get("query"), Some("p(X)"));
        assert_eq!(input.get("missing"), None);
    }
}
