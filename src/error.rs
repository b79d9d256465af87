//! Rich diagnostic error types for the heka service layer.
//!
//! Each operation defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. `EngineFault` is the one
//! type that crosses the collaborator boundary: it carries whatever
//! diagnostic the wrapped engine reports, classified just enough for the
//! service layer to route it.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the heka service layer.
///
/// Each variant wraps an operation-specific error, preserving the full
/// diagnostic chain (error codes, help text, source chain) through to the
/// caller. Every failure is invocation-scoped: none of them corrupt the
/// engine's knowledge base or require a restart.
#[derive(Debug, Error, Diagnostic)]
pub enum HekaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Consult(#[from] ConsultError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tool(#[from] ToolError),
}

/// Convenience alias for service-layer operations.
pub type HekaResult<T> = std::result::Result<T, HekaError>;

// ---------------------------------------------------------------------------
// Engine faults (collaborator boundary)
// ---------------------------------------------------------------------------

/// A fault reported by the wrapped engine.
///
/// The engine's diagnostic text is carried verbatim; the variants exist so
/// the service layer can tell cancellation apart from genuine failures
/// without parsing message strings.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineFault {
    #[error("syntax error: {message}")]
    #[diagnostic(
        code(heka::engine::syntax),
        help(
            "The engine could not parse the query or program text. \
             Check the clause syntax against the engine's dialect."
        )
    )]
    Syntax { message: String },

    #[error("resource limit: {message}")]
    #[diagnostic(
        code(heka::engine::resource),
        help(
            "The engine hit an internal resource limit (depth, memory, table \
             size). Simplify the query or raise the engine's limits."
        )
    )]
    Resource { message: String },

    #[error("semantic error: {message}")]
    #[diagnostic(
        code(heka::engine::semantic),
        help(
            "The query or program is well-formed but meaningless to the engine \
             (unknown directive, type error in a built-in, ...)."
        )
    )]
    Semantic { message: String },

    #[error("search cancelled before completion")]
    #[diagnostic(
        code(heka::engine::cancelled),
        help(
            "The engine observed its cancel token mid-search. The collector \
             reclassifies this as a timeout when its own deadline tripped."
        )
    )]
    Cancelled,

    #[error("{message}")]
    #[diagnostic(code(heka::engine::fault))]
    Other { message: String },
}

impl EngineFault {
    /// Fault with unclassified engine diagnostic text.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Syntax fault with the engine's parse diagnostic.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Semantic fault with the engine's diagnostic.
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic {
            message: message.into(),
        }
    }

    /// Resource-limit fault with the engine's diagnostic.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Errors from bounded query collection.
#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("empty query")]
    #[diagnostic(
        code(heka::query::empty),
        help(
            "Provide a non-empty query string. Whitespace-only input is \
             rejected before the engine is touched."
        )
    )]
    EmptyQuery,

    #[error("query timed out after {budget:?}")]
    #[diagnostic(
        code(heka::query::timeout),
        help(
            "The solution search exceeded its time budget. Solutions gathered \
             before the deadline are discarded; narrow the query or raise the \
             collector budget and re-issue."
        )
    )]
    Timeout { budget: Duration },

    #[error("engine fault during query")]
    #[diagnostic(code(heka::query::engine))]
    Engine {
        #[source]
        #[diagnostic_source]
        fault: EngineFault,
    },
}

// ---------------------------------------------------------------------------
// Consult errors
// ---------------------------------------------------------------------------

/// Errors from program loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConsultError {
    #[error("empty program")]
    #[diagnostic(
        code(heka::consult::empty),
        help(
            "Provide at least one clause or directive. Whitespace-only input \
             is rejected before the engine is touched."
        )
    )]
    EmptyProgram,

    #[error("engine fault while loading program")]
    #[diagnostic(
        code(heka::consult::engine),
        help(
            "Loading stopped at the failing clause. Clauses loaded before it \
             remain in the knowledge base (at-least-applied, no rollback)."
        )
    )]
    Engine {
        #[source]
        #[diagnostic_source]
        fault: EngineFault,
    },
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors from predicate snapshots.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("engine does not support predicate enumeration")]
    #[diagnostic(
        code(heka::catalog::unsupported),
        help(
            "The wrapped engine returned no `PredicateIndex` capability. \
             Implement `LogicEngine::predicate_index` on the engine wrapper; \
             there is no fallback introspection."
        )
    )]
    Unsupported,

    #[error("engine fault while enumerating predicates")]
    #[diagnostic(code(heka::catalog::engine))]
    Engine {
        #[source]
        #[diagnostic_source]
        fault: EngineFault,
    },
}

// ---------------------------------------------------------------------------
// Tool errors
// ---------------------------------------------------------------------------

/// Errors raised at the tool boundary, before any core operation runs.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolError {
    #[error("tool not found: \"{name}\"")]
    #[diagnostic(
        code(heka::tool::not_found),
        help("Check available tools with `ToolRegistry::list()`.")
    )]
    UnknownTool { name: String },

    #[error("tool \"{tool}\": missing required parameter \"{param}\"")]
    #[diagnostic(
        code(heka::tool::missing_param),
        help(
            "The parameter is declared required in the tool's signature; \
             the transport must supply it."
        )
    )]
    MissingParam { tool: String, param: String },

    #[error("tool \"{tool}\": parameter \"{param}\" is empty")]
    #[diagnostic(
        code(heka::tool::empty_param),
        help("Required string parameters must be non-empty after trimming.")
    )]
    EmptyParam { tool: String, param: String },

    #[error("tool \"{tool}\": failed to render result: {message}")]
    #[diagnostic(code(heka::tool::render))]
    Render { tool: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_budget() {
        let err = QueryError::Timeout {
            budget: Duration::from_secs(15),
        };
        let msg = format!("{err}");
        assert!(msg.contains("timed out"));
        assert!(msg.contains("15"));
    }

    #[test]
    fn engine_fault_is_source_of_query_error() {
        use std::error::Error as _;
        let err = QueryError::Engine {
            fault: EngineFault::syntax("unexpected token `)`"),
        };
        let source = err.source().expect("fault attached as source");
        assert!(format!("{source}").contains("unexpected token"));
    }

    #[test]
    fn resource_fault_carries_engine_diagnostic() {
        let fault = EngineFault::resource("solution table exceeded 1000000 rows");
        let msg = format!("{fault}");
        assert!(msg.contains("resource limit"));
        assert!(msg.contains("1000000 rows"));
    }

    #[test]
    fn top_level_wraps_transparently() {
        let err: HekaError = CatalogError::Unsupported.into();
        assert!(format!("{err}").contains("predicate enumeration"));
    }
}
