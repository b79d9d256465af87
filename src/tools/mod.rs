//! The three tools the service exposes: query, exec, discover.

pub mod discover;
pub mod exec;
pub mod query;

pub use discover::DiscoverTool;
pub use exec::ExecTool;
pub use query::QueryTool;

use crate::tool::ToolRegistry;

/// Registry pre-populated with the full tool surface.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(QueryTool::new()));
    registry.register(Box::new(ExecTool));
    registry.register(Box::new(DiscoverTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_three_tools() {
        let registry = default_registry();
        let mut names: Vec<String> = registry.list().into_iter().map(|s| s.name).collect();
        names.sort();
        assert_eq!(names, vec!["discover", "exec", "query"]);
    }
}
