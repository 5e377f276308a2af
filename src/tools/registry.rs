use std::collections::HashMap;
use std::sync::Arc;

use super::{
    FastqcTool, ListDirectoryTool, ReadFileLinesTool, SalmonIndexTool, SalmonQuantTool, Tool,
};
use crate::config::BinaryConfig;
use crate::process::ProcessRunner;

/// Registry for tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// The five bioinformatics tools, sharing one process runner
    pub fn bioinformatics(binaries: &BinaryConfig) -> Self {
        let runner = Arc::new(ProcessRunner::new(binaries.clone()));

        let mut registry = Self::new();
        registry.register(FastqcTool::new(Arc::clone(&runner)));
        registry.register(SalmonIndexTool::new(Arc::clone(&runner)));
        registry.register(SalmonQuantTool::new(runner));
        registry.register(ListDirectoryTool);
        registry.register(ReadFileLinesTool);
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all tools, ordered by name
    pub fn all(&self) -> Vec<&dyn Tool> {
        let mut tools: Vec<&dyn Tool> = self.tools.values().map(|t| t.as_ref()).collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    /// Get tool names, ordered
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
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
