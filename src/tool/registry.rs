use super::ToolDefinition;
use ahash::AHashMap;

/// Resolves tool definitions by name.
pub trait ToolRegistry {
    fn resolve(&self, name: &str) -> Option<&ToolDefinition>;
}

/// In-memory tool catalog.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: AHashMap<String, ToolDefinition>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool, replacing any previous entry with the same name.
    pub fn register(&mut self, tool: ToolDefinition) -> &mut Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    /// Registers a tool under an additional name.
    pub fn with_alias(mut self, alias: &str, tool_name: &str) -> Self {
        if let Some(tool) = self.tools.get(tool_name).cloned() {
            self.tools.insert(alias.to_string(), tool);
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tools: Vec<ToolDefinition> = serde_json::from_str(json)?;
        Ok(tools.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<ToolDefinition> for ToolCatalog {
    fn from_iter<I: IntoIterator<Item = ToolDefinition>>(iter: I) -> Self {
        let mut catalog = ToolCatalog::new();
        for tool in iter {
            catalog.register(tool);
        }
        catalog
    }
}

impl ToolRegistry for ToolCatalog {
    fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }
}
