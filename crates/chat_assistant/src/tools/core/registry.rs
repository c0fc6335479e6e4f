use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::tools::core::dyn_tool::DynTool;
use crate::tools::core::tool::ToolContext;
use crate::tools::ToolDefinition;
use crate::types::ToolError;

/// Central registry for all tools available to the assistant.
///
/// Tools are listed in registration order. Registering a name twice replaces
/// the earlier tool but keeps its position.
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Create a registry holding the built-in workspace tools
    pub fn with_default_tools() -> Self {
        use crate::tools::impls::{ListFilesTool, ReadFileTool, WriteFileTool};

        let mut registry = Self::new();
        registry.register(Box::new(ReadFileTool));
        registry.register(Box::new(WriteFileTool));
        registry.register(Box::new(ListFilesTool));
        registry
    }

    /// Register a tool in the registry
    pub fn register(&mut self, tool: Box<dyn DynTool>) {
        let name = tool.spec().name.to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            debug!("Replaced tool '{}'", name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Definitions of all registered tools, in registration order
    pub fn list_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| {
                let spec = tool.spec();
                ToolDefinition {
                    name: spec.name.to_string(),
                    description: spec.description.to_string(),
                    parameters: spec.parameters_schema,
                }
            })
            .collect()
    }

    /// Look up a tool, validate the parameters against its schema and run it.
    ///
    /// Returns the rendered output on success.
    pub async fn execute(
        &self,
        name: &str,
        params: Value,
        context: &ToolContext<'_>,
    ) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::ToolNotFound(name.to_string()))?;

        validate_parameters(name, &tool.spec().parameters_schema, &params)?;

        debug!("Executing tool '{}' with params: {}", name, params);
        let output = tool
            .invoke(context, params)
            .await
            .map_err(|e| match e.downcast::<ToolError>() {
                Ok(tool_error) => tool_error,
                Err(e) => ToolError::ToolExecution {
                    tool: name.to_string(),
                    message: format!("{e:#}"),
                },
            })?;

        info!("Tool '{}': {}", name, output.status());
        Ok(output.render())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the parameters against the `type` and `required` entries of an
/// object schema. Nested schemas are left to the tool's own deserialization.
fn validate_parameters(tool: &str, schema: &Value, params: &Value) -> Result<(), ToolError> {
    let invalid = |message: String| ToolError::InvalidParameters {
        tool: tool.to_string(),
        message,
    };

    if schema.get("type").and_then(Value::as_str) != Some("object") {
        return Ok(());
    }

    let object = params
        .as_object()
        .ok_or_else(|| invalid(format!("expected an object, got {params}")))?;

    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str);

    for field in required {
        match object.get(field) {
            None | Some(Value::Null) => {
                return Err(invalid(format!("missing required parameter '{field}'")))
            }
            Some(_) => {}
        }
    }

    Ok(())
}
