//! System message generation functionality

use crate::tools::ToolDefinition;

const SYSTEM_MESSAGE: &str = include_str!("../../resources/system_message.md");

const TOOL_SEPARATOR: &str = "\n\n---\n\n";

/// Generate the system message describing the given tools.
///
/// Rebuilt for every request so it always reflects the current registry.
pub fn generate_system_message(definitions: &[ToolDefinition]) -> String {
    let tools = definitions
        .iter()
        .map(describe_tool)
        .collect::<Vec<_>>()
        .join(TOOL_SEPARATOR);

    SYSTEM_MESSAGE.replace("{{tools}}", &tools)
}

fn describe_tool(definition: &ToolDefinition) -> String {
    let parameters = serde_json::to_string_pretty(&definition.parameters)
        .unwrap_or_else(|_| definition.parameters.to_string());
    format!(
        "Tool name: {}\nDescription: {}\nParameters: {}",
        definition.name, definition.description, parameters
    )
}
