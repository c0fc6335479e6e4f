// Tool calling: registry, built-in tools, directive parsing and the system message
mod parse;

pub mod core;
pub mod impls;
pub mod system_message;

use serde::Serialize;
use serde_json::Value;

pub use self::core::{ToolContext, ToolRegistry};
pub use parse::{parse_tool_directives, ToolCallDirective};
pub use system_message::generate_system_message;

/// Public description of a registered tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}
