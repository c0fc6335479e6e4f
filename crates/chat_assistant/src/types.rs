use thiserror::Error;

/// Errors raised while executing a tool call.
///
/// None of these abort the conversation: they are reported back to the
/// model as a tool result so it can adapt.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters for tool '{tool}': {message}")]
    InvalidParameters { tool: String, message: String },

    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("No workspace folder is open")]
    MissingWorkspace,
}
