use crate::types::ToolError;

/// Where the agent is in processing a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    #[default]
    Idle,
    /// Request sent, no reply yet
    AwaitingModel,
    StreamingResponse,
    ExecutingTools,
}

/// Render the outcome of a tool call as the text of a synthetic user message
pub fn format_tool_result(tool: &str, result: &Result<String, ToolError>) -> String {
    match result {
        Ok(output) => format!("[Tool result]\nTool: {tool}\nStatus: success\nOutput:\n{output}"),
        Err(e) => format!("[Tool result]\nTool: {tool}\nStatus: failure\nError: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tool_result() {
        assert_eq!(
            format_tool_result("list_files", &Ok("a.txt\nb.txt".to_string())),
            "[Tool result]\nTool: list_files\nStatus: success\nOutput:\na.txt\nb.txt"
        );
        assert_eq!(
            format_tool_result("nope", &Err(ToolError::ToolNotFound("nope".to_string()))),
            "[Tool result]\nTool: nope\nStatus: failure\nError: Tool not found: nope"
        );
    }
}
