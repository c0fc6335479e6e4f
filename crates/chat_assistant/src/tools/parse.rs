use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{error, warn};

/// A tool call requested by the model through a fenced JSON block
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallDirective {
    pub tool: String,
    pub params: Value,
}

fn tool_block_regex() -> Result<&'static Regex, &'static regex::Error> {
    static REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```"))
        .as_ref()
}

/// Extract tool call directives from a complete assistant reply.
///
/// Every fenced `json` block holding an object with a non-empty `tool`
/// string and a non-empty `params` value is a directive. Other blocks are
/// skipped.
/// Directives are returned in the order they appear.
pub fn parse_tool_directives(text: &str) -> Vec<ToolCallDirective> {
    let regex = match tool_block_regex() {
        Ok(regex) => regex,
        Err(e) => {
            error!("Tool block pattern failed to compile: {}", e);
            return Vec::new();
        }
    };

    regex
        .captures_iter(text)
        .filter_map(|captures| {
            let block = captures.get(1)?.as_str();
            match parse_directive(block) {
                Ok(directive) => Some(directive),
                Err(reason) => {
                    warn!("Skipping JSON block ({}): {}", reason, block);
                    None
                }
            }
        })
        .collect()
}

fn parse_directive(block: &str) -> Result<ToolCallDirective, String> {
    let value: Value = serde_json::from_str(block).map_err(|e| format!("invalid JSON: {e}"))?;

    let tool = match value.get("tool") {
        Some(Value::String(tool)) if !tool.is_empty() => tool.clone(),
        _ => return Err("no tool name".to_string()),
    };

    let params = match value.get("params") {
        Some(params) if !is_empty_value(params) => params.clone(),
        _ => return Err("no params".to_string()),
    };

    Ok(ToolCallDirective { tool, params })
}

/// `null`, `false`, zero and `""` do not count as parameters. Empty
/// objects and arrays do.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
