use crate::tools::core::{Render, Tool, ToolContext, ToolSpec};
use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

// Input type for the read_file tool
#[derive(Deserialize, Serialize)]
pub struct ReadFileInput {
    pub path: String,
}

// Output type
pub struct ReadFileOutput {
    pub path: String,
    pub content: String,
}

impl Render for ReadFileOutput {
    fn status(&self) -> String {
        format!("Read {} bytes from {}", self.content.len(), self.path)
    }

    fn render(&self) -> String {
        self.content.clone()
    }
}

pub struct ReadFileTool;

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    type Input = ReadFileInput;
    type Output = ReadFileOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "read_file",
            description: "Read the contents of a file in the workspace",
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "File path relative to the workspace root"
                    }
                },
                "required": ["path"]
            }),
        }
    }

    async fn execute<'a>(
        &self,
        context: &ToolContext<'a>,
        input: Self::Input,
    ) -> Result<Self::Output> {
        let full_path = context.resolve_path(&input.path)?;
        let bytes = tokio::fs::read(&full_path)
            .await
            .with_context(|| format!("Failed to read file '{}'", input.path))?;

        let (content, encoding) = decode_text(&bytes);
        if encoding != UTF_8 {
            debug!("Decoded '{}' as {}", input.path, encoding.name());
        }

        Ok(ReadFileOutput {
            path: input.path,
            content,
        })
    }
}

/// Decode file bytes to text. A BOM wins, then UTF-8, then Windows-1252,
/// which maps every byte and so never fails.
fn decode_text(bytes: &[u8]) -> (String, &'static Encoding) {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None if std::str::from_utf8(bytes).is_ok() => UTF_8,
        None => WINDOWS_1252,
    };
    let (content, _, _) = encoding.decode(bytes);
    (content.into_owned(), encoding)
}
