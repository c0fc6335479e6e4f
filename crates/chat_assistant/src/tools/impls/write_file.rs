use crate::tools::core::{Render, Tool, ToolContext, ToolSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

// Input type for the write_file tool
#[derive(Deserialize, Serialize)]
pub struct WriteFileInput {
    pub path: String,
    pub content: String,
}

// Output type
pub struct WriteFileOutput {
    pub path: String,
    pub bytes_written: usize,
}

impl Render for WriteFileOutput {
    fn status(&self) -> String {
        format!("Wrote {} bytes to {}", self.bytes_written, self.path)
    }

    fn render(&self) -> String {
        format!("File written: {}", self.path)
    }
}

pub struct WriteFileTool;

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    type Input = WriteFileInput;
    type Output = WriteFileOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "write_file",
            description: "Create or overwrite a file in the workspace. Missing parent directories are created.",
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "File path relative to the workspace root"
                    },
                    "content": {
                        "type": "string",
                        "description": "The complete content of the file"
                    }
                },
                "required": ["path", "content"]
            }),
        }
    }

    async fn execute<'a>(
        &self,
        context: &ToolContext<'a>,
        input: Self::Input,
    ) -> Result<Self::Output> {
        let full_path = context.resolve_path(&input.path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directories for '{}'", input.path))?;
        }

        tokio::fs::write(&full_path, input.content.as_bytes())
            .await
            .with_context(|| format!("Failed to write file '{}'", input.path))?;

        Ok(WriteFileOutput {
            path: input.path,
            bytes_written: input.content.len(),
        })
    }
}
