use crate::tools::core::{Render, Tool, ToolContext, ToolSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

// Input type for the list_files tool
#[derive(Deserialize, Serialize)]
pub struct ListFilesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// Output type
pub struct ListFilesOutput {
    pub path: String,
    pub entries: Vec<String>,
}

impl Render for ListFilesOutput {
    fn status(&self) -> String {
        format!("Listed {} entries in '{}'", self.entries.len(), self.path)
    }

    fn render(&self) -> String {
        self.entries.join("\n")
    }
}

pub struct ListFilesTool;

#[async_trait::async_trait]
impl Tool for ListFilesTool {
    type Input = ListFilesInput;
    type Output = ListFilesOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "list_files",
            description: "List the entries of a directory in the workspace (not recursive)",
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Optional: directory path relative to the workspace root. Defaults to the root."
                    }
                }
            }),
        }
    }

    async fn execute<'a>(
        &self,
        context: &ToolContext<'a>,
        input: Self::Input,
    ) -> Result<Self::Output> {
        let path = input.path.unwrap_or_default();
        let full_path = context.resolve_path(&path)?;

        let mut read_dir = tokio::fs::read_dir(&full_path)
            .await
            .with_context(|| format!("Failed to list directory '{path}'"))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .with_context(|| format!("Failed to list directory '{path}'"))?
        {
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();

        Ok(ListFilesOutput { path, entries })
    }
}
