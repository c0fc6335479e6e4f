use super::render::Render;
use super::spec::ToolSpec;
use crate::types::ToolError;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::{Component, Path, PathBuf};

/// Context provided to tools during execution
#[derive(Clone, Copy, Default)]
pub struct ToolContext<'a> {
    /// Root folder of the open workspace, if any
    pub workspace_root: Option<&'a Path>,
}

impl<'a> ToolContext<'a> {
    pub fn new(workspace_root: Option<&'a Path>) -> Self {
        Self { workspace_root }
    }

    pub fn workspace_root(&self) -> Result<&'a Path, ToolError> {
        self.workspace_root.ok_or(ToolError::MissingWorkspace)
    }

    /// Resolve a path given by the model against the workspace root.
    ///
    /// Leading separators are dropped so absolute paths still land below the
    /// root. Parent components are kept as given.
    pub fn resolve_path(&self, path: &str) -> Result<PathBuf, ToolError> {
        let root = self.workspace_root()?;
        let relative: PathBuf = Path::new(path)
            .components()
            .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
            .collect();
        Ok(root.join(relative))
    }
}

/// Core trait for tools, defining the execution interface
#[async_trait::async_trait]
pub trait Tool: Send + Sync + 'static {
    /// Input type for this tool, must be deserializable from JSON
    type Input: DeserializeOwned + Send;

    /// Output type for this tool
    type Output: Render + Send + Sync;

    /// Get the metadata for this tool
    fn spec(&self) -> ToolSpec;

    /// Execute the tool with the given context and input
    async fn execute<'a>(
        &self,
        context: &ToolContext<'a>,
        input: Self::Input,
    ) -> Result<Self::Output>;
}
