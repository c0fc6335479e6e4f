use super::render::Render;
use super::spec::ToolSpec;
use super::tool::{Tool, ToolContext};
use crate::types::ToolError;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Type-erased tool interface for storing heterogeneous tools in collections
#[async_trait::async_trait]
pub trait DynTool: Send + Sync + 'static {
    /// Get the static metadata for this tool
    fn spec(&self) -> ToolSpec;

    /// Invoke the tool with JSON parameters and get a type-erased output
    async fn invoke<'a>(&self, context: &ToolContext<'a>, params: Value)
        -> Result<Box<dyn Render>>;
}

/// Automatic implementation of DynTool for any type that implements Tool
#[async_trait::async_trait]
impl<T> DynTool for T
where
    T: Tool,
    T::Input: DeserializeOwned,
    T::Output: Render + Send + Sync + 'static,
{
    fn spec(&self) -> ToolSpec {
        Tool::spec(self)
    }

    async fn invoke<'a>(
        &self,
        context: &ToolContext<'a>,
        params: Value,
    ) -> Result<Box<dyn Render>> {
        let input: T::Input =
            serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters {
                tool: Tool::spec(self).name.to_string(),
                message: e.to_string(),
            })?;

        let output = self.execute(context, input).await?;

        Ok(Box::new(output) as Box<dyn Render>)
    }
}
