// Core tools implementation
pub mod dyn_tool;
pub mod registry;
pub mod render;
pub mod spec;
pub mod tool;

pub use registry::ToolRegistry;
pub use render::Render;
pub use spec::ToolSpec;
pub use tool::{Tool, ToolContext};
