pub mod export;
mod runner;
mod types;

pub use runner::{Agent, AgentComponents};
pub use types::AgentState;
