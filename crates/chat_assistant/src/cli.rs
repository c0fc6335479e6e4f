use crate::settings::SettingsOverrides;
use clap::Parser;
use llm::ProviderKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat assistant with workspace tools", long_about = None)]
pub struct Args {
    /// Workspace folder the file tools operate in. Without it every tool call fails.
    #[arg(short = 'w', long)]
    pub workspace: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/chat-assistant/settings.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// LLM provider to use, overriding the settings file
    #[arg(short = 'p', long)]
    pub provider: Option<ProviderKind>,

    /// Model name to use (provider-specific)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API base URL for the provider
    #[arg(long)]
    pub base_url: Option<String>,

    /// Maximum number of chained tool turns per message
    #[arg(long)]
    pub max_continuation_depth: Option<u32>,

    /// Send a single message, print the conversation and exit
    #[arg(short, long)]
    pub task: Option<String>,

    /// Enable verbose logging (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn settings_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            provider: self.provider,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_continuation_depth: self.max_continuation_depth,
        }
    }
}
