mod agent;
mod cli;
mod logging;
mod session;
mod settings;
mod tools;
mod types;
mod ui;

#[cfg(test)]
mod tests;

use crate::agent::{Agent, AgentComponents};
use crate::cli::Args;
use crate::session::{build_provider, ChatSession};
use crate::settings::SettingsSource;
use crate::tools::ToolRegistry;
use crate::ui::{stdio, ChannelUi, TerminalUi, UserInterface};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    logging::setup_logging(args.verbose);

    let settings_source = SettingsSource::new(args.config.clone(), args.settings_overrides());
    let settings = settings_source.load()?;
    let workspace_root = resolve_workspace(args.workspace.clone())?;

    let build_agent = |ui: Arc<dyn UserInterface>| {
        let mut agent = Agent::new(AgentComponents {
            provider: build_provider(&settings),
            tool_registry: ToolRegistry::with_default_tools(),
            workspace_root: workspace_root.clone(),
            ui,
        });
        agent.set_max_continuation_depth(settings.max_continuation_depth);
        agent
    };

    match args.task {
        Some(task) => {
            let ui: Arc<dyn UserInterface> = Arc::new(TerminalUi::stdout());
            let mut agent = build_agent(ui);
            agent.handle_user_message(task).await;
            println!();
        }
        None => {
            let (command_tx, command_rx) = async_channel::unbounded();
            let (event_tx, event_rx) = async_channel::unbounded();

            let ui: Arc<dyn UserInterface> = Arc::new(ChannelUi::new(event_tx));
            let mut session = ChatSession::new(build_agent(ui.clone()), settings_source, ui);

            let reader = tokio::spawn(stdio::read_commands(
                BufReader::new(tokio::io::stdin()),
                command_tx,
            ));
            let writer = tokio::spawn(stdio::write_events(tokio::io::stdout(), event_rx));

            info!("Waiting for host commands on stdin");
            session.run(command_rx).await;

            // Closes the event channel so the writer can finish
            drop(session);
            if let Err(e) = reader.await.context("Command reader panicked")? {
                warn!("Command reader stopped: {:#}", e);
            }
            writer.await.context("Event writer panicked")??;
        }
    }

    Ok(())
}

fn resolve_workspace(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let Some(path) = path else {
        warn!("No workspace given, file tools are unavailable");
        return Ok(None);
    };

    let root = path
        .canonicalize()
        .with_context(|| format!("Workspace folder not found: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Workspace is not a directory: {}", root.display());
    }
    info!("Workspace: {}", root.display());
    Ok(Some(root))
}
