use crate::agent::Agent;
use crate::settings::{AssistantSettings, SettingsSource};
use crate::ui::{HostCommand, HostEvent, UserInterface};
use llm::{create_chat_client, ChatProvider, ConfigurationError};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Build the chat client selected by the settings
pub fn build_provider(
    settings: &AssistantSettings,
) -> Result<Box<dyn ChatProvider>, ConfigurationError> {
    let config = settings.resolve_provider_config()?;
    create_chat_client(&config)
}

/// Connects the host command channel to the agent.
///
/// Commands are handled one at a time: a user message is processed to
/// completion, including all tool continuations, before the next command is
/// taken from the channel.
pub struct ChatSession {
    agent: Agent,
    settings_source: SettingsSource,
    ui: Arc<dyn UserInterface>,
}

impl ChatSession {
    pub fn new(agent: Agent, settings_source: SettingsSource, ui: Arc<dyn UserInterface>) -> Self {
        Self {
            agent,
            settings_source,
            ui,
        }
    }

    #[allow(dead_code)]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Process commands until the host closes the channel
    pub async fn run(&mut self, commands: async_channel::Receiver<HostCommand>) {
        while let Ok(command) = commands.recv().await {
            self.handle_command(command).await;
        }
        info!("Host closed the command channel");
    }

    pub async fn handle_command(&mut self, command: HostCommand) {
        debug!("Handling {:?}", command);
        match command {
            HostCommand::SendMessage { content } => self.agent.handle_user_message(content).await,
            HostCommand::ClearChat => self.agent.clear().await,
            HostCommand::ExportChat => self.agent.export().await,
            HostCommand::Ready => self.agent.republish().await,
            HostCommand::ConfigurationChanged => self.reload_configuration().await,
        }
    }

    async fn reload_configuration(&mut self) {
        let settings = match self.settings_source.load() {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to reload settings: {:#}", e);
                let event = HostEvent::ShowError {
                    message: format!("Failed to reload settings: {e:#}"),
                };
                if let Err(e) = self.ui.send_event(event).await {
                    error!("Failed to deliver event to host: {}", e);
                }
                return;
            }
        };

        info!("Settings changed, rebuilding the chat provider");
        self.agent.set_provider(build_provider(&settings));
        self.agent
            .set_max_continuation_depth(settings.max_continuation_depth);
    }
}
