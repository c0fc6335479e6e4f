use super::export::render_markdown;
use super::types::{format_tool_result, AgentState};
use crate::tools::{
    generate_system_message, parse_tool_directives, ToolCallDirective, ToolContext, ToolRegistry,
};
use crate::ui::{HostEvent, UserInterface};
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use llm::{ChatProvider, ConfigurationError, Message, ProviderKind, TransportError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Everything the agent needs from the outside
pub struct AgentComponents {
    /// The chat client, or why none could be built
    pub provider: Result<Box<dyn ChatProvider>, ConfigurationError>,
    pub tool_registry: ToolRegistry,
    pub workspace_root: Option<PathBuf>,
    pub ui: Arc<dyn UserInterface>,
}

/// Owns the conversation history and drives the stream / tool / continuation loop.
pub struct Agent {
    state: AgentState,
    message_history: Vec<Message>,
    provider: Option<Box<dyn ChatProvider>>,
    configuration_error: Option<ConfigurationError>,
    tool_registry: ToolRegistry,
    workspace_root: Option<PathBuf>,
    ui: Arc<dyn UserInterface>,
    /// Unbounded when `None`
    max_continuation_depth: Option<u32>,
}

impl Agent {
    pub fn new(components: AgentComponents) -> Self {
        let AgentComponents {
            provider,
            tool_registry,
            workspace_root,
            ui,
        } = components;

        let mut this = Self {
            state: AgentState::Idle,
            message_history: Vec::new(),
            provider: None,
            configuration_error: None,
            tool_registry,
            workspace_root,
            ui,
            max_continuation_depth: None,
        };
        this.set_provider(provider);
        this
    }

    #[allow(dead_code)]
    pub fn state(&self) -> AgentState {
        self.state
    }

    #[allow(dead_code)]
    pub fn message_history(&self) -> &[Message] {
        &self.message_history
    }

    /// Register additional tools at runtime
    #[allow(dead_code)]
    pub fn tool_registry_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tool_registry
    }

    pub fn set_max_continuation_depth(&mut self, depth: Option<u32>) {
        self.max_continuation_depth = depth;
    }

    /// Replace the chat client wholesale. An error leaves the agent
    /// unconfigured until the next successful replacement.
    pub fn set_provider(&mut self, provider: Result<Box<dyn ChatProvider>, ConfigurationError>) {
        match provider {
            Ok(provider) => {
                info!("Using model '{}'", provider.model());
                self.provider = Some(provider);
                self.configuration_error = None;
            }
            Err(e) => {
                warn!("No chat provider available: {}", e);
                self.provider = None;
                self.configuration_error = Some(e);
            }
        }
    }

    /// Process one user message, including every chained tool continuation.
    ///
    /// Without a configured provider the user is told to configure one and
    /// the history is left untouched.
    pub async fn handle_user_message(&mut self, content: impl Into<String>) {
        if self.provider.is_none() {
            let message = self.configuration_error_message();
            warn!("{}", message);
            self.notify(HostEvent::ShowError { message }).await;
            return;
        }

        self.message_history.push(Message::new_user(content));
        self.publish_history().await;

        if let Err(e) = self.run_turn(0).await {
            self.report_transport_error(e).await;
        }
        self.state = AgentState::Idle;
    }

    /// Empty the history
    pub async fn clear(&mut self) {
        self.message_history.clear();
        self.state = AgentState::Idle;
        self.publish_history().await;
        self.notify(HostEvent::ShowInfo {
            message: "Conversation cleared".to_string(),
        })
        .await;
    }

    /// Deliver the history as Markdown to the host
    pub async fn export(&self) {
        match render_markdown(&self.message_history) {
            Some(content) => {
                self.notify(HostEvent::ExportedChat { content }).await;
                self.notify(HostEvent::ShowInfo {
                    message: "Conversation exported".to_string(),
                })
                .await;
            }
            None => {
                self.notify(HostEvent::ShowInfo {
                    message: "No conversation history to export".to_string(),
                })
                .await;
            }
        }
    }

    /// Send the current snapshot again, e.g. after the host view was reopened
    pub async fn republish(&self) {
        self.publish_history().await;
    }

    /// One model turn: stream the reply, then run its tool directives in
    /// order, each followed by its own continuation turn.
    fn run_turn(&mut self, depth: u32) -> BoxFuture<'_, Result<(), TransportError>> {
        async move {
            let Some(reply) = self.stream_assistant_reply().await? else {
                return Ok(());
            };

            let directives = parse_tool_directives(&reply);
            if directives.is_empty() {
                debug!("Reply contains no tool calls");
                return Ok(());
            }

            for directive in directives {
                self.state = AgentState::ExecutingTools;
                self.execute_directive(directive).await;

                if let Some(max_depth) = self.max_continuation_depth {
                    if depth >= max_depth {
                        warn!(
                            "Reached the maximum of {} chained tool turns, stopping",
                            max_depth
                        );
                        self.notify(HostEvent::ShowInfo {
                            message: format!(
                                "Stopped after {max_depth} chained tool turns"
                            ),
                        })
                        .await;
                        return Ok(());
                    }
                }

                self.run_turn(depth + 1).await?;
            }
            Ok(())
        }
        .boxed()
    }

    /// Stream the next assistant reply into a new history entry.
    ///
    /// Returns the complete reply text, or `None` if no provider is set.
    async fn stream_assistant_reply(&mut self) -> Result<Option<String>, TransportError> {
        let Some(provider) = self.provider.as_deref() else {
            warn!("No chat provider configured, ending the turn");
            return Ok(None);
        };

        let request = self.build_request();
        self.state = AgentState::AwaitingModel;

        self.message_history.push(Message::new_assistant(""));
        let index = self.message_history.len() - 1;
        self.publish_history().await;

        debug!(
            "Requesting reply from '{}' with {} messages",
            provider.model(),
            request.len()
        );
        let mut stream = provider.stream_chat(&request).await?;

        self.state = AgentState::StreamingResponse;
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            self.message_history[index].content.push_str(&fragment);
            self.publish_history().await;
        }

        Ok(Some(self.message_history[index].content.clone()))
    }

    async fn execute_directive(&mut self, directive: ToolCallDirective) {
        let ToolCallDirective { tool, params } = directive;
        let context = ToolContext::new(self.workspace_root.as_deref());

        let result = self.tool_registry.execute(&tool, params, &context).await;
        if let Err(e) = &result {
            warn!("Tool '{}' failed: {}", tool, e);
        }

        self.message_history
            .push(Message::new_user(format_tool_result(&tool, &result)));
        self.publish_history().await;
    }

    /// `[system, ...history]` with a freshly generated system message
    fn build_request(&self) -> Vec<Message> {
        let system_message = generate_system_message(&self.tool_registry.list_definitions());
        std::iter::once(Message::new_system(system_message))
            .chain(self.message_history.iter().cloned())
            .collect()
    }

    async fn report_transport_error(&mut self, e: TransportError) {
        error!("Chat request failed: {}", e);
        self.message_history
            .push(Message::new_assistant(format!("Sorry, an error occurred: {e}")));
        self.publish_history().await;
        self.notify(HostEvent::ShowError {
            message: format!("API request failed: {e}"),
        })
        .await;
    }

    fn configuration_error_message(&self) -> String {
        match &self.configuration_error {
            Some(ConfigurationError::MissingApiKey(provider)) => {
                let name = provider
                    .parse::<ProviderKind>()
                    .map(|kind| kind.display_name().to_string())
                    .unwrap_or_else(|_| provider.clone());
                format!("Please configure the {name} API key first")
            }
            Some(e) => e.to_string(),
            None => "No AI provider is configured".to_string(),
        }
    }

    async fn publish_history(&self) {
        trace!("Publishing {} messages", self.message_history.len());
        self.notify(HostEvent::UpdateMessages {
            messages: self.message_history.clone(),
        })
        .await;
    }

    async fn notify(&self, event: HostEvent) {
        if let Err(e) = self.ui.send_event(event).await {
            warn!("Failed to deliver event to host: {}", e);
        }
    }
}
