use crate::tools::core::{Render, Tool, ToolContext, ToolSpec};
use crate::ui::{HostEvent, UIError, UserInterface};
use anyhow::Result;
use async_trait::async_trait;
use llm::{ChatProvider, FragmentStream, Message, TransportError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted reply of the mock provider
pub enum MockReply {
    /// Stream these fragments, then end
    Fragments(Vec<&'static str>),
    /// The request itself fails
    FailRequest(&'static str),
    /// Stream these fragments, then fail
    FailMidStream(Vec<&'static str>, &'static str),
}

impl MockReply {
    pub fn text(text: &'static str) -> Self {
        MockReply::Fragments(vec![text])
    }
}

/// Chat provider replaying scripted replies and recording every request
#[derive(Clone)]
pub struct MockChatProvider {
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
}

impl MockChatProvider {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(replies.into())),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn boxed(&self) -> Box<dyn ChatProvider> {
        Box::new(self.clone())
    }
}

fn network_error(message: &str) -> TransportError {
    TransportError::Network(message.to_string())
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, TransportError> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request #{}", self.requests().len()));

        let items: Vec<Result<String, TransportError>> = match reply {
            MockReply::FailRequest(message) => return Err(network_error(message)),
            MockReply::Fragments(fragments) => fragments
                .into_iter()
                .map(|fragment| Ok(fragment.to_string()))
                .collect(),
            MockReply::FailMidStream(fragments, message) => fragments
                .into_iter()
                .map(|fragment| Ok(fragment.to_string()))
                .chain(std::iter::once(Err(network_error(message))))
                .collect(),
        };

        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, TransportError> {
        use futures::StreamExt;

        let mut stream = self.stream_chat(messages).await?;
        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Records every event sent to the host
#[derive(Clone, Default)]
pub struct RecordingUi {
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Contents of every published history snapshot
    pub fn snapshots(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::UpdateMessages { messages } => {
                    Some(messages.into_iter().map(|m| m.content).collect())
                }
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::ShowError { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::ShowInfo { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl UserInterface for RecordingUi {
    async fn send_event(&self, event: HostEvent) -> Result<(), UIError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub struct CountingOutput(String);

impl Render for CountingOutput {
    fn status(&self) -> String {
        "counted".to_string()
    }

    fn render(&self) -> String {
        self.0.clone()
    }
}

/// Replaces `list_files` and counts how often it runs
pub struct CountingListFiles {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for CountingListFiles {
    type Input = Value;
    type Output = CountingOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "list_files",
            description: "Counts invocations",
            parameters_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn execute<'a>(
        &self,
        _context: &ToolContext<'a>,
        _input: Self::Input,
    ) -> Result<Self::Output> {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CountingOutput(format!("call {calls}")))
    }
}

/// Tool with a fixed name that always returns the same text
pub struct FixedTool {
    pub name: &'static str,
    pub reply: &'static str,
}

#[async_trait]
impl Tool for FixedTool {
    type Input = Value;
    type Output = CountingOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            description: "Returns a fixed reply",
            parameters_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn execute<'a>(
        &self,
        _context: &ToolContext<'a>,
        _input: Self::Input,
    ) -> Result<Self::Output> {
        Ok(CountingOutput(self.reply.to_string()))
    }
}
