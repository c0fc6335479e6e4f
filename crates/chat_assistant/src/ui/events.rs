use llm::Message;
use serde::{Deserialize, Serialize};

/// Commands sent by the host (one JSON object per line on stdin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    SendMessage { content: String },
    ClearChat,
    ExportChat,
    /// The host view was (re)opened and wants the current history
    Ready,
    /// Settings changed on disk; rebuild the provider client
    ConfigurationChanged,
}

/// Events delivered to the host (one JSON object per line on stdout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// Full snapshot of the conversation history
    UpdateMessages { messages: Vec<Message> },
    ShowError { message: String },
    ShowInfo { message: String },
    /// Markdown rendering of the conversation, produced on request
    ExportedChat { content: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_format() {
        let command: HostCommand =
            serde_json::from_value(json!({"type": "sendMessage", "content": "Hi"})).unwrap();
        assert_eq!(
            command,
            HostCommand::SendMessage {
                content: "Hi".to_string()
            }
        );

        for (wire, expected) in [
            ("clearChat", HostCommand::ClearChat),
            ("exportChat", HostCommand::ExportChat),
            ("ready", HostCommand::Ready),
            ("configurationChanged", HostCommand::ConfigurationChanged),
        ] {
            let command: HostCommand = serde_json::from_value(json!({ "type": wire })).unwrap();
            assert_eq!(command, expected);
        }

        assert!(serde_json::from_value::<HostCommand>(json!({"type": "reboot"})).is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let message = Message {
            role: llm::MessageRole::User,
            content: "Hi".to_string(),
            timestamp: 7,
        };
        let event = HostEvent::UpdateMessages {
            messages: vec![message],
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "updateMessages",
                "messages": [{"role": "user", "content": "Hi", "timestamp": 7}]
            })
        );

        assert_eq!(
            serde_json::to_value(HostEvent::ShowError {
                message: "boom".to_string()
            })
            .unwrap(),
            json!({"type": "showError", "message": "boom"})
        );
    }
}
