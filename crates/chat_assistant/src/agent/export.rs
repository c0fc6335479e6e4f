//! Markdown rendering of a conversation

use llm::{Message, MessageRole};

/// Render the history as Markdown. Returns `None` for an empty history.
pub fn render_markdown(messages: &[Message]) -> Option<String> {
    if messages.is_empty() {
        return None;
    }

    Some(
        messages
            .iter()
            .map(render_message)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn render_message(message: &Message) -> String {
    let label = match message.role {
        MessageRole::User => "User",
        MessageRole::Assistant => "AI",
        MessageRole::System => "System",
    };
    format!(
        "## {} [{}]\n\n{}\n\n---\n",
        label,
        format_timestamp(message.timestamp),
        message.content
    )
}

fn format_timestamp(timestamp_millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_millis)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp_millis.to_string())
}
