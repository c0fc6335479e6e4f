//! Line-delimited JSON transport between the host and the session

use super::{HostCommand, HostEvent};
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Read one command per line until EOF or until the session stops listening.
///
/// Lines that are not valid commands are logged and skipped.
pub async fn read_commands<R>(reader: R, commands: async_channel::Sender<HostCommand>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read host command")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<HostCommand>(line) {
            Ok(command) => {
                debug!("Host command: {:?}", command);
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("Ignoring invalid host command ({}): {}", e, line),
        }
    }
    Ok(())
}

/// Write each event as one JSON line until all senders are gone
pub async fn write_events<W>(mut writer: W, events: async_channel::Receiver<HostEvent>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(event) = events.recv().await {
        let mut line = serde_json::to_vec(&event).context("Failed to serialize host event")?;
        line.push(b'\n');
        writer
            .write_all(&line)
            .await
            .context("Failed to write host event")?;
        writer.flush().await.context("Failed to flush host event")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_commands_skips_invalid_lines() -> Result<()> {
        let input = concat!(
            "{\"type\":\"ready\"}\n",
            "\n",
            "not json\n",
            "{\"type\":\"sendMessage\",\"content\":\"Hi\"}\n",
            "{\"type\":\"clearChat\"}"
        );
        let (sender, receiver) = async_channel::unbounded();

        read_commands(input.as_bytes(), sender).await?;

        let commands: Vec<_> = std::iter::from_fn(|| receiver.try_recv().ok()).collect();
        assert_eq!(
            commands,
            vec![
                HostCommand::Ready,
                HostCommand::SendMessage {
                    content: "Hi".to_string()
                },
                HostCommand::ClearChat,
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_write_events_as_lines() -> Result<()> {
        let (sender, receiver) = async_channel::unbounded();
        sender
            .send(HostEvent::ShowInfo {
                message: "one".to_string(),
            })
            .await?;
        sender
            .send(HostEvent::ExportedChat {
                content: "# Chat".to_string(),
            })
            .await?;
        drop(sender);

        let mut output = Vec::new();
        write_events(&mut output, receiver).await?;

        assert_eq!(
            String::from_utf8(output)?,
            "{\"type\":\"showInfo\",\"message\":\"one\"}\n{\"type\":\"exportedChat\",\"content\":\"# Chat\"}\n"
        );
        Ok(())
    }
}
