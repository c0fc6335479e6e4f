use super::{HostEvent, UIError, UserInterface};
use async_trait::async_trait;

/// Forwards events into an async channel drained by the host writer
#[derive(Clone)]
pub struct ChannelUi {
    sender: async_channel::Sender<HostEvent>,
}

impl ChannelUi {
    pub fn new(sender: async_channel::Sender<HostEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl UserInterface for ChannelUi {
    async fn send_event(&self, event: HostEvent) -> Result<(), UIError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| UIError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sender, receiver) = async_channel::unbounded();
        let ui = ChannelUi::new(sender);

        for n in 0..3 {
            ui.send_event(HostEvent::ShowInfo {
                message: n.to_string(),
            })
            .await
            .unwrap();
        }

        for n in 0..3 {
            assert_eq!(
                receiver.recv().await.unwrap(),
                HostEvent::ShowInfo {
                    message: n.to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (sender, receiver) = async_channel::unbounded();
        drop(receiver);
        let ui = ChannelUi::new(sender);
        let result = ui
            .send_event(HostEvent::ShowInfo {
                message: String::new(),
            })
            .await;
        assert!(matches!(result, Err(UIError::ChannelClosed)));
    }
}
