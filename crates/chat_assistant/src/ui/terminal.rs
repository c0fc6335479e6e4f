use super::{HostEvent, UIError, UserInterface};
use async_trait::async_trait;
use llm::{Message, MessageRole};
use std::io::Write;
use std::sync::Mutex;

/// Prints the conversation to a terminal as it grows.
///
/// History snapshots are turned back into incremental output: only the part
/// of the history not yet printed is written.
pub struct TerminalUi<W: Write + Send> {
    state: Mutex<TerminalState<W>>,
}

struct TerminalState<W> {
    writer: W,
    /// Index of the message currently being printed
    index: usize,
    /// Bytes of that message already printed
    printed: usize,
    header_printed: bool,
}

impl TerminalUi<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalUi<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                writer,
                index: 0,
                printed: 0,
                header_printed: false,
            }),
        }
    }

    #[allow(dead_code)]
    pub fn into_inner(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.writer,
            Err(poisoned) => poisoned.into_inner().writer,
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut TerminalState<W>) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl<W: Write> TerminalState<W> {
    fn print_snapshot(&mut self, messages: &[Message]) -> std::io::Result<()> {
        // History was cleared or replaced
        if messages.len() < self.index || (messages.len() == self.index && self.header_printed) {
            self.index = 0;
            self.printed = 0;
            self.header_printed = false;
        }

        for (index, message) in messages.iter().enumerate().skip(self.index) {
            if index > self.index {
                writeln!(self.writer)?;
                self.index = index;
                self.printed = 0;
                self.header_printed = false;
            }
            if !self.header_printed {
                write!(self.writer, "\n{}: ", role_label(message.role))?;
                self.header_printed = true;
            }
            if let Some(remainder) = message.content.get(self.printed..) {
                self.writer.write_all(remainder.as_bytes())?;
                self.printed = message.content.len();
            }
        }
        self.writer.flush()
    }
}

fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "System",
        MessageRole::User => "You",
        MessageRole::Assistant => "Assistant",
    }
}

#[async_trait]
impl<W: Write + Send> UserInterface for TerminalUi<W> {
    async fn send_event(&self, event: HostEvent) -> Result<(), UIError> {
        self.with_state(|state| {
            match event {
                HostEvent::UpdateMessages { messages } => state.print_snapshot(&messages)?,
                HostEvent::ShowError { message } => {
                    writeln!(state.writer, "\nError: {message}")?;
                }
                HostEvent::ShowInfo { message } => {
                    writeln!(state.writer, "\n{message}")?;
                }
                HostEvent::ExportedChat { content } => {
                    writeln!(state.writer, "\n{content}")?;
                }
            }
            Ok(())
        })
    }
}
