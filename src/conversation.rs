use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::message::{Message, MessageId};

/// A mutation of the conversation log
#[derive(Debug, Clone)]
pub enum LogCommand {
    Append(Message),
    /// Append `chunk` to the text of an existing message
    Extend { id: MessageId, chunk: String },
}

/// Ordered, append-only list of messages. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command. Returns false when it referenced an unknown message.
    pub fn apply(&mut self, command: LogCommand) -> bool {
        match command {
            LogCommand::Append(message) => {
                self.messages.push(message);
                true
            }
            LogCommand::Extend { id, chunk } => {
                // the message being revealed is nearly always the last one
                match self.messages.iter_mut().rev().find(|m| m.id == id) {
                    Some(message) => {
                        message.text.push_str(&chunk);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

struct Envelope {
    command: LogCommand,
    ack: oneshot::Sender<()>,
}

/// Cloneable front end of the log writer task.
///
/// All mutations are funnelled through one task which applies them in arrival
/// order; readers watch the resulting log.
#[derive(Clone)]
pub struct ConversationHandle {
    tx: mpsc::UnboundedSender<Envelope>,
    view: watch::Receiver<ConversationLog>,
}

impl ConversationHandle {
    /// Start the writer task. It exits once every handle has been dropped.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();
        let (state, view) = watch::channel(ConversationLog::new());

        let writer = tokio::spawn(async move {
            while let Some(Envelope { command, ack }) = rx.recv().await {
                let target = match &command {
                    LogCommand::Extend { id, .. } => Some(id.clone()),
                    LogCommand::Append(_) => None,
                };
                state.send_modify(|log| {
                    if !log.apply(command) {
                        if let Some(id) = target {
                            warn!(message_id = %id, "extend for unknown message ignored");
                        }
                    }
                });
                // the submitter may have given up waiting; the mutation stands
                let _ = ack.send(());
            }
            debug!("conversation writer stopped");
        });

        (Self { tx, view }, writer)
    }

    /// Send a command and wait until readers can observe it
    pub async fn apply(&self, command: LogCommand) -> Result<(), GenerationError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Envelope { command, ack })
            .map_err(|_| GenerationError::LogClosed)?;
        done.await.map_err(|_| GenerationError::LogClosed)
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationLog> {
        self.view.clone()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.view.borrow().messages().to_vec()
    }
}
