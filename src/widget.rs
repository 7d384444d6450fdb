use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::announce::{self, Announcer};
use crate::config::ReplyConfig;
use crate::conversation::{ConversationHandle, ConversationLog, LogCommand};
use crate::delay::{DelayRange, Jitter, RandomJitter};
use crate::error::GenerationError;
use crate::message::{Message, MessageId};
use crate::reply::{ReplySource, SimulatedReplies, ERROR_REPLY};

/// What happened to a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// User message appended, reply on its way
    Accepted,
    /// Nothing but whitespace; the caller should refocus the input
    Blank,
    /// A reply is still being generated
    Busy,
    /// The widget has been torn down
    Closed,
}

/// Clears the generation flag when dropped, whichever way the reply ends
struct GeneratingGuard {
    flag: Arc<AtomicBool>,
}

impl GeneratingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: Arc::clone(flag) })
    }
}

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The prompt box: accepts submissions, simulates the assistant and reveals
/// its reply into the conversation log.
pub struct PromptWidget {
    log: ConversationHandle,
    generating: Arc<AtomicBool>,
    replies: Arc<dyn ReplySource>,
    announcer: Arc<dyn Announcer>,
    jitter: Arc<dyn Jitter>,
    reveal_tick: DelayRange,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl PromptWidget {
    pub fn new(announcer: Arc<dyn Announcer>) -> Self {
        Self::from_config(&ReplyConfig::default(), announcer)
    }

    pub fn from_config(config: &ReplyConfig, announcer: Arc<dyn Announcer>) -> Self {
        let (log, _writer) = ConversationHandle::spawn();
        Self {
            log,
            generating: Arc::new(AtomicBool::new(false)),
            replies: Arc::new(SimulatedReplies::from_config(config)),
            announcer,
            jitter: Arc::new(RandomJitter),
            reveal_tick: config.reveal_tick,
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn with_replies(mut self, replies: Arc<dyn ReplySource>) -> Self {
        self.replies = replies;
        self
    }

    /// Jitter used between revealed characters
    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.log.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationLog> {
        self.log.subscribe()
    }

    /// Submit the input text. The user message is in the log by the time this
    /// returns `Accepted`; the assistant reply follows on a background task.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if self.cancel.is_cancelled() {
            return SubmitOutcome::Closed;
        }
        if self.is_generating() {
            debug!("submission ignored while a reply is in flight");
            return SubmitOutcome::Busy;
        }
        let text = text.trim();
        if text.is_empty() {
            debug!("blank submission ignored");
            return SubmitOutcome::Blank;
        }

        let Some(guard) = GeneratingGuard::acquire(&self.generating) else {
            debug!("submission ignored while a reply is in flight");
            return SubmitOutcome::Busy;
        };

        if let Err(e) = self.log.apply(LogCommand::Append(Message::user(text))).await {
            warn!("could not record user message: {}", e);
            return SubmitOutcome::Closed;
        }
        self.announcer.announce(announce::GENERATING);
        info!(source = self.replies.source_name(), chars = text.chars().count(), "generating reply");

        let job = ReplyJob {
            log: self.log.clone(),
            replies: Arc::clone(&self.replies),
            announcer: Arc::clone(&self.announcer),
            jitter: Arc::clone(&self.jitter),
            reveal_tick: self.reveal_tick,
        };
        let prompt = text.to_string();
        let cancel = self.cancel.clone();

        self.tasks.spawn(async move {
            let _guard = guard;
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("reply cancelled by teardown");
                }
                result = job.run(&prompt) => {
                    if let Err(e) = result {
                        warn!("reply abandoned: {}", e);
                    }
                }
            }
        });

        SubmitOutcome::Accepted
    }

    /// Cancel any reply in progress and wait for it to wind down. Partially
    /// revealed text stays in the log.
    pub async fn teardown(self) {
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        info!("prompt widget torn down");
    }
}

impl Drop for PromptWidget {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct ReplyJob {
    log: ConversationHandle,
    replies: Arc<dyn ReplySource>,
    announcer: Arc<dyn Announcer>,
    jitter: Arc<dyn Jitter>,
    reveal_tick: DelayRange,
}

impl ReplyJob {
    async fn run(&self, prompt: &str) -> Result<(), GenerationError> {
        match self.replies.reply(prompt).await {
            Ok(reply) => {
                let message = Message::assistant("");
                let id = message.id.clone();
                self.log.apply(LogCommand::Append(message)).await?;
                self.reveal(&id, &reply).await?;
                self.announcer.announce(announce::READY);
                info!("reply revealed");
            }
            Err(e) => {
                warn!("reply generation failed: {}", e);
                self.announcer.announce(announce::FAILED);
                self.log
                    .apply(LogCommand::Append(Message::assistant_error(ERROR_REPLY)))
                    .await?;
            }
        }
        Ok(())
    }

    /// One character per tick
    async fn reveal(&self, id: &MessageId, reply: &str) -> Result<(), GenerationError> {
        let mut chars = reply.chars().peekable();
        while let Some(ch) = chars.next() {
            self.log
                .apply(LogCommand::Extend { id: id.clone(), chunk: ch.to_string() })
                .await?;
            if chars.peek().is_some() {
                tokio::time::sleep(self.jitter.pick(self.reveal_tick)).await;
            }
        }
        Ok(())
    }
}
