use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

use crate::config::TypingConfig;
use crate::delay::{Jitter, RandomJitter};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Typing,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingState {
    pub prompt_index: usize,
    /// Number of characters of the current prompt on screen
    pub char_index: usize,
    pub direction: Direction,
}

/// How long to wait before the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Type,
    Hold,
    Delete,
    Restart,
}

/// The placeholder text state machine. Knows nothing about time; the driver
/// turns each `Pause` into a delay.
#[derive(Debug, Clone)]
pub struct TypingSequencer {
    prompts: Vec<String>,
    state: TypingState,
}

impl TypingSequencer {
    pub fn new(prompts: Vec<String>) -> Result<Self, ConfigError> {
        if prompts.is_empty() {
            return Err(ConfigError::Invalid(
                "typing sequencer needs at least one prompt".to_string(),
            ));
        }
        Ok(Self {
            prompts,
            state: TypingState {
                prompt_index: 0,
                char_index: 0,
                direction: Direction::Typing,
            },
        })
    }

    pub fn state(&self) -> TypingState {
        self.state
    }

    fn current_len(&self) -> usize {
        self.prompts[self.state.prompt_index].chars().count()
    }

    /// Text currently on screen
    pub fn display(&self) -> String {
        self.prompts[self.state.prompt_index]
            .chars()
            .take(self.state.char_index)
            .collect()
    }

    /// Move one step and report what kind of wait comes next
    pub fn advance(&mut self) -> Pause {
        match self.state.direction {
            Direction::Typing => {
                let len = self.current_len();
                if self.state.char_index < len {
                    self.state.char_index += 1;
                }
                if self.state.char_index >= len {
                    self.state.direction = Direction::Deleting;
                    Pause::Hold
                } else {
                    Pause::Type
                }
            }
            Direction::Deleting => {
                self.state.char_index = self.state.char_index.saturating_sub(1);
                if self.state.char_index == 0 {
                    self.state.prompt_index = (self.state.prompt_index + 1) % self.prompts.len();
                    self.state.direction = Direction::Typing;
                    Pause::Restart
                } else {
                    Pause::Delete
                }
            }
        }
    }
}

/// What the placeholder shows after a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub state: TypingState,
    pub text: String,
}

impl TypingFrame {
    fn of(sequencer: &TypingSequencer) -> Self {
        Self {
            state: sequencer.state(),
            text: sequencer.display(),
        }
    }
}

/// Timing used by the driver loop
#[derive(Clone)]
pub struct TypingCadence {
    config: TypingConfig,
    jitter: Arc<dyn Jitter>,
}

impl TypingCadence {
    pub fn new(config: TypingConfig) -> Self {
        Self {
            config,
            jitter: Arc::new(RandomJitter),
        }
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    fn wait(&self, pause: Pause) -> Duration {
        let range = match pause {
            Pause::Type => self.config.type_tick,
            Pause::Hold => self.config.hold,
            Pause::Delete => self.config.delete_tick,
            Pause::Restart => self.config.restart,
        };
        self.jitter.pick(range)
    }
}

/// Runs a `TypingSequencer` on a timer until stopped
pub struct TypingAnimation {
    sequencer: TypingSequencer,
    cadence: TypingCadence,
}

impl TypingAnimation {
    pub fn new(config: TypingConfig) -> Result<Self, ConfigError> {
        let sequencer = TypingSequencer::new(config.prompts.clone())?;
        Ok(Self {
            sequencer,
            cadence: TypingCadence::new(config),
        })
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.cadence = self.cadence.with_jitter(jitter);
        self
    }

    /// Start the animation. Ticks stop while the input is focused and for good
    /// once the handle is stopped or dropped.
    pub fn start(self) -> TypingHandle {
        let Self { mut sequencer, cadence } = self;
        let (focus_tx, mut focus) = watch::channel(false);
        let (frames_tx, frames) = watch::channel(TypingFrame::of(&sequencer));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                while *focus.borrow_and_update() {
                    tokio::select! {
                        _ = token.cancelled() => return,
                        changed = focus.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }

                let pause = sequencer.advance();
                frames_tx.send_replace(TypingFrame::of(&sequencer));
                let wait = cadence.wait(pause);
                debug!(?pause, wait_ms = wait.as_millis() as u64, "typing tick");

                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(wait) => {}
                    // focus arrived mid-wait: the pending tick is dropped
                    changed = focus.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        info!("typing animation started");
        TypingHandle {
            handle,
            focus: focus_tx,
            frames,
            cancel: cancel.drop_guard(),
        }
    }
}

/// Handle for controlling the typing animation
pub struct TypingHandle {
    handle: JoinHandle<()>,
    focus: watch::Sender<bool>,
    frames: watch::Receiver<TypingFrame>,
    cancel: DropGuard,
}

impl TypingHandle {
    /// Tell the animation whether the real input has focus
    pub fn set_focused(&self, focused: bool) {
        self.focus.send_if_modified(|current| {
            if *current == focused {
                false
            } else {
                *current = focused;
                true
            }
        });
    }

    pub fn current(&self) -> TypingFrame {
        self.frames.borrow().clone()
    }

    pub fn frames(&self) -> watch::Receiver<TypingFrame> {
        self.frames.clone()
    }

    /// Stop the animation and wait for the driver to exit
    pub async fn stop(self) {
        let TypingHandle { handle, cancel, .. } = self;
        // dropping the guard cancels the driver
        drop(cancel);
        let _ = handle.await;
        info!("typing animation stopped");
    }
}
