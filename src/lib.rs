pub mod animation;
pub mod announce;
pub mod chips;
pub mod config;
pub mod conversation;
pub mod delay;
pub mod error;
pub mod faq;
pub mod message;
pub mod reply;
pub mod typing;
pub mod ui;
pub mod widget;

// Re-export commonly used types
pub use announce::{Announcer, RecordingAnnouncer, TracingAnnouncer};
pub use config::WidgetConfig;
pub use conversation::{ConversationHandle, ConversationLog, LogCommand};
pub use delay::{DelayRange, Jitter, LowerBound, NoDelay, RandomJitter};
pub use error::{ConfigError, FaqError, GenerationError};
pub use message::{Message, MessageId, Role};
pub use reply::{compose_reply, ReplySource, SimulatedReplies};
pub use typing::{TypingAnimation, TypingHandle, TypingSequencer};
pub use widget::{PromptWidget, SubmitOutcome};
