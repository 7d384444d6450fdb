use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config::ReplyConfig;
use crate::delay::{DelayRange, Jitter, RandomJitter};
use crate::error::GenerationError;

pub const REPLY_PREFIX: &str = "Suggestion: \"";
pub const REPLY_SUFFIX: &str = "\" — consider breaking logic into small, well-named pure functions.";
pub const ELLIPSIS: char = '…';
pub const ERROR_REPLY: &str = "An error occurred while generating the response.";

/// Something that turns a submitted prompt into the full assistant reply
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Name of the source (for logs)
    fn source_name(&self) -> &str;
}

/// Build the reply text for `prompt`. Pure: the same prompt always yields the
/// same reply. Prompts longer than `max_echo_chars` characters are cut and
/// marked with an ellipsis.
pub fn compose_reply(prompt: &str, max_echo_chars: usize) -> String {
    let mut echoed: String = prompt.chars().take(max_echo_chars).collect();
    if prompt.chars().nth(max_echo_chars).is_some() {
        echoed.push(ELLIPSIS);
    }
    format!("{}{}{}", REPLY_PREFIX, echoed, REPLY_SUFFIX)
}

/// Local stand-in for an assistant: waits a little, then answers with
/// `compose_reply`.
#[derive(Clone)]
pub struct SimulatedReplies {
    think: DelayRange,
    max_echo_chars: usize,
    jitter: Arc<dyn Jitter>,
}

impl SimulatedReplies {
    pub fn new() -> Self {
        Self::from_config(&ReplyConfig::default())
    }

    pub fn from_config(config: &ReplyConfig) -> Self {
        Self {
            think: config.think,
            max_echo_chars: config.max_echo_chars,
            jitter: Arc::new(RandomJitter),
        }
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_think_delay(mut self, think: DelayRange) -> Self {
        self.think = think;
        self
    }
}

impl Default for SimulatedReplies {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplySource for SimulatedReplies {
    async fn reply(&self, prompt: &str) -> Result<String, GenerationError> {
        let wait = self.jitter.pick(self.think);
        debug!(wait_ms = wait.as_millis() as u64, "simulating assistant think time");
        tokio::time::sleep(wait).await;
        Ok(compose_reply(prompt, self.max_echo_chars))
    }

    fn source_name(&self) -> &str {
        "Simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::{LowerBound, NoDelay};
    use std::time::Duration;

    #[test]
    fn test_short_prompt_echoed_verbatim() {
        assert_eq!(
            compose_reply("fix bug", 90),
            "Suggestion: \"fix bug\" — consider breaking logic into small, well-named pure functions."
        );
    }

    #[test]
    fn test_long_prompt_truncated_with_ellipsis() {
        let prompt: String = "abcdefghij".repeat(12);
        let reply = compose_reply(&prompt, 90);

        let expected_echo = format!("{}…", &prompt[..90]);
        assert!(reply.contains(&expected_echo));
        assert!(!reply.contains(&prompt[..91]));
    }

    #[test]
    fn test_exactly_limit_is_not_marked() {
        let prompt = "x".repeat(90);
        let reply = compose_reply(&prompt, 90);
        assert!(!reply.contains(ELLIPSIS));
        assert!(reply.contains(&prompt));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let prompt = "é".repeat(100);
        let reply = compose_reply(&prompt, 90);
        let echoed = reply
            .strip_prefix(REPLY_PREFIX)
            .and_then(|r| r.strip_suffix(REPLY_SUFFIX))
            .unwrap();
        assert_eq!(echoed.chars().count(), 91);
        assert!(echoed.ends_with(ELLIPSIS));
    }

    #[tokio::test]
    async fn test_simulated_reply_is_deterministic() {
        let source = SimulatedReplies::new().with_jitter(Arc::new(NoDelay));
        let first = source.reply("same input").await.unwrap();
        let second = source.reply("same input").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, compose_reply("same input", 90));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_reply_waits_think_time() {
        let source = SimulatedReplies::new().with_jitter(Arc::new(LowerBound));
        let started = tokio::time::Instant::now();
        source.reply("fix bug").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(700));
    }
}
