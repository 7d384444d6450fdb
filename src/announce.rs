use std::sync::{Arc, Mutex};
use tracing::info;

pub const GENERATING: &str = "Generating assistant response...";
pub const READY: &str = "Assistant response ready";
pub const FAILED: &str = "Failed to generate response";

/// Receiver of screen-reader status updates. Fire and forget.
pub trait Announcer: Send + Sync {
    fn announce(&self, status: &str);
}

/// Emits announcements as tracing events under the `a11y` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn announce(&self, status: &str) {
        info!(target: "a11y", status);
    }
}

/// Keeps every announcement in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingAnnouncer {
    history: Arc<Mutex<Vec<String>>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn latest(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, status: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.push(status.to_string());
        }
        TracingAnnouncer.announce(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_announcer_keeps_order() {
        let announcer = RecordingAnnouncer::new();
        assert_eq!(announcer.latest(), None);

        announcer.announce(GENERATING);
        announcer.announce(READY);

        assert_eq!(announcer.history(), vec![GENERATING.to_string(), READY.to_string()]);
        assert_eq!(announcer.latest().as_deref(), Some(READY));
    }

    #[test]
    fn test_clones_share_history() {
        let announcer = RecordingAnnouncer::new();
        let shared = announcer.clone();
        shared.announce(FAILED);
        assert_eq!(announcer.latest().as_deref(), Some(FAILED));
    }
}
