use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Monotonic frame counter ticking at a fixed period.
///
/// Drives the blinking caret and the "thinking" dots. The counter only moves
/// forward; views derive their glyph from it with the helpers below.
pub struct FrameClock {
    period: Duration,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn start(&self) -> FrameHandle {
        let (tx, frames) = watch::channel(0u64);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // first tick of an interval completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tx.send_modify(|frame| *frame += 1);
                    }
                }
            }
        });

        FrameHandle {
            handle,
            frames,
            cancel: cancel.drop_guard(),
        }
    }
}

/// Handle for a running `FrameClock`
pub struct FrameHandle {
    handle: JoinHandle<()>,
    frames: watch::Receiver<u64>,
    cancel: DropGuard,
}

impl FrameHandle {
    pub fn frame(&self) -> u64 {
        *self.frames.borrow()
    }

    pub fn frames(&self) -> watch::Receiver<u64> {
        self.frames.clone()
    }

    pub async fn stop(self) {
        let FrameHandle { handle, cancel, .. } = self;
        drop(cancel);
        let _ = handle.await;
    }
}

pub fn caret_visible(frame: u64) -> bool {
    frame % 2 == 0
}

pub fn thinking_dots(frame: u64) -> &'static str {
    match frame % 3 {
        0 => ".",
        1 => "..",
        _ => "...",
    }
}

pub fn spinner(frame: u64) -> char {
    SPINNER[(frame % SPINNER.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_helpers_cycle() {
        assert!(caret_visible(0));
        assert!(!caret_visible(1));
        assert!(caret_visible(2));

        let dots: Vec<&str> = (0..4).map(thinking_dots).collect();
        assert_eq!(dots, vec![".", "..", "...", "."]);

        assert_eq!(spinner(0), spinner(10));
        assert_ne!(spinner(0), spinner(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_counts_frames() {
        let handle = FrameClock::from_millis(530).start();
        assert_eq!(handle.frame(), 0);

        tokio::time::sleep(Duration::from_millis(530 * 3 + 10)).await;
        assert_eq!(handle.frame(), 3);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_clock_is_frozen() {
        let handle = FrameClock::from_millis(100).start();
        let frames = handle.frames();
        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.stop().await;

        let last = *frames.borrow();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*frames.borrow(), last);
    }
}
