use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use futures::StreamExt;
use std::{
    env,
    fs::File,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use prompt_hero::{
    animation::FrameClock,
    error::FaqError,
    faq::{FaqItem, FaqLoad, HttpFaqSource},
    ui::{Action, App, Frame},
    PromptWidget, RecordingAnnouncer, SubmitOutcome, TypingAnimation, WidgetConfig,
};

const LOG_FILE: &str = "prompt-hero.log";

/// Restores the terminal on every exit path
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn init_tracing() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("cannot create {}", LOG_FILE))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prompt_hero=info,a11y=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn config_path() -> Option<PathBuf> {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

async fn next_faq(load: &mut Option<FaqLoad>) -> Result<Vec<FaqItem>, FaqError> {
    match load {
        Some(load) => load.wait().await,
        None => std::future::pending().await,
    }
}

async fn run(config: WidgetConfig) -> Result<()> {
    let announcer = RecordingAnnouncer::new();
    let widget = PromptWidget::from_config(&config.reply, Arc::new(announcer.clone()));
    let typing = TypingAnimation::new(config.typing.clone())?.start();
    let caret = FrameClock::from_millis(config.typing.caret_blink_ms).start();
    let thinking = FrameClock::from_millis(config.reply.thinking_frame_ms).start();

    let mut app = App::new(&config);
    if let Ok((columns, _)) = terminal::size() {
        app.set_width(columns);
    }
    let mut faq_load = config
        .faq
        .url
        .clone()
        .map(|url| FaqLoad::spawn(Arc::new(HttpFaqSource::new(url))));

    let mut events = EventStream::new();
    let mut typing_frames = typing.frames();
    let mut log_view = widget.subscribe();
    let mut caret_frames = caret.frames();
    let mut thinking_frames = thinking.frames();

    loop {
        typing.set_focused(!app.shows_placeholder());

        let placeholder = typing_frames.borrow_and_update().text.clone();
        let messages = log_view.borrow_and_update().messages().to_vec();
        let status = announcer.latest();
        let frame = Frame {
            placeholder: &placeholder,
            caret_frame: *caret_frames.borrow_and_update(),
            thinking_frame: *thinking_frames.borrow_and_update(),
            messages: &messages,
            generating: widget.is_generating(),
            status: status.as_deref(),
        };
        app.draw(&frame)?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key) {
                        Action::Quit => break,
                        Action::Submit(text) => match widget.submit(&text).await {
                            SubmitOutcome::Accepted => app.input.clear(),
                            SubmitOutcome::Blank => app.focus(),
                            SubmitOutcome::Busy => {}
                            SubmitOutcome::Closed => break,
                        },
                        Action::None => {}
                    }
                }
                Some(Ok(Event::Resize(columns, _))) => app.set_width(columns),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = typing_frames.changed() => {}
            _ = log_view.changed() => {}
            _ = caret_frames.changed(), if app.shows_placeholder() => {}
            _ = thinking_frames.changed(), if widget.is_generating() => {}
            result = next_faq(&mut faq_load) => {
                faq_load = None;
                app.faq.finish_load(result);
            }
        }
    }

    widget.teardown().await;
    typing.stop().await;
    caret.stop().await;
    thinking.stop().await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing()?;

    let config = WidgetConfig::load(config_path().as_deref()).context("failed to load config")?;
    info!("starting prompt hero");

    let guard = TerminalGuard::enter()?;
    let result = run(config).await;
    drop(guard);

    if let Err(e) = &result {
        error!("prompt hero exited with error: {:#}", e);
    }
    result
}
