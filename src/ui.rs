pub mod message_card;
pub mod prompt_box;

use crossterm::{
    cursor,
    event::{KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};

use crate::animation;
use crate::chips::QuickTweaks;
use crate::config::WidgetConfig;
use crate::faq::{FaqState, FALLBACK_NOTICE};
use crate::message::{Message, Role};

pub const HISTORY_HINT: &str = "Recent prompts are stored in History. Press F5 to open it.";
pub const HISTORY_EMPTY: &str = "Recent prompts will appear here.";
use message_card::MessageCard;
use prompt_box::{InputBuffer, PromptBox, PromptContent};

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(String),
    Quit,
}

/// Everything time-driven the frame needs, sampled by the event loop
pub struct Frame<'a> {
    pub placeholder: &'a str,
    pub caret_frame: u64,
    pub thinking_frame: u64,
    pub messages: &'a [Message],
    pub generating: bool,
    pub status: Option<&'a str>,
}

pub struct App {
    pub input: InputBuffer,
    pub focused: bool,
    pub tweaks: QuickTweaks,
    pub faq: FaqState,
    pub history_open: bool,
    width: usize,
}

impl App {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            input: InputBuffer::new(),
            focused: false,
            tweaks: QuickTweaks::new(&config.chips),
            faq: FaqState::new(&config.faq),
            history_open: false,
            width: 80,
        }
    }

    pub fn set_width(&mut self, columns: u16) {
        self.width = (columns as usize).clamp(20, 120);
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Placeholder animation runs only while blurred and empty
    pub fn shows_placeholder(&self) -> bool {
        !self.focused && self.input.is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Enter, m) if !m.contains(KeyModifiers::SHIFT) => {
                self.focused = true;
                Action::Submit(self.input.text())
            }
            (KeyCode::Tab, _) => {
                self.focused = true;
                Action::None
            }
            (KeyCode::Esc, _) => {
                self.focused = false;
                Action::None
            }
            (KeyCode::Char(d), KeyModifiers::ALT) if d.is_ascii_digit() => {
                let index = d.to_digit(10).and_then(|n| (n as usize).checked_sub(1));
                if let Some(chip) = index.and_then(|i| self.tweaks.get(i)) {
                    let chip = chip.to_string();
                    if !self.input.is_empty() {
                        self.input.insert(' ');
                    }
                    self.input.insert_str(&chip);
                    self.focused = true;
                }
                Action::None
            }
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                self.input.insert(c);
                self.focused = true;
                Action::None
            }
            (KeyCode::Backspace, _) => {
                self.input.backspace();
                Action::None
            }
            (KeyCode::Delete, _) => {
                self.input.delete();
                Action::None
            }
            (KeyCode::Left, _) => {
                self.input.left();
                Action::None
            }
            (KeyCode::Right, _) => {
                self.input.right();
                Action::None
            }
            (KeyCode::Home, _) => {
                self.input.home();
                Action::None
            }
            (KeyCode::End, _) => {
                self.input.end();
                Action::None
            }
            (KeyCode::Up, _) => {
                self.faq.prev();
                Action::None
            }
            (KeyCode::Down, _) => {
                self.faq.next();
                Action::None
            }
            (KeyCode::F(2), _) => {
                self.tweaks.toggle();
                Action::None
            }
            (KeyCode::F(3), _) => {
                self.faq.toggle_cursor();
                Action::None
            }
            (KeyCode::F(4), _) => {
                let next = (self.faq.active_tab() + 1) % self.faq.tabs().len();
                self.faq.select_tab(next);
                Action::None
            }
            (KeyCode::F(5), _) => {
                self.history_open = !self.history_open;
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Lay the whole screen out as plain lines
    pub fn layout(&self, frame: &Frame<'_>) -> Vec<(Color, String)> {
        let mut lines = Vec::new();
        let width = self.width;

        lines.push((Color::Cyan, " AI PROMPT".to_string()));
        lines.push((Color::White, " More powerful with Prompting".to_string()));

        let prompt_box = PromptBox::new().with_width(width);
        let content = if self.shows_placeholder() {
            PromptContent::Placeholder {
                text: frame.placeholder,
                caret: animation::caret_visible(frame.caret_frame),
            }
        } else {
            PromptContent::Input(&self.input)
        };
        let box_color = if self.focused { Color::Cyan } else { Color::DarkGrey };
        for line in prompt_box.lines(&content) {
            lines.push((box_color, line));
        }

        let mut header = " Quick tweaks".to_string();
        if let Some(label) = self.tweaks.more_label() {
            header.push_str(&format!("  [F2: {}]", label));
        }
        lines.push((Color::Grey, header));
        for (i, chip) in self.tweaks.visible().iter().enumerate() {
            lines.push((Color::Grey, format!("   Alt+{}  {}", i + 1, chip)));
        }

        lines.push((Color::DarkGrey, "─".repeat(width)));
        for message in frame.messages {
            let card = MessageCard::for_message(message, width.saturating_sub(8));
            let waiting = message.role == Role::Assistant && message.text.is_empty() && frame.generating;
            let text = if waiting {
                animation::thinking_dots(frame.thinking_frame).to_string()
            } else {
                message.text.clone()
            };
            let (indent, color) = match message.role {
                Role::User => ("        ", Color::Blue),
                Role::Assistant => ("", Color::White),
            };
            for line in card.lines(&text) {
                lines.push((color, format!("{}{}", indent, line)));
            }
        }

        lines.push((Color::Grey, format!(" {}", HISTORY_HINT)));
        if self.history_open {
            lines.push((Color::DarkGrey, format!("   {}", HISTORY_EMPTY)));
        }

        lines.push((Color::DarkGrey, "─".repeat(width)));
        let tabs: Vec<String> = self
            .faq
            .tabs()
            .iter()
            .enumerate()
            .map(|(i, tab)| if i == self.faq.active_tab() { format!("[{}]", tab) } else { tab.to_string() })
            .collect();
        lines.push((Color::Cyan, format!(" FAQ  {}  (F4)", tabs.join("  "))));
        if self.faq.is_loading() {
            lines.push((Color::DarkGrey, " Loading FAQs...".to_string()));
        } else if self.faq.error().is_some() {
            lines.push((Color::Yellow, format!(" {}", FALLBACK_NOTICE)));
        }
        for (i, item) in self.faq.items().iter().enumerate() {
            let marker = if self.faq.is_open(i) { "−" } else { "+" };
            let pointer = if i == self.faq.cursor() { ">" } else { " " };
            lines.push((Color::White, format!("{} {} {}", pointer, marker, item.q)));
            if self.faq.is_open(i) {
                for wrapped in message_card::wrap_text(&item.a, width.saturating_sub(6)) {
                    lines.push((Color::Grey, format!("     {}", wrapped)));
                }
            }
        }

        let status = match (frame.generating, frame.status) {
            (true, Some(status)) => format!(" {} {}", animation::spinner(frame.thinking_frame), status),
            (false, Some(status)) => format!(" {}", status),
            (_, None) => String::new(),
        };
        lines.push((Color::DarkGrey, status));
        lines.push((
            Color::DarkGrey,
            " Enter: send  Tab/Esc: focus  Up/Down + F3: FAQ  F5: history  Ctrl+C: quit".to_string(),
        ));

        lines
    }

    /// Redraw the screen. The tail of the layout wins when it does not fit.
    pub fn draw(&self, frame: &Frame<'_>) -> io::Result<()> {
        let mut stdout = io::stdout();
        let (_, rows) = terminal::size()?;
        let lines = self.layout(frame);
        let skip = lines.len().saturating_sub(rows as usize);

        queue!(stdout, cursor::Hide, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for (row, (color, line)) in lines.iter().skip(skip).enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, row as u16),
                SetForegroundColor(*color),
                Print(line),
                ResetColor
            )?;
        }

        // prompt box middle line sits at index 3 of the layout
        if self.focused && skip <= 3 {
            let column = PromptBox::new().with_width(self.width).cursor_column(&self.input);
            queue!(stdout, cursor::MoveTo(column, (3 - skip) as u16), cursor::Show)?;
        }

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn frame<'a>(messages: &'a [Message]) -> Frame<'a> {
        Frame {
            placeholder: "Refactor this",
            caret_frame: 0,
            thinking_frame: 0,
            messages,
            generating: false,
            status: None,
        }
    }

    #[test]
    fn test_typing_focuses_and_enter_submits() {
        let mut app = App::new(&WidgetConfig::default());
        assert!(app.shows_placeholder());

        for c in "fix bug".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(app.focused);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Submit("fix bug".to_string()));
    }

    #[test]
    fn test_escape_blurs_and_tab_focuses() {
        let mut app = App::new(&WidgetConfig::default());
        app.handle_key(key(KeyCode::Tab));
        assert!(app.focused);
        assert!(!app.shows_placeholder());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.focused);
        assert!(app.shows_placeholder());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new(&WidgetConfig::default());
        let action = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn test_alt_digit_inserts_chip() {
        let mut app = App::new(&WidgetConfig::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('4'), KeyModifiers::ALT));
        assert_eq!(app.input.text(), "Docker or container");
        // chip 5 is hidden until expanded
        app.handle_key(KeyEvent::new(KeyCode::Char('5'), KeyModifiers::ALT));
        assert_eq!(app.input.text(), "Docker or container");
        app.handle_key(key(KeyCode::F(2)));
        app.handle_key(KeyEvent::new(KeyCode::Char('8'), KeyModifiers::ALT));
        assert_eq!(app.input.text(), "Docker or container add tests");
    }

    #[test]
    fn test_layout_shows_placeholder_and_messages() {
        let app = App::new(&WidgetConfig::default());
        let messages = vec![Message::user("fix bug"), Message::assistant("Suggestion")];
        let lines: Vec<String> = app.layout(&frame(&messages)).into_iter().map(|(_, l)| l).collect();

        assert!(lines[3].contains("> Refactor this|"));
        assert!(lines.iter().any(|l| l.contains("fix bug")));
        assert!(lines.iter().any(|l| l.contains(" Assistant ")));
        assert!(lines.iter().any(|l| l.contains("Do I have to open Port 22")));
    }

    #[test]
    fn test_f5_toggles_history_panel() {
        let mut app = App::new(&WidgetConfig::default());
        let shown = |app: &App| {
            app.layout(&frame(&[]))
                .iter()
                .any(|(_, line)| line.contains(HISTORY_EMPTY))
        };
        assert!(!shown(&app));

        app.handle_key(key(KeyCode::F(5)));
        assert!(app.history_open);
        assert!(shown(&app));

        app.handle_key(key(KeyCode::F(5)));
        assert!(!shown(&app));
    }

    #[test]
    fn test_layout_shows_thinking_dots_for_empty_reply() {
        let app = App::new(&WidgetConfig::default());
        let messages = vec![Message::user("fix bug"), Message::assistant("")];
        let mut view = frame(&messages);
        view.generating = true;
        view.thinking_frame = 2;
        view.status = Some("Generating assistant response...");

        let lines: Vec<String> = app.layout(&view).into_iter().map(|(_, l)| l).collect();
        assert!(lines.iter().any(|l| l.contains("│ ...")));
        assert!(lines.iter().any(|l| l.contains("Generating assistant response...")));
    }
}
