/// Single-line edit buffer with a character-based cursor
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}

/// What goes inside the box
pub enum PromptContent<'a> {
    Input(&'a InputBuffer),
    /// Animated example prompt, shown while the input is blurred and empty
    Placeholder { text: &'a str, caret: bool },
}

/// Bordered prompt box
pub struct PromptBox {
    width: usize,
    prompt_text: String,
}

impl PromptBox {
    pub fn new() -> Self {
        Self {
            width: 80,
            prompt_text: "> ".to_string(),
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(8);
        self
    }

    pub fn lines(&self, content: &PromptContent<'_>) -> [String; 3] {
        let content_width = self.width.saturating_sub(4);
        let body = match content {
            PromptContent::Input(buffer) => format!("{}{}", self.prompt_text, buffer.text()),
            PromptContent::Placeholder { text, caret } => {
                format!("{}{}{}", self.prompt_text, text, if *caret { "|" } else { " " })
            }
        };
        // keep the tail visible when the text overflows the box
        let shown: String = {
            let count = body.chars().count();
            body.chars().skip(count.saturating_sub(content_width)).collect()
        };
        let padding = content_width.saturating_sub(shown.chars().count());

        [
            format!("╭{}╮", "─".repeat(self.width.saturating_sub(2))),
            format!("│ {}{} │", shown, " ".repeat(padding)),
            format!("╰{}╯", "─".repeat(self.width.saturating_sub(2))),
        ]
    }

    /// Terminal column of the edit cursor inside the middle line
    pub fn cursor_column(&self, buffer: &InputBuffer) -> u16 {
        let content_width = self.width.saturating_sub(4);
        let total = self.prompt_text.chars().count() + buffer.chars.len();
        let hidden = total.saturating_sub(content_width);
        let visual = (self.prompt_text.chars().count() + buffer.cursor()).saturating_sub(hidden);
        (2 + visual.min(content_width)) as u16
    }
}

impl Default for PromptBox {
    fn default() -> Self {
        Self::new()
    }
}
