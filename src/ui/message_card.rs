use crate::message::{Message, Role};

/// Formats a message as a bordered card
pub struct MessageCard {
    width: usize,
    title: String,
}

impl MessageCard {
    pub fn new() -> Self {
        Self {
            width: 80,
            title: "Message".to_string(),
        }
    }

    pub fn with_title(title: &str) -> Self {
        Self {
            width: 80,
            title: title.to_string(),
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(8);
        self
    }

    /// Card for a conversation message, titled by its role
    pub fn for_message(message: &Message, width: usize) -> Self {
        let title = match message.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        Self::with_title(title).with_width(width)
    }

    pub fn lines(&self, content: &str) -> Vec<String> {
        let mut lines = vec![self.header()];
        lines.extend(self.body(content));
        lines.push(self.footer());
        lines
    }

    fn header(&self) -> String {
        let title_with_spaces = format!(" {} ", self.title);
        let title_len = title_with_spaces.chars().count();
        let remaining_width = self.width.saturating_sub(2);
        let left_padding = remaining_width.saturating_sub(title_len) / 2;
        let right_padding = remaining_width
            .saturating_sub(title_len)
            .saturating_sub(left_padding);

        format!(
            "╭{}{}{}╮",
            "─".repeat(left_padding),
            title_with_spaces,
            "─".repeat(right_padding)
        )
    }

    fn footer(&self) -> String {
        format!("╰{}╯", "─".repeat(self.width.saturating_sub(2)))
    }

    fn body(&self, content: &str) -> Vec<String> {
        let content_width = self.width.saturating_sub(4);
        let mut lines = Vec::new();

        for line in content.lines() {
            if line.is_empty() {
                lines.push(format!("│{}│", " ".repeat(self.width.saturating_sub(2))));
                continue;
            }
            for wrapped_line in wrap_text(line, content_width) {
                let padding = content_width.saturating_sub(wrapped_line.chars().count());
                lines.push(format!("│ {}{} │", wrapped_line, " ".repeat(padding)));
            }
        }

        if lines.is_empty() {
            lines.push(format!("│{}│", " ".repeat(self.width.saturating_sub(2))));
        }
        lines
    }
}

impl Default for MessageCard {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap on whitespace; words longer than `width` are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if text.chars().count() <= width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }

        if current_line.is_empty() {
            current_line = word;
        } else if current_line.chars().count() + 1 + word.chars().count() <= width {
            current_line.push(' ');
            current_line.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current_line, word));
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let text = "This is a very long line that should be wrapped properly";
        let wrapped = wrap_text(text, 20);

        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(line.chars().count() <= 20);
        }
        assert_eq!(wrapped.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        let wrapped = wrap_text("aaaaaaaaaaaa bb", 5);
        assert_eq!(wrapped, vec!["aaaaa", "aaaaa", "aa bb"]);
    }

    #[test]
    fn test_card_lines_have_uniform_width() {
        let card = MessageCard::with_title("Assistant").with_width(40);
        let lines = card.lines(
            "Suggestion: \"fix bug\" — consider breaking logic into small, well-named pure functions.",
        );

        assert!(lines[0].contains(" Assistant "));
        assert!(lines.len() > 3);
        for line in &lines {
            assert_eq!(line.chars().count(), 40, "bad line: {:?}", line);
        }
    }

    #[test]
    fn test_empty_message_still_renders_a_row() {
        let message = Message::assistant("");
        let lines = MessageCard::for_message(&message, 30).lines(&message.text);
        assert_eq!(lines.len(), 3);
    }
}
