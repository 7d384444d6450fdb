use crate::config::ChipConfig;

/// "Quick tweaks" under the prompt box: a handful of canned instructions, only
/// the first few shown until expanded.
#[derive(Debug, Clone)]
pub struct QuickTweaks {
    chips: Vec<String>,
    visible_by_default: usize,
    show_all: bool,
}

impl QuickTweaks {
    pub fn new(config: &ChipConfig) -> Self {
        Self {
            chips: config.chips.clone(),
            visible_by_default: config.visible_by_default,
            show_all: false,
        }
    }

    pub fn toggle(&mut self) {
        self.show_all = !self.show_all;
    }

    pub fn is_expanded(&self) -> bool {
        self.show_all
    }

    pub fn visible(&self) -> &[String] {
        if self.show_all {
            &self.chips
        } else {
            &self.chips[..self.visible_by_default.min(self.chips.len())]
        }
    }

    /// Label for the expand/collapse control, `None` when everything fits
    pub fn more_label(&self) -> Option<String> {
        let hidden = self.chips.len().saturating_sub(self.visible_by_default);
        if hidden == 0 {
            None
        } else if self.show_all {
            Some("Show less".to_string())
        } else {
            Some(format!("+{} more", hidden))
        }
    }

    /// Chip text by position among the visible chips
    pub fn get(&self, index: usize) -> Option<&str> {
        self.visible().get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_shows_default_count() {
        let tweaks = QuickTweaks::new(&ChipConfig::default());
        assert_eq!(tweaks.visible().len(), 4);
        assert_eq!(tweaks.more_label().as_deref(), Some("+4 more"));
        assert_eq!(tweaks.get(0), Some("functions as per context"));
        assert_eq!(tweaks.get(5), None);
    }

    #[test]
    fn test_toggle_expands_and_collapses() {
        let mut tweaks = QuickTweaks::new(&ChipConfig::default());
        tweaks.toggle();
        assert!(tweaks.is_expanded());
        assert_eq!(tweaks.visible().len(), 8);
        assert_eq!(tweaks.more_label().as_deref(), Some("Show less"));
        assert_eq!(tweaks.get(7), Some("add tests"));

        tweaks.toggle();
        assert_eq!(tweaks.visible().len(), 4);
    }

    #[test]
    fn test_no_label_when_all_chips_fit() {
        let config = ChipConfig {
            chips: vec!["one".to_string(), "two".to_string()],
            visible_by_default: 4,
        };
        let tweaks = QuickTweaks::new(&config);
        assert_eq!(tweaks.visible().len(), 2);
        assert_eq!(tweaks.more_label(), None);
    }
}
