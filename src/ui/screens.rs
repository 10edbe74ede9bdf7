use crate::controller::Output;

/// Results area holding the text of the most recent query.
#[derive(Default)]
pub(crate) struct ResultsPanel {
    pub(crate) lines: Vec<String>,
    pub(crate) scroll: u16,
}

impl ResultsPanel {
    /// Replace the panel content and jump back to the top.
    pub(crate) fn show(&mut self, output: &Output) {
        self.lines = output.lines();
        self.scroll = 0;
    }

    pub(crate) fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1).min(u16::MAX as usize) as isize;
        let next = (self.scroll as isize + delta).clamp(0, max);
        self.scroll = next as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Student;

    #[test]
    fn scrolling_stays_within_content() {
        let mut panel = ResultsPanel::default();
        panel.show(&Output::Listing(vec![
            Student::new("A", "1", 1.0),
            Student::new("B", "2", 2.0),
        ]));
        assert_eq!(panel.lines.len(), 4);

        panel.scroll_by(-5);
        assert_eq!(panel.scroll, 0);
        panel.scroll_by(10);
        assert_eq!(panel.scroll, 3);

        panel.show(&Output::Blank);
        assert_eq!(panel.scroll, 0);
        assert!(panel.lines.is_empty());
    }

    #[test]
    fn scroll_offset_saturates_on_huge_listings() {
        let mut panel = ResultsPanel {
            lines: vec![String::new(); u16::MAX as usize + 10],
            scroll: 0,
        };
        panel.scroll_by(u16::MAX as isize + 100);
        assert_eq!(panel.scroll, u16::MAX);
        panel.scroll_by(1);
        assert_eq!(panel.scroll, u16::MAX);
    }
}
