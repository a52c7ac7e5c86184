//! Status panel rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::monitor::Summary;

const TITLE: &str = "Log Monitor";
const PLACEHOLDER: &str = "Initializing...";

/// Bordered panel showing the latest summary
#[derive(Debug, Clone, Default)]
pub struct StatusPanel {
    latest: Option<Summary>,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown summary
    pub fn show(&mut self, summary: Summary) {
        self.latest = Some(summary);
    }

    pub fn latest(&self) -> Option<&Summary> {
        self.latest.as_ref()
    }

    fn content(&self) -> Line<'_> {
        match &self.latest {
            Some(summary) => Line::from(vec![
                Span::styled(
                    format!("[{}] ", summary.timestamp()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(summary.text.as_str()),
            ]),
            None => Line::from(PLACEHOLDER),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.content())
            .block(Block::default().title(TITLE).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Draw the whole viewport
pub fn draw(frame: &mut Frame, panel: &StatusPanel) {
    panel.render(frame, frame.area());
}
