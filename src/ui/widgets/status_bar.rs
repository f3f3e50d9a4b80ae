use std::time::Instant;

use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::scroller::ScrollerStatus;
use crate::ui::utils::{format_age, truncate_by_width};

/// Everything the bottom line shows
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub username: String,
    pub filter: String,
    pub status: ScrollerStatus,
    pub warnings: usize,
}

impl StatusLine {
    /// Left-hand summary: who, what, how many and how fresh
    pub fn summary(&self, now: Instant) -> String {
        let user = if self.username.is_empty() {
            "<no username>"
        } else {
            &self.username
        };

        let mut parts = vec![
            format!("{} [{}]", user, self.filter),
            format!("{} entries", self.status.entries),
        ];
        if let Some((first, last)) = self.status.visible {
            parts.push(format!("showing {}-{}", first + 1, last + 1));
        }
        parts.push(match (self.status.fetching, self.status.last_fetch) {
            (true, _) => "fetching...".to_string(),
            (false, Some(at)) => format!("updated {} ago", format_age(now.saturating_duration_since(at))),
            (false, None) => "not fetched".to_string(),
        });
        if self.warnings > 0 {
            parts.push(format!("{} config warnings (see log)", self.warnings));
        }
        parts.join(" | ")
    }
}

const KEY_HINTS: &str = " q quit  r reload  f refresh ";

pub fn create_status_bar(line: &StatusLine, width: u16, now: Instant) -> Paragraph<'static> {
    let hints_width = KEY_HINTS.len();
    let room = (width as usize).saturating_sub(hints_width + 1);
    let summary = truncate_by_width(&format!(" {}", line.summary(now)), room);
    let padding = room.saturating_sub(unicode_width::UnicodeWidthStr::width(summary.as_str()));

    let summary_style = if line.warnings > 0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    Paragraph::new(Line::from(vec![
        Span::styled(summary, summary_style),
        Span::raw(" ".repeat(padding + 1)),
        Span::styled(KEY_HINTS, Style::default().dark_gray()),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn line() -> StatusLine {
        StatusLine {
            username: "someone".to_string(),
            filter: "READING/manga".to_string(),
            status: ScrollerStatus::default(),
            warnings: 0,
        }
    }

    #[test]
    fn test_summary_before_first_fetch() {
        assert_eq!(
            line().summary(Instant::now()),
            "someone [READING/manga] | 0 entries | not fetched"
        );
    }

    #[test]
    fn test_summary_with_entries() {
        let now = Instant::now();
        let mut line = line();
        line.status.entries = 12;
        line.status.visible = Some((10, 3));
        line.status.last_fetch = now.checked_sub(Duration::from_secs(90));
        line.warnings = 2;

        assert_eq!(
            line.summary(now),
            "someone [READING/manga] | 12 entries | showing 11-4 | updated 1m ago | 2 config warnings (see log)"
        );
    }

    #[test]
    fn test_missing_username_is_called_out() {
        let mut line = line();
        line.username.clear();
        line.status.fetching = true;
        assert!(line.summary(Instant::now()).starts_with("<no username>"));
        assert!(line.summary(Instant::now()).ends_with("fetching..."));
    }
}
