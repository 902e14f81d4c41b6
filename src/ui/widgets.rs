//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::keyboard::KeyEvent;
use crate::metrics::MetricRow;
use crate::report::EventEntry;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Metric rows with colored status markers
pub struct MetricsPanel<'a> {
    rows: &'a [MetricRow],
    colors: ThemeColors,
}

impl<'a> MetricsPanel<'a> {
    pub fn new(rows: &'a [MetricRow], colors: ThemeColors) -> Self {
        Self { rows, colors }
    }
}

impl<'a> Widget for MetricsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Metrics ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));

        let inner = block.inner(area);
        block.render(area, buf);

        for (row, y) in self.rows.iter().zip(inner.y..inner.y + inner.height) {
            let color = self.colors.status(row.status);
            let line = Line::from(vec![
                Span::styled(
                    format!("{}: ", row.label),
                    Style::default().fg(self.colors.fg).add_modifier(Modifier::BOLD),
                ),
                Span::styled(row.value.as_str(), Style::default().fg(color)),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

/// The text buffer being typed into
pub struct TextPanel<'a> {
    text: &'a str,
    colors: ThemeColors,
}

impl<'a> TextPanel<'a> {
    pub fn new(text: &'a str, colors: ThemeColors) -> Self {
        Self { text, colors }
    }
}

impl<'a> Widget for TextPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Type here ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.accent));

        let paragraph = if self.text.is_empty() {
            Paragraph::new(Span::styled(
                "Start typing here...",
                Style::default().fg(self.colors.dim),
            ))
        } else {
            Paragraph::new(format!("{}_", self.text)).style(Style::default().fg(self.colors.fg))
        };

        paragraph
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Most recent keystrokes, newest at the bottom
pub struct EventTable<'a> {
    events: &'a [KeyEvent],
    colors: ThemeColors,
}

impl<'a> EventTable<'a> {
    pub fn new(events: &'a [KeyEvent], colors: ThemeColors) -> Self {
        Self { events, colors }
    }
}

impl<'a> Widget for EventTable<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Keystrokes ({}) ", self.events.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let header = format!("{:<12}{:>6}{:>12}{:>12}", "Key", "Code", "Down (ms)", "Up (ms)");
        let width = inner.width as usize;
        buf.set_stringn(
            inner.x,
            inner.y,
            &header,
            width,
            Style::default().fg(self.colors.accent).add_modifier(Modifier::BOLD),
        );

        let visible = inner.height.saturating_sub(1) as usize;
        let skip = self.events.len().saturating_sub(visible);
        for (i, event) in self.events.iter().skip(skip).enumerate() {
            let entry = EventEntry::from(event);
            let up = entry
                .up_ms
                .map(|ms| ms.to_string())
                .unwrap_or_else(|| "held".to_string());
            let key = match entry.key.as_str() {
                " " => "Space".to_string(),
                "\n" => "Enter".to_string(),
                other => other.to_string(),
            };
            let line = format!("{:<12}{:>6}{:>12}{:>12}", key, entry.code, entry.down_ms, up);
            let color = if entry.up_ms.is_some() {
                self.colors.fg
            } else {
                self.colors.yellow
            };
            buf.set_stringn(inner.x, inner.y + 1 + i as u16, &line, width, Style::default().fg(color));
        }
    }
}

/// Widget for the help screen
pub struct HelpPanel {
    colors: ThemeColors,
}

impl HelpPanel {
    pub fn new(colors: ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Help - Keystroke Dynamics ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.info));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = [
            "",
            " CONTROLS",
            " -----------",
            " Tab / Shift+Tab  : Switch between views",
            " Esc              : Quit",
            " Ctrl+S           : Submit metrics",
            " Ctrl+R           : Clear keystrokes and text",
            " Ctrl+E           : Export session report to JSON",
            " Ctrl+P           : Pause/Resume capture",
            " F1               : Show this help",
            "",
            " Shortcuts, Tab, Esc and F-keys are not recorded as keystrokes.",
            "",
            " METRICS",
            " -----------",
            " Dwell            : How long each key is held",
            " Flight           : Gap between releasing a key and pressing the next",
            " Trajectory       : Distance travelled between letter keys",
            " H-Score          : 1 / (flight std dev + 1), higher is steadier",
        ];

        for (line, y) in help_text.iter().zip(inner.y..inner.y + inner.height) {
            let style = if line.contains("---") {
                Style::default().fg(self.colors.dim)
            } else if line.trim_start().chars().all(|c| c.is_ascii_uppercase()) && !line.trim().is_empty() {
                Style::default().fg(self.colors.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_stringn(inner.x, y, line, inner.width as usize, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    view: &'a str,
    elapsed: &'a str,
    keystrokes: usize,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        state: &'a str,
        view: &'a str,
        elapsed: &'a str,
        keystrokes: usize,
        colors: ThemeColors,
    ) -> Self {
        Self {
            state,
            view,
            elapsed,
            keystrokes,
            message: None,
            colors,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.bar).fg(self.colors.fg);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} | {} ", self.state, self.view);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = Style::default().bg(self.colors.bar).fg(self.colors.yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | Keystrokes: {} ", self.elapsed, self.keystrokes);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
    colors: ThemeColors,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, colors: ThemeColors) -> Self {
        Self { tabs, selected, colors }
    }
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let end = area.x + area.width;
        let mut x = area.x;

        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(self.colors.bar)
                    .bg(self.colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg).bg(self.colors.bar)
            };

            let label = format!(" {} ", tab);
            let width = label.len() as u16;
            if x + width > end {
                break;
            }
            buf.set_string(x, area.y, &label, style);
            x += width;
        }

        for fill_x in x..end {
            buf.set_string(fill_x, area.y, " ", Style::default().bg(self.colors.bar));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsResult;
    use crate::testing::{record, tap};

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn metrics_panel_renders_rows() {
        let rows = MetricsResult::default().summary();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        MetricsPanel::new(&rows, ThemeColors::dark()).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Dwell Average: 0.00 ms"));
        assert!(text.contains("H-Score: not enough data"));
    }

    #[test]
    fn event_table_shows_latest_rows() {
        let rec = record(&[tap('a', 0, 100), tap(' ', 150, 200), tap('b', 250, 300)]);
        let area = Rect::new(0, 0, 50, 5);
        let mut buf = Buffer::empty(area);
        EventTable::new(rec.events(), ThemeColors::dark()).render(area, &mut buf);

        let text = buffer_text(&buf);
        // two rows fit below the header: the oldest scrolls away
        assert!(text.contains("Keystrokes (3)"));
        assert!(!text.contains("100"));
        assert!(text.contains("Space"));
        assert!(text.contains("300"));
    }

    #[test]
    fn event_table_rows_stay_inside_border() {
        let rec = record(&[tap('a', 0, 100), tap('b', 250, 300)]);
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        EventTable::new(rec.events(), ThemeColors::dark()).render(area, &mut buf);

        for y in 1..4 {
            assert_eq!(buf[(19, y)].symbol(), "│", "row {y}");
        }
    }

    #[test]
    fn text_panel_shows_placeholder() {
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        TextPanel::new("", ThemeColors::light()).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("Start typing here..."));
    }
}
