use chrono::{DateTime, Duration, Local, NaiveDate};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::store::schema::HistoryRecord;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryFilter {
    All,
    Week,
    Today,
}

impl HistoryFilter {
    pub fn next(self) -> Self {
        match self {
            HistoryFilter::All => HistoryFilter::Week,
            HistoryFilter::Week => HistoryFilter::Today,
            HistoryFilter::Today => HistoryFilter::All,
        }
    }

    pub fn label(self) -> String {
        match self {
            HistoryFilter::All => t!("history.all").to_string(),
            HistoryFilter::Week => t!("history.week").to_string(),
            HistoryFilter::Today => t!("history.today").to_string(),
        }
    }

    /// Records are newest-first already; filtering preserves that order.
    pub fn apply<'a>(
        self,
        history: &'a [HistoryRecord],
        today: NaiveDate,
    ) -> Vec<&'a HistoryRecord> {
        match self {
            HistoryFilter::All => history.iter().collect(),
            HistoryFilter::Today => history.iter().filter(|r| r.date == today).collect(),
            HistoryFilter::Week => {
                let week_start = today - Duration::days(7);
                history.iter().filter(|r| r.date >= week_start).collect()
            }
        }
    }
}

/// Relative label for a record date: today, yesterday, or the plain date.
fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        t!("history.today").to_string()
    } else if date == today - Duration::days(1) {
        t!("history.yesterday").to_string()
    } else {
        date.to_string()
    }
}

pub struct HistoryList<'a> {
    pub records: Vec<&'a HistoryRecord>,
    pub filter: HistoryFilter,
    pub confirm_clear: bool,
    pub today: NaiveDate,
    pub theme: &'a Theme,
}

impl Widget for &HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("history.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_filter_tabs(layout[0], buf);

        if self.records.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", t!("history.empty")),
                Style::default().fg(colors.text_dim()),
            )))
            .render(layout[2], buf);
        } else {
            self.render_records(layout[2], buf);
        }

        if self.confirm_clear {
            Paragraph::new(Line::from(Span::styled(
                format!(" {} [y/n]", t!("history.confirm_clear")),
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )))
            .render(layout[3], buf);
        }
    }
}

impl HistoryList<'_> {
    fn render_filter_tabs(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for filter in [HistoryFilter::All, HistoryFilter::Week, HistoryFilter::Today] {
            let active = filter == self.filter;
            spans.push(Span::styled(
                format!("[{}]", filter.label()),
                Style::default()
                    .fg(if active { colors.accent() } else { colors.text_dim() })
                    .add_modifier(if active {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_records(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        for (row, record) in self.records.iter().take(area.height as usize).enumerate() {
            let time = DateTime::from_timestamp_millis(record.timestamp)
                .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
                .unwrap_or_default();

            let line = Line::from(vec![
                Span::styled(
                    format!(" {}", record.selected),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("  {}", date_label(record.date, self.today)),
                    Style::default().fg(colors.primary()),
                ),
                Span::styled(format!("  {time}"), Style::default().fg(colors.text_dim())),
            ]);
            let rect = Rect::new(area.x, area.y + row as u16, area.width, 1);
            Paragraph::new(line).render(rect, buf);
        }
    }
}
