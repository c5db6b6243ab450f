use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::store::schema::{AppData, LunchOption};
use crate::ui::theme::Theme;

/// Home screen: the result card, the option/eligible/history counters,
/// and the drawn option's details once the reel stops.
pub struct DrawPanel<'a> {
    pub data: &'a AppData,
    pub eligible_count: usize,
    /// Name under the reel cursor while a draw is running.
    pub reel_name: Option<&'a str>,
    pub final_option: Option<&'a LunchOption>,
    pub message: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for &DrawPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        self.render_result_card(layout[0], buf);
        self.render_counters(layout[1], buf);

        if self.data.settings.exclude_recent {
            let summary = t!(
                "draw.exclude_summary",
                days = self.data.settings.exclude_days
            );
            Paragraph::new(Line::from(Span::styled(
                summary,
                Style::default().fg(colors.text_dim()),
            )))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
        }

        if let Some(option) = self.final_option {
            self.render_details(option, layout[3], buf);
        }
    }
}

impl DrawPanel<'_> {
    fn render_result_card(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.surface()));
        let inner = block.inner(area);
        block.render(area, buf);

        let name_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let lines: Vec<Line> = if let Some(name) = self.reel_name {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    t!("draw.drawing"),
                    Style::default().fg(colors.text_dim()),
                )),
                Line::from(""),
                Line::from(Span::styled(name.to_string(), name_style)),
            ]
        } else if let Some(option) = self.final_option {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    t!("draw.title"),
                    Style::default().fg(colors.primary()),
                )),
                Line::from(""),
                Line::from(Span::styled(option.name.clone(), name_style)),
            ]
        } else if let Some(message) = self.message {
            vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled(
                    message.to_string(),
                    Style::default().fg(colors.error()),
                )),
            ]
        } else if self.data.lunch_options.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    t!("draw.no_options"),
                    Style::default().fg(colors.fg()),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    t!("draw.no_options_hint"),
                    Style::default().fg(colors.text_dim()),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled(
                    t!("draw.prompt"),
                    Style::default().fg(colors.text_dim()),
                )),
            ]
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn render_counters(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);

        let counters = [
            (
                self.data.lunch_options.len(),
                t!("draw.total"),
                colors.primary(),
            ),
            (self.eligible_count, t!("draw.available"), colors.success()),
            (
                self.data.history.len(),
                t!("draw.history_count"),
                colors.accent(),
            ),
        ];

        for (i, (count, label, color)) in counters.into_iter().enumerate() {
            let lines = vec![
                Line::from(Span::styled(
                    count.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(label, Style::default().fg(colors.text_dim()))),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(columns[i], buf);
        }
    }

    fn render_details(&self, option: &LunchOption, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut lines: Vec<Line> = Vec::new();
        if !option.kind.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{} {}", t!("form.kind"), option.kind),
                Style::default().fg(colors.fg()),
            )));
        }
        if let Some(ref location) = option.location {
            lines.push(Line::from(Span::styled(
                format!("{} {}", t!("form.location"), location),
                Style::default().fg(colors.fg()),
            )));
        }
        if option.liked {
            lines.push(Line::from(Span::styled(
                format!("♥ {}", t!("form.liked")),
                Style::default().fg(colors.liked()),
            )));
        }
        if lines.is_empty() {
            return;
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.surface()));
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(lines).render(inner, buf);
    }
}
