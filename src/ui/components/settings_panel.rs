use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::store::schema::{AppSettings, ThemeMode};
use crate::ui::theme::Theme;

/// The exclude-days choices offered in the UI.
pub const EXCLUDE_DAY_CHOICES: [i64; 4] = [1, 2, 3, 7];

pub const SETTINGS_ROWS: usize = 6;
pub const ROW_THEME: usize = 0;
pub const ROW_LANGUAGE: usize = 1;
pub const ROW_EXCLUDE_RECENT: usize = 2;
pub const ROW_EXCLUDE_DAYS: usize = 3;
pub const ROW_CLEAR_FAVORITES: usize = 4;
pub const ROW_CLEAR_HISTORY: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearTarget {
    Favorites,
    History,
}

pub struct SettingsPanel<'a> {
    pub settings: &'a AppSettings,
    pub selected: usize,
    pub confirm: Option<ClearTarget>,
    pub theme: &'a Theme,
}

impl Widget for &SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("settings.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let theme_value = match self.settings.theme {
            ThemeMode::Light => t!("settings.theme_light"),
            ThemeMode::Dark => t!("settings.theme_dark"),
        };
        let on_off = |value: bool| {
            if value {
                t!("common.on")
            } else {
                t!("common.off")
            }
        };

        let rows: [(String, String); SETTINGS_ROWS] = [
            (t!("settings.theme").to_string(), theme_value.to_string()),
            (
                t!("settings.language").to_string(),
                self.settings.language.label().to_string(),
            ),
            (
                t!("settings.exclude_recent").to_string(),
                on_off(self.settings.exclude_recent).to_string(),
            ),
            (
                t!("settings.exclude_days").to_string(),
                t!("settings.days_value", days = self.settings.exclude_days).to_string(),
            ),
            (t!("settings.clear_favorites").to_string(), String::new()),
            (t!("settings.clear_history").to_string(), String::new()),
        ];

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(SETTINGS_ROWS as u16 * 2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let row_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(rows.iter().map(|_| Constraint::Length(2)).collect::<Vec<_>>())
            .split(layout[1]);

        for (i, (label, value)) in rows.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { " > " } else { "   " };
            let is_action = value.is_empty();

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let mut spans = vec![Span::styled(format!("{indicator}{label}"), label_style)];
            if !is_action {
                spans.push(Span::styled(
                    format!("  < {value} >"),
                    Style::default().fg(if is_selected {
                        colors.primary()
                    } else {
                        colors.text_dim()
                    }),
                ));
            }
            Paragraph::new(Line::from(spans)).render(row_layout[i], buf);
        }

        if let Some(target) = self.confirm {
            let prompt = match target {
                ClearTarget::Favorites => t!("settings.clear_favorites"),
                ClearTarget::History => t!("settings.clear_history"),
            };
            Paragraph::new(Line::from(Span::styled(
                format!(" {prompt}: {} [y/n]", t!("settings.confirm_clear")),
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )))
            .render(layout[3], buf);
        }
    }
}
