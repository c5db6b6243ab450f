use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::store::schema::LunchOption;
use crate::ui::theme::Theme;

/// Scrollable list of lunch options with a selection cursor and an inline
/// delete confirmation.
pub struct OptionList<'a> {
    pub options: &'a [LunchOption],
    pub selected: usize,
    pub confirm_delete: bool,
    pub theme: &'a Theme,
}

impl Widget for &OptionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("options.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        if self.options.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                t!("options.empty"),
                Style::default().fg(colors.text_dim()),
            )))
            .render(layout[0], buf);
        } else {
            self.render_rows(layout[0], buf);
        }

        if self.confirm_delete {
            Paragraph::new(Line::from(Span::styled(
                format!(" {} [y/n]", t!("options.confirm_delete")),
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )))
            .render(layout[1], buf);
        }
    }
}

impl OptionList<'_> {
    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let row_height = 2usize;
        let visible = (area.height as usize / row_height).max(1);

        // Keep the cursor on screen
        let first = if self.selected >= visible {
            self.selected + 1 - visible
        } else {
            0
        };

        for (row, (i, option)) in self
            .options
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let mut title_spans = vec![Span::styled(
                format!(" {indicator} {}", option.name),
                Style::default()
                    .fg(if is_selected {
                        colors.accent()
                    } else {
                        colors.fg()
                    })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            )];
            if option.liked {
                title_spans.push(Span::styled(
                    format!("  ♥ {}", t!("form.liked")),
                    Style::default().fg(colors.liked()),
                ));
            }

            let mut detail = option.kind.clone();
            if let Some(ref location) = option.location {
                if !detail.is_empty() {
                    detail.push_str("  ");
                }
                detail.push_str(location);
            }

            let rect = Rect::new(
                area.x,
                area.y + (row * row_height) as u16,
                area.width,
                row_height as u16,
            );
            if rect.bottom() > area.bottom() {
                break;
            }
            Paragraph::new(vec![
                Line::from(title_spans),
                Line::from(Span::styled(
                    format!("     {detail}"),
                    Style::default().fg(colors.text_dim()),
                )),
            ])
            .render(rect, buf);
        }
    }
}
