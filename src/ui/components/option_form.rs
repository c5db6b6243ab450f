use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::store::schema::{LunchOption, NewOption, OptionPatch};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

const FIELD_COUNT: usize = 4;
const FIELD_LIKED: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    Continue,
    Save,
    Cancel,
}

/// Add/edit form for one lunch option: three text fields and the liked
/// toggle. Owns its editing state; the App validates and persists on
/// [`FormOutcome::Save`].
pub struct OptionForm {
    pub editing_id: Option<String>,
    pub name: LineInput,
    pub kind: LineInput,
    pub location: LineInput,
    pub liked: bool,
    pub focus: usize,
    pub error: Option<String>,
}

impl OptionForm {
    pub fn add() -> Self {
        Self {
            editing_id: None,
            name: LineInput::default(),
            kind: LineInput::default(),
            location: LineInput::default(),
            liked: false,
            focus: 0,
            error: None,
        }
    }

    pub fn edit(option: &LunchOption) -> Self {
        Self {
            editing_id: Some(option.id.clone()),
            name: LineInput::new(&option.name),
            kind: LineInput::new(&option.kind),
            location: LineInput::new(option.location.as_deref().unwrap_or_default()),
            liked: option.liked,
            focus: 0,
            error: None,
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                return FormOutcome::Continue;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                return FormOutcome::Continue;
            }
            _ => {}
        }

        if self.focus == FIELD_LIKED {
            return match key.code {
                KeyCode::Esc => FormOutcome::Cancel,
                KeyCode::Enter => FormOutcome::Save,
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.liked = !self.liked;
                    FormOutcome::Continue
                }
                _ => FormOutcome::Continue,
            };
        }

        let input = match self.focus {
            0 => &mut self.name,
            1 => &mut self.kind,
            _ => &mut self.location,
        };
        match input.handle(key) {
            InputResult::Submit => FormOutcome::Save,
            InputResult::Cancel => FormOutcome::Cancel,
            InputResult::Continue => {
                self.error = None;
                FormOutcome::Continue
            }
        }
    }

    pub fn trimmed_name(&self) -> &str {
        self.name.value().trim()
    }

    fn location_value(&self) -> Option<String> {
        let location = self.location.value().trim();
        if location.is_empty() {
            None
        } else {
            Some(location.to_string())
        }
    }

    pub fn as_new_option(&self) -> NewOption {
        NewOption {
            name: self.trimmed_name().to_string(),
            kind: self.kind.value().trim().to_string(),
            location: self.location_value(),
            liked: self.liked,
        }
    }

    /// Full-form patch: the form always carries every field, so each one
    /// is `Some`; an emptied location clears the stored value.
    pub fn as_patch(&self) -> OptionPatch {
        OptionPatch {
            name: Some(self.trimmed_name().to_string()),
            kind: Some(self.kind.value().trim().to_string()),
            location: Some(self.location_value()),
            liked: Some(self.liked),
        }
    }
}

pub struct FormView<'a> {
    pub form: &'a OptionForm,
    pub theme: &'a Theme,
}

impl Widget for &FormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let form = self.form;

        let title = if form.editing_id.is_some() {
            t!("form.title_edit")
        } else {
            t!("form.title_add")
        };
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.surface()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let labels = [
            t!("form.name"),
            t!("form.kind"),
            t!("form.location"),
            t!("form.liked"),
        ];
        for (i, label) in labels.iter().enumerate() {
            let focused = i == form.focus;
            let indicator = if focused { ">" } else { " " };
            let label_style = Style::default()
                .fg(if focused { colors.accent() } else { colors.fg() })
                .add_modifier(if focused {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let mut spans = vec![Span::styled(format!(" {indicator} {label}: "), label_style)];
            if i == FIELD_LIKED {
                spans.push(Span::styled(
                    if form.liked { "[x]" } else { "[ ]" },
                    Style::default().fg(colors.liked()),
                ));
            } else {
                let input = match i {
                    0 => &form.name,
                    1 => &form.kind,
                    _ => &form.location,
                };
                spans.extend(render_input(input, focused, self.theme));
            }
            Paragraph::new(Line::from(spans)).render(layout[i], buf);
        }

        if let Some(ref error) = form.error {
            Paragraph::new(Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(colors.error()),
            )))
            .render(layout[4], buf);
        }
    }
}

fn render_input<'a>(input: &'a LineInput, focused: bool, theme: &Theme) -> Vec<Span<'a>> {
    let colors = &theme.colors;
    if !focused {
        return vec![Span::styled(
            input.value(),
            Style::default().fg(colors.fg()),
        )];
    }

    let (before, at, after) = input.render_parts();
    let cursor_style = Style::default()
        .fg(colors.bg())
        .bg(colors.fg())
        .add_modifier(Modifier::SLOW_BLINK);
    vec![
        Span::styled(before, Style::default().fg(colors.fg())),
        Span::styled(at.map(String::from).unwrap_or_else(|| " ".to_string()), cursor_style),
        Span::styled(after, Style::default().fg(colors.fg())),
    ]
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut OptionForm, s: &str) {
        for ch in s.chars() {
            form.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn tab_cycles_through_all_fields() {
        let mut form = OptionForm::add();
        assert_eq!(form.focus, 0);
        for expected in [1, 2, 3, 0] {
            form.handle(key(KeyCode::Tab));
            assert_eq!(form.focus, expected);
        }
    }

    #[test]
    fn space_toggles_liked_only_on_the_liked_row() {
        let mut form = OptionForm::add();
        type_str(&mut form, "a b");
        assert!(!form.liked);
        assert_eq!(form.name.value(), "a b");

        form.focus = FIELD_LIKED;
        form.handle(key(KeyCode::Char(' ')));
        assert!(form.liked);
    }

    #[test]
    fn enter_saves_and_esc_cancels() {
        let mut form = OptionForm::add();
        assert_eq!(form.handle(key(KeyCode::Enter)), FormOutcome::Save);
        assert_eq!(form.handle(key(KeyCode::Esc)), FormOutcome::Cancel);
    }

    #[test]
    fn as_new_option_trims_and_drops_empty_location() {
        let mut form = OptionForm::add();
        type_str(&mut form, "  Ramen-ya  ");
        form.handle(key(KeyCode::Tab));
        type_str(&mut form, "noodles");

        let option = form.as_new_option();
        assert_eq!(option.name, "Ramen-ya");
        assert_eq!(option.kind, "noodles");
        assert_eq!(option.location, None);
        assert!(!option.liked);
    }

    #[test]
    fn as_patch_carries_every_field_and_clears_location() {
        let existing = LunchOption {
            id: "1".to_string(),
            name: "Curry House".to_string(),
            kind: "curry".to_string(),
            liked: true,
            location: Some("2F".to_string()),
            created_at: chrono::Utc::now(),
        };
        let mut form = OptionForm::edit(&existing);
        assert_eq!(form.editing_id.as_deref(), Some("1"));

        // Clear the location field
        form.focus = 2;
        for _ in 0..2 {
            form.handle(key(KeyCode::Backspace));
        }

        let patch = form.as_patch();
        assert_eq!(patch.name.as_deref(), Some("Curry House"));
        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.liked, Some(true));
    }
}
