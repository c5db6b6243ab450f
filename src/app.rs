use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use crate::engine::selection::{self, SelectionError};
use crate::engine::spin::SpinState;
use crate::store::json_store::JsonStore;
use crate::store::schema::{AppData, Language, LunchOption, OptionPatch, SettingsPatch, ThemeMode};
use crate::ui::components::history_list::HistoryFilter;
use crate::ui::components::menu::Menu;
use crate::ui::components::option_form::OptionForm;
use crate::ui::components::settings_panel::{
    ClearTarget, EXCLUDE_DAY_CHOICES, ROW_CLEAR_FAVORITES, ROW_CLEAR_HISTORY, ROW_EXCLUDE_DAYS,
    ROW_EXCLUDE_RECENT, ROW_LANGUAGE, ROW_THEME, SETTINGS_ROWS,
};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Draw,
    Options,
    OptionForm,
    History,
    Settings,
}

/// Top-level state holder. Owns the in-memory copy of the aggregate and
/// the store; every mutation goes through the store and replaces the
/// in-memory copy with the freshly written aggregate.
pub struct App {
    pub screen: AppScreen,
    pub data: AppData,
    pub store: Option<JsonStore>,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub should_quit: bool,
    /// Transient warning shown in the footer (persistence problems).
    pub status: Option<String>,

    // Draw screen
    pub spin: Option<SpinState>,
    pub spin_deadline: Option<Instant>,
    pub reel_names: Vec<String>,
    pub pending_winner: Option<LunchOption>,
    pub final_option: Option<LunchOption>,
    pub draw_message: Option<String>,

    // Options screen
    pub options_selected: usize,
    pub confirm_delete: bool,
    pub form: Option<OptionForm>,

    // History screen
    pub history_filter: HistoryFilter,
    pub history_confirm_clear: bool,

    // Settings screen
    pub settings_selected: usize,
    pub settings_confirm: Option<ClearTarget>,

    rng: SmallRng,
}

impl App {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        let store = match data_dir {
            Some(dir) => JsonStore::with_base_dir(dir).ok(),
            None => JsonStore::new().ok(),
        };
        let data = store.as_ref().map(JsonStore::load).unwrap_or_default();

        rust_i18n::set_locale(data.settings.language.locale());
        let theme: &'static Theme = Box::leak(Box::new(Theme::for_mode(data.settings.theme)));
        let menu = Menu::new(theme);

        let status = if store.is_none() {
            Some(t!("status.no_store").to_string())
        } else {
            None
        };

        Self {
            screen: AppScreen::Menu,
            data,
            store,
            theme,
            menu,
            should_quit: false,
            status,
            spin: None,
            spin_deadline: None,
            reel_names: Vec::new(),
            pending_winner: None,
            final_option: None,
            draw_message: None,
            options_selected: 0,
            confirm_delete: false,
            form: None,
            history_filter: HistoryFilter::All,
            history_confirm_clear: false,
            settings_selected: 0,
            settings_confirm: None,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Re-read the aggregate from disk, discarding the in-memory copy.
    pub fn refresh_data(&mut self) {
        if let Some(ref store) = self.store {
            self.data = store.load();
        }
    }

    /// Run one store mutation and adopt the written aggregate. On a write
    /// failure the in-memory copy stays as-is (stale but renderable) and
    /// the footer warns that the change may not persist.
    fn with_store<F>(&mut self, op: F)
    where
        F: FnOnce(&JsonStore) -> anyhow::Result<AppData>,
    {
        let Some(ref store) = self.store else {
            self.status = Some(t!("status.no_store").to_string());
            return;
        };
        match op(store) {
            Ok(data) => self.data = data,
            Err(_) => self.status = Some(t!("status.save_failed").to_string()),
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_draw(&mut self) {
        self.screen = AppScreen::Draw;
        self.draw_message = None;
    }

    pub fn go_to_options(&mut self) {
        self.screen = AppScreen::Options;
        self.confirm_delete = false;
        self.clamp_options_cursor();
    }

    pub fn go_to_history(&mut self) {
        self.screen = AppScreen::History;
        self.history_confirm_clear = false;
    }

    pub fn go_to_settings(&mut self) {
        self.screen = AppScreen::Settings;
        self.settings_selected = 0;
        self.settings_confirm = None;
    }

    pub fn activate_menu_item(&mut self) {
        match self.menu.selected {
            0 => self.go_to_draw(),
            1 => self.go_to_options(),
            2 => self.go_to_history(),
            3 => self.go_to_settings(),
            _ => {}
        }
    }

    // ── Draw screen ─────────────────────────────────────────────────────

    pub fn is_drawing(&self) -> bool {
        self.spin.is_some()
    }

    pub fn eligible_count(&self) -> usize {
        selection::eligible(
            &self.data.lunch_options,
            &self.data.history,
            &self.data.settings,
            Utc::now().date_naive(),
        )
        .len()
    }

    /// Decide the winner up front, then start the reel; the reel is
    /// guaranteed to stop on the winner, so what the user sees as final is
    /// exactly what gets recorded.
    pub fn start_draw(&mut self) {
        if self.is_drawing() {
            return;
        }
        let today = Utc::now().date_naive();
        let drawn = selection::draw(
            &mut self.rng,
            &self.data.lunch_options,
            &self.data.history,
            &self.data.settings,
            today,
        );
        match drawn {
            Ok(drawn) => {
                let pool = selection::eligible(
                    &self.data.lunch_options,
                    &self.data.history,
                    &self.data.settings,
                    today,
                );
                self.reel_names = pool.iter().map(|o| o.name.clone()).collect();
                self.pending_winner = Some(drawn.option.clone());
                let spin = SpinState::new(&mut self.rng, self.reel_names.len(), drawn.index);
                self.spin_deadline = Some(Instant::now() + spin.delay());
                self.spin = Some(spin);
                self.final_option = None;
                self.draw_message = None;
            }
            Err(SelectionError::NoEligibleOptions) => {
                self.final_option = None;
                self.draw_message = Some(if self.data.lunch_options.is_empty() {
                    t!("draw.no_options_hint").to_string()
                } else {
                    t!("draw.no_eligible").to_string()
                });
            }
        }
    }

    /// Advance the reel when its current delay has elapsed; on the final
    /// step, record the draw.
    pub fn on_tick(&mut self) {
        let Some(deadline) = self.spin_deadline else {
            return;
        };
        if Instant::now() < deadline {
            return;
        }
        let Some(ref mut spin) = self.spin else {
            return;
        };
        if spin.advance() {
            self.spin_deadline = Some(Instant::now() + spin.delay());
        } else {
            self.finish_draw();
        }
    }

    pub fn reel_name(&self) -> Option<&str> {
        let spin = self.spin.as_ref()?;
        self.reel_names.get(spin.current()).map(String::as_str)
    }

    fn finish_draw(&mut self) {
        self.spin = None;
        self.spin_deadline = None;
        self.reel_names.clear();
        if let Some(winner) = self.pending_winner.take() {
            self.with_store(|store| store.add_history(&winner.name));
            self.final_option = Some(winner);
        }
    }

    // ── Options screen ──────────────────────────────────────────────────

    fn clamp_options_cursor(&mut self) {
        let len = self.data.lunch_options.len();
        if len == 0 {
            self.options_selected = 0;
        } else if self.options_selected >= len {
            self.options_selected = len - 1;
        }
    }

    pub fn options_next(&mut self) {
        if self.options_selected + 1 < self.data.lunch_options.len() {
            self.options_selected += 1;
        }
    }

    pub fn options_prev(&mut self) {
        self.options_selected = self.options_selected.saturating_sub(1);
    }

    pub fn selected_option(&self) -> Option<&LunchOption> {
        self.data.lunch_options.get(self.options_selected)
    }

    pub fn open_add_form(&mut self) {
        self.form = Some(OptionForm::add());
        self.screen = AppScreen::OptionForm;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(option) = self.selected_option() {
            self.form = Some(OptionForm::edit(option));
            self.screen = AppScreen::OptionForm;
        }
    }

    /// Validate and persist the form. An empty name never reaches the
    /// store; the form stays open with an error message instead.
    pub fn submit_form(&mut self) {
        let Some(ref mut form) = self.form else {
            return;
        };
        if form.trimmed_name().is_empty() {
            form.error = Some(t!("form.name_required").to_string());
            return;
        }

        match form.editing_id.clone() {
            Some(id) => {
                let patch = form.as_patch();
                self.with_store(|store| store.update_option(&id, &patch));
            }
            None => {
                let option = form.as_new_option();
                self.with_store(|store| store.add_option(option));
            }
        }
        self.form = None;
        self.go_to_options();
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.go_to_options();
    }

    pub fn request_delete(&mut self) {
        if self.selected_option().is_some() {
            self.confirm_delete = true;
        }
    }

    pub fn confirm_delete_selected(&mut self) {
        self.confirm_delete = false;
        if let Some(option) = self.selected_option() {
            let id = option.id.clone();
            self.with_store(|store| store.delete_option(&id));
            self.clamp_options_cursor();
        }
    }

    pub fn toggle_selected_liked(&mut self) {
        if let Some(option) = self.selected_option() {
            let id = option.id.clone();
            let liked = !option.liked;
            self.with_store(|store| {
                store.update_option(
                    &id,
                    &OptionPatch {
                        liked: Some(liked),
                        ..OptionPatch::default()
                    },
                )
            });
        }
    }

    // ── History screen ──────────────────────────────────────────────────

    pub fn cycle_history_filter(&mut self) {
        self.history_filter = self.history_filter.next();
    }

    pub fn request_clear_history(&mut self) {
        if !self.data.history.is_empty() {
            self.history_confirm_clear = true;
        }
    }

    pub fn confirm_clear_history(&mut self) {
        self.history_confirm_clear = false;
        self.with_store(JsonStore::clear_history);
    }

    // ── Settings screen ─────────────────────────────────────────────────

    pub fn settings_next(&mut self) {
        if self.settings_selected + 1 < SETTINGS_ROWS {
            self.settings_selected += 1;
        }
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    /// Enter/arrows on a settings row: cycle the value, or arm the clear
    /// confirmation for the action rows.
    pub fn settings_activate(&mut self, forward: bool) {
        match self.settings_selected {
            ROW_THEME => self.set_theme_mode(self.data.settings.theme.toggled()),
            ROW_LANGUAGE => {
                let language = if forward {
                    self.data.settings.language.next()
                } else {
                    self.data.settings.language.prev()
                };
                self.set_language(language);
            }
            ROW_EXCLUDE_RECENT => {
                let exclude = !self.data.settings.exclude_recent;
                self.with_store(|store| {
                    store.update_settings(&SettingsPatch {
                        exclude_recent: Some(exclude),
                        ..SettingsPatch::default()
                    })
                });
            }
            ROW_EXCLUDE_DAYS => self.cycle_exclude_days(forward),
            ROW_CLEAR_FAVORITES => self.settings_confirm = Some(ClearTarget::Favorites),
            ROW_CLEAR_HISTORY => self.settings_confirm = Some(ClearTarget::History),
            _ => {}
        }
    }

    pub fn settings_confirm_clear(&mut self) {
        let Some(target) = self.settings_confirm.take() else {
            return;
        };
        match target {
            ClearTarget::Favorites => {
                self.with_store(JsonStore::clear_favorites);
                self.clamp_options_cursor();
            }
            ClearTarget::History => self.with_store(JsonStore::clear_history),
        }
    }

    fn cycle_exclude_days(&mut self, forward: bool) {
        let current = self.data.settings.exclude_days;
        let position = EXCLUDE_DAY_CHOICES.iter().position(|&d| d == current);
        let len = EXCLUDE_DAY_CHOICES.len();
        let next = match position {
            Some(i) if forward => EXCLUDE_DAY_CHOICES[(i + 1) % len],
            Some(i) => EXCLUDE_DAY_CHOICES[(i + len - 1) % len],
            // A hand-edited record may hold a value outside the choices
            None => EXCLUDE_DAY_CHOICES[0],
        };
        self.with_store(|store| {
            store.update_settings(&SettingsPatch {
                exclude_days: Some(next),
                ..SettingsPatch::default()
            })
        });
    }

    fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.with_store(|store| {
            store.update_settings(&SettingsPatch {
                theme: Some(mode),
                ..SettingsPatch::default()
            })
        });
        let theme: &'static Theme =
            Box::leak(Box::new(Theme::for_mode(self.data.settings.theme)));
        self.theme = theme;
        self.menu = Menu::new(theme);
    }

    fn set_language(&mut self, language: Language) {
        self.with_store(|store| {
            store.update_settings(&SettingsPatch {
                language: Some(language),
                ..SettingsPatch::default()
            })
        });
        rust_i18n::set_locale(self.data.settings.language.locale());
        // Menu labels are resolved at construction time
        self.menu = Menu::new(self.theme);
    }
}
