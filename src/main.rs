mod app;
mod engine;
mod event;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use store::schema::Language;
use ui::components::draw_panel::DrawPanel;
use ui::components::history_list::HistoryList;
use ui::components::option_form::{FormOutcome, FormView};
use ui::components::option_list::OptionList;
use ui::components::settings_panel::SettingsPanel;
use ui::layout::{AppLayout, centered_rect};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "lunchpick", version, about = "Terminal lunch picker with draw history")]
struct Cli {
    #[arg(short, long, help = "Theme name (overrides the stored setting)")]
    theme: Option<String>,

    #[arg(short, long, help = "UI language (zh-TW, zh-CN, en)")]
    language: Option<String>,

    #[arg(short, long, help = "Data directory (defaults to the platform data dir)")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new(cli.data_dir);

    if let Some(theme_name) = cli.theme
        && let Some(theme) = ui::theme::Theme::load(&theme_name)
    {
        let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
        app.theme = theme;
        app.menu.theme = theme;
    }
    if let Some(ref locale) = cli.language
        && let Some(language) = Language::from_locale(locale)
    {
        // Session-only override; the stored setting is untouched
        rust_i18n::set_locale(language.locale());
        app.menu = ui::components::menu::Menu::new(app.theme);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Tick fast enough to keep up with the shortest reel delay
    let events = EventHandler::new(Duration::from_millis(25));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // A new keypress dismisses the last persistence warning
    app.status = None;

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Draw => handle_draw_key(app, key),
        AppScreen::Options => handle_options_key(app, key),
        AppScreen::OptionForm => handle_form_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.go_to_draw(),
        KeyCode::Char('2') => app.go_to_options(),
        KeyCode::Char('3') => app.go_to_history(),
        KeyCode::Char('4') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.activate_menu_item(),
        _ => {}
    }
}

fn handle_draw_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            if !app.is_drawing() {
                app.go_to_menu();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('d') => app.start_draw(),
        _ => {}
    }
}

fn handle_options_key(app: &mut App, key: KeyEvent) {
    if app.confirm_delete {
        match key.code {
            KeyCode::Char('y') => app.confirm_delete_selected(),
            KeyCode::Char('n') | KeyCode::Esc => app.confirm_delete = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.options_next(),
        KeyCode::Up | KeyCode::Char('k') => app.options_prev(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
        KeyCode::Char('l') => app.toggle_selected_liked(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    let Some(ref mut form) = app.form else {
        return;
    };
    match form.handle(key) {
        FormOutcome::Save => app.submit_form(),
        FormOutcome::Cancel => app.cancel_form(),
        FormOutcome::Continue => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    if app.history_confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.confirm_clear_history(),
            KeyCode::Char('n') | KeyCode::Esc => app.history_confirm_clear = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Tab | KeyCode::Char('f') => app.cycle_history_filter(),
        KeyCode::Char('c') | KeyCode::Char('x') => app.request_clear_history(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    if app.settings_confirm.is_some() {
        match key.code {
            KeyCode::Char('y') => app.settings_confirm_clear(),
            KeyCode::Char('n') | KeyCode::Esc => app.settings_confirm = None,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_activate(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_activate(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Draw => render_draw(frame, app),
        AppScreen::Options => render_options(frame, app),
        AppScreen::OptionForm => render_form(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, title: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", t!("app.name")),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {title}"),
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &str) {
    let colors = &app.theme.colors;
    let line = match app.status {
        Some(ref status) => Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.error()),
        )),
        None => Line::from(Span::styled(
            format!(" {hints}"),
            Style::default().fg(colors.text_dim()),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &t!("app.tagline"));

    let menu_area = centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app, layout.footer, &t!("hints.menu"));
}

fn render_draw(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &t!("menu.draw"));

    let panel = DrawPanel {
        data: &app.data,
        eligible_count: app.eligible_count(),
        reel_name: app.reel_name(),
        final_option: app.final_option.as_ref(),
        message: app.draw_message.as_deref(),
        theme: app.theme,
    };
    frame.render_widget(&panel, layout.main);

    render_footer(frame, app, layout.footer, &t!("hints.draw"));
}

fn render_options(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &t!("options.title"));

    let list = OptionList {
        options: &app.data.lunch_options,
        selected: app.options_selected,
        confirm_delete: app.confirm_delete,
        theme: app.theme,
    };
    frame.render_widget(&list, layout.main);

    render_footer(frame, app, layout.footer, &t!("hints.options"));
}

fn render_form(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &t!("options.title"));

    if let Some(ref form) = app.form {
        let area = centered_rect(60, 70, layout.main);
        let view = FormView {
            form,
            theme: app.theme,
        };
        frame.render_widget(&view, area);
    }

    render_footer(frame, app, layout.footer, &t!("hints.form"));
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &t!("history.title"));

    let today = Utc::now().date_naive();
    let list = HistoryList {
        records: app.history_filter.apply(&app.data.history, today),
        filter: app.history_filter,
        confirm_clear: app.history_confirm_clear,
        today,
        theme: app.theme,
    };
    frame.render_widget(&list, layout.main);

    render_footer(frame, app, layout.footer, &t!("hints.history"));
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &t!("settings.title"));

    let panel = SettingsPanel {
        settings: &app.data.settings,
        selected: app.settings_selected,
        confirm: app.settings_confirm,
        theme: app.theme,
    };
    frame.render_widget(&panel, centered_rect(70, 90, layout.main));

    render_footer(frame, app, layout.footer, &t!("hints.settings"));
}
