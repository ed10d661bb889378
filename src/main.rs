use std::io;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing::{error, info, warn};

use typeneon::app::{App, AppScreen, StartMode};
use typeneon::config::{Config, ConfigOverrides, Difficulty};
use typeneon::event::{AppEvent, EventHandler};
use typeneon::provider::{self, worker::Dispatcher};
use typeneon::session::input::KeyAction;
use typeneon::session::state::SessionKind;
use typeneon::ui;
use typeneon::ui::components::dashboard::Dashboard;
use typeneon::ui::components::game_field::{self, GameField};
use typeneon::ui::components::keyboard_diagram::KeyboardDiagram;
use typeneon::ui::components::menu::Menu;
use typeneon::ui::components::progress_bar::ProgressBar;
use typeneon::ui::components::stats_sidebar::StatsSidebar;
use typeneon::ui::components::typing_area::TypingArea;
use typeneon::ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "typeneon", version, about = "Neon terminal typing trainer")]
struct Cli {
    #[arg(short, long, value_enum, help = "Start directly in a mode")]
    mode: Option<StartMode>,

    #[arg(long, help = "Topic for generated lesson text")]
    topic: Option<String>,

    #[arg(short, long, value_enum, help = "Lesson and word difficulty")]
    difficulty: Option<Difficulty>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Keyboard layout (qwerty, dvorak, colemak)")]
    layout: Option<String>,

    #[arg(long, help = "Never call the text API; use built-in text")]
    offline: bool,

    #[arg(long, help = "Log level or filter directive (overrides config)")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let overrides = ConfigOverrides {
        topic: cli.topic,
        difficulty: cli.difficulty,
        theme: cli.theme,
        keyboard_layout: cli.layout,
        log_level: cli.log_level,
    };
    let effective = overrides.apply(&config);

    let _log_guard = typeneon::logging::init_logging(&Config::log_dir(), &effective.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "typeneon starting");
    if let Some(err) = config_error {
        warn!(error = %err, "could not read config, using defaults");
    }

    let events = EventHandler::new(effective.tick_rate());
    let text_provider = provider::from_config(&effective.provider, cli.offline);
    let dispatcher = Dispatcher::new(text_provider, events.sender());
    let mut app = App::new(config, dispatcher).with_overrides(&overrides);
    if let Some(mode) = cli.mode {
        app.start(mode);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
    }
    info!("typeneon exiting");

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
            AppEvent::Tick => {
                app.handle_tick(Instant::now());
            }
            AppEvent::Resize(_, _) => {}
            AppEvent::Provider(response) => {
                app.handle_provider_response(response);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only presses count; repeats would inflate input
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Lesson => handle_lesson_key(app, key),
        AppScreen::Zen => handle_zen_key(app, key),
        AppScreen::Arcade => handle_arcade_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_lesson(),
        KeyCode::Char('2') => app.start_zen(),
        KeyCode::Char('3') => app.start_arcade(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.activate_menu_item(),
        _ => {}
    }
}

fn handle_lesson_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Tab => app.start_lesson(),
        _ => app.type_key(KeyAction::from(&key), Instant::now()),
    }
}

fn handle_zen_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.end_zen(Instant::now()),
        _ => app.type_key(KeyAction::from(&key), Instant::now()),
    }
}

fn handle_arcade_key(app: &mut App, key: KeyEvent) {
    let over = app.game.as_ref().is_none_or(|g| g.is_over());
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('r') if over => app.start_arcade(),
        _ if over => {}
        _ => {
            app.arcade_key(KeyAction::from(&key));
        }
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') | KeyCode::Enter => app.next_lesson(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if let Err(err) = app.save_settings() {
                warn!(error = %err, "could not save config");
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
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
        AppScreen::Lesson | AppScreen::Zen => render_session(frame, app),
        AppScreen::Arcade => render_arcade(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header<'a>(app: &App, title: &'a str, info: String) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

fn footer<'a>(app: &App, hints: &'a str) -> Paragraph<'a> {
    Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(app.theme.colors.text_pending()),
    )))
}

fn provider_status(app: &App) -> String {
    if app.using_fallback {
        format!(" | {} (built-in text)", app.provider_name())
    } else {
        format!(" | {}", app.provider_name())
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let info = format!(
        " {} | {} | {}{}",
        app.config.difficulty,
        app.config.topic,
        app.config.keyboard_layout,
        provider_status(app),
    );
    frame.render_widget(header(app, " typeneon ", info), layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(Menu::new(app.menu_selected, &app.theme), menu_area);

    frame.render_widget(
        footer(app, " [1-3] Start  [c] Settings  [j/k] Move  [Enter] Select  [q] Quit "),
        layout[2],
    );
}

fn render_session(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let session = &app.session;
    let now = Instant::now();
    let stats = session.stats(now);
    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;
    let is_lesson = session.kind() == SessionKind::Lesson;

    let weak_keys = session
        .heatmap()
        .weak_keys(app.config.weak_key_min_attempts, app.config.weak_key_error_rate);

    let title = if is_lesson { " Lesson " } else { " Zen " };
    let info = if tier.show_sidebar() {
        format!(" {} | {}{}", app.config.topic, app.config.difficulty, provider_status(app))
    } else {
        format!(
            " WPM {} | Acc {}% | Errors {}",
            stats.wpm, stats.accuracy, stats.mistakes
        )
    };
    frame.render_widget(header(app, title, info), app_layout.header);

    let show_kbd = is_lesson && tier.show_keyboard(area.height);
    let mut constraints = vec![Constraint::Min(5)];
    if is_lesson {
        constraints.push(Constraint::Length(3));
    }
    if show_kbd {
        constraints.push(Constraint::Length(6));
    }
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    frame.render_widget(
        TypingArea::new(session, &app.theme).pending(app.text_pending),
        main[0],
    );

    if is_lesson {
        frame.render_widget(
            ProgressBar::new(
                "Progress",
                session.typed().len(),
                session.reference().len(),
                &app.theme,
            ),
            main[1],
        );
    }

    if show_kbd {
        let kbd = KeyboardDiagram::new(
            &app.keyboard_layout,
            session.heatmap(),
            session.expected_char(),
            &app.theme,
        )
        .compact(tier.compact_keyboard());
        frame.render_widget(kbd, main[2]);
    }

    if let Some(sidebar) = app_layout.sidebar {
        let progress = is_lesson.then(|| session.progress());
        frame.render_widget(
            StatsSidebar::new(stats, &weak_keys, &app.theme).progress(progress),
            sidebar,
        );
    }

    let hints = if is_lesson {
        " [Esc] Menu  [Tab] New lesson  [Backspace] Delete "
    } else {
        " [Esc] Finish  [Backspace] Delete "
    };
    frame.render_widget(footer(app, hints), app_layout.footer);
}

fn render_arcade(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(game) = app.game.as_ref() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        header(app, " Arcade ", game_field::hud_line(game)),
        layout[0],
    );
    frame.render_widget(GameField::new(game, &app.theme), layout[1]);
    frame.render_widget(
        footer(app, " Type the falling words  [Backspace] Delete  [Esc] Menu "),
        layout[2],
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref result) = app.last_result {
        let centered = ui::layout::centered_rect(60, 70, area);
        frame.render_widget(Dashboard::new(result, &app.theme, app.tip_pending), centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 70, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields = app.settings_fields();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        "  Up/Down to move, Left/Right to change",
        Style::default().fg(colors.text_pending()),
    )))
    .render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = if is_selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let value_style = Style::default().fg(if is_selected {
            colors.warning()
        } else {
            colors.text_pending()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("    < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    Paragraph::new(Line::from(Span::styled(
        "  [Esc] Save & back",
        Style::default().fg(colors.accent()),
    )))
    .render(layout[3], frame.buffer_mut());
}
