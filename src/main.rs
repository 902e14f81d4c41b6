//! Keystroke Dynamics - typing-rhythm capture in the terminal
//!
//! Key timing comes from the global keyboard state; the text buffer comes
//! from terminal input.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode as CtKeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;

use keystroke_dynamics::{
    config::{self, Config},
    keyboard::{KeyInput, KeyboardListener},
    ui::{
        App, AppState, AppView, EventTable, HelpPanel, MetricsPanel, StatusBar, TabBar,
        TextPanel, ThemeColors,
    },
};

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging() {
    let dir = config::data_dir();
    let file = fs::create_dir_all(&dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("keystroke-dynamics.log"))
    });

    // without a log file, logging stays off
    if let Ok(file) = file {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("using default config: {}", e);
            Config::default()
        }
    };
    let mut app = App::from_config(config);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    let metrics = app.metrics();
    println!("\nKeystroke Dynamics session complete.");
    println!("Keystrokes recorded: {}", app.recorder.len());
    println!("Session duration: {}", app.elapsed_formatted());
    for row in metrics.summary() {
        println!("  {}: {}", row.label, row.value);
    }

    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let (input_tx, input_rx) = mpsc::channel::<KeyInput>();
    let mut listener = KeyboardListener::new(input_tx);
    let tick_rate = app.config.refresh_interval();
    let colors = ThemeColors::from_theme(app.config.ui.theme);

    loop {
        listener.poll();
        while let Ok(input) = input_rx.try_recv() {
            app.process_input(&input);
        }
        app.poll_submission();

        terminal.draw(|frame| draw(frame, app, colors))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.state == AppState::Quitting {
            break;
        }
    }

    if app.is_submitting() {
        if let Some(Err(e)) = app.finish_submission(app.config.export.timeout()) {
            log::warn!("submission in flight at exit failed: {}", e);
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: CtKeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            CtKeyCode::Char('s') => {
                app.submit();
            }
            CtKeyCode::Char('r') => app.reset(),
            CtKeyCode::Char('p') => app.toggle_pause(),
            CtKeyCode::Char('c') => app.quit(),
            CtKeyCode::Char('e') => {
                let filename = PathBuf::from(format!(
                    "keystroke_report_{}.json",
                    chrono::Utc::now().format("%Y%m%d_%H%M%S")
                ));
                if let Err(e) = app.export_report(&filename) {
                    app.set_status(format!("Export failed: {}", e));
                }
            }
            _ => {}
        }
        return;
    }

    match code {
        CtKeyCode::Esc => app.quit(),
        CtKeyCode::BackTab => app.prev_view(),
        CtKeyCode::Tab => app.next_view(),
        CtKeyCode::F(1) => app.view = AppView::Help,
        CtKeyCode::Backspace => app.backspace(),
        CtKeyCode::Enter => app.type_char('\n'),
        CtKeyCode::Char(ch) if !modifiers.contains(KeyModifiers::ALT) => app.type_char(ch),
        _ => {}
    }
}

fn draw(frame: &mut Frame, app: &App, colors: ThemeColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
    frame.render_widget(TabBar::new(&tab_names, app.view.index(), colors), chunks[0]);

    match app.view {
        AppView::Capture => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);
            frame.render_widget(TextPanel::new(&app.text, colors), columns[0]);
            let rows = app.metrics().summary();
            frame.render_widget(MetricsPanel::new(&rows, colors), columns[1]);
        }
        AppView::Events => {
            frame.render_widget(EventTable::new(app.recorder.events(), colors), chunks[1]);
        }
        AppView::Help => {
            frame.render_widget(HelpPanel::new(colors), chunks[1]);
        }
    }

    let state_str = match app.state {
        AppState::Running if app.is_submitting() => "SUBMITTING",
        AppState::Running => "RECORDING",
        AppState::Paused => "PAUSED",
        AppState::Quitting => "QUITTING",
    };
    let elapsed = app.elapsed_formatted();
    let status = StatusBar::new(state_str, app.view.name(), &elapsed, app.recorder.len(), colors)
        .message(app.get_status());
    frame.render_widget(status, chunks[2]);
}
