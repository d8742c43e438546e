mod app;
mod config;
mod event;
mod exam;
mod sheet;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen, Confirm};
use event::{AppEvent, EventHandler};
use exam::{Section, TOTAL_QUESTIONS};
use sheet::choice::Choice;
use sheet::scoring::{self, answered_in};
use store::json_store::JsonStore;
use ui::components::confirm_dialog::ConfirmDialog;
use ui::components::progress_bar::ProgressBar;
use ui::components::score_summary::ScoreSummary;
use ui::components::sheet_grid::SheetGrid;
use ui::layout::{AppLayout, centered_rect};

#[derive(Parser)]
#[command(name = "marksheet", version, about = "Terminal TOEIC answer sheet with scoring")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Directory for saved answers (defaults to the platform data dir)")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Questions per grid column")]
    columns: Option<u16>,
}

/// Route warnings to a file under the data dir. The terminal itself is owned
/// by the TUI, so stderr is not a usable sink while the app runs.
fn init_logging(data_dir: &Path) {
    let _ = fs::create_dir_all(data_dir);
    let Ok(log_file) = fs::File::options()
        .create(true)
        .append(true)
        .open(data_dir.join("marksheet.log"))
    else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(JsonStore::default_base_dir);
    init_logging(&data_dir);

    let mut app = App::new(cli.data_dir, cli.theme);

    if let Some(columns) = cli.columns {
        app.config.questions_per_column = columns;
        app.config.validate();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

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
            // Ticks just trigger a redraw so the save flash fades on time.
            AppEvent::Tick => {}
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

    // A pending confirmation captures all input until answered.
    if app.pending_confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.run_confirmed(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
            _ => {}
        }
        return;
    }

    match app.screen {
        AppScreen::Sheet => handle_sheet_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
    }
}

fn handle_sheet_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(ch @ ('a' | 'b' | 'c' | 'd' | 'A' | 'B' | 'C' | 'D')) => {
            if let Some(choice) = Choice::from_char(ch) {
                app.select(choice);
            }
        }
        KeyCode::Char('1') => app.select(Choice::A),
        KeyCode::Char('2') => app.select(Choice::B),
        KeyCode::Char('3') => app.select(Choice::C),
        KeyCode::Char('4') => app.select(Choice::D),
        KeyCode::Up | KeyCode::Char('k') => app.move_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.move_next(),
        KeyCode::Left | KeyCode::Char('h') => app.move_column_back(),
        KeyCode::Right | KeyCode::Char('l') => app.move_column_forward(),
        KeyCode::Char('g') => app.jump_first(),
        KeyCode::Char('G') => app.jump_last(),
        KeyCode::Tab => app.next_part(),
        KeyCode::BackTab => app.prev_part(),
        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('s') => app.go_to_summary(),
        KeyCode::Char('x') => app.request_confirm(Confirm::ClearSection),
        KeyCode::Char('X') => app.request_confirm(Confirm::ClearAll),
        KeyCode::Char('R') => app.request_confirm(Confirm::Reset),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('s') => app.go_to_sheet(),
        _ => {}
    }
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    Block::default()
        .style(Style::default().bg(colors.bg()))
        .render(area, frame.buffer_mut());

    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header);

    if let Some(progress_area) = layout.progress {
        let answered = answered_in(app.sheet.active(), 1, TOTAL_QUESTIONS);
        let label = if app.sheet.key_mode {
            "Answer key"
        } else {
            "Answered"
        };
        ProgressBar::new(label, answered, TOTAL_QUESTIONS as usize, app.theme)
            .render(progress_area, frame.buffer_mut());
    }

    match app.screen {
        AppScreen::Sheet => render_sheet(frame, app, layout.main, layout.tier.both_sections()),
        AppScreen::Summary => {
            let popup = centered_rect(70, 80, layout.main);
            ScoreSummary::new(&app.sheet, app.theme).render(popup, frame.buffer_mut());
        }
    }

    render_footer(frame, app, layout.footer);

    if let Some(confirm) = app.pending_confirm {
        let message = confirm.message(app.cursor_section(), app.sheet.key_mode);
        let popup = centered_rect(50, 20, area);
        ConfirmDialog::new(&message, app.theme).render(popup, frame.buffer_mut());
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    let mode_text = if app.sheet.key_mode {
        Span::styled(
            " MARKING ANSWER KEY ",
            Style::default()
                .fg(colors.bg())
                .bg(colors.key_selected())
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" ANSWERING ", Style::default().fg(colors.text_dim()))
    };

    let mut top = vec![
        Span::styled(
            " marksheet ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        mode_text,
    ];
    if app.save_flash() {
        top.push(Span::raw("  "));
        top.push(Span::styled(
            "\u{25cf} saved",
            Style::default().fg(colors.bubble_correct()),
        ));
    }
    if app.store.is_none() {
        top.push(Span::raw("  "));
        top.push(Span::styled(
            "\u{26a0} not persisting",
            Style::default().fg(colors.warning()),
        ));
    }

    let stats = if !app.sheet.key_mode && !app.sheet.key.is_empty() {
        let tally = scoring::tally_all(&app.sheet.answers, &app.sheet.key);
        format!(
            " Score {}/{} ({:.1}%)   \u{2713} {}  \u{2717} {}  \u{2014} {}",
            tally.correct,
            TOTAL_QUESTIONS,
            scoring::percent(tally.correct, TOTAL_QUESTIONS as usize),
            tally.correct,
            tally.incorrect,
            tally.unanswered,
        )
    } else {
        let active = app.sheet.active();
        let listening = answered_in(active, 1, 100);
        let reading = answered_in(active, 101, 200);
        format!(
            " Listening {listening}/100   Reading {reading}/100   Total {}/{TOTAL_QUESTIONS}",
            listening + reading,
        )
    };

    let lines = vec![
        Line::from(top),
        Line::from(Span::styled(stats, Style::default().fg(colors.fg()))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_sheet(frame: &mut Frame, app: &App, area: Rect, both_sections: bool) {
    let per_column = app.config.questions_per_column;

    if both_sections {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        SheetGrid::new(Section::Listening, &app.sheet, app.cursor, per_column, app.theme)
            .render(halves[0], frame.buffer_mut());
        SheetGrid::new(Section::Reading, &app.sheet, app.cursor, per_column, app.theme)
            .render(halves[1], frame.buffer_mut());
    } else {
        SheetGrid::new(app.cursor_section(), &app.sheet, app.cursor, per_column, app.theme)
            .render(area, frame.buffer_mut());
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    let hints = match app.screen {
        AppScreen::Sheet => {
            " [a-d/1-4] mark  [hjkl/\u{2190}\u{2193}\u{2191}\u{2192}] move  [Tab] part  [m] key mode  [s] score  [x/X] clear  [R] reset  [q] quit"
        }
        AppScreen::Summary => " [Esc/s] back to sheet  [q] back",
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(colors.text_dim()),
        ))),
        area,
    );
}
