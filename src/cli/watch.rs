//! Watch command implementation - Interactive TUI viewer.

// Display math only
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::output::format_event;
use super::{BoardArgs, CliError, resolve_seed};
use colhex::game::{Color, Match, Phase};
use colhex::sim::{new_match, step_frame};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand_chacha::ChaCha8Rng;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color as TermColor, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::VecDeque;
use std::io::stdout;
use std::time::{Duration, Instant};

/// Event log lines kept on screen.
const LOG_LINES: usize = 12;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the TUI fails.
pub(crate) fn execute(board_args: &BoardArgs, seed: Option<u64>, tick_ms: u64) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let config = board_args.sim_config();
    let game = new_match(seed, &config)?;

    let app = App::new(
        game,
        seed,
        config.frames_per_tick,
        tick_ms.max(1),
        board_args.humans.clone(),
    );
    run_tui(app)
}

/// App state for the TUI.
struct App {
    game: Match<ChaCha8Rng>,
    seed: u64,
    frames_per_tick: u32,
    tick_ms: u64,
    frame_in_tick: u32,
    last_frame: Instant,
    humans: Vec<Color>,
    cursor: (u16, u16),
    log: VecDeque<String>,
}

impl App {
    fn new(
        game: Match<ChaCha8Rng>,
        seed: u64,
        frames_per_tick: u32,
        tick_ms: u64,
        humans: Vec<Color>,
    ) -> Self {
        Self {
            game,
            seed,
            frames_per_tick,
            tick_ms,
            frame_in_tick: 0,
            last_frame: Instant::now(),
            humans,
            cursor: (0, 0),
            log: VecDeque::with_capacity(LOG_LINES),
        }
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms) / self.frames_per_tick.max(1)
    }

    fn is_running(&self) -> bool {
        matches!(self.game.phase(), Phase::Countdown | Phase::Active)
            && !self.game.clock().is_paused()
    }

    /// Render every frame that is due, ticking the clock as frames add up.
    fn advance(&mut self) {
        let dt = 1.0 / f64::from(self.frames_per_tick);
        while self.is_running() && self.last_frame.elapsed() >= self.frame_duration() {
            self.last_frame += self.frame_duration();
            step_frame(&mut self.game, dt);
            self.frame_in_tick += 1;
            if self.frame_in_tick >= self.frames_per_tick {
                self.frame_in_tick = 0;
                self.game.on_clock_tick();
            }
        }
        self.collect_events();
    }

    fn collect_events(&mut self) {
        for event in self.game.drain_events() {
            if self.log.len() == LOG_LINES {
                self.log.pop_front();
            }
            self.log.push_back(format_event(&event));
        }
    }

    fn start(&mut self) {
        if self.game.on_ready() {
            self.frame_in_tick = 0;
            self.last_frame = Instant::now();
        }
    }

    fn toggle_pause(&mut self) {
        if self.game.clock().is_paused() {
            self.game.on_resume();
            self.last_frame = Instant::now();
        } else {
            self.game.on_pause();
        }
    }

    fn restart(&mut self) {
        if self.game.phase() != Phase::Finished {
            return;
        }
        self.log.clear();
        if let Err(e) = self.game.restart() {
            self.log.push_back(format!("restart failed: {e}"));
        }
    }

    fn move_cursor(&mut self, dcol: i32, drow: i32) {
        let grid = self.game.grid();
        let row = (i32::from(self.cursor.1) + drow).clamp(0, i32::from(grid.rows()) - 1) as u16;
        let row_len = if row % 2 == 1 {
            grid.columns().saturating_sub(1).max(1)
        } else {
            grid.columns()
        };
        let col = (i32::from(self.cursor.0) + dcol).clamp(0, i32::from(row_len) - 1) as u16;
        self.cursor = (col, row);
    }

    /// Touch the cell under the cursor on behalf of its owner.
    fn touch(&mut self) {
        let Some(cell) = self.game.grid().cell_at(self.cursor.0, self.cursor.1).copied() else {
            return;
        };
        if let Some(owner) = cell.owner
            && self.humans.contains(&owner)
        {
            self.game.on_touch(owner, cell.id);
        }
        self.game.on_gesture_end();
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        app.advance();

        // Handle input with timeout
        if event::poll(Duration::from_millis(10)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Char('s') => app.start(),
                KeyCode::Char('r') => app.restart(),
                KeyCode::Enter => app.touch(),
                KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1, 0),
                KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1, 0),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(0, -1),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(0, 1),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_board(f, main_chunks[0], app);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(main_chunks[1]);

    render_stats(f, side_chunks[0], app);
    render_log(f, side_chunks[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let clock = match game.phase() {
        Phase::Setup => "press s to start".to_string(),
        Phase::Countdown => format!("starting ({})", game.countdown()),
        Phase::Active => game
            .clock()
            .seconds_left()
            .map_or_else(String::new, |s| format!("{s}s left")),
        Phase::Ending | Phase::Finished => "match over".to_string(),
    };
    let status = if game.clock().is_paused() {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " Colhex | Seed {} | {:?} | {} | {} ",
        app.seed,
        game.phase(),
        clock,
        status
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(TermColor::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_board(f: &mut Frame, area: Rect, app: &App) {
    let grid = app.game.grid();
    let pulse_cells: Vec<_> = app.game.pulses().map(|(_, p)| p.origin_cell).collect();

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..grid.rows() {
        let mut spans = Vec::new();
        if row % 2 == 1 {
            spans.push(Span::raw(" "));
        }
        for col in 0..grid.columns() {
            let Some(cell) = grid.cell_at(col, row) else {
                continue;
            };
            let mut style = Style::default().fg(cell.owner.map_or(TermColor::DarkGray, term_color));
            if pulse_cells.contains(&cell.id) {
                style = style.add_modifier(Modifier::BOLD);
            }
            if app.cursor == (col, row) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let glyph = if cell.owner.is_some() { "⬢" } else { "⬡" };
            spans.push(Span::styled(glyph, style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Board "));
    f.render_widget(board, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for player in app.game.registry().iter() {
        let kind = if player.is_computer { "cpu" } else { "you" };
        let mut spans = vec![
            Span::styled(
                format!("{:<7}", player.color.name()),
                Style::default()
                    .fg(term_color(player.color))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {:>3}  {kind}", player.score())),
        ];
        if app.game.scoreboard().is_at_zero(player.color) {
            spans.push(Span::raw(" [OUT]"));
        }
        lines.push(Line::from(spans));
    }

    if !app.game.ranking().is_empty() {
        lines.push(Line::from(""));
        if let Some(first) = app.game.ranking().first() {
            lines.push(Line::from(format!("Winner: {}", first.color)));
        }
    }

    let stats = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });
    f.render_widget(stats, area);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app.log.iter().map(|l| Line::from(l.as_str())).collect();
    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Events "))
        .wrap(Wrap { trim: true });
    f.render_widget(log, area);
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Yellow => TermColor::Yellow,
        Color::Orange => TermColor::Rgb(255, 140, 0),
        Color::Red => TermColor::Red,
        Color::Purple => TermColor::Magenta,
        Color::Blue => TermColor::Blue,
        Color::Green => TermColor::Green,
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = match app.game.phase() {
        Phase::Setup => " [s] Start  [q] Quit ",
        Phase::Finished | Phase::Ending => " [r] Play again  [q] Quit ",
        Phase::Countdown | Phase::Active => {
            " [Space] Pause  [arrows] Move  [Enter] Touch  [q] Quit "
        }
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(TermColor::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
