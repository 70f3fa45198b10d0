//! Main TUI application state and logic

use crate::driver::engine::Driver;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Locals,
    Heap,
    Terminal,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: program -> terminal -> locals -> heap)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Locals,
            FocusedPane::Locals => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Program,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Heap,
            FocusedPane::Terminal => FocusedPane::Program,
            FocusedPane::Locals => FocusedPane::Terminal,
            FocusedPane::Heap => FocusedPane::Locals,
        }
    }
}

/// The main application state
pub struct App {
    /// The driver whose history is being replayed
    pub driver: Driver,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub program_scroll: usize,
    pub heap_scroll: usize,
    pub terminal_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    /// Create a new app for a driver that has already run
    pub fn new(driver: Driver) -> Self {
        let status_message = if driver.is_finished() {
            String::from("Ready!")
        } else {
            String::from("Run aborted, replaying partial history")
        };
        App {
            driver,
            focused_pane: FocusedPane::Program,
            program_scroll: 0,
            heap_scroll: 0,
            terminal_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.driver.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Terminal (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Locals (top) | Heap (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(columns[1]);

        super::panes::program::render_program_pane(
            frame,
            left_rows[0],
            self.driver.plan(),
            self.driver.current_step(),
            self.focused_pane == FocusedPane::Program,
            &mut self.program_scroll,
        );

        super::panes::terminal::render_terminal_pane(
            frame,
            left_rows[1],
            self.driver.terminal(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        super::panes::locals::render_locals_pane(
            frame,
            right_rows[0],
            self.driver.locals(),
            self.driver.heap(),
            self.focused_pane == FocusedPane::Locals,
        );

        super::panes::heap::render_heap_pane(
            frame,
            right_rows[1],
            self.driver.heap(),
            self.driver.locals(),
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        super::panes::status::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.driver.history_position(),
            self.driver.total_snapshots(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.driver.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Program => {
                    self.program_scroll = self.program_scroll.saturating_sub(1);
                }
                FocusedPane::Heap => {
                    self.heap_scroll = self.heap_scroll.saturating_sub(1);
                }
                FocusedPane::Terminal => {
                    self.terminal_scroll = self.terminal_scroll.saturating_sub(1);
                }
                FocusedPane::Locals => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Program => {
                    self.program_scroll = self.program_scroll.saturating_add(1);
                }
                FocusedPane::Heap => {
                    self.heap_scroll = self.heap_scroll.saturating_add(1);
                }
                FocusedPane::Terminal => {
                    self.terminal_scroll = self.terminal_scroll.saturating_add(1);
                }
                FocusedPane::Locals => {}
            },
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.last_play_time = Instant::now();
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.status_message = match self.driver.jump_to_end() {
                    Ok(()) => "Jumped to end".to_string(),
                    Err(e) => format!("Error: {}", e),
                };
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.status_message = match self.driver.rewind_to_start() {
                    Ok(()) => "Jumped to start".to_string(),
                    Err(e) => format!("Error: {}", e),
                };
                self.terminal_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.driver.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                // Auto-scroll terminal to bottom
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.driver.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}
