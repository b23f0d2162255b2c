//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Submission through the lookup session
//! - Async lookups via background worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::HttpProvider;
use crate::application::{InferenceAggregator, LookupSession};
use crate::config::ProviderConfig;
use crate::ports::NameInferenceProvider;

use super::ui::{
    lookup::{render_lookup, LookupFormState},
    render_disclaimer,
};
use super::worker::LookupWorker;

/// Main application state
pub struct App<P = HttpProvider>
where
    P: NameInferenceProvider + 'static,
{
    /// Whether the app should quit
    should_quit: bool,

    /// Name input
    form: LookupFormState,

    /// Loading flag, last result and error
    session: LookupSession,

    /// Background lookups
    worker: LookupWorker<P>,
}

impl App<HttpProvider> {
    /// Create a new application instance backed by the HTTP provider.
    ///
    /// # Errors
    /// Returns error if the provider or the worker runtime cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let provider = Arc::new(HttpProvider::new(config)?);
        let worker = LookupWorker::new(InferenceAggregator::new(provider))?;
        Ok(Self::with_dependencies(worker))
    }
}

impl<P> App<P>
where
    P: NameInferenceProvider + 'static,
{
    /// Create application with an injected worker (Composition Root pattern).
    pub fn with_dependencies(worker: LookupWorker<P>) -> Self {
        Self {
            should_quit: false,
            form: LookupFormState::default(),
            session: LookupSession::new(),
            worker,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                render_lookup(f, chunks[0], &self.form, &self.session);
                render_disclaimer(f, chunks[1]);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply every completion the worker has delivered so far.
    fn poll_worker(&mut self) {
        while let Some(completion) = self.worker.try_recv() {
            self.session.settle(completion.ticket, completion.outcome);
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('u') => self.form.clear(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                self.form.clear();
                self.session.reset();
            }
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Char(c) => self.form.input_char(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if self.session.is_loading() {
            tracing::debug!("Submit ignored while a lookup is running");
            return;
        }

        match self.session.begin(&self.form.input) {
            Ok((ticket, query)) => {
                self.form.validation = None;
                self.worker.spawn(ticket, query);
            }
            Err(e) => {
                self.form.validation = Some(e.to_string());
            }
        }
    }
}
