//! Terminal front end.
//!
//! A thin shell over [`Session`](crate::session::Session): keystrokes edit
//! the drafts, Enter submits the form that owns the focused field, and all
//! network work runs on spawned tasks that report back over a channel so
//! state is only ever mutated on the UI loop.

mod render;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use pulse_shared::{ApiError, CreatedPost, CreatedUser, Post};

use crate::session::Session;
use crate::state::{LoadTicket, Status};

/// Input fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Address,
    Email,
    Username,
    Password,
    AuthorId,
    Content,
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Address,
        Field::Email,
        Field::Username,
        Field::Password,
        Field::AuthorId,
        Field::Content,
    ];

    fn next(self) -> Field {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Field {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Result of one network flow, reported back to the UI loop.
enum FlowOutcome {
    Connected(Result<(), ApiError>),
    FeedLoaded(LoadTicket, Result<Vec<Post>, ApiError>),
    Registered(Result<CreatedUser, ApiError>),
    Published(Result<CreatedPost, ApiError>),
}

pub struct App {
    session: Session,
    /// The address bar edits locally; it is committed on Enter.
    address_input: String,
    focus: Field,
    outcomes_tx: mpsc::UnboundedSender<FlowOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<FlowOutcome>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let session = Session::default();
        let address_input = session.config.base_address.clone();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            session,
            address_input,
            focus: Field::Address,
            outcomes_tx,
            outcomes_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

        let result = self.run_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let tick_rate = Duration::from_millis(50);

        // Initial page against the default address.
        self.spawn_feed_load();

        loop {
            while let Ok(outcome) = self.outcomes_rx.try_recv() {
                self.handle_outcome(outcome);
            }

            terminal.draw(|f| render::draw(f, self))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('r') => self.spawn_feed_load(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Enter => self.submit_focused(),
            KeyCode::Backspace => {
                self.focused_value_mut().pop();
            }
            KeyCode::Char(c) => self.focused_value_mut().push(c),
            _ => {}
        }
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Address => &mut self.address_input,
            Field::Email => &mut self.session.credentials.email,
            Field::Username => &mut self.session.credentials.username,
            Field::Password => &mut self.session.credentials.password,
            Field::AuthorId => &mut self.session.post_draft.author_id,
            Field::Content => &mut self.session.post_draft.content,
        }
    }

    /// Enter submits the form the focused field belongs to. Required-field
    /// presence is enforced here, the way the host forms would; the session
    /// flows forward whatever the drafts hold.
    fn submit_focused(&mut self) {
        match self.focus {
            Field::Address => self.spawn_connect(),
            Field::Email | Field::Username | Field::Password => {
                if self.session.credentials.is_complete() {
                    self.spawn_register();
                } else {
                    self.session.status =
                        Some(Status::error("Email, username and password are required"));
                }
            }
            Field::AuthorId | Field::Content => {
                if self.session.post_draft.is_complete() {
                    self.spawn_publish();
                } else {
                    self.session.status =
                        Some(Status::error("Author id and content are required"));
                }
            }
        }
    }

    fn spawn_connect(&mut self) {
        self.session.set_base_address(&self.address_input.clone());
        self.address_input = self.session.config.base_address.clone();

        let gateway = self.session.gateway().clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.health().await;
            let _ = tx.send(FlowOutcome::Connected(outcome));
        });
    }

    fn spawn_feed_load(&mut self) {
        let ticket = self.session.begin_feed_load();
        let gateway = self.session.gateway().clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.list_posts().await;
            let _ = tx.send(FlowOutcome::FeedLoaded(ticket, outcome));
        });
    }

    fn spawn_register(&mut self) {
        let request = self.session.credentials.to_request();
        let gateway = self.session.gateway().clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.register(&request).await;
            let _ = tx.send(FlowOutcome::Registered(outcome));
        });
    }

    fn spawn_publish(&mut self) {
        let payload = self.session.post_draft.payload();
        let gateway = self.session.gateway().clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.create_post(&payload).await;
            let _ = tx.send(FlowOutcome::Published(outcome));
        });
    }

    fn handle_outcome(&mut self, outcome: FlowOutcome) {
        match outcome {
            FlowOutcome::Connected(result) => {
                if self.session.apply_connect_outcome(result) {
                    self.spawn_feed_load();
                }
            }
            FlowOutcome::FeedLoaded(ticket, result) => {
                self.session.apply_feed_outcome(ticket, result);
            }
            FlowOutcome::Registered(result) => {
                self.session.apply_registration_outcome(result);
            }
            FlowOutcome::Published(result) => {
                if self.session.apply_publish_outcome(result) {
                    self.spawn_feed_load();
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
