//! Application event loop
//!
//! Single-threaded and event-driven: every state transition happens
//! synchronously in response to a key, a collection-change event or a
//! completed network call. Fetches and mutations are the only suspension
//! points; both run as pending futures the loop polls, so the table stays
//! interactive while they are in flight.

use std::future::Future;
use std::io;
use std::io::Write;
use std::pin::Pin;

use crossterm::cursor;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal;
use futures::StreamExt;
use log::debug;
use log::info;
use log::warn;
use uuid::Uuid;

use praxis_lib::api::CollectionChanged;
use praxis_lib::api::MutationGateway;
use praxis_lib::api::MutationOutcome;
use praxis_lib::api::Operation;
use praxis_lib::error::Error;
use praxis_lib::model::Entity;
use praxis_lib::model::Record;
use praxis_lib::table::FilterValue;
use praxis_lib::table::TableEngine;
use praxis_lib::table::TableRow;
use praxis_lib::table::TableSource;
use praxis_lib::PraxisClient;

use crate::columns::table_config;
use crate::shell;

/// The collections reachable from the shell, in navigation order.
const NAV: [Entity; 4] = [
    Entity::Patients,
    Entity::Adults,
    Entity::Clinics,
    Entity::Symptoms,
];

type FetchFuture = Pin<Box<dyn Future<Output = (u64, Option<Result<Vec<Record>, Error>>)> + Send>>;
type MutationFuture = Pin<Box<dyn Future<Output = Result<MutationOutcome, Error>>>>;

enum InputMode {
    Browse,
    Search,
}

/// One resolved loop turn.
enum Tick {
    Term(Option<Event>),
    Changed(Option<CollectionChanged>),
    Fetched(u64, Option<Result<Vec<Record>, Error>>),
    Mutated(Result<MutationOutcome, Error>),
}

/// The dashboard application.
pub struct App {
    client: PraxisClient,
    gateway: MutationGateway,
    engine: TableEngine<Record>,
    source: TableSource,
    page_size: usize,
    nav_index: usize,
    cursor: usize,
    column_cursor: usize,
    input: InputMode,
    status: String,
    /// Set while a bulk action is unresolved; cleared selection-wise on
    /// resolution regardless of outcome.
    bulk_in_flight: bool,
    quit: bool,
}

impl App {
    /// Creates the app on the first navigation entry.
    pub fn new(client: PraxisClient, page_size: usize) -> Self {
        let gateway = MutationGateway::new(client.clone());
        let entity = NAV[0];
        Self {
            engine: build_engine(entity, page_size),
            source: TableSource::new(entity),
            client,
            gateway,
            page_size,
            nav_index: 0,
            cursor: 0,
            column_cursor: 0,
            input: InputMode::Browse,
            status: String::new(),
            bulk_in_flight: false,
            quit: false,
        }
    }

    /// Runs the event loop until the user quits.
    pub async fn run(mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.event_loop().await;

        execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        result
    }

    async fn event_loop(&mut self) -> io::Result<()> {
        let mut changes = self.gateway.subscribe();
        let mut term = EventStream::new();
        let mut fetch: Option<FetchFuture> = Some(self.start_fetch());
        let mut mutation: Option<MutationFuture> = None;

        while !self.quit {
            self.draw()?;

            let tick = tokio::select! {
                event = term.next() => Tick::Term(event.transpose().unwrap_or(None)),
                change = changes.recv() => Tick::Changed(change.ok()),
                (generation, result) = async { fetch.as_mut().expect("guarded").await },
                    if fetch.is_some() => Tick::Fetched(generation, result),
                result = async { mutation.as_mut().expect("guarded").await },
                    if mutation.is_some() => Tick::Mutated(result),
            };

            match tick {
                Tick::Term(None) => break,
                Tick::Term(Some(event)) => {
                    if let Event::Key(key) = event {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key, &mut fetch, &mut mutation);
                        }
                    }
                }
                Tick::Changed(Some(event)) => {
                    // Another writer touched a collection; refetch if it
                    // is the one on screen.
                    if self.source.invalidated_by(&event) {
                        debug!("collection changed, refetching {}", event.entity);
                        fetch = Some(self.start_fetch());
                    }
                }
                Tick::Changed(None) => {}
                Tick::Fetched(generation, result) => {
                    fetch = None;
                    self.apply_fetch(generation, result);
                }
                Tick::Mutated(result) => {
                    mutation = None;
                    self.apply_mutation(result);
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Starts a fetch for the current collection, cancelling what was in
    /// flight. The returned future resolves with its generation so a stale
    /// completion can be recognized and dropped.
    fn start_fetch(&mut self) -> FetchFuture {
        let ticket = self.source.start();
        let client = self.client.clone();
        let entity = self.source.entity();

        Box::pin(async move {
            let generation = ticket.generation();
            let result = ticket
                .run(async move {
                    client
                        .list(entity)
                        .execute()
                        .await
                        .map(|response| response.into_inner().into_records())
                })
                .await;
            (generation, result)
        })
    }

    fn apply_fetch(&mut self, generation: u64, result: Option<Result<Vec<Record>, Error>>) {
        if generation != self.source.current_generation() {
            debug!("dropping stale fetch result (generation {generation})");
            return;
        }
        match result {
            Some(Ok(records)) => {
                info!("loaded {} {} record(s)", records.len(), self.source.entity());
                self.engine.set_rows(records);
                self.clamp_cursor();
                self.status.clear();
            }
            Some(Err(error)) => {
                warn!("fetch failed: {error}");
                self.status = format!("Load failed: {error} (r to retry)");
            }
            None => {}
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    fn start_mutation(&mut self, operation: Operation) -> MutationFuture {
        info!("executing: {}", operation.describe());
        self.status = format!("{}…", operation.describe());
        let gateway = self.gateway.clone();
        Box::pin(async move { gateway.execute(operation).await })
    }

    fn apply_mutation(&mut self, result: Result<MutationOutcome, Error>) {
        // Bulk actions clear the selection on any outcome, so the same
        // ids cannot be targeted twice.
        if self.bulk_in_flight {
            self.engine.clear_selection();
            self.bulk_in_flight = false;
        }

        match result {
            Ok(outcome) => {
                self.status = match outcome {
                    MutationOutcome::Deleted { .. } => "Deleted.".to_string(),
                    MutationOutcome::BulkDeleted { ids, .. } => {
                        format!("Deleted {} record(s).", ids.len())
                    }
                    _ => "Saved.".to_string(),
                };
                // The gateway's event triggers the refetch.
            }
            Err(error) => {
                warn!("mutation failed: {error}");
                let hint = if error.is_retryable() { " (retryable)" } else { "" };
                self.status = format!("Action failed: {error}{hint}");
            }
        }
    }

    // =========================================================================
    // Key handling
    // =========================================================================

    fn handle_key(
        &mut self,
        key: KeyEvent,
        fetch: &mut Option<FetchFuture>,
        mutation: &mut Option<MutationFuture>,
    ) {
        if matches!(self.input, InputMode::Search) {
            self.handle_search_key(key);
            return;
        }

        let busy = mutation.is_some();

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }

            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Left => {
                let page = self.engine.page_index();
                self.engine.set_page(page.saturating_sub(1));
                self.clamp_cursor();
            }
            KeyCode::Right => {
                let page = self.engine.page_index();
                self.engine.set_page(page + 1);
                self.clamp_cursor();
            }
            KeyCode::Tab => {
                let count = self.engine.visible_columns().len();
                if count > 0 {
                    self.column_cursor = (self.column_cursor + 1) % count;
                }
            }

            KeyCode::Char('/') => {
                self.input = InputMode::Search;
                self.status = "Search: type to filter, Enter/Esc to leave".to_string();
            }
            KeyCode::Char('s') => {
                if let Some(key) = self.column_under_cursor() {
                    self.engine.sort_by(&key);
                }
            }
            KeyCode::Char('h') => {
                if let Some(key) = self.column_under_cursor() {
                    let visible = self.engine.is_column_visible(&key);
                    self.engine.set_column_visibility(&key, !visible);
                    self.column_cursor = 0;
                }
            }
            KeyCode::Char('f') => self.cycle_gender_filter(),

            KeyCode::Char(' ') => {
                if let Some(id) = self.row_under_cursor() {
                    self.engine.toggle_row_selection(id);
                }
            }
            KeyCode::Char('a') => self.engine.toggle_all_on_page(true),
            KeyCode::Char('A') => self.engine.toggle_all_on_page(false),
            KeyCode::Char('c') => self.engine.clear_selection(),

            KeyCode::Char('d') if !busy => {
                if let Some(id) = self.row_under_cursor() {
                    let entity = self.source.entity();
                    *mutation = Some(self.start_mutation(Operation::delete(entity, id)));
                }
            }
            KeyCode::Char('x') if !busy => {
                let ids = self.engine.selected_ids();
                if !ids.is_empty() {
                    let entity = self.source.entity();
                    self.bulk_in_flight = true;
                    *mutation = Some(self.start_mutation(Operation::bulk_delete(entity, ids)));
                }
            }

            KeyCode::Char('r') => *fetch = Some(self.start_fetch()),
            KeyCode::Char('[') => self.navigate(-1, fetch),
            KeyCode::Char(']') => self.navigate(1, fetch),

            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.input = InputMode::Browse;
                self.status.clear();
            }
            KeyCode::Backspace => {
                let mut text = self.engine.search_text().to_string();
                text.pop();
                self.engine.set_search_text(text);
                self.clamp_cursor();
            }
            KeyCode::Char(ch) => {
                let mut text = self.engine.search_text().to_string();
                text.push(ch);
                self.engine.set_search_text(text);
                self.clamp_cursor();
            }
            _ => {}
        }
    }

    /// Switches to another collection: a fresh engine and source, with
    /// whatever was in flight for the old one cancelled so its response
    /// cannot land in the new table.
    fn navigate(&mut self, step: isize, fetch: &mut Option<FetchFuture>) {
        let count = NAV.len() as isize;
        self.nav_index = ((self.nav_index as isize + step).rem_euclid(count)) as usize;
        let entity = NAV[self.nav_index];

        self.source.cancel_in_flight();
        self.source = TableSource::new(entity);
        self.engine = build_engine(entity, self.page_size);
        self.cursor = 0;
        self.column_cursor = 0;
        self.status.clear();
        *fetch = Some(self.start_fetch());
    }

    fn cycle_gender_filter(&mut self) {
        let current = match self.engine.filters().get("gender") {
            Some(FilterValue::Single(v)) => Some(v.clone()),
            _ => None,
        };
        let next = match current.as_deref() {
            None => FilterValue::Single("male".to_string()),
            Some("male") => FilterValue::Single("female".to_string()),
            _ => FilterValue::Single(String::new()),
        };
        self.engine.set_filter("gender", next);
        self.clamp_cursor();
    }

    // =========================================================================
    // Cursor helpers
    // =========================================================================

    fn move_cursor(&mut self, step: isize) {
        let len = self.engine.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + step;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_cursor(&mut self) {
        let len = self.engine.visible_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn row_under_cursor(&self) -> Option<Uuid> {
        self.engine
            .visible_rows()
            .get(self.cursor)
            .map(|row| row.row_id())
    }

    fn column_under_cursor(&self) -> Option<String> {
        self.engine
            .visible_columns()
            .get(self.column_cursor)
            .map(|column| column.key().to_string())
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    fn draw(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        let entity = self.source.entity();
        let title = format!(
            " praxis · {entity} · [/]=search s=sort f=filter space=select x=bulk-delete [=prev ]=next q=quit"
        );
        queue!(stdout, Print(&title), cursor::MoveToNextLine(2))?;

        let search_mode = matches!(self.input, InputMode::Search);
        let status = if search_mode {
            format!("/{}", self.engine.search_text())
        } else {
            self.status.clone()
        };

        for line in shell::render_lines(&self.engine, self.cursor, &status) {
            queue!(stdout, Print(&line), cursor::MoveToNextLine(1))?;
        }

        stdout.flush()
    }
}

fn build_engine(entity: Entity, page_size: usize) -> TableEngine<Record> {
    let config = table_config(entity);
    TableEngine::new(config.columns)
        .with_search_columns(config.search_columns)
        .with_filters(config.filters)
        .with_page_size(page_size)
}
