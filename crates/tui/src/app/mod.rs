mod ui;

use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamelist_core::{
    catalog::Catalog,
    config::AppConfig,
    search::{SearchEvent, SearchHandle, SearchScheduler, SearchWorkflow},
    GameRecord,
};
use ratatui::{backend::CrosstermBackend, widgets::TableState, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use self::ui::Theme;

const TICK_RATE: Duration = Duration::from_millis(250);
const PAGE_SIZE: usize = 10;

/// Form controls, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Rating,
    Platform,
    Localized,
    Multiplayer,
    Submit,
}

impl Control {
    const ORDER: [Control; 5] = [
        Control::Rating,
        Control::Platform,
        Control::Localized,
        Control::Multiplayer,
        Control::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|control| *control == self)
            .unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal view over the game catalog.
pub struct GameListApp {
    catalog: Catalog,
    scheduler: SearchScheduler,
    search_rx: Option<mpsc::Receiver<SearchEvent>>,
    workflow: SearchWorkflow,
    pending: Vec<SearchHandle>,
    focus: Control,
    table: TableState,
    status: String,
    ticks: usize,
    should_quit: bool,
    theme: Theme,
}

impl GameListApp {
    pub fn new(catalog: Catalog, config: &AppConfig) -> Self {
        let (scheduler, search_rx) = SearchScheduler::new(
            catalog.clone(),
            config.localized_language.as_str(),
            config.search_delay(),
        );
        Self {
            catalog,
            scheduler,
            search_rx: Some(search_rx),
            workflow: SearchWorkflow::new(config.overlap_policy),
            pending: Vec::new(),
            focus: Control::Rating,
            table: TableState::default(),
            status: "Ready".to_string(),
            ticks: 0,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.set_status(format!(
            "Loaded {} games from {}",
            self.catalog.len(),
            self.catalog.source()
        ));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut search_rx = self
            .search_rx
            .take()
            .context("search receiver already taken")?;

        let outcome: Result<()> = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err(err.into());
            }
            if self.should_quit {
                break Ok(());
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    match maybe_event {
                        Some(AppEvent::Input(event)) => {
                            if let Err(err) = self.handle_input(event) {
                                self.set_status(format!("Error: {err}"));
                            }
                        }
                        Some(AppEvent::Tick) => self.handle_tick(),
                        None => break Ok(()),
                    }
                }
                Some(event) = search_rx.recv() => self.handle_search_event(event),
            }
        };

        self.shutdown();
        restore_terminal(&mut terminal)?;
        outcome
    }

    fn shutdown(&mut self) {
        for handle in self.pending.drain(..) {
            if !handle.is_finished() {
                debug!(ticket = %handle.ticket(), "aborting pending search on exit");
                handle.abort();
            }
        }
    }

    fn handle_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    fn handle_search_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Completed { ticket, result } => {
                self.pending.retain(|handle| handle.ticket() != ticket);
                let matches = result.len();
                if self.workflow.complete(ticket, result) {
                    self.table
                        .select(if matches == 0 { None } else { Some(0) });
                    self.set_status(format!("Search {ticket}: {matches} games found"));
                } else {
                    debug!(%ticket, "superseded search result ignored");
                }
            }
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Key(_)
            | Event::Resize(_, _)
            | Event::Mouse(_)
            | Event::FocusGained
            | Event::FocusLost
            | Event::Paste(_) => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                self.should_quit = true;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Right => self.change_focused(true),
            KeyCode::Left => self.change_focused(false),
            KeyCode::Char(' ') => {
                if self.focus == Control::Submit {
                    self.submit();
                } else {
                    self.change_focused(true);
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('j') => self.scroll(1),
            KeyCode::Char('k') => self.scroll(-1),
            KeyCode::PageDown => self.scroll(PAGE_SIZE as isize),
            KeyCode::PageUp => self.scroll(-(PAGE_SIZE as isize)),
            KeyCode::Char('t') | KeyCode::Home => self.jump_to_top(),
            KeyCode::Char('b') | KeyCode::End => self.jump_to_bottom(),
            _ => {}
        }
        Ok(())
    }

    fn change_focused(&mut self, forward: bool) {
        let criteria = self.workflow.criteria_mut();
        match self.focus {
            Control::Rating => {
                criteria.rating = if forward {
                    criteria.rating.next()
                } else {
                    criteria.rating.previous()
                };
            }
            Control::Platform => {
                criteria.platform = if forward {
                    criteria.platform.next()
                } else {
                    criteria.platform.previous()
                };
            }
            Control::Localized => {
                criteria.require_localized_language = !criteria.require_localized_language;
            }
            Control::Multiplayer => {
                criteria.require_multiplayer = !criteria.require_multiplayer;
            }
            Control::Submit => return,
        }
        if self.workflow.is_stale() {
            self.set_status("Filters changed; press Enter to search".to_string());
        }
    }

    fn submit(&mut self) {
        self.pending.retain(|handle| !handle.is_finished());
        let criteria = self.workflow.criteria();
        let handle = self.scheduler.submit(criteria);
        let ticket = handle.ticket();
        self.workflow.begin_search(ticket);
        self.pending.push(handle);
        info!(%ticket, ?criteria, "search submitted");
        self.set_status(format!("Searching ({ticket})..."));
    }

    fn result_len(&self) -> usize {
        self.workflow.result().map_or(0, |result| result.len())
    }

    fn scroll(&mut self, delta: isize) {
        let len = self.result_len();
        if len == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table.select(Some(next as usize));
    }

    fn jump_to_top(&mut self) {
        if self.workflow.show_jump_controls() {
            self.table.select(Some(0));
        }
    }

    fn jump_to_bottom(&mut self) {
        if self.workflow.show_jump_controls() {
            self.table.select(Some(self.result_len() - 1));
        }
    }

    fn selected_game(&self) -> Option<&GameRecord> {
        let result = self.workflow.result()?;
        let position = self.table.selected()?;
        let index = *result.indices().get(position)?;
        self.catalog.get(index)
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
