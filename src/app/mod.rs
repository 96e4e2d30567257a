use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc;
use std::sync::Arc;

use deadline_widget::{
    deadline::{Clock, SystemClock},
    refresh::{
        watcher::{ChangeWatcher, WatchEvent},
        ChannelSink, RefreshController, RefreshSummary, Surface, WidgetId,
    },
    store::FileStore,
    theme::ThemeConfig,
    widget::ListWidgetAdapter,
};

use crate::ui::draw;

// ─── App state ────────────────────────────────────────────────────────────────

/// Terminal host for the two widget faces. Owns the refresh controller and
/// runs every refresh on the UI thread.
pub struct App {
    pub controller:  RefreshController<FileStore>,
    pub clock:       Arc<SystemClock>,
    pub theme:       ThemeConfig,
    pub watcher:     Option<ChangeWatcher>,
    redraw_rx:       mpsc::Receiver<(WidgetId, Surface)>,
    pub list_cursor: usize,
    pub status:      String,
    pub show_help:   bool,
    pub running:     bool,
}

impl App {
    pub fn new(store: FileStore, widget_ids: Vec<WidgetId>, theme: ThemeConfig) -> Self {
        let clock           = Arc::new(SystemClock);
        let (sink, rx)      = ChannelSink::channel();
        let controller      = RefreshController::new(store, clock.clone(), Box::new(sink), widget_ids);

        Self {
            controller, clock, theme,
            watcher: None,
            redraw_rx: rx,
            list_cursor: 0,
            status: String::new(),
            show_help: false,
            running: true,
        }
    }

    pub fn attach_watcher(&mut self, w: ChangeWatcher) { self.watcher = Some(w); }

    pub fn monotonic_now(&self) -> i64 { self.clock.monotonic_millis() }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term).await;

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen)?;
        term.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        self.refresh();

        // Countdown digits tick once a second; poll a bit faster than that.
        let tick = std::time::Duration::from_millis(200);
        while self.running {
            term.draw(|f| draw(f, self))?;

            let pending: Vec<WatchEvent> = if let Some(ref w) = self.watcher {
                if let Ok(mut rx) = w.event_rx.try_lock() {
                    let mut buf = Vec::new();
                    while let Ok(ev) = rx.try_recv() { buf.push(ev); }
                    buf
                } else { vec![] }
            } else { vec![] };
            for ev in pending { self.on_watch_event(ev); }

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    self.on_key(key).await;
                }
            }
        }

        if let Some(ref w) = self.watcher { w.shutdown().await; }
        self.controller.shutdown();
        Ok(())
    }

    fn on_watch_event(&mut self, ev: WatchEvent) {
        match ev {
            WatchEvent::DataChanged  => { self.refresh(); }
            WatchEvent::StoreMissing => {
                self.refresh();
                self.status = "✗ shared store missing, showing defaults".into();
            }
        }
    }

    fn refresh(&mut self) -> RefreshSummary {
        let summary = self.controller.on_refresh();

        let mut list_redrawn = false;
        while let Ok((_, surface)) = self.redraw_rx.try_recv() {
            list_redrawn |= surface == Surface::List;
        }
        if list_redrawn {
            let count = self.controller.list().item_count();
            self.list_cursor = self.list_cursor.min(count.saturating_sub(1));
        }

        self.status = if summary.skipped > 0 {
            format!("⟳ gen {}  {} items  {} skipped", summary.generation, summary.items, summary.skipped)
        } else {
            format!("✓ gen {}  {} items", summary.generation, summary.items)
        };
        summary
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    async fn on_key(&mut self, key: crossterm::event::KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => {
                self.refresh();
                if let Some(ref w) = self.watcher { w.check_now().await; }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.list_cursor + 1 < self.controller.list().item_count() { self.list_cursor += 1; }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
            }
            _ => {}
        }
    }
}
