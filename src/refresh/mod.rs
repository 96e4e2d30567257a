//! Entry point the host calls when shared widget data changed.

pub mod watcher;

use std::sync::{mpsc, Arc};

use crate::deadline::Clock;
use crate::model::{parse_snapshot_detailed, DeadlineListSnapshot};
use crate::store::{SharedDataStore, DEFAULT_FULL_SCHEDULE, KEY_FULL_SCHEDULE};
use crate::widget::timer::TimerEntry;
use crate::widget::DeadlineListAdapter;

pub type WidgetId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    List,
    Timer,
}

/// How the core asks the host to redraw a widget instance.
pub trait RedrawSink {
    fn notify_data_changed(&self, widget_id: WidgetId, surface: Surface);
}

#[derive(Debug, Default)]
pub struct NoopSink;

impl RedrawSink for NoopSink {
    fn notify_data_changed(&self, _: WidgetId, _: Surface) {}
}

/// Forwards redraw requests over a channel to whichever thread draws.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<(WidgetId, Surface)>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::Receiver<(WidgetId, Surface)>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl RedrawSink for ChannelSink {
    fn notify_data_changed(&self, widget_id: WidgetId, surface: Surface) {
        // Receiver gone means nothing is drawing any more.
        let _ = self.tx.send((widget_id, surface));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub generation: u64,
    pub items:      usize,
    pub skipped:    usize,
}

// ─── Controller ───────────────────────────────────────────────────────────────

pub struct RefreshController<S: SharedDataStore> {
    store:      S,
    clock:      Arc<dyn Clock + Send + Sync>,
    sink:       Box<dyn RedrawSink>,
    widget_ids: Vec<WidgetId>,
    list:       DeadlineListAdapter,
    timer:      TimerEntry,
}

impl<S: SharedDataStore> RefreshController<S> {
    pub fn new(
        store:      S,
        clock:      Arc<dyn Clock + Send + Sync>,
        sink:       Box<dyn RedrawSink>,
        widget_ids: Vec<WidgetId>,
    ) -> Self {
        let mut list = DeadlineListAdapter::new(Arc::clone(&clock));
        list.on_create();
        Self { store, clock, sink, widget_ids, list, timer: TimerEntry::placeholder() }
    }

    pub fn list(&self)  -> &DeadlineListAdapter { &self.list }
    pub fn timer(&self) -> &TimerEntry          { &self.timer }
    pub fn store(&self) -> &S                   { &self.store }

    /// Reads the store once, rebuilds both faces from that read and asks every
    /// widget to redraw. Safe to call any number of times.
    pub fn on_refresh(&mut self) -> RefreshSummary {
        let data = self.store.read_snapshot();
        let raw  = data.read_string(KEY_FULL_SCHEDULE, DEFAULT_FULL_SCHEDULE);
        let (snapshot, skipped) = match parse_snapshot_detailed(&raw) {
            Ok(report) => (report.snapshot, report.skipped.len()),
            Err(e) => {
                tracing::warn!("schedule snapshot unusable, showing empty list: {e}");
                (DeadlineListSnapshot::default(), 0)
            }
        };
        let items = snapshot.len();

        self.list.on_data_set_changed(snapshot);
        self.timer = TimerEntry::from_store(&data, self.clock.as_ref());

        for &id in &self.widget_ids {
            self.sink.notify_data_changed(id, Surface::List);
            self.sink.notify_data_changed(id, Surface::Timer);
        }

        let summary = RefreshSummary { generation: self.list.generation(), items, skipped };
        tracing::info!(
            generation = summary.generation, items, skipped,
            countdown = self.timer.face.is_countdown(),
            "widgets refreshed"
        );
        summary
    }

    pub fn shutdown(&mut self) {
        self.list.on_destroy();
        tracing::info!("refresh controller shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::FixedClock;
    use std::cell::Cell;
    use crate::store::{MemoryStore, KEY_DEADLINE, KEY_TITLE};
    use crate::widget::timer::TimerFace;
    use crate::widget::{ListState, ListWidgetAdapter};

    const NOW: i64 = 1_760_000_000_000;

    fn controller(store: MemoryStore) -> (RefreshController<MemoryStore>, mpsc::Receiver<(WidgetId, Surface)>) {
        let (sink, rx) = ChannelSink::channel();
        let c = RefreshController::new(store, Arc::new(FixedClock::new(NOW, 0)), Box::new(sink), vec![3, 9]);
        (c, rx)
    }

    #[test]
    fn empty_store_refreshes_to_empty_list() {
        let (mut c, _rx) = controller(MemoryStore::new());
        let s = c.on_refresh();
        assert_eq!(s, RefreshSummary { generation: 1, items: 0, skipped: 0 });
        assert_eq!(c.list().item_count(), 0);
        assert_eq!(c.timer().title, "No Assignments");
        assert_eq!(c.timer().face, TimerFace::Static("00:00:00".into()));
    }

    #[test]
    fn notifies_every_widget_for_both_surfaces() {
        let (mut c, rx) = controller(MemoryStore::new());
        c.on_refresh();
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![
            (3, Surface::List), (3, Surface::Timer),
            (9, Surface::List), (9, Surface::Timer),
        ]);
    }

    #[test]
    fn counts_skipped_elements() {
        let store = MemoryStore::new()
            .with(KEY_FULL_SCHEDULE, r#"[{"title":"a"}, 5, {"title":"b","deadline":"x"}]"#);
        let (mut c, _rx) = controller(store);
        let s = c.on_refresh();
        assert_eq!((s.items, s.skipped), (1, 2));
    }

    #[test]
    fn refresh_is_idempotent() {
        let store = MemoryStore::new()
            .with(KEY_FULL_SCHEDULE, format!(r#"[{{"subject":"CS 101","title":"HW","deadline":{}}}]"#, NOW + 7_200_000))
            .with(KEY_TITLE, "HW")
            .with(KEY_DEADLINE, (NOW + 7_200_000).to_string());
        let (mut c, _rx) = controller(store);
        c.on_refresh();
        let first = (c.list().render_all(), c.timer().clone());
        let s = c.on_refresh();
        assert_eq!(s.generation, 2);
        assert_eq!((c.list().render_all(), c.timer().clone()), first);
        assert_eq!(first.0[0].time_label, "2 Hours");
    }

    /// Hands out host write "A" on its first load and write "B" afterwards.
    struct RewritingStore {
        loads: Cell<usize>,
    }

    impl RewritingStore {
        fn load(&self) -> MemoryStore {
            let n     = self.loads.get();
            self.loads.set(n + 1);
            let title = if n == 0 { "A" } else { "B" };
            MemoryStore::new()
                .with(KEY_FULL_SCHEDULE, format!(r#"[{{"title":"{title}"}}]"#))
                .with(KEY_TITLE, title)
        }
    }

    impl SharedDataStore for RewritingStore {
        fn read_raw(&self, key: &str) -> Option<String> { self.load().read_raw(key) }
        fn read_snapshot(&self) -> MemoryStore           { self.load() }
    }

    #[test]
    fn one_refresh_reads_the_store_once() {
        let store = RewritingStore { loads: Cell::new(0) };
        let mut c = RefreshController::new(store, Arc::new(FixedClock::new(NOW, 0)), Box::new(NoopSink), vec![1]);
        c.on_refresh();
        assert_eq!(c.store().loads.get(), 1);
        assert_eq!(c.list().item_at(0).title, "A");
        assert_eq!(c.timer().title, "A");

        c.on_refresh();
        assert_eq!(c.store().loads.get(), 2);
        assert_eq!((c.list().item_at(0).title.as_str(), c.timer().title.as_str()), ("B", "B"));
    }

    #[test]
    fn shutdown_tears_down_list() {
        let (mut c, _rx) = controller(MemoryStore::new().with(KEY_FULL_SCHEDULE, "[{}]"));
        c.on_refresh();
        c.shutdown();
        assert_eq!(c.list().state(), ListState::TornDown);
        assert_eq!(c.list().item_count(), 0);
    }
}
