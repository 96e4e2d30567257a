//! Render contract between the deadline list and a list-style widget surface.

pub mod timer;

use std::sync::Arc;

use crate::deadline::{compute_remaining, Clock};
use crate::model::{DeadlineListSnapshot, DeadlineRecord};
use crate::subject::parse_subject;

// ─── Rendered fields ──────────────────────────────────────────────────────────

/// Display strings for one list row. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedItem {
    pub department: String,
    pub number:     String,
    pub title:      String,
    pub time_label: String,
}

/// Best effort: a missing record renders blank, a missing deadline leaves
/// `time_label` blank.
pub fn render_item(record: Option<&DeadlineRecord>, now_millis: i64) -> RenderedItem {
    let Some(record) = record else {
        return RenderedItem::default();
    };
    let parsed     = parse_subject(&record.subject);
    let time_label = record
        .deadline_millis
        .map(|d| compute_remaining(d, now_millis).to_string())
        .unwrap_or_default();

    RenderedItem {
        department: parsed.department,
        number:     parsed.number,
        title:      record.title.clone(),
        time_label,
    }
}

// ─── Adapter contract ─────────────────────────────────────────────────────────

/// What a platform list host asks of a widget's data source.
pub trait ListWidgetAdapter {
    fn item_count(&self) -> usize;
    fn item_at(&self, index: usize) -> RenderedItem;
    fn item_id(&self, index: usize) -> i64;
    fn view_type_count(&self) -> usize { 1 }
    fn has_stable_ids(&self)  -> bool  { true }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Uninitialized,
    Loaded,
    Reloading,
    TornDown,
}

// ─── Deadline list adapter ────────────────────────────────────────────────────

pub struct DeadlineListAdapter {
    state:      ListState,
    snapshot:   Arc<DeadlineListSnapshot>,
    generation: u64,
    clock:      Arc<dyn Clock + Send + Sync>,
}

impl DeadlineListAdapter {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state:      ListState::Uninitialized,
            snapshot:   Arc::new(DeadlineListSnapshot::default()),
            generation: 0,
            clock,
        }
    }

    pub fn state(&self)      -> ListState { self.state }
    pub fn generation(&self) -> u64       { self.generation }

    /// The snapshot currently on screen. Holders keep their generation alive
    /// even after the next publish.
    pub fn snapshot(&self) -> Arc<DeadlineListSnapshot> { Arc::clone(&self.snapshot) }

    pub fn on_create(&mut self) {
        if self.state == ListState::Uninitialized {
            self.state = ListState::Loaded;
            tracing::debug!("list adapter created");
        }
    }

    /// Replaces the whole snapshot in one swap. Ignored once torn down.
    pub fn on_data_set_changed(&mut self, snapshot: DeadlineListSnapshot) {
        if self.state == ListState::TornDown {
            tracing::debug!("list adapter torn down, dropping snapshot");
            return;
        }
        self.state      = ListState::Reloading;
        self.snapshot   = Arc::new(snapshot);
        self.generation += 1;
        self.state      = ListState::Loaded;
        tracing::debug!(generation = self.generation, items = self.snapshot.len(), "list snapshot published");
    }

    pub fn on_destroy(&mut self) {
        self.state    = ListState::TornDown;
        self.snapshot = Arc::new(DeadlineListSnapshot::default());
        tracing::debug!("list adapter destroyed");
    }

    /// Every row of the current generation, rendered against one `now`.
    pub fn render_all(&self) -> Vec<RenderedItem> {
        let now = self.clock.now_millis();
        self.snapshot.records().iter().map(|r| render_item(Some(r), now)).collect()
    }
}

impl ListWidgetAdapter for DeadlineListAdapter {
    fn item_count(&self) -> usize { self.snapshot.len() }

    fn item_at(&self, index: usize) -> RenderedItem {
        let record = self.snapshot.get(index);
        if record.is_none() {
            tracing::warn!(index, count = self.snapshot.len(), "item requested out of range");
        }
        render_item(record, self.clock.now_millis())
    }

    fn item_id(&self, index: usize) -> i64 {
        i64::try_from(index).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::FixedClock;
    use crate::model::parse_snapshot;

    const NOW: i64 = 1_760_000_000_000;

    fn adapter() -> DeadlineListAdapter {
        let mut a = DeadlineListAdapter::new(Arc::new(FixedClock::new(NOW, 0)));
        a.on_create();
        a
    }

    #[test]
    fn lifecycle() {
        let mut a = DeadlineListAdapter::new(Arc::new(FixedClock::new(NOW, 0)));
        assert_eq!(a.state(), ListState::Uninitialized);
        a.on_create();
        assert_eq!(a.state(), ListState::Loaded);
        a.on_data_set_changed(parse_snapshot("[{}]"));
        assert_eq!((a.state(), a.generation(), a.item_count()), (ListState::Loaded, 1, 1));
        a.on_data_set_changed(parse_snapshot("garbage"));
        assert_eq!((a.state(), a.generation(), a.item_count()), (ListState::Loaded, 2, 0));
        a.on_destroy();
        assert_eq!(a.state(), ListState::TornDown);
        a.on_data_set_changed(parse_snapshot("[{}]"));
        assert_eq!((a.state(), a.item_count()), (ListState::TornDown, 0));
    }

    #[test]
    fn renders_rows() {
        let mut a = adapter();
        a.on_data_set_changed(parse_snapshot(&format!(
            r#"[{{"subject":"CS 101","title":"Homework 3","deadline":{}}},
                {{"subject":"MATH-201","title":"Quiz","deadline":{}}}]"#,
            NOW + 90_000_000, NOW - 1_000,
        )));
        assert_eq!(a.item_at(0), RenderedItem {
            department: "CS".into(), number: "101".into(),
            title: "Homework 3".into(), time_label: "1 Days".into(),
        });
        assert_eq!(a.item_at(1).time_label, "Done");
        assert_eq!(a.item_at(1).department, "MATH");
        assert_eq!(a.render_all().len(), 2);
    }

    #[test]
    fn out_of_range_is_blank() {
        let a = adapter();
        assert_eq!(a.item_at(3), RenderedItem::default());
    }

    #[test]
    fn no_deadline_leaves_time_blank() {
        let mut a = adapter();
        a.on_data_set_changed(parse_snapshot(r#"[{"subject":"ART","title":"Sketch"}]"#));
        let item = a.item_at(0);
        assert_eq!((item.department.as_str(), item.title.as_str(), item.time_label.as_str()),
                   ("ART", "Sketch", ""));
    }

    #[test]
    fn ids_and_layout() {
        let a = adapter();
        assert_eq!(a.item_id(0), 0);
        assert_eq!(a.item_id(7), 7);
        assert_eq!(a.view_type_count(), 1);
        assert!(a.has_stable_ids());
    }

    #[test]
    fn old_generation_survives_publish() {
        let mut a = adapter();
        a.on_data_set_changed(parse_snapshot(r#"[{"title":"old"}]"#));
        let held = a.snapshot();
        a.on_data_set_changed(parse_snapshot(r#"[{"title":"new"},{"title":"newer"}]"#));
        assert_eq!(held.get(0).unwrap().title, "old");
        assert_eq!(a.item_count(), 2);
    }
}
