//! End-to-end: shared store → refresh → rendered widget fields.

use deadline_widget::deadline::{Clock, FixedClock};
use deadline_widget::model::parse_snapshot;
use deadline_widget::refresh::{NoopSink, RefreshController};
use deadline_widget::store::{FileStore, MemoryStore, KEY_DEADLINE, KEY_FULL_SCHEDULE, KEY_SUBJECT, KEY_TITLE};
use deadline_widget::widget::timer::TimerFace;
use deadline_widget::widget::{DeadlineListAdapter, ListWidgetAdapter, RenderedItem};
use std::sync::Arc;

const NOW: i64 = 1_760_000_000_000;

fn clock() -> Arc<FixedClock> { Arc::new(FixedClock::new(NOW, 50_000)) }

fn loaded(raw: &str) -> DeadlineListAdapter {
    let mut a = DeadlineListAdapter::new(clock());
    a.on_create();
    a.on_data_set_changed(parse_snapshot(raw));
    a
}

#[test]
fn homework_row_renders_split_subject_and_days() {
    let raw = format!(r#"[{{"subject":"CS 101","title":"Homework 3","deadline":{}}}]"#, NOW + 90_000_000);
    let a   = loaded(&raw);
    assert_eq!(a.item_count(), 1);
    assert_eq!(a.item_at(0), RenderedItem {
        department: "CS".into(),
        number:     "101".into(),
        title:      "Homework 3".into(),
        time_label: "1 Days".into(),
    });
}

#[test]
fn past_quiz_is_done() {
    let raw = format!(r#"[{{"subject":"MATH-201","title":"Quiz","deadline":{}}}]"#, NOW - 1000);
    let a   = loaded(&raw);
    let row = a.item_at(0);
    assert_eq!(row.time_label, "Done");
    assert_eq!((row.department.as_str(), row.number.as_str()), ("MATH", "201"));
}

#[test]
fn malformed_payloads_render_nothing() {
    for raw in ["{not valid}", ""] {
        let a = loaded(raw);
        assert_eq!(a.item_count(), 0);
        assert_eq!(a.item_at(0), RenderedItem::default());
    }
}

#[test]
fn same_payload_renders_identically_twice() {
    let raw = format!(
        r#"[{{"subject":"CS 101","title":"A","deadline":{}}},
            {{"subject":"BIO","title":"B"}},
            {{"subject":"EE-150-02","title":"C","deadline":{}}}]"#,
        NOW + 7_200_000, NOW + 5 * 86_400_000,
    );
    let (a, b) = (loaded(&raw), loaded(&raw));
    assert_eq!(a.item_count(), b.item_count());
    for i in 0..a.item_count() {
        assert_eq!(a.item_at(i), b.item_at(i));
        assert_eq!(a.item_id(i), i as i64);
    }
    assert_eq!(a.item_at(0).time_label, "2 Hours");
    assert_eq!(a.item_at(1).time_label, "");
    assert_eq!(a.item_at(2).number, "150");
    assert_eq!(a.item_at(2).time_label, "5 Days");
}

#[test]
fn zero_deadline_falls_back_to_static_label() {
    let store = MemoryStore::new().with(KEY_DEADLINE, "0").with(KEY_TITLE, "Nothing due");
    let mut c = RefreshController::new(store, clock(), Box::new(NoopSink), vec![1]);
    c.on_refresh();
    assert_eq!(c.timer().title, "Nothing due");
    assert_eq!(c.timer().face, TimerFace::Static("00:00:00".into()));
}

#[test]
fn file_store_round_through_controller() {
    let dir  = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget_data.json");
    let schedule = format!(
        r#"[{{"subject":"CS 101","title":"Homework 3","deadline":{}}}, "junk"]"#,
        NOW + 90_000_000,
    );
    let payload = serde_json::json!({
        KEY_FULL_SCHEDULE: schedule,
        KEY_TITLE:         "Homework 3",
        KEY_SUBJECT:       "CS 101",
        KEY_DEADLINE:      NOW + 60_000,
    });
    std::fs::write(&path, payload.to_string()).unwrap();

    let clk   = clock();
    let mut c = RefreshController::new(FileStore::new(&path), clk.clone(), Box::new(NoopSink), vec![1, 2]);
    let s     = c.on_refresh();
    assert_eq!((s.items, s.skipped, s.generation), (1, 1, 1));
    assert_eq!(c.list().item_at(0).time_label, "1 Days");
    assert_eq!(c.timer().subject, "CS 101");
    assert_eq!(c.timer().face, TimerFace::Countdown { base_monotonic_millis: 110_000 });
    assert_eq!(c.timer().remaining_millis(clk.monotonic_millis()), Some(60_000));

    // Host rewrites the store: the next refresh replaces the list wholesale.
    std::fs::write(&path, r#"{"full_schedule_json":"[]"}"#).unwrap();
    let s = c.on_refresh();
    assert_eq!((s.items, s.generation), (0, 2));
    assert_eq!(c.timer().title, "No Assignments");
}
