//! Single "next deadline" face: a title, a subject and a live countdown.

use crate::deadline::{compute_countdown_base, Clock, CountdownSpec, MILLIS_PER_HOUR};
use crate::store::{
    SharedDataStore, DEFAULT_SUBJECT, DEFAULT_TITLE, KEY_DEADLINE, KEY_SUBJECT, KEY_TITLE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerFace {
    /// Surface ticks down towards this monotonic timestamp.
    Countdown { base_monotonic_millis: i64 },
    Static(String),
}

impl TimerFace {
    pub fn is_countdown(&self) -> bool { matches!(self, TimerFace::Countdown { .. }) }
}

impl From<CountdownSpec> for TimerFace {
    fn from(spec: CountdownSpec) -> Self {
        match spec {
            CountdownSpec::Live { base_monotonic_millis } => TimerFace::Countdown { base_monotonic_millis },
            CountdownSpec::Static(label)                   => TimerFace::Static(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEntry {
    pub title:   String,
    pub subject: String,
    pub face:    TimerFace,
}

impl TimerEntry {
    pub fn new(title: &str, subject: &str, deadline_millis: i64, clock: &dyn Clock) -> Self {
        let spec = compute_countdown_base(deadline_millis, clock.now_millis(), clock.monotonic_millis());
        Self { title: title.to_owned(), subject: subject.to_owned(), face: spec.into() }
    }

    /// Reads `title`, `subject` and `deadline` from the shared store.
    pub fn from_store(store: &dyn SharedDataStore, clock: &dyn Clock) -> Self {
        let title    = store.read_string(KEY_TITLE, DEFAULT_TITLE);
        let subject  = store.read_string(KEY_SUBJECT, DEFAULT_SUBJECT);
        let deadline = store.read_millis(KEY_DEADLINE, 0);
        Self::new(&title, &subject, deadline, clock)
    }

    /// Shown while the real entry loads.
    pub fn placeholder() -> Self {
        Self {
            title:   "Assignment".to_owned(),
            subject: String::new(),
            face:    TimerFace::Static(crate::deadline::STATIC_COUNTDOWN_LABEL.to_owned()),
        }
    }

    /// Sample entry for widget galleries: due an hour from now.
    pub fn preview(clock: &dyn Clock) -> Self {
        Self::new("Math Final", "", clock.now_millis() + MILLIS_PER_HOUR, clock)
    }

    /// Milliseconds left on a live countdown as of `monotonic_now_millis`.
    pub fn remaining_millis(&self, monotonic_now_millis: i64) -> Option<i64> {
        match self.face {
            TimerFace::Countdown { base_monotonic_millis } =>
                Some(base_monotonic_millis - monotonic_now_millis),
            TimerFace::Static(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::{format_countdown, FixedClock};
    use crate::store::MemoryStore;

    const NOW: i64 = 1_760_000_000_000;

    #[test]
    fn empty_store_is_static_no_assignments() {
        let clock = FixedClock::new(NOW, 1_000);
        let entry = TimerEntry::from_store(&MemoryStore::new(), &clock);
        assert_eq!(entry, TimerEntry {
            title: "No Assignments".into(),
            subject: "".into(),
            face: TimerFace::Static("00:00:00".into()),
        });
        assert_eq!(entry.remaining_millis(5_000), None);
    }

    #[test]
    fn store_deadline_drives_countdown() {
        let clock = FixedClock::new(NOW, 1_000);
        let store = MemoryStore::new()
            .with(KEY_TITLE, "Essay")
            .with(KEY_SUBJECT, "ENG 110")
            .with(KEY_DEADLINE, (NOW + 90_000).to_string());
        let entry = TimerEntry::from_store(&store, &clock);
        assert_eq!(entry.title, "Essay");
        assert_eq!(entry.subject, "ENG 110");
        assert_eq!(entry.face, TimerFace::Countdown { base_monotonic_millis: 91_000 });

        clock.advance(30_000);
        let left = entry.remaining_millis(clock.monotonic_millis()).unwrap();
        assert_eq!(left, 60_000);
        assert_eq!(format_countdown(left), "00:01:00");
    }

    #[test]
    fn past_deadline_still_counts_down_from_the_past() {
        let clock = FixedClock::new(NOW, 10_000);
        let entry = TimerEntry::new("Late", "", NOW - 2_000, &clock);
        assert!(entry.face.is_countdown());
        assert_eq!(entry.remaining_millis(10_000), Some(-2_000));
    }

    #[test]
    fn gallery_entries() {
        let clock = FixedClock::new(NOW, 0);
        assert_eq!(TimerEntry::placeholder().title, "Assignment");
        assert!(!TimerEntry::placeholder().face.is_countdown());
        let preview = TimerEntry::preview(&clock);
        assert_eq!(preview.title, "Math Final");
        assert_eq!(preview.remaining_millis(0), Some(MILLIS_PER_HOUR));
    }
}
