//! Read side of the key/value store the host app writes widget data into.
//!
//! The core never writes here. Readers always get the latest value or the
//! documented default for a key.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

// ─── Keys and defaults ────────────────────────────────────────────────────────

pub const KEY_FULL_SCHEDULE: &str = "full_schedule_json";
pub const KEY_DEADLINE:      &str = "deadline";
pub const KEY_TITLE:         &str = "title";
pub const KEY_SUBJECT:       &str = "subject";

/// Every key a widget refresh consumes.
pub const WIDGET_KEYS: [&str; 4] = [KEY_FULL_SCHEDULE, KEY_DEADLINE, KEY_TITLE, KEY_SUBJECT];

pub const DEFAULT_FULL_SCHEDULE: &str = "[]";
pub const DEFAULT_TITLE:         &str = "No Assignments";
pub const DEFAULT_SUBJECT:       &str = "";

// ─── Store contract ───────────────────────────────────────────────────────────

pub trait SharedDataStore {
    /// Raw string form of `key`, or `None` when the host never wrote it.
    fn read_raw(&self, key: &str) -> Option<String>;

    /// All `WIDGET_KEYS` as seen by a single read, so one refresh never mixes
    /// two host writes. Stores whose lookups touch disk should override this
    /// with one load.
    fn read_snapshot(&self) -> MemoryStore {
        let mut snap = MemoryStore::new();
        for key in WIDGET_KEYS {
            if let Some(v) = self.read_raw(key) { snap.set(key, v); }
        }
        snap
    }

    fn read_string(&self, key: &str, default: &str) -> String {
        self.read_raw(key).unwrap_or_else(|| default.to_owned())
    }

    /// Integer milliseconds. Accepts float text ("1.7e12") since some hosts
    /// store timestamps as doubles; anything unreadable becomes `default`.
    fn read_millis(&self, key: &str, default: i64) -> i64 {
        let Some(raw) = self.read_raw(key) else { return default };
        let raw = raw.trim();
        raw.parse::<i64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(default)
    }
}

impl<S: SharedDataStore + ?Sized> SharedDataStore for &S {
    fn read_raw(&self, key: &str) -> Option<String> { (**self).read_raw(key) }
    fn read_snapshot(&self) -> MemoryStore           { (**self).read_snapshot() }
}

impl<S: SharedDataStore + ?Sized> SharedDataStore for Box<S> {
    fn read_raw(&self, key: &str) -> Option<String> { (**self).read_raw(key) }
    fn read_snapshot(&self) -> MemoryStore           { (**self).read_snapshot() }
}

// ─── In-memory store ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_owned(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

impl SharedDataStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Option<String> { self.values.get(key).cloned() }
    fn read_snapshot(&self) -> MemoryStore           { self.clone() }
}

// ─── File-backed store ────────────────────────────────────────────────────────

/// A JSON object on disk, `{ "key": value, ... }`, re-read on every lookup so
/// the latest host write is always visible.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    fn load(&self) -> Map<String, Value> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t)  => t,
            Err(e) => {
                tracing::warn!("shared store {} unreadable: {e}", self.path.display());
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(m)) => m,
            Ok(_) => {
                tracing::warn!("shared store {} is not a JSON object", self.path.display());
                Map::new()
            }
            Err(e) => {
                tracing::warn!("shared store {} malformed: {e}", self.path.display());
                Map::new()
            }
        }
    }
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null      => None,
        Value::String(s) => Some(s),
        other            => Some(other.to_string()),
    }
}

impl SharedDataStore for FileStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        value_text(self.load().remove(key)?)
    }

    fn read_snapshot(&self) -> MemoryStore {
        let mut snap = MemoryStore::new();
        for (key, value) in self.load() {
            if let Some(v) = value_text(value) { snap.set(&key, v); }
        }
        snap
    }
}
