use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ─── Domain models ────────────────────────────────────────────────────────────

/// One assignment as written by the host app into `full_schedule_json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineRecord {
    pub subject:         String,
    pub title:           String,
    /// Epoch milliseconds. `None` when the source had no deadline (absent, null or 0).
    pub deadline_millis: Option<i64>,
}

/// Records in source array order. Never re-sorted, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineListSnapshot {
    records: Vec<DeadlineRecord>,
}

impl DeadlineListSnapshot {
    pub fn new(records: Vec<DeadlineRecord>) -> Self { Self { records } }

    pub fn len(&self)      -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool  { self.records.is_empty() }

    pub fn get(&self, index: usize) -> Option<&DeadlineRecord> { self.records.get(index) }

    pub fn records(&self) -> &[DeadlineRecord] { &self.records }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("schedule payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("schedule payload is not a JSON array")]
    NotArray,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("element is not a JSON object")]
    NotObject,

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Parsed(DeadlineRecord),
    Skipped(RecordError),
}

/// What a detailed parse saw: the snapshot plus every skipped element index.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub snapshot: DeadlineListSnapshot,
    pub skipped:  Vec<(usize, RecordError)>,
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    subject:  Option<Value>,
    #[serde(default)]
    title:    Option<Value>,
    #[serde(default)]
    deadline: Option<Value>,
}

/// Fail-soft parse used by the render path: bad payloads give an empty snapshot,
/// bad elements are dropped.
pub fn parse_snapshot(raw: &str) -> DeadlineListSnapshot {
    match parse_snapshot_detailed(raw) {
        Ok(report) => report.snapshot,
        Err(e) => {
            tracing::warn!("schedule snapshot unusable, showing empty list: {e}");
            DeadlineListSnapshot::default()
        }
    }
}

pub fn parse_snapshot_detailed(raw: &str) -> Result<ParseReport, SnapshotError> {
    let root: Value = serde_json::from_str(raw)?;
    let Value::Array(elements) = root else {
        return Err(SnapshotError::NotArray);
    };

    let mut records = Vec::with_capacity(elements.len());
    let mut skipped = Vec::new();

    for (idx, element) in elements.iter().enumerate() {
        match parse_record(element) {
            RecordOutcome::Parsed(r) => records.push(r),
            RecordOutcome::Skipped(e) => {
                tracing::warn!("skipping schedule element {idx}: {e}");
                skipped.push((idx, e));
            }
        }
    }

    tracing::debug!(parsed = records.len(), skipped = skipped.len(), "schedule parsed");
    Ok(ParseReport { snapshot: DeadlineListSnapshot::new(records), skipped })
}

pub fn parse_record(element: &Value) -> RecordOutcome {
    if !element.is_object() {
        return RecordOutcome::Skipped(RecordError::NotObject);
    }
    let raw = match RawRecord::deserialize(element) {
        Ok(r)  => r,
        Err(_) => return RecordOutcome::Skipped(RecordError::NotObject),
    };

    let subject = match text_field(raw.subject, "subject") {
        Ok(s)  => s,
        Err(e) => return RecordOutcome::Skipped(e),
    };
    let title = match text_field(raw.title, "title") {
        Ok(s)  => s,
        Err(e) => return RecordOutcome::Skipped(e),
    };
    let deadline_millis = match deadline_field(raw.deadline) {
        Ok(d)  => d,
        Err(e) => return RecordOutcome::Skipped(e),
    };

    RecordOutcome::Parsed(DeadlineRecord { subject, title, deadline_millis })
}

fn text_field(value: Option<Value>, name: &'static str) -> Result<String, RecordError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s))   => Ok(s),
        Some(_)                  => Err(RecordError::WrongType(name)),
    }
}

/// Accepts integers, integral floats and numeric strings; 0 means no deadline.
fn deadline_field(value: Option<Value>) -> Result<Option<i64>, RecordError> {
    let millis = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64().filter(|f| f.fract() == 0.0 && f.is_finite()).map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match millis {
        Some(0) => Ok(None),
        Some(m) => Ok(Some(m)),
        None    => Err(RecordError::WrongType("deadline")),
    }
}
