//! Time math for deadline widgets.
//!
//! Two outputs for two surfaces:
//!   - list rows get a coarse `RemainingTime` label ("3 Days", "5 Hours", "Done");
//!   - the single-deadline timer face gets a monotonic countdown base that a
//!     live-ticking display counts down towards.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

pub const MILLIS_PER_HOUR: i64 = 3_600_000;
pub const MILLIS_PER_DAY:  i64 = 86_400_000;

/// Label shown when there is no deadline to count down to.
pub const STATIC_COUNTDOWN_LABEL: &str = "00:00:00";

// ─── Remaining time (list rows) ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingTime {
    Done,
    Days(i64),
    /// Less than a day left; may be `Hours(0)` in the last hour.
    Hours(i64),
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainingTime::Done     => write!(f, "Done"),
            RemainingTime::Days(n)  => write!(f, "{n} Days"),
            RemainingTime::Hours(n) => write!(f, "{n} Hours"),
        }
    }
}

pub fn compute_remaining(deadline_millis: i64, now_millis: i64) -> RemainingTime {
    let diff = deadline_millis.saturating_sub(now_millis);
    if diff < 0 {
        return RemainingTime::Done;
    }
    let days  = diff / MILLIS_PER_DAY;
    let hours = (diff / MILLIS_PER_HOUR) % 24;
    if days > 0 { RemainingTime::Days(days) } else { RemainingTime::Hours(hours) }
}

// ─── Countdown base (timer face) ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownSpec {
    /// Monotonic timestamp at which the live countdown reaches zero.
    Live { base_monotonic_millis: i64 },
    Static(String),
}

/// A non-positive deadline is the "no deadline" sentinel.
///
/// Past deadlines are passed through unclamped: the base lands before
/// `monotonic_now_millis` and the surface shows an expired countdown.
pub fn compute_countdown_base(
    deadline_millis:      i64,
    now_millis:           i64,
    monotonic_now_millis: i64,
) -> CountdownSpec {
    if deadline_millis <= 0 {
        return CountdownSpec::Static(STATIC_COUNTDOWN_LABEL.to_owned());
    }
    let remaining = deadline_millis.saturating_sub(now_millis);
    CountdownSpec::Live {
        base_monotonic_millis: monotonic_now_millis.saturating_add(remaining),
    }
}

/// `HH:MM:SS` for a ticking display. Hours are not wrapped at 24; a countdown
/// that already ran out stays frozen at zero.
pub fn format_countdown(remaining_millis: i64) -> String {
    if remaining_millis <= 0 {
        return STATIC_COUNTDOWN_LABEL.to_owned();
    }
    let secs = remaining_millis / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

// ─── Clocks ───────────────────────────────────────────────────────────────────

/// Wall clock plus a monotonic clock, both in milliseconds.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
    /// Milliseconds on a clock that never jumps backwards.
    fn monotonic_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

fn monotonic_origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn monotonic_millis(&self) -> i64 {
        i64::try_from(monotonic_origin().elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Settable clock for previews and tests. Both readings move together.
#[derive(Debug, Default)]
pub struct FixedClock {
    now:       AtomicI64,
    monotonic: AtomicI64,
}

impl FixedClock {
    pub fn new(now_millis: i64, monotonic_millis: i64) -> Self {
        Self { now: AtomicI64::new(now_millis), monotonic: AtomicI64::new(monotonic_millis) }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::Relaxed);
        self.monotonic.fetch_add(millis, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self)       -> i64 { self.now.load(Ordering::Relaxed) }
    fn monotonic_millis(&self) -> i64 { self.monotonic.load(Ordering::Relaxed) }
}
