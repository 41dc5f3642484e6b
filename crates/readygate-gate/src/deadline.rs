//! Absolute deadline shared by every condition of a gate.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::time::Instant;

/// Stand-in for budgets too large to represent as an instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A fixed point in time after which waiting stops.
///
/// Internally a monotonic instant: a wall-clock deadline is converted once,
/// when the `Deadline` is built, and clock adjustments afterwards do not move
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline `budget` from now. A budget past what the clock can
    /// represent is capped at roughly thirty years.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self(saturating_add(Instant::now(), budget))
    }

    /// A deadline at a wall-clock time. A time in the past is allowed and
    /// yields a deadline that has already passed.
    #[must_use]
    pub fn at<Tz: TimeZone>(when: DateTime<Tz>) -> Self {
        let now = Instant::now();
        let delta = when.with_timezone(&Utc) - Utc::now();
        match delta.to_std() {
            Ok(ahead) => Self(saturating_add(now, ahead)),
            Err(_) => {
                let behind = (-delta).to_std().unwrap_or_default();
                Self(now.checked_sub(behind).unwrap_or(now))
            }
        }
    }

    /// A deadline at a monotonic instant.
    #[must_use]
    pub const fn at_instant(instant: Instant) -> Self {
        Self(instant)
    }

    /// The underlying instant.
    #[must_use]
    pub const fn instant(&self) -> Instant {
        self.0
    }

    /// Time left, clamped at zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    /// Milliseconds left; zero or negative once the deadline has passed.
    #[must_use]
    pub fn remaining_millis(&self) -> i64 {
        let now = Instant::now();
        if self.0 >= now {
            i64::try_from((self.0 - now).as_millis()).unwrap_or(i64::MAX)
        } else {
            i64::try_from((now - self.0).as_millis()).map_or(i64::MIN, |late| -late)
        }
    }

    /// Whether no whole millisecond of budget is left.
    #[must_use]
    pub fn has_passed(&self) -> bool {
        self.remaining_millis() <= 0
    }
}

fn saturating_add(now: Instant, budget: Duration) -> Instant {
    now.checked_add(budget)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
