use crate::foundation::error::{ClipdeckError, ClipdeckResult};

/// Tolerance used when comparing timeline instants in seconds.
pub const TIME_EPSILON: f64 = 1e-6;

/// Reference canvas width used to express pixel insets (portrait 1080x1920).
pub const REFERENCE_WIDTH_PX: f64 = 1080.0;
/// Reference canvas height used to express pixel insets.
pub const REFERENCE_HEIGHT_PX: f64 = 1920.0;

/// Half-open span of timeline seconds `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    /// Inclusive start in seconds.
    pub start_seconds: f64,
    /// Exclusive end in seconds.
    pub end_seconds: f64,
}

impl TimeSpan {
    /// Build a span, rejecting non-finite bounds and `end < start`.
    pub fn new(start_seconds: f64, end_seconds: f64) -> ClipdeckResult<Self> {
        if !start_seconds.is_finite() || !end_seconds.is_finite() {
            return Err(ClipdeckError::validation("TimeSpan bounds must be finite"));
        }
        if end_seconds < start_seconds {
            return Err(ClipdeckError::validation("TimeSpan start must be <= end"));
        }
        Ok(Self {
            start_seconds,
            end_seconds,
        })
    }

    /// Build a span from possibly-garbage editor values.
    ///
    /// Non-finite start becomes 0; an end that is non-finite or not after the
    /// start collapses onto the start.
    pub fn lenient(start_seconds: f64, end_seconds: f64) -> Self {
        let start = if start_seconds.is_finite() {
            start_seconds
        } else {
            0.0
        };
        let end = if end_seconds.is_finite() && end_seconds > start {
            end_seconds
        } else {
            start
        };
        Self {
            start_seconds: start,
            end_seconds: end,
        }
    }

    /// Length in seconds, never negative.
    pub fn duration(self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }

    /// Exact half-open containment.
    pub fn contains(self, t: f64) -> bool {
        self.start_seconds <= t && t < self.end_seconds
    }

    /// Half-open containment of an instant with [`TIME_EPSILON`] slack on both edges.
    pub fn contains_instant(self, t: f64) -> bool {
        t + TIME_EPSILON >= self.start_seconds && t <= self.end_seconds - TIME_EPSILON
    }

    /// Strict interior overlap with another span, tolerant to [`TIME_EPSILON`] jitter.
    pub fn overlaps(self, other: TimeSpan) -> bool {
        self.start_seconds < other.end_seconds - TIME_EPSILON
            && self.end_seconds > other.start_seconds + TIME_EPSILON
    }

    /// Translate both bounds by `delta` seconds.
    pub fn shift(self, delta: f64) -> Self {
        Self {
            start_seconds: self.start_seconds + delta,
            end_seconds: self.end_seconds + delta,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
