use crate::{
    composition::config::{TimingRule, TimingRuleConfig},
    foundation::math::finite_opt,
};

/// Visibility sub-window relative to the start of the owning segment.
///
/// Always satisfies `0 <= start_rel_s <= end_rel_s <= duration`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingWindow {
    pub start_rel_s: f64,
    pub end_rel_s: f64,
}

impl TimingWindow {
    pub fn len(self) -> f64 {
        self.end_rel_s - self.start_rel_s
    }

    pub fn is_empty(self) -> bool {
        self.len() <= 0.0
    }

    /// Half-open containment of a segment-relative instant.
    pub fn contains(self, t_rel_s: f64) -> bool {
        self.start_rel_s <= t_rel_s && t_rel_s < self.end_rel_s
    }
}

/// Resolve the visible sub-window of an element inside a segment of
/// `duration_s` seconds.
///
/// Non-finite or negative durations count as 0. Non-finite `timing_seconds` is
/// treated as absent and negative values as 0.
pub fn resolve_window(rule: &TimingRuleConfig, duration_s: f64) -> TimingWindow {
    let total = if duration_s.is_finite() {
        duration_s.max(0.0)
    } else {
        0.0
    };
    let secs = finite_opt(rule.timing_seconds).map(|s| s.max(0.0));
    if rule.timing_seconds.is_some() && secs.is_none() {
        tracing::debug!(value = ?rule.timing_seconds, "non-finite timing seconds, treating as absent");
    }

    let (start, end) = match rule.timing_rule {
        TimingRule::Entire => (0.0, total),
        TimingRule::StartAfter => (secs.unwrap_or(0.0).min(total), total),
        TimingRule::FirstOnly => (0.0, secs.unwrap_or(0.0).min(total)),
        TimingRule::LastOnly => {
            let visible = secs.unwrap_or(total).min(total);
            ((total - visible).max(0.0), total)
        }
    };

    TimingWindow {
        start_rel_s: start,
        end_rel_s: end,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/window.rs"]
mod tests;
