use crate::{
    composition::{
        config::{TimingRule, TimingRuleConfig},
        model::LowerThird,
    },
    foundation::math::finite_opt,
};

/// Jitter tolerated from drag operations when comparing durations.
pub const PROMOTION_TOLERANCE_S: f64 = 0.05;

fn duration(lt: &LowerThird) -> f64 {
    let d = lt.end_seconds - lt.start_seconds;
    if d.is_finite() { d.max(0.0) } else { 0.0 }
}

/// Relax a `first_only` rule to `entire` when a lower third grows.
///
/// If `previous` was visible for its whole (shorter) duration under
/// `first_only`, and `next` is longer by more than [`PROMOTION_TOLERANCE_S`],
/// the result is `next` with its rule reset to `entire` and no parameter.
/// Otherwise `next` is returned unchanged.
pub fn promote_timing_on_expand(previous: &LowerThird, next: &LowerThird) -> LowerThird {
    let prev_dur = duration(previous);
    let next_dur = duration(next);
    if next_dur <= prev_dur + PROMOTION_TOLERANCE_S {
        return next.clone();
    }

    let prev_timing = previous.config_snapshot.timing;
    if prev_timing.timing_rule != TimingRule::FirstOnly {
        return next.clone();
    }
    let Some(secs) = finite_opt(prev_timing.timing_seconds) else {
        return next.clone();
    };
    let visible_prev = secs.min(prev_dur).max(0.0);
    if (visible_prev - prev_dur).abs() > PROMOTION_TOLERANCE_S {
        return next.clone();
    }

    tracing::debug!(
        id = %next.id,
        prev_duration = prev_dur,
        next_duration = next_dur,
        "promoting first_only timing to entire"
    );
    let mut promoted = next.clone();
    promoted.config_snapshot.timing = TimingRuleConfig::entire();
    promoted
}

#[cfg(test)]
#[path = "../../tests/unit/eval/promotion.rs"]
mod tests;
