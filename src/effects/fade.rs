use crate::{composition::config::FadeMode, foundation::math::clamp01};

/// Length of every fade ramp, in seconds.
pub const FADE_SECONDS: f64 = 0.5;

/// Opacity multiplier in `[0, 1]` for a segment-relative time `t_rel_s` inside
/// the window `[window_start_rel_s, window_end_rel_s)`.
///
/// The in and out ramps multiply, so windows shorter than two ramps never
/// reach full opacity under [`FadeMode::InOut`].
pub fn fade_alpha(
    fade: FadeMode,
    t_rel_s: f64,
    window_start_rel_s: f64,
    window_end_rel_s: f64,
) -> f64 {
    let mut alpha = 1.0;
    if fade.fades_in() {
        alpha *= clamp01((t_rel_s - window_start_rel_s) / FADE_SECONDS);
    }
    if fade.fades_out() {
        alpha *= clamp01((window_end_rel_s - t_rel_s) / FADE_SECONDS);
    }
    alpha
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fade.rs"]
mod tests;
