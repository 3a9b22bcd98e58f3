/// Clamp `v` into `[min, max]`, mapping non-finite input to `min`.
///
/// Resolvers run on every drag event, so `NaN` must never escape into output.
pub fn clamp_finite(v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        return min;
    }
    v.clamp(min, max)
}

/// `v` when finite, otherwise `fallback`.
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Finite value of an optional number, or `None`.
pub fn finite_opt(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Clamp to `[0, 1]`; `NaN` maps to 0.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

/// Round half toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
///
/// Stored presets were tuned against this rounding, so it is kept for parity
/// instead of `f64::round` (half away from zero).
pub fn round_half_up(v: f64) -> f64 {
    let floor = v.floor();
    if v - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Round to one decimal place with half-up semantics.
pub fn round_to_tenth(v: f64) -> f64 {
    round_half_up(v * 10.0) / 10.0
}

/// Linear interpolation through `(x0, y0)` and `(x1, y1)` evaluated at `x`.
///
/// Degenerate segments (non-finite or coincident `x0`/`x1`) return `y0`.
/// Values of `x` outside `[x0, x1]` extrapolate along the same line.
pub fn interpolate2(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if !x0.is_finite() || !x1.is_finite() || (x1 - x0).abs() < 1e-9 {
        return y0;
    }
    let t = (x - x0) / (x1 - x0);
    y0 + (y1 - y0) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
