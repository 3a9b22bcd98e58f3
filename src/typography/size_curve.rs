//! Perceptual UI size -> concrete text metrics.
//!
//! The integer size shown in the editor is first mapped to a curve coordinate,
//! then interpolated piecewise-linearly between the five bucket anchors of the
//! selected family.

use crate::{
    foundation::math::{clamp_finite, finite_opt, interpolate2, round_half_up, round_to_tenth},
    typography::presets::{FamilyDefinition, PartialSizePreset, SizeBucket, SizePreset},
};

pub const SIZE_MIN: i64 = 10;
pub const SIZE_MAX: i64 = 40;
pub const SIZE_DEFAULT: i64 = 18;

/// Selectable UI sizes, `SIZE_MIN..=SIZE_MAX`.
pub fn size_options() -> Vec<i64> {
    (SIZE_MIN..=SIZE_MAX).collect()
}

/// Map a UI size onto the curve axis.
///
/// Identity up to 11, half slope between 11 and 16, then a -2.5 shift.
pub fn map_ui_size_to_curve_coord(size: f64) -> f64 {
    let n = clamp_finite(size, SIZE_MIN as f64, SIZE_MAX as f64);
    if n <= 11.0 {
        n
    } else if n <= 16.0 {
        11.0 + (n - 11.0) * 0.5
    } else {
        n - 2.5
    }
}

#[derive(Clone, Copy)]
enum Field {
    FontSize,
    Tracking,
    LineSpacing,
}

impl Field {
    fn of(self, p: &SizePreset) -> f64 {
        match self {
            Self::FontSize => p.font_size_pct,
            Self::Tracking => p.tracking_pct,
            Self::LineSpacing => p.line_spacing_pct,
        }
    }
}

/// Per-bucket metrics after applying variant > family > built-in precedence.
fn resolve_anchors(
    family: Option<&FamilyDefinition>,
    variant_key: Option<&str>,
) -> [SizePreset; 5] {
    let variant = match (family, variant_key) {
        (Some(f), Some(k)) => f.variant(k),
        _ => None,
    };
    SizeBucket::ALL.map(|bucket| {
        let builtin = bucket.builtin_preset();
        let fam = family.and_then(|f| f.sizes.get(&bucket));
        let var = variant.and_then(|v| v.sizes.get(&bucket));
        let pick = |get: fn(&PartialSizePreset) -> Option<f64>, fallback: f64| {
            finite_opt(var.and_then(get))
                .or_else(|| finite_opt(fam.and_then(get)))
                .unwrap_or(fallback)
        };
        SizePreset {
            font_size_pct: pick(|p: &PartialSizePreset| p.font_size_pct, builtin.font_size_pct),
            tracking_pct: pick(|p: &PartialSizePreset| p.tracking_pct, builtin.tracking_pct),
            line_spacing_pct: pick(
                |p: &PartialSizePreset| p.line_spacing_pct,
                builtin.line_spacing_pct,
            ),
        }
    })
}

fn interpolate_field(coord: f64, field: Field, anchors: &[SizePreset; 5]) -> f64 {
    let lo = map_ui_size_to_curve_coord(SIZE_MIN as f64);
    let hi = map_ui_size_to_curve_coord(SIZE_MAX as f64);
    let n = clamp_finite(coord, lo, hi);

    // Segment i spans anchors[i]..anchors[i + 1]; the ends extrapolate.
    let segment = SizeBucket::ALL[1..SizeBucket::ALL.len() - 1]
        .iter()
        .position(|b| n <= b.curve_coord())
        .unwrap_or(SizeBucket::ALL.len() - 2);
    let (b0, b1) = (SizeBucket::ALL[segment], SizeBucket::ALL[segment + 1]);
    interpolate2(
        n,
        b0.curve_coord(),
        field.of(&anchors[segment]),
        b1.curve_coord(),
        field.of(&anchors[segment + 1]),
    )
}

/// Resolve concrete metrics for a UI size within a family and optional variant.
///
/// Font size is rounded to 0.1 within `[1, 12]`; tracking and line spacing are
/// rounded to integers within `[-20, 50]` and `[-20, 200]`.
pub fn resolve_size_preset(
    ui_size: i64,
    family: Option<&FamilyDefinition>,
    variant_key: Option<&str>,
) -> SizePreset {
    let coord = map_ui_size_to_curve_coord(ui_size as f64);
    let anchors = resolve_anchors(family, variant_key);
    SizePreset {
        font_size_pct: round_to_tenth(interpolate_field(coord, Field::FontSize, &anchors))
            .clamp(1.0, 12.0),
        tracking_pct: round_half_up(
            interpolate_field(coord, Field::Tracking, &anchors).clamp(-20.0, 50.0),
        ),
        line_spacing_pct: round_half_up(
            interpolate_field(coord, Field::LineSpacing, &anchors).clamp(-20.0, 200.0),
        ),
    }
}

/// Normalize a stored size key to a numeric UI size in `[SIZE_MIN, SIZE_MAX]`.
///
/// Accepts legacy bucket names and numeric strings; anything else, including
/// empty input, yields [`SIZE_DEFAULT`].
pub fn normalize_size_key(raw: Option<&str>) -> i64 {
    let s = raw.unwrap_or_default().trim().to_ascii_lowercase();
    if s.is_empty() {
        return SIZE_DEFAULT;
    }
    if let Some(bucket) = SizeBucket::parse(&s) {
        return bucket.legacy_size();
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => (round_half_up(n) as i64).clamp(SIZE_MIN, SIZE_MAX),
        _ => {
            tracing::debug!(value = %s, fallback = SIZE_DEFAULT, "unparseable size key");
            SIZE_DEFAULT
        }
    }
}

/// [`normalize_size_key`] as the canonical decimal string.
pub fn normalize_size_key_string(raw: Option<&str>) -> String {
    normalize_size_key(raw).to_string()
}

/// Resolve metrics directly from a stored size key.
pub fn resolve_size_preset_for_key(
    size_key: Option<&str>,
    family: Option<&FamilyDefinition>,
    variant_key: Option<&str>,
) -> SizePreset {
    resolve_size_preset(normalize_size_key(size_key), family, variant_key)
}

#[cfg(test)]
#[path = "../../tests/unit/typography/size_curve.rs"]
mod tests;
