use crate::{
    composition::config::{AnchorColumn, AnchorRow, PlacementConfig},
    foundation::core::{REFERENCE_HEIGHT_PX, REFERENCE_WIDTH_PX},
    foundation::math::{clamp_finite, finite_opt},
};

const MAX_INSET_PX: f64 = 9999.0;

/// Horizontal placement: an offset from exactly one edge, or centered.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalPlacement {
    /// Offset from the left edge, percent of canvas width.
    Left(f64),
    /// Offset from the right edge, percent of canvas width.
    Right(f64),
    /// Left edge at 50%, translated back by half the element width.
    Center,
}

/// Vertical placement: an offset from exactly one edge, or centered.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPlacement {
    /// Offset from the top edge, percent of canvas height.
    Top(f64),
    /// Offset from the bottom edge, percent of canvas height.
    Bottom(f64),
    /// Top edge at 50%, translated back by half the element height.
    Middle,
}

/// Axes that need a translate-by-half-extent transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CenteringAxes {
    /// Translate by -50% of width.
    pub x: bool,
    /// Translate by -50% of height.
    pub y: bool,
}

/// Absolute placement of an element, in percent of the canvas.
///
/// Each axis carries a single edge offset or a centering flag, so an element is
/// never pinned to both opposing edges.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementPrimitives {
    /// Element width as a percentage of canvas width.
    pub width_pct: f64,
    /// Horizontal placement.
    pub horizontal: HorizontalPlacement,
    /// Vertical placement.
    pub vertical: VerticalPlacement,
}

impl PlacementPrimitives {
    /// Left offset, if pinned to the left edge.
    pub fn left(&self) -> Option<f64> {
        match self.horizontal {
            HorizontalPlacement::Left(v) => Some(v),
            _ => None,
        }
    }

    /// Right offset, if pinned to the right edge.
    pub fn right(&self) -> Option<f64> {
        match self.horizontal {
            HorizontalPlacement::Right(v) => Some(v),
            _ => None,
        }
    }

    /// Top offset, if pinned to the top edge.
    pub fn top(&self) -> Option<f64> {
        match self.vertical {
            VerticalPlacement::Top(v) => Some(v),
            _ => None,
        }
    }

    /// Bottom offset, if pinned to the bottom edge.
    pub fn bottom(&self) -> Option<f64> {
        match self.vertical {
            VerticalPlacement::Bottom(v) => Some(v),
            _ => None,
        }
    }

    /// Which axes are centered.
    pub fn centering_axes(&self) -> CenteringAxes {
        CenteringAxes {
            x: self.horizontal == HorizontalPlacement::Center,
            y: self.vertical == VerticalPlacement::Middle,
        }
    }

    /// CSS declarations equivalent to this placement (absolute positioning).
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("position", "absolute".to_owned()),
            ("width", format!("{}%", self.width_pct)),
            ("height", "auto".to_owned()),
        ];
        let mut transform = Vec::new();
        match self.horizontal {
            HorizontalPlacement::Left(v) => out.push(("left", format!("{v}%"))),
            HorizontalPlacement::Right(v) => out.push(("right", format!("{v}%"))),
            HorizontalPlacement::Center => {
                out.push(("left", "50%".to_owned()));
                transform.push("translateX(-50%)");
            }
        }
        match self.vertical {
            VerticalPlacement::Top(v) => out.push(("top", format!("{v}%"))),
            VerticalPlacement::Bottom(v) => out.push(("bottom", format!("{v}%"))),
            VerticalPlacement::Middle => {
                out.push(("top", "50%".to_owned()));
                transform.push("translateY(-50%)");
            }
        }
        if !transform.is_empty() {
            out.push(("transform", transform.join(" ")));
        }
        out
    }
}

/// Resolve a declarative placement into edge offsets and centering flags.
///
/// Total: non-finite sizes fall back to 1%, non-finite pixel insets fall back
/// to the preset, and pixel insets are clamped to `[0, 9999]` before being
/// converted against the 1080x1920 reference canvas.
pub fn resolve_placement(cfg: &PlacementConfig) -> PlacementPrimitives {
    let width_pct = clamp_finite(cfg.size_pct_width, 1.0, 100.0);

    let inset_x_pct = match finite_opt(cfg.inset_x_px) {
        Some(px) => px.clamp(0.0, MAX_INSET_PX) / REFERENCE_WIDTH_PX * 100.0,
        None => cfg.inset_x_preset.percent(),
    };
    let inset_y_pct = match finite_opt(cfg.inset_y_px) {
        Some(px) => px.clamp(0.0, MAX_INSET_PX) / REFERENCE_HEIGHT_PX * 100.0,
        None => cfg.inset_y_preset.percent(),
    };

    let horizontal = match cfg.position.column {
        AnchorColumn::Left => HorizontalPlacement::Left(inset_x_pct),
        AnchorColumn::Right => HorizontalPlacement::Right(inset_x_pct),
        AnchorColumn::Center => HorizontalPlacement::Center,
    };
    let vertical = match cfg.position.row {
        AnchorRow::Top => VerticalPlacement::Top(inset_y_pct),
        AnchorRow::Bottom => VerticalPlacement::Bottom(inset_y_pct),
        AnchorRow::Middle => VerticalPlacement::Middle,
    };

    PlacementPrimitives {
        width_pct,
        horizontal,
        vertical,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
