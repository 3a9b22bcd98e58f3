//! Declarative per-element configuration as persisted with a timeline.
//!
//! Every enum here parses leniently: unknown or missing strings fall back to
//! the variant's default instead of failing, so a half-edited document always
//! loads. Fallbacks are reported through `tracing` at debug level.

use std::fmt;

macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (default $default:ident) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "Option<String>", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            /// Canonical snake_case spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// Case-insensitive parse; unknown input yields the default.
            pub fn parse(raw: &str) -> Self {
                let s = raw.trim().to_ascii_lowercase();
                $(
                    if s == $text {
                        return Self::$variant;
                    }
                )+
                if !s.is_empty() {
                    tracing::debug!(
                        kind = stringify!($name),
                        value = raw,
                        fallback = Self::$default.as_str(),
                        "unknown value, using default"
                    );
                }
                Self::$default
            }
        }

        impl From<Option<String>> for $name {
            fn from(value: Option<String>) -> Self {
                value.as_deref().map(Self::parse).unwrap_or_default()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

lenient_enum! {
    /// Named inset used when no pixel inset is set.
    pub enum InsetPreset (default Medium) {
        /// 6% of the axis.
        Small => "small",
        /// 10% of the axis.
        Medium => "medium",
        /// 14% of the axis.
        Large => "large",
    }
}

impl InsetPreset {
    /// Inset as a percentage of the relevant canvas axis.
    pub fn percent(self) -> f64 {
        match self {
            Self::Small => 6.0,
            Self::Medium => 10.0,
            Self::Large => 14.0,
        }
    }
}

lenient_enum! {
    /// Visibility rule relative to the owning segment.
    pub enum TimingRule (default Entire) {
        /// Whole segment.
        Entire => "entire",
        /// From `timing_seconds` in until the end.
        StartAfter => "start_after",
        /// The first `timing_seconds`.
        FirstOnly => "first_only",
        /// The last `timing_seconds`.
        LastOnly => "last_only",
    }
}

lenient_enum! {
    /// Opacity ramp applied at the edges of a timing window.
    pub enum FadeMode (default None) {
        /// No ramp.
        None => "none",
        /// Ramp up from the window start.
        In => "in",
        /// Ramp down into the window end.
        Out => "out",
        /// Both ramps.
        InOut => "in_out",
    }
}

impl FadeMode {
    /// Whether the ramp at the window start applies.
    pub fn fades_in(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Whether the ramp at the window end applies.
    pub fn fades_out(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

lenient_enum! {
    /// Which kind of segment a visualizer listens to.
    pub enum AudioSourceKind (default Narration) {
        /// Main-track video clips.
        Video => "video",
        /// Picture-in-picture overlays.
        VideoOverlay => "video_overlay",
        /// Narration segments.
        Narration => "narration",
        /// Music segments.
        Music => "music",
    }
}

/// Vertical half of an [`Anchor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorRow {
    /// Top edge.
    Top,
    /// Vertically centered.
    Middle,
    /// Bottom edge.
    Bottom,
}

/// Horizontal half of an [`Anchor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorColumn {
    /// Left edge.
    Left,
    /// Horizontally centered.
    Center,
    /// Right edge.
    Right,
}

/// One of the nine named placement anchors (`{top,middle,bottom}_{left,center,right}`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct Anchor {
    /// Row half.
    pub row: AnchorRow,
    /// Column half.
    pub column: AnchorColumn,
}

impl Default for Anchor {
    fn default() -> Self {
        Self::new(AnchorRow::Bottom, AnchorColumn::Right)
    }
}

impl Anchor {
    /// Build an anchor from its halves.
    pub const fn new(row: AnchorRow, column: AnchorColumn) -> Self {
        Self { row, column }
    }

    /// Parse an anchor name.
    ///
    /// Legacy `center` means `middle_center`. A missing or unrecognized row
    /// becomes `bottom` and a missing or unrecognized column becomes `right`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_ascii_lowercase();
        let s = if s == "center" { "middle_center" } else { s.as_str() };
        let mut halves = s.split('_');
        let row_raw = halves.next().unwrap_or_default();
        let col_raw = halves.next().unwrap_or_default();
        let row = match row_raw {
            "top" => AnchorRow::Top,
            "middle" => AnchorRow::Middle,
            "bottom" => AnchorRow::Bottom,
            other => {
                if !other.is_empty() {
                    tracing::debug!(value = raw, "unknown anchor row, using bottom");
                }
                AnchorRow::Bottom
            }
        };
        let column = match col_raw {
            "left" => AnchorColumn::Left,
            "center" => AnchorColumn::Center,
            "right" => AnchorColumn::Right,
            other => {
                if !other.is_empty() {
                    tracing::debug!(value = raw, "unknown anchor column, using right");
                }
                AnchorColumn::Right
            }
        };
        Self { row, column }
    }

    /// Canonical `row_column` spelling.
    pub fn as_str(self) -> &'static str {
        use AnchorColumn as C;
        use AnchorRow as R;
        match (self.row, self.column) {
            (R::Top, C::Left) => "top_left",
            (R::Top, C::Center) => "top_center",
            (R::Top, C::Right) => "top_right",
            (R::Middle, C::Left) => "middle_left",
            (R::Middle, C::Center) => "middle_center",
            (R::Middle, C::Right) => "middle_right",
            (R::Bottom, C::Left) => "bottom_left",
            (R::Bottom, C::Center) => "bottom_center",
            (R::Bottom, C::Right) => "bottom_right",
        }
    }
}

impl From<Option<String>> for Anchor {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<Anchor> for String {
    fn from(value: Anchor) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative placement of a visual element on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    /// Named anchor.
    #[serde(default)]
    pub position: Anchor,
    /// Element width as a percentage of canvas width, `[1, 100]`.
    #[serde(default = "default_size_pct_width")]
    pub size_pct_width: f64,
    /// Horizontal inset in pixels of the 1080-wide reference canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset_x_px: Option<f64>,
    /// Vertical inset in pixels of the 1920-tall reference canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset_y_px: Option<f64>,
    /// Horizontal inset preset, used when `inset_x_px` is absent.
    #[serde(default)]
    pub inset_x_preset: InsetPreset,
    /// Vertical inset preset, used when `inset_y_px` is absent.
    #[serde(default)]
    pub inset_y_preset: InsetPreset,
}

fn default_size_pct_width() -> f64 {
    15.0
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            position: Anchor::default(),
            size_pct_width: default_size_pct_width(),
            inset_x_px: None,
            inset_y_px: None,
            inset_x_preset: InsetPreset::default(),
            inset_y_preset: InsetPreset::default(),
        }
    }
}

/// Visibility sub-window rule of an element within its segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingRuleConfig {
    /// Rule kind.
    #[serde(default)]
    pub timing_rule: TimingRule,
    /// Rule parameter in seconds; ignored by [`TimingRule::Entire`].
    #[serde(default)]
    pub timing_seconds: Option<f64>,
}

impl TimingRuleConfig {
    /// The `entire` rule with no parameter.
    pub fn entire() -> Self {
        Self::default()
    }

    /// Rule with a parameter.
    pub fn new(timing_rule: TimingRule, timing_seconds: Option<f64>) -> Self {
        Self {
            timing_rule,
            timing_seconds,
        }
    }
}

/// Fade configuration. The ramp length is fixed (see [`crate::FADE_SECONDS`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FadeConfig {
    /// Fade mode.
    #[serde(default)]
    pub fade: FadeMode,
}

#[cfg(test)]
#[path = "../../tests/unit/composition/config.rs"]
mod tests;
