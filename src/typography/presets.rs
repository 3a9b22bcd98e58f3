//! Font size preset tables keyed `family -> bucket -> value`, with optional
//! per-variant overrides.

use std::collections::BTreeMap;

use crate::foundation::{
    core::{REFERENCE_HEIGHT_PX, REFERENCE_WIDTH_PX},
    error::{ClipdeckError, ClipdeckResult},
};

/// Only catalog layout understood by this crate.
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// Named legacy size bucket. Each bucket is an anchor of the size curve.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
}

impl SizeBucket {
    /// Buckets in ascending size order.
    pub const ALL: [SizeBucket; 5] = [
        SizeBucket::XSmall,
        SizeBucket::Small,
        SizeBucket::Medium,
        SizeBucket::Large,
        SizeBucket::XLarge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::XSmall => "x_small",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::XLarge => "x_large",
        }
    }

    /// Exact (already lowercased) bucket name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == s)
    }

    /// Numeric UI size a stored legacy bucket name maps to.
    pub fn legacy_size(self) -> i64 {
        match self {
            Self::XSmall => 12,
            Self::Small => 15,
            Self::Medium => 18,
            Self::Large => 23,
            Self::XLarge => 28,
        }
    }

    /// Position of this anchor on the curve axis.
    pub fn curve_coord(self) -> f64 {
        match self {
            Self::XSmall => 11.5,
            Self::Small => 13.0,
            Self::Medium => 15.5,
            Self::Large => 20.5,
            Self::XLarge => 25.5,
        }
    }

    /// Metrics used when neither the variant nor the family sets a field.
    pub fn builtin_preset(self) -> SizePreset {
        let font_size_pct = match self {
            Self::XSmall => 3.0,
            Self::Small => 3.8,
            Self::Medium => 4.5,
            Self::Large => 5.2,
            Self::XLarge => 6.4,
        };
        SizePreset {
            font_size_pct,
            tracking_pct: 0.0,
            line_spacing_pct: 0.0,
        }
    }
}

/// Concrete text metrics.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePreset {
    /// Font size, percent of frame height.
    pub font_size_pct: f64,
    /// Letter spacing, percent of font size.
    pub tracking_pct: f64,
    /// Extra line spacing, percent of font size.
    pub line_spacing_pct: f64,
}

/// Override where each field may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSizePreset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing_pct: Option<f64>,
}

impl From<SizePreset> for PartialSizePreset {
    fn from(p: SizePreset) -> Self {
        Self {
            font_size_pct: Some(p.font_size_pct),
            tracking_pct: Some(p.tracking_pct),
            line_spacing_pct: Some(p.line_spacing_pct),
        }
    }
}

/// A font variant (weight/style) inside a family.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantDefinition {
    pub label: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<SizeBucket, PartialSizePreset>,
}

/// Per-family size table plus its variants.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyDefinition {
    pub label: String,
    pub sizes: BTreeMap<SizeBucket, PartialSizePreset>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, VariantDefinition>,
}

impl FamilyDefinition {
    /// Variant by key; keys are compared after trimming.
    pub fn variant(&self, key: &str) -> Option<&VariantDefinition> {
        self.variants.get(key.trim())
    }
}

/// Reference frame the preset values were calibrated against.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BaselineFrame {
    pub width: u32,
    pub height: u32,
}

impl Default for BaselineFrame {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH_PX as u32,
            height: REFERENCE_HEIGHT_PX as u32,
        }
    }
}

/// All families known to the editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetCatalog {
    pub schema_version: u32,
    #[serde(default)]
    pub baseline_frame: BaselineFrame,
    #[serde(default)]
    pub families: BTreeMap<String, FamilyDefinition>,
}

type FamilyRow = (&'static str, &'static str, [f64; 5], &'static [(&'static str, &'static str)]);

const BUILTIN_FAMILIES: &[FamilyRow] = &[
    (
        "dejavu_sans",
        "DejaVu Sans",
        [2.8, 3.4, 4.2, 5.2, 6.4],
        &[
            ("dejavu_sans_regular", "Regular"),
            ("dejavu_sans_bold", "Bold"),
            ("dejavu_sans_italic", "Italic"),
            ("dejavu_sans_bold_italic", "Bold Italic"),
        ],
    ),
    (
        "caveat",
        "Caveat",
        [3.2, 3.8, 4.6, 5.6, 6.8],
        &[
            ("caveat_regular", "Regular"),
            ("caveat_medium", "Medium"),
            ("caveat_semibold", "SemiBold"),
            ("caveat_bold", "Bold"),
        ],
    ),
    (
        "aladin",
        "Aladin",
        [2.9, 3.6, 4.4, 5.4, 6.6],
        &[("fc:Aladin:Regular", "Regular")],
    ),
    (
        "pirata_one",
        "Pirata One",
        [2.9, 3.6, 4.4, 5.4, 6.6],
        &[("fc:Pirata%20One:Regular", "Regular")],
    ),
    (
        "titan_one",
        "Titan One",
        [2.6, 3.2, 3.9, 4.8, 5.7],
        &[("fc:Titan%20One:Regular", "Regular")],
    ),
];

impl PresetCatalog {
    /// Catalog shipped with the editor.
    pub fn builtin() -> Self {
        let families = BUILTIN_FAMILIES
            .iter()
            .map(|(key, label, font_sizes, variants)| {
                let sizes = SizeBucket::ALL
                    .into_iter()
                    .zip(font_sizes.iter())
                    .map(|(bucket, &font_size_pct)| {
                        let preset = SizePreset {
                            font_size_pct,
                            tracking_pct: 0.0,
                            line_spacing_pct: 0.0,
                        };
                        (bucket, PartialSizePreset::from(preset))
                    })
                    .collect();
                let variants = variants
                    .iter()
                    .map(|(vkey, vlabel)| {
                        (
                            (*vkey).to_owned(),
                            VariantDefinition {
                                label: (*vlabel).to_owned(),
                                sizes: BTreeMap::new(),
                            },
                        )
                    })
                    .collect();
                (
                    (*key).to_owned(),
                    FamilyDefinition {
                        label: (*label).to_owned(),
                        sizes,
                        variants,
                    },
                )
            })
            .collect();

        Self {
            schema_version: CATALOG_SCHEMA_VERSION,
            baseline_frame: BaselineFrame::default(),
            families,
        }
    }

    /// Parse and validate an externally supplied catalog.
    pub fn from_json_str(s: &str) -> ClipdeckResult<Self> {
        let catalog: Self = serde_json::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> ClipdeckResult<()> {
        if self.schema_version != CATALOG_SCHEMA_VERSION {
            return Err(ClipdeckError::validation(format!(
                "unsupported preset catalog schemaVersion {} (expected {CATALOG_SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        if self.baseline_frame.width == 0 || self.baseline_frame.height == 0 {
            return Err(ClipdeckError::validation(
                "baselineFrame width/height must be > 0",
            ));
        }
        for key in self.families.keys() {
            if key.trim().is_empty() {
                return Err(ClipdeckError::validation("family key must be non-empty"));
            }
        }
        Ok(())
    }

    /// Family by key; keys are compared after trimming.
    pub fn family(&self, key: &str) -> Option<&FamilyDefinition> {
        self.families.get(key.trim())
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typography/presets.rs"]
mod tests;
