use std::collections::BTreeSet;

use crate::{
    audio::ducking::MusicMixConfig,
    composition::config::{AudioSourceKind, FadeConfig, PlacementConfig, TimingRuleConfig},
    foundation::{
        core::TimeSpan,
        error::{ClipdeckError, ClipdeckResult},
    },
    ids::ulid::Identifier,
};

/// Document version written by this crate.
pub const TIMELINE_VERSION: &str = "create_video_v1";

fn default_version() -> String {
    TIMELINE_VERSION.to_owned()
}

fn default_opacity_pct() -> f64 {
    100.0
}

/// The editable multi-track document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub playhead_seconds: f64,
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub video_overlays: Vec<VideoOverlay>,
    /// Music.
    #[serde(default)]
    pub audio_segments: Vec<AudioSegment>,
    #[serde(default)]
    pub narration: Vec<AudioSegment>,
    #[serde(default)]
    pub lower_thirds: Vec<LowerThird>,
    #[serde(default)]
    pub visualizers: Vec<Visualizer>,
    #[serde(default)]
    pub guidelines: Vec<Guideline>,
    #[serde(default)]
    pub audio_config: MusicMixConfig,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            version: default_version(),
            playhead_seconds: 0.0,
            clips: Vec::new(),
            video_overlays: Vec::new(),
            audio_segments: Vec::new(),
            narration: Vec::new(),
            lower_thirds: Vec::new(),
            visualizers: Vec::new(),
            guidelines: Vec::new(),
            audio_config: MusicMixConfig::default(),
        }
    }
}

/// Main-track video clip. Without an explicit `start_seconds` it is packed
/// right after the previous clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<u64>,
    pub source_start_seconds: f64,
    pub source_end_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<f64>,
}

impl Clip {
    /// Played length, never negative.
    pub fn source_duration(&self) -> f64 {
        source_duration(self.source_start_seconds, self.source_end_seconds)
    }
}

/// Picture-in-picture video, positioned like any other overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOverlay {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<u64>,
    pub source_start_seconds: f64,
    pub source_end_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<f64>,
    #[serde(flatten)]
    pub placement: PlacementConfig,
}

impl VideoOverlay {
    pub fn source_duration(&self) -> f64 {
        source_duration(self.source_start_seconds, self.source_end_seconds)
    }
}

fn source_duration(start: f64, end: f64) -> f64 {
    let d = end - start;
    if d.is_finite() { d.max(0.0) } else { 0.0 }
}

/// A music or narration segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<u64>,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Offset into the source file where playback begins.
    #[serde(default)]
    pub source_start_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_db: Option<f64>,
}

/// Stored appearance of a lower third, captured when it was placed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowerThirdConfig {
    #[serde(flatten)]
    pub placement: PlacementConfig,
    #[serde(flatten)]
    pub timing: TimingRuleConfig,
    #[serde(flatten)]
    pub fade: FadeConfig,
    #[serde(default = "default_opacity_pct")]
    pub opacity_pct: f64,
}

impl Default for LowerThirdConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            timing: TimingRuleConfig::default(),
            fade: FadeConfig::default(),
            opacity_pct: default_opacity_pct(),
        }
    }
}

/// Caption image shown over a segment of the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowerThird {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<u64>,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(default)]
    pub config_snapshot: LowerThirdConfig,
}

/// Audio-reactive visual bound to an audio-bearing segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualizer {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<u64>,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(default)]
    pub audio_source_kind: AudioSourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_source_segment_id: Option<Identifier>,
    #[serde(flatten)]
    pub placement: PlacementConfig,
}

/// Alignment marker at a single instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guideline {
    pub id: Identifier,
    pub seconds: f64,
}

/// Anything occupying timeline seconds.
pub trait Timed {
    fn id(&self) -> &Identifier;
    fn start_seconds(&self) -> f64;
    fn end_seconds(&self) -> f64;

    /// Span with garbage bounds normalized (see [`TimeSpan::lenient`]).
    fn span(&self) -> TimeSpan {
        TimeSpan::lenient(self.start_seconds(), self.end_seconds())
    }
}

macro_rules! impl_timed_ranged {
    ($($ty:ty),+) => {
        $(
            impl Timed for $ty {
                fn id(&self) -> &Identifier {
                    &self.id
                }
                fn start_seconds(&self) -> f64 {
                    self.start_seconds
                }
                fn end_seconds(&self) -> f64 {
                    self.end_seconds
                }
            }
        )+
    };
}

impl_timed_ranged!(AudioSegment, LowerThird, Visualizer);

impl Timed for Guideline {
    fn id(&self) -> &Identifier {
        &self.id
    }
    fn start_seconds(&self) -> f64 {
        self.seconds
    }
    fn end_seconds(&self) -> f64 {
        self.seconds
    }
}

/// Borrowed view of one element with its resolved placement in time.
///
/// Clips and overlays carry the span computed from sequential packing, since
/// their start may be implicit.
#[derive(Clone, Copy, Debug)]
pub enum TimelineElement<'a> {
    Clip(&'a Clip, TimeSpan),
    VideoOverlay(&'a VideoOverlay, TimeSpan),
    Music(&'a AudioSegment),
    Narration(&'a AudioSegment),
    LowerThird(&'a LowerThird),
    Visualizer(&'a Visualizer),
    Guideline(&'a Guideline),
}

impl TimelineElement<'_> {
    /// Short lowercase kind name used in messages and resolved output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Clip(..) => "clip",
            Self::VideoOverlay(..) => "video_overlay",
            Self::Music(_) => "music",
            Self::Narration(_) => "narration",
            Self::LowerThird(_) => "lower_third",
            Self::Visualizer(_) => "visualizer",
            Self::Guideline(_) => "guideline",
        }
    }

    fn is_instant(&self) -> bool {
        matches!(self, Self::Guideline(_))
    }
}

impl Timed for TimelineElement<'_> {
    fn id(&self) -> &Identifier {
        match self {
            Self::Clip(c, _) => &c.id,
            Self::VideoOverlay(o, _) => &o.id,
            Self::Music(s) | Self::Narration(s) => &s.id,
            Self::LowerThird(l) => &l.id,
            Self::Visualizer(v) => &v.id,
            Self::Guideline(g) => &g.id,
        }
    }

    fn start_seconds(&self) -> f64 {
        match self {
            Self::Clip(_, span) | Self::VideoOverlay(_, span) => span.start_seconds,
            Self::Music(s) | Self::Narration(s) => s.start_seconds,
            Self::LowerThird(l) => l.start_seconds,
            Self::Visualizer(v) => v.start_seconds,
            Self::Guideline(g) => g.seconds,
        }
    }

    fn end_seconds(&self) -> f64 {
        match self {
            Self::Clip(_, span) | Self::VideoOverlay(_, span) => span.end_seconds,
            Self::Music(s) | Self::Narration(s) => s.end_seconds,
            Self::LowerThird(l) => l.end_seconds,
            Self::Visualizer(v) => v.end_seconds,
            Self::Guideline(g) => g.seconds,
        }
    }
}

/// Timeline start of each item: an explicit finite start wins, otherwise the
/// item begins where the previous one ended.
pub(crate) fn packed_starts<T>(
    items: &[T],
    explicit: impl Fn(&T) -> Option<f64>,
    duration: impl Fn(&T) -> f64,
) -> Vec<f64> {
    let mut out = Vec::with_capacity(items.len());
    let mut acc = 0.0;
    for item in items {
        let start = explicit(item)
            .filter(|s| s.is_finite())
            .map_or(acc, |s| s.max(0.0));
        out.push(start);
        acc = start + duration(item);
    }
    out
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every element in document order: clips, overlays, music, narration,
    /// lower thirds, visualizers, guidelines.
    pub fn elements(&self) -> Vec<TimelineElement<'_>> {
        let mut out = Vec::new();

        let starts = packed_starts(&self.clips, |c| c.start_seconds, Clip::source_duration);
        for (clip, start) in self.clips.iter().zip(starts) {
            let span = TimeSpan::lenient(start, start + clip.source_duration());
            out.push(TimelineElement::Clip(clip, span));
        }
        let starts = packed_starts(
            &self.video_overlays,
            |o| o.start_seconds,
            VideoOverlay::source_duration,
        );
        for (overlay, start) in self.video_overlays.iter().zip(starts) {
            let span = TimeSpan::lenient(start, start + overlay.source_duration());
            out.push(TimelineElement::VideoOverlay(overlay, span));
        }

        out.extend(self.audio_segments.iter().map(TimelineElement::Music));
        out.extend(self.narration.iter().map(TimelineElement::Narration));
        out.extend(self.lower_thirds.iter().map(TimelineElement::LowerThird));
        out.extend(self.visualizers.iter().map(TimelineElement::Visualizer));
        out.extend(self.guidelines.iter().map(TimelineElement::Guideline));
        out
    }

    /// Element by identifier.
    pub fn find(&self, id: &Identifier) -> Option<TimelineElement<'_>> {
        self.elements().into_iter().find(|e| e.id() == id)
    }

    /// Check document invariants: finite non-negative bounds, `end > start`
    /// for ranged elements, valid source ranges, and unique identifiers.
    pub fn validate(&self) -> ClipdeckResult<()> {
        if self.version != TIMELINE_VERSION {
            return Err(ClipdeckError::validation(format!(
                "unsupported timeline version '{}' (expected '{TIMELINE_VERSION}')",
                self.version
            )));
        }
        if !self.playhead_seconds.is_finite() || self.playhead_seconds < 0.0 {
            return Err(ClipdeckError::validation(
                "playheadSeconds must be finite and >= 0",
            ));
        }

        for (id, start, end) in self
            .clips
            .iter()
            .map(|c| (&c.id, c.source_start_seconds, c.source_end_seconds))
            .chain(
                self.video_overlays
                    .iter()
                    .map(|o| (&o.id, o.source_start_seconds, o.source_end_seconds)),
            )
        {
            if !(start.is_finite() && end.is_finite() && start >= 0.0 && end > start) {
                return Err(ClipdeckError::validation(format!(
                    "'{id}' has invalid source range [{start}, {end})"
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for el in self.elements() {
            let (start, end) = (el.start_seconds(), el.end_seconds());
            if !start.is_finite() || !end.is_finite() || start < 0.0 {
                return Err(ClipdeckError::validation(format!(
                    "{} '{}' has non-finite or negative bounds",
                    el.kind(),
                    el.id()
                )));
            }
            if !el.is_instant() && end <= start {
                return Err(ClipdeckError::validation(format!(
                    "{} '{}' must end after it starts",
                    el.kind(),
                    el.id()
                )));
            }
            if !seen.insert(el.id().clone()) {
                return Err(ClipdeckError::validation(format!(
                    "duplicate identifier '{}'",
                    el.id()
                )));
            }
        }

        for a in self.audio_segments.iter().chain(&self.narration) {
            if !a.source_start_seconds.is_finite() || a.source_start_seconds < 0.0 {
                return Err(ClipdeckError::validation(format!(
                    "'{}' sourceStartSeconds must be finite and >= 0",
                    a.id
                )));
            }
        }
        for lt in &self.lower_thirds {
            let o = lt.config_snapshot.opacity_pct;
            if !o.is_finite() || !(0.0..=100.0).contains(&o) {
                return Err(ClipdeckError::validation(format!(
                    "lower third '{}' opacityPct must be within [0, 100]",
                    lt.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
