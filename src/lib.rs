//! Clipdeck is the timeline core of a short-form video editor.
//!
//! It owns the editable [`Timeline`] document and the pure resolvers that turn
//! its declarative settings into concrete render parameters:
//!
//! - placement anchors and insets into CSS-like primitives
//! - timing rules and fades into visibility windows and alpha
//! - UI text sizes into typography presets
//! - music settings into ducking parameters
//!
//! Preview and export both consume [`Evaluator::resolve_at`], so they never
//! disagree about what is on screen.
#![forbid(unsafe_code)]

pub mod audio;
pub mod composition;
pub mod effects;
pub mod eval;
pub mod foundation;
pub mod ids;
pub mod layout;
pub mod typography;

pub use crate::audio::ducking::{MusicMix, MusicMixConfig, SidechainParams, resolve_music_mix};
pub use crate::composition::config::{
    Anchor, AudioSourceKind, FadeConfig, FadeMode, InsetPreset, PlacementConfig, TimingRule,
    TimingRuleConfig,
};
pub use crate::composition::model::{
    AudioSegment, Clip, Guideline, LowerThird, LowerThirdConfig, TIMELINE_VERSION, Timed,
    Timeline, TimelineElement, VideoOverlay, Visualizer,
};
pub use crate::composition::ops::{SplitTarget, split_at_playhead};
pub use crate::effects::fade::{FADE_SECONDS, fade_alpha};
pub use crate::eval::evaluator::{Evaluator, NodeKind, ResolvedFrame, ResolvedNode};
pub use crate::eval::promotion::promote_timing_on_expand;
pub use crate::eval::rebind::{CandidateSegment, pick_rebind_candidate};
pub use crate::eval::window::{TimingWindow, resolve_window};
pub use crate::foundation::core::{TIME_EPSILON, TimeSpan};
pub use crate::foundation::error::{ClipdeckError, ClipdeckResult};
pub use crate::ids::ulid::{
    Clock, IdSource, Identifier, MonotonicGenerator, SystemClock, decode_time, is_valid, new_id,
};
pub use crate::layout::placement::{PlacementPrimitives, resolve_placement};
pub use crate::typography::presets::{PresetCatalog, SizeBucket, SizePreset};
pub use crate::typography::size_curve::{resolve_size_preset, resolve_size_preset_for_key};
