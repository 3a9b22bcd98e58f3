use crate::{
    audio::ducking::{MusicMix, resolve_music_mix},
    composition::{
        config::{AudioSourceKind, TimingRuleConfig},
        model::{Timed, Timeline, TimelineElement},
    },
    effects::fade::fade_alpha,
    eval::{
        rebind::{candidate_segments, pick_rebind_candidate},
        window::{TimingWindow, resolve_window},
    },
    foundation::{
        core::TimeSpan,
        error::{ClipdeckError, ClipdeckResult},
        math::clamp01,
    },
    ids::ulid::Identifier,
    layout::placement::{PlacementPrimitives, resolve_placement},
};

/// Everything drawn over the main track at one instant.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFrame {
    pub seconds: f64,
    /// Bottom to top.
    pub nodes: Vec<ResolvedNode>,
    pub mix: MusicMix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    VideoOverlay,
    Visualizer,
    LowerThird,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode {
    pub id: Identifier,
    pub kind: NodeKind,
    /// Timeline span of the owning segment.
    pub segment: TimeSpan,
    /// Visible part of the segment, relative to its start.
    pub window: TimingWindow,
    /// `window` in timeline seconds.
    pub visible: TimeSpan,
    pub placement: PlacementPrimitives,
    pub alpha: f64,
    /// Position inside the source media, for video overlays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_seconds: Option<f64>,
    /// Segment whose audio drives a visualizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_source: Option<Identifier>,
}

pub struct Evaluator;

impl Evaluator {
    /// Resolve every overlay visible at `seconds`.
    ///
    /// Nodes are ordered by kind (video overlays, visualizers, lower thirds),
    /// then segment start, then identifier.
    #[tracing::instrument(skip(timeline))]
    pub fn resolve_at(timeline: &Timeline, seconds: f64) -> ClipdeckResult<ResolvedFrame> {
        timeline.validate()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ClipdeckError::validation(
                "resolve time must be finite and >= 0",
            ));
        }

        let mut nodes = Vec::new();
        for el in timeline.elements() {
            let node = match el {
                TimelineElement::VideoOverlay(o, span) => resolve_ranged(
                    el.id(),
                    NodeKind::VideoOverlay,
                    span,
                    seconds,
                    resolve_placement(&o.placement),
                )
                .map(|mut n| {
                    n.source_seconds = Some(o.source_start_seconds + (seconds - span.start_seconds));
                    n
                }),
                TimelineElement::Visualizer(v) => resolve_ranged(
                    el.id(),
                    NodeKind::Visualizer,
                    v.span(),
                    seconds,
                    resolve_placement(&v.placement),
                )
                .map(|mut n| {
                    n.audio_source = bound_audio_source(
                        timeline,
                        v.audio_source_kind,
                        v.audio_source_segment_id.as_ref(),
                        v.span(),
                    );
                    n
                }),
                TimelineElement::LowerThird(lt) => {
                    let cfg = &lt.config_snapshot;
                    let segment = lt.span();
                    let window = resolve_window(&cfg.timing, segment.duration());
                    let rel = seconds - segment.start_seconds;
                    window.contains(rel).then(|| ResolvedNode {
                        id: lt.id.clone(),
                        kind: NodeKind::LowerThird,
                        segment,
                        window,
                        visible: absolute(window, segment),
                        placement: resolve_placement(&cfg.placement),
                        alpha: fade_alpha(cfg.fade.fade, rel, window.start_rel_s, window.end_rel_s)
                            * clamp01(cfg.opacity_pct / 100.0),
                        source_seconds: None,
                        audio_source: None,
                    })
                }
                _ => None,
            };
            nodes.extend(node);
        }

        nodes.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.segment.start_seconds.total_cmp(&b.segment.start_seconds))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(ResolvedFrame {
            seconds,
            nodes,
            mix: resolve_music_mix(&timeline.audio_config),
        })
    }
}

fn absolute(window: TimingWindow, segment: TimeSpan) -> TimeSpan {
    TimeSpan {
        start_seconds: window.start_rel_s,
        end_seconds: window.end_rel_s,
    }
    .shift(segment.start_seconds)
}

/// Fully opaque node visible over its whole segment.
fn resolve_ranged(
    id: &Identifier,
    kind: NodeKind,
    segment: TimeSpan,
    seconds: f64,
    placement: PlacementPrimitives,
) -> Option<ResolvedNode> {
    if !segment.contains(seconds) {
        return None;
    }
    let window = resolve_window(&TimingRuleConfig::entire(), segment.duration());
    Some(ResolvedNode {
        id: id.clone(),
        kind,
        segment,
        window,
        visible: absolute(window, segment),
        placement,
        alpha: 1.0,
        source_seconds: None,
        audio_source: None,
    })
}

/// The stored binding when it still names a segment of the right kind,
/// otherwise the best-aligned candidate.
fn bound_audio_source(
    timeline: &Timeline,
    kind: AudioSourceKind,
    stored: Option<&Identifier>,
    span: TimeSpan,
) -> Option<Identifier> {
    let candidates = candidate_segments(timeline, kind);
    if let Some(id) = stored {
        if candidates.iter().any(|c| &c.id == id) {
            return Some(id.clone());
        }
        tracing::debug!(stale = %id, %kind, "visualizer binding is stale, picking a new source");
    }
    pick_rebind_candidate(span.start_seconds, span.end_seconds, &candidates)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
