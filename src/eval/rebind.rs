use crate::{
    composition::{
        config::AudioSourceKind,
        model::{Timed, Timeline, TimelineElement},
    },
    foundation::core::TimeSpan,
    ids::ulid::Identifier,
};

/// An audio-bearing segment a visualizer may listen to.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateSegment {
    pub id: Identifier,
    pub span: TimeSpan,
}

/// Segments of `kind` in source order, with their timeline windows.
pub fn candidate_segments(timeline: &Timeline, kind: AudioSourceKind) -> Vec<CandidateSegment> {
    timeline
        .elements()
        .into_iter()
        .filter(|el| {
            matches!(
                (kind, el),
                (AudioSourceKind::Video, TimelineElement::Clip(..))
                    | (AudioSourceKind::VideoOverlay, TimelineElement::VideoOverlay(..))
                    | (AudioSourceKind::Music, TimelineElement::Music(_))
                    | (AudioSourceKind::Narration, TimelineElement::Narration(_))
            )
        })
        .map(|el| CandidateSegment {
            id: el.id().clone(),
            span: TimeSpan {
                start_seconds: el.start_seconds(),
                end_seconds: el.end_seconds(),
            },
        })
        .collect()
}

/// Choose the segment a visualizer covering `[start, end)` should bind to.
///
/// Preference: the first candidate containing `start`, then the first
/// overlapping `[start, end)`, then the first candidate at all. Comparisons
/// allow [`crate::TIME_EPSILON`] of slack. `None` only when `candidates` is
/// empty.
pub fn pick_rebind_candidate(
    start_seconds: f64,
    end_seconds: f64,
    candidates: &[CandidateSegment],
) -> Option<Identifier> {
    let range = TimeSpan::lenient(start_seconds, end_seconds);

    if let Some(c) = candidates
        .iter()
        .find(|c| c.span.contains_instant(range.start_seconds))
    {
        return Some(c.id.clone());
    }
    if let Some(c) = candidates.iter().find(|c| c.span.overlaps(range)) {
        return Some(c.id.clone());
    }
    let fallback = candidates.first()?;
    tracing::debug!(
        start = range.start_seconds,
        end = range.end_seconds,
        chosen = %fallback.id,
        "no aligned audio segment, using first candidate"
    );
    Some(fallback.id.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/eval/rebind.rs"]
mod tests;
