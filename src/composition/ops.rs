//! Timeline math and structural edits driven by the playhead.
//!
//! Edits take the document by `&mut` and report what they did; a refused edit
//! leaves the document untouched.

use crate::{
    composition::{
        config::AudioSourceKind,
        model::{
            AudioSegment, Clip, LowerThird, Timed, Timeline, VideoOverlay, Visualizer,
            packed_starts,
        },
    },
    eval::{
        promotion::promote_timing_on_expand,
        rebind::{CandidateSegment, candidate_segments, pick_rebind_candidate},
    },
    foundation::{
        core::TIME_EPSILON,
        math::{finite_or, round_to_tenth},
    },
    ids::ulid::{IdSource, Identifier},
};

/// A split never leaves a piece shorter than this.
pub const SPLIT_MIN_EDGE_S: f64 = 0.2;

/// Media placed by its source range: main-track clips and video overlays.
trait SourceRanged: Clone {
    fn id(&self) -> &Identifier;
    fn set_id(&mut self, id: Identifier);
    fn explicit_start(&self) -> Option<f64>;
    fn set_start(&mut self, start: f64);
    fn source_range(&self) -> (f64, f64);
    fn set_source_range(&mut self, start: f64, end: f64);

    fn duration(&self) -> f64 {
        let (a, b) = self.source_range();
        let d = b - a;
        if d.is_finite() { d.max(0.0) } else { 0.0 }
    }
}

macro_rules! impl_source_ranged {
    ($($ty:ty),+) => {
        $(
            impl SourceRanged for $ty {
                fn id(&self) -> &Identifier {
                    &self.id
                }
                fn set_id(&mut self, id: Identifier) {
                    self.id = id;
                }
                fn explicit_start(&self) -> Option<f64> {
                    self.start_seconds
                }
                fn set_start(&mut self, start: f64) {
                    self.start_seconds = Some(start);
                }
                fn source_range(&self) -> (f64, f64) {
                    (self.source_start_seconds, self.source_end_seconds)
                }
                fn set_source_range(&mut self, start: f64, end: f64) {
                    self.source_start_seconds = start;
                    self.source_end_seconds = end;
                }
            }
        )+
    };
}

impl_source_ranged!(Clip, VideoOverlay);

fn starts_of<T: SourceRanged>(items: &[T]) -> Vec<f64> {
    packed_starts(items, T::explicit_start, T::duration)
}

fn end_of<T: SourceRanged>(items: &[T]) -> f64 {
    items
        .iter()
        .zip(starts_of(items))
        .map(|(item, start)| start + item.duration())
        .fold(0.0, f64::max)
}

/// Timeline start of each clip.
pub fn clip_starts(clips: &[Clip]) -> Vec<f64> {
    starts_of(clips)
}

/// Timeline start of each video overlay.
pub fn overlay_starts(overlays: &[VideoOverlay]) -> Vec<f64> {
    starts_of(overlays)
}

/// End of the main video track.
pub fn clips_end_seconds(clips: &[Clip]) -> f64 {
    end_of(clips)
}

/// Latest end of any element on the timeline.
pub fn timeline_end_seconds(timeline: &Timeline) -> f64 {
    timeline
        .elements()
        .iter()
        .map(|e| finite_or(e.end_seconds(), 0.0))
        .fold(0.0, f64::max)
}

/// Position of a timeline instant on the main track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipLocation {
    pub index: usize,
    /// Seconds from the clip's timeline start.
    pub within: f64,
}

/// Clip playing at `t`, half-open. `None` in gaps and past the end.
pub fn locate(t: f64, clips: &[Clip]) -> Option<ClipLocation> {
    locate_in(t, clips)
}

fn locate_in<T: SourceRanged>(t: f64, items: &[T]) -> Option<ClipLocation> {
    if !t.is_finite() {
        return None;
    }
    let starts = starts_of(items);
    items
        .iter()
        .zip(&starts)
        .position(|(item, &start)| t >= start && t < start + item.duration())
        .map(|index| ClipLocation {
            index,
            within: t - starts[index],
        })
}

fn sort_by_start<T>(
    items: &mut [T],
    start: impl Fn(&T) -> f64,
    id: impl Fn(&T) -> &Identifier,
) {
    items.sort_by(|a, b| start(a).total_cmp(&start(b)).then_with(|| id(a).cmp(id(b))));
}

fn insert_at_playhead<T: SourceRanged>(
    items: &mut Vec<T>,
    playhead_seconds: f64,
    item: T,
    max_end_seconds: Option<f64>,
) -> Option<f64> {
    let starts = starts_of(items);
    let track_end = end_of(items);
    let t = round_to_tenth(finite_or(playhead_seconds, 0.0)).clamp(0.0, track_end.max(0.0));
    let dur = item.duration();

    let mut normalized: Vec<T> = items.clone();
    for (existing, start) in normalized.iter_mut().zip(&starts) {
        existing.set_start(round_to_tenth(*start));
    }

    let mut ranges: Vec<(f64, f64)> = normalized
        .iter()
        .map(|c| {
            let s = c.explicit_start().unwrap_or(0.0);
            (s, round_to_tenth(s + c.duration()))
        })
        .collect();
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut start = t;
    for (rs, re) in ranges {
        if start < re - TIME_EPSILON && start + dur > rs + TIME_EPSILON {
            start = round_to_tenth(re);
        }
    }

    let mut placed = item;
    placed.set_start(start);
    if let Some(max_end) = max_end_seconds.filter(|v| v.is_finite()) {
        let max_dur = round_to_tenth((max_end - start).max(0.0));
        if max_dur <= 0.05 {
            tracing::debug!(start, max_end, "no room before limit, insert refused");
            return None;
        }
        if dur > max_dur + TIME_EPSILON {
            let (src_start, _) = placed.source_range();
            placed.set_source_range(src_start, round_to_tenth(src_start + max_dur));
        }
    }

    normalized.push(placed);
    sort_by_start(&mut normalized, |c| c.explicit_start().unwrap_or(0.0), T::id);
    *items = normalized;
    Some(start)
}

/// Insert a clip at the playhead (rounded to 0.1s), sliding it forward past
/// any clip it would overlap.
///
/// Existing clips get explicit starts. With `max_end_seconds`, the clip is
/// trimmed to end there, and the insert is refused (`None`) when less than
/// 0.05s would remain. Returns the placed start.
pub fn insert_clip_at_playhead(
    timeline: &mut Timeline,
    clip: Clip,
    max_end_seconds: Option<f64>,
) -> Option<f64> {
    insert_at_playhead(
        &mut timeline.clips,
        timeline.playhead_seconds,
        clip,
        max_end_seconds,
    )
}

/// [`insert_clip_at_playhead`] for the overlay track.
pub fn insert_video_overlay_at_playhead(
    timeline: &mut Timeline,
    overlay: VideoOverlay,
    max_end_seconds: Option<f64>,
) -> Option<f64> {
    insert_at_playhead(
        &mut timeline.video_overlays,
        timeline.playhead_seconds,
        overlay,
        max_end_seconds,
    )
}

fn split_source_ranged<T: SourceRanged>(
    items: &mut Vec<T>,
    playhead_seconds: f64,
    target: &Identifier,
    ids: &mut impl IdSource,
) -> Option<(Identifier, Identifier)> {
    let t = round_to_tenth(finite_or(playhead_seconds, 0.0));
    let loc = locate_in(t, items)?;
    if items[loc.index].id() != target {
        return None;
    }
    let starts = starts_of(items);
    let original = &items[loc.index];
    let (src_start, src_end) = original.source_range();
    let cut = round_to_tenth(src_start + loc.within);
    if cut <= src_start + SPLIT_MIN_EDGE_S || cut >= src_end - SPLIT_MIN_EDGE_S {
        return None;
    }

    let start = round_to_tenth(starts[loc.index]);
    let left_dur = round_to_tenth(cut - src_start);
    let mut left = original.clone();
    left.set_id(ids.next_id());
    left.set_start(start);
    left.set_source_range(src_start, cut);
    let mut right = original.clone();
    right.set_id(ids.next_id());
    right.set_start(round_to_tenth(start + left_dur));
    right.set_source_range(cut, src_end);
    let halves = (left.id().clone(), right.id().clone());

    for (item, s) in items.iter_mut().zip(&starts) {
        item.set_start(round_to_tenth(*s));
    }
    items[loc.index] = left;
    items.insert(loc.index + 1, right);
    sort_by_start(items, |c| c.explicit_start().unwrap_or(0.0), T::id);
    Some(halves)
}

/// Cut point for a ranged element, or `None` when the cut would leave a piece
/// shorter than [`SPLIT_MIN_EDGE_S`].
fn ranged_cut(start: f64, end: f64, playhead_seconds: f64) -> Option<(f64, f64, f64)> {
    let start = round_to_tenth(finite_or(start, 0.0));
    let end = round_to_tenth(finite_or(end, 0.0));
    if end <= start {
        return None;
    }
    let cut = round_to_tenth(finite_or(playhead_seconds, 0.0)).clamp(start, end);
    if cut <= start + SPLIT_MIN_EDGE_S || cut >= end - SPLIT_MIN_EDGE_S {
        return None;
    }
    Some((start, cut, end))
}

fn split_ranged<T: Timed + Clone>(
    items: &mut Vec<T>,
    playhead_seconds: f64,
    target: &Identifier,
    ids: &mut impl IdSource,
    mut shape: impl FnMut(&mut T, Identifier, f64, f64, SplitSide),
) -> Option<(Identifier, Identifier)> {
    let idx = items.iter().position(|it| it.id() == target)?;
    let (start, cut, end) =
        ranged_cut(items[idx].start_seconds(), items[idx].end_seconds(), playhead_seconds)?;

    let mut left = items[idx].clone();
    shape(&mut left, ids.next_id(), start, cut, SplitSide::Left);
    let mut right = items[idx].clone();
    shape(&mut right, ids.next_id(), cut, end, SplitSide::Right { offset: cut - start });
    let halves = (left.id().clone(), right.id().clone());

    items[idx] = left;
    items.insert(idx + 1, right);
    sort_by_start(items, T::start_seconds, T::id);
    Some(halves)
}

#[derive(Clone, Copy)]
enum SplitSide {
    Left,
    Right { offset: f64 },
}

/// Which track a split applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitTarget {
    Clip,
    VideoOverlay,
    Music,
    Narration,
    LowerThird,
    Visualizer,
}

fn split_audio(seg: &mut AudioSegment, id: Identifier, start: f64, end: f64, side: SplitSide) {
    let base = finite_or(seg.source_start_seconds, 0.0);
    seg.id = id;
    seg.start_seconds = start;
    seg.end_seconds = end;
    seg.source_start_seconds = match side {
        SplitSide::Left => base,
        SplitSide::Right { offset } => round_to_tenth(base + round_to_tenth(offset).max(0.0)),
    };
}

/// Split the element `target` on track `track` at the playhead.
///
/// Both halves get fresh identifiers from `ids`; audio halves keep playing
/// the same source material. Visualizers bound to a split clip, overlay or
/// audio segment are rebound to the half under their start. Returns the right
/// half's identifier, or `None` when `target` is not under the playhead or a
/// piece would be shorter than [`SPLIT_MIN_EDGE_S`].
pub fn split_at_playhead(
    timeline: &mut Timeline,
    track: SplitTarget,
    target: &Identifier,
    ids: &mut impl IdSource,
) -> Option<Identifier> {
    let playhead = timeline.playhead_seconds;
    let halves = match track {
        SplitTarget::Clip => split_source_ranged(&mut timeline.clips, playhead, target, ids),
        SplitTarget::VideoOverlay => {
            split_source_ranged(&mut timeline.video_overlays, playhead, target, ids)
        }
        SplitTarget::Music => {
            split_ranged(&mut timeline.audio_segments, playhead, target, ids, split_audio)
        }
        SplitTarget::Narration => {
            split_ranged(&mut timeline.narration, playhead, target, ids, split_audio)
        }
        SplitTarget::LowerThird => split_ranged(
            &mut timeline.lower_thirds,
            playhead,
            target,
            ids,
            |lt: &mut LowerThird, id, start, end, _| {
                lt.id = id;
                lt.start_seconds = start;
                lt.end_seconds = end;
            },
        ),
        SplitTarget::Visualizer => split_ranged(
            &mut timeline.visualizers,
            playhead,
            target,
            ids,
            |v: &mut Visualizer, id, start, end, _| {
                v.id = id;
                v.start_seconds = start;
                v.end_seconds = end;
            },
        ),
    };
    let Some((left, right)) = halves else {
        tracing::debug!(?track, %target, playhead, "split refused");
        return None;
    };
    if let Some(kind) = track.audio_source_kind() {
        rebind_split_dependents(timeline, kind, target, [&left, &right]);
    }
    Some(right)
}

impl SplitTarget {
    /// Kind a visualizer uses to listen to this track, if it can.
    fn audio_source_kind(self) -> Option<AudioSourceKind> {
        match self {
            Self::Clip => Some(AudioSourceKind::Video),
            Self::VideoOverlay => Some(AudioSourceKind::VideoOverlay),
            Self::Music => Some(AudioSourceKind::Music),
            Self::Narration => Some(AudioSourceKind::Narration),
            Self::LowerThird | Self::Visualizer => None,
        }
    }
}

/// Point visualizers bound to a removed segment at whichever half of it they
/// start in.
fn rebind_split_dependents(
    timeline: &mut Timeline,
    kind: AudioSourceKind,
    removed: &Identifier,
    halves: [&Identifier; 2],
) {
    let candidates: Vec<CandidateSegment> = candidate_segments(timeline, kind)
        .into_iter()
        .filter(|c| halves.contains(&&c.id))
        .collect();
    for viz in &mut timeline.visualizers {
        if viz.audio_source_segment_id.as_ref() != Some(removed) {
            continue;
        }
        let chosen = pick_rebind_candidate(viz.start_seconds, viz.end_seconds, &candidates);
        tracing::debug!(visualizer = %viz.id, %removed, chosen = ?chosen, "rebind after split");
        viz.audio_source_segment_id = chosen;
    }
}

/// Move a lower third to `[start, end)`, relaxing its timing rule when the
/// change makes it longer (see [`promote_timing_on_expand`]).
///
/// Negative starts clamp to 0. Returns `false` when `id` is unknown or the
/// range is empty or non-finite.
pub fn retime_lower_third(
    timeline: &mut Timeline,
    id: &Identifier,
    start_seconds: f64,
    end_seconds: f64,
) -> bool {
    if !start_seconds.is_finite() || !end_seconds.is_finite() {
        return false;
    }
    let start_seconds = start_seconds.max(0.0);
    if end_seconds <= start_seconds {
        return false;
    }
    let Some(slot) = timeline.lower_thirds.iter_mut().find(|lt| &lt.id == id) else {
        return false;
    };
    let previous = slot.clone();
    let mut next = previous.clone();
    next.start_seconds = start_seconds;
    next.end_seconds = end_seconds;
    *slot = promote_timing_on_expand(&previous, &next);
    true
}

/// Rebind a visualizer to the best-aligned segment of its source kind.
///
/// Writes and returns the chosen segment; clears the binding when no segment
/// of that kind exists. `None` is also returned for an unknown visualizer.
pub fn rebind_visualizer(timeline: &mut Timeline, id: &Identifier) -> Option<Identifier> {
    let idx = timeline.visualizers.iter().position(|v| &v.id == id)?;
    let viz = &timeline.visualizers[idx];
    let candidates = candidate_segments(timeline, viz.audio_source_kind);
    let chosen = pick_rebind_candidate(viz.start_seconds, viz.end_seconds, &candidates);
    tracing::debug!(visualizer = %id, chosen = ?chosen, kind = %viz.audio_source_kind, "rebind");
    timeline.visualizers[idx].audio_source_segment_id = chosen.clone();
    chosen
}

#[cfg(test)]
#[path = "../../tests/unit/composition/ops.rs"]
mod tests;
