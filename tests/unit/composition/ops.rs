use super::*;
use crate::composition::config::{AudioSourceKind, TimingRule, TimingRuleConfig};
use crate::composition::model::LowerThirdConfig;

fn id(n: u32) -> Identifier {
    Identifier::parse(&format!("{n:026}")).unwrap()
}

/// Hands out `id(1000)`, `id(1001)`, ...
struct Seq(u32);

impl IdSource for Seq {
    fn next_id(&mut self) -> Identifier {
        let out = id(self.0);
        self.0 += 1;
        out
    }
}

fn clip(n: u32, src: (f64, f64)) -> Clip {
    Clip {
        id: id(n),
        upload_id: None,
        source_start_seconds: src.0,
        source_end_seconds: src.1,
        start_seconds: None,
    }
}

fn audio(n: u32, start: f64, end: f64, src: f64) -> AudioSegment {
    AudioSegment {
        id: id(n),
        upload_id: None,
        start_seconds: start,
        end_seconds: end,
        source_start_seconds: src,
        gain_db: None,
    }
}

fn lower_third(n: u32, start: f64, end: f64, timing: TimingRuleConfig) -> LowerThird {
    LowerThird {
        id: id(n),
        upload_id: None,
        start_seconds: start,
        end_seconds: end,
        config_snapshot: LowerThirdConfig {
            timing,
            ..LowerThirdConfig::default()
        },
    }
}

fn two_clip_timeline() -> Timeline {
    let mut tl = Timeline::new();
    tl.clips = vec![clip(1, (0.0, 4.0)), clip(2, (10.0, 12.0))];
    tl
}

#[test]
fn clip_math_packs_and_locates() {
    let tl = two_clip_timeline();
    assert_eq!(clip_starts(&tl.clips), [0.0, 4.0]);
    assert_eq!(clips_end_seconds(&tl.clips), 6.0);
    assert_eq!(
        locate(4.5, &tl.clips),
        Some(ClipLocation {
            index: 1,
            within: 0.5
        })
    );
    assert_eq!(locate(6.0, &tl.clips), None);
    assert_eq!(locate(f64::NAN, &tl.clips), None);
    assert_eq!(clips_end_seconds(&[]), 0.0);
}

#[test]
fn timeline_end_covers_every_track() {
    let mut tl = two_clip_timeline();
    assert_eq!(timeline_end_seconds(&tl), 6.0);
    tl.narration.push(audio(3, 2.0, 9.5, 0.0));
    assert_eq!(timeline_end_seconds(&tl), 9.5);
    assert_eq!(timeline_end_seconds(&Timeline::new()), 0.0);
}

#[test]
fn insert_slides_past_overlapping_clips() {
    let mut tl = two_clip_timeline();
    tl.playhead_seconds = 3.04;
    let placed = insert_clip_at_playhead(&mut tl, clip(3, (0.0, 2.0)), None);
    assert_eq!(placed, Some(6.0));
    let starts: Vec<Option<f64>> = tl.clips.iter().map(|c| c.start_seconds).collect();
    assert_eq!(starts, [Some(0.0), Some(4.0), Some(6.0)]);
    assert_eq!(tl.clips[2].id, id(3));
}

#[test]
fn insert_into_gap_keeps_playhead_position() {
    let mut tl = Timeline::new();
    let mut late = clip(1, (0.0, 2.0));
    late.start_seconds = Some(5.0);
    tl.clips.push(late);
    tl.playhead_seconds = 1.0;
    assert_eq!(insert_clip_at_playhead(&mut tl, clip(2, (0.0, 3.0)), None), Some(1.0));
    assert_eq!(tl.clips[0].id, id(2));
    assert_eq!(tl.clips[1].id, id(1));
}

#[test]
fn insert_respects_max_end() {
    let mut tl = Timeline::new();
    assert_eq!(insert_clip_at_playhead(&mut tl, clip(1, (2.0, 7.0)), Some(3.0)), Some(0.0));
    assert_eq!(tl.clips[0].source_end_seconds, 5.0);

    tl.playhead_seconds = 3.0;
    let before = tl.clone();
    assert_eq!(insert_clip_at_playhead(&mut tl, clip(2, (0.0, 1.0)), Some(3.03)), None);
    assert_eq!(tl, before);
}

#[test]
fn insert_overlay_uses_its_own_track() {
    let mut tl = two_clip_timeline();
    let overlay = VideoOverlay {
        id: id(9),
        upload_id: None,
        source_start_seconds: 0.0,
        source_end_seconds: 1.5,
        start_seconds: None,
        placement: Default::default(),
    };
    tl.playhead_seconds = 2.0;
    // Empty overlay track ends at 0, so the playhead clamps there.
    assert_eq!(insert_video_overlay_at_playhead(&mut tl, overlay, None), Some(0.0));
    assert_eq!(overlay_starts(&tl.video_overlays), [0.0]);
    assert_eq!(tl.clips.len(), 2);
}

#[test]
fn split_clip_produces_fresh_ids_and_contiguous_halves() {
    let mut tl = two_clip_timeline();
    tl.playhead_seconds = 1.5;
    let mut ids = Seq(1000);
    let right = split_at_playhead(&mut tl, SplitTarget::Clip, &id(1), &mut ids).unwrap();
    assert_eq!(right, id(1001));
    assert_eq!(tl.clips.len(), 3);

    let left = &tl.clips[0];
    assert_eq!(left.id, id(1000));
    assert_eq!((left.source_start_seconds, left.source_end_seconds), (0.0, 1.5));
    assert_eq!(left.start_seconds, Some(0.0));
    let r = &tl.clips[1];
    assert_eq!((r.source_start_seconds, r.source_end_seconds), (1.5, 4.0));
    assert_eq!(r.start_seconds, Some(1.5));
    assert_eq!(tl.clips[2].start_seconds, Some(4.0));
    assert!(tl.find(&id(1)).is_none());
    tl.validate().unwrap();
}

#[test]
fn split_clip_refuses_near_edges_and_wrong_target() {
    let mut tl = two_clip_timeline();
    let before = tl.clone();
    let mut ids = Seq(1000);

    tl.playhead_seconds = 0.1;
    assert!(split_at_playhead(&mut tl, SplitTarget::Clip, &id(1), &mut ids).is_none());
    tl.playhead_seconds = 3.9;
    assert!(split_at_playhead(&mut tl, SplitTarget::Clip, &id(1), &mut ids).is_none());
    tl.playhead_seconds = 5.0;
    assert!(split_at_playhead(&mut tl, SplitTarget::Clip, &id(1), &mut ids).is_none());
    let mut expected = before.clone();
    expected.playhead_seconds = 5.0;
    assert_eq!(tl, expected);
}

#[test]
fn split_music_advances_source_offset() {
    let mut tl = Timeline::new();
    tl.audio_segments.push(audio(1, 2.0, 8.0, 1.0));
    tl.playhead_seconds = 5.0;
    let mut ids = Seq(50);
    let right = split_at_playhead(&mut tl, SplitTarget::Music, &id(1), &mut ids).unwrap();

    let segs = &tl.audio_segments;
    assert_eq!(segs.len(), 2);
    assert_eq!((segs[0].start_seconds, segs[0].end_seconds), (2.0, 5.0));
    assert_eq!(segs[0].source_start_seconds, 1.0);
    assert_eq!(segs[1].id, right);
    assert_eq!((segs[1].start_seconds, segs[1].end_seconds), (5.0, 8.0));
    assert_eq!(segs[1].source_start_seconds, 4.0);
}

#[test]
fn split_lower_third_keeps_snapshot() {
    let mut tl = Timeline::new();
    let timing = TimingRuleConfig::new(TimingRule::LastOnly, Some(1.0));
    tl.lower_thirds.push(lower_third(1, 0.0, 4.0, timing));
    tl.playhead_seconds = 1.0;
    let mut ids = Seq(10);
    split_at_playhead(&mut tl, SplitTarget::LowerThird, &id(1), &mut ids).unwrap();
    assert_eq!(tl.lower_thirds.len(), 2);
    assert!(tl.lower_thirds.iter().all(|lt| lt.config_snapshot.timing == timing));
    assert_eq!(tl.lower_thirds[1].start_seconds, 1.0);

    assert!(split_at_playhead(&mut tl, SplitTarget::Narration, &id(1), &mut ids).is_none());
}

#[test]
fn split_with_monotonic_generator_orders_halves() {
    let mut tl = Timeline::new();
    tl.narration.push(audio(1, 0.0, 6.0, 0.0));
    tl.playhead_seconds = 3.0;
    let mut ids = crate::ids::ulid::MonotonicGenerator::new();
    let right = split_at_playhead(&mut tl, SplitTarget::Narration, &id(1), &mut ids).unwrap();
    assert!(tl.narration[0].id < right);
}

#[test]
fn retime_promotes_full_coverage_caption() {
    let mut tl = Timeline::new();
    let timing = TimingRuleConfig::new(TimingRule::FirstOnly, Some(3.0));
    tl.lower_thirds.push(lower_third(1, 0.0, 3.0, timing));

    assert!(retime_lower_third(&mut tl, &id(1), 0.0, 6.0));
    let lt = &tl.lower_thirds[0];
    assert_eq!(lt.end_seconds, 6.0);
    assert_eq!(lt.config_snapshot.timing, TimingRuleConfig::entire());

    assert!(!retime_lower_third(&mut tl, &id(1), 4.0, 4.0));
    assert!(!retime_lower_third(&mut tl, &id(2), 0.0, 1.0));
}

#[test]
fn rebind_writes_chosen_segment_or_clears() {
    let mut tl = Timeline::new();
    tl.audio_segments = vec![audio(1, 0.0, 12.0, 0.0), audio(2, 12.0, 20.0, 0.0)];
    tl.visualizers.push(crate::composition::model::Visualizer {
        id: id(5),
        preset_id: None,
        start_seconds: 10.0,
        end_seconds: 15.0,
        audio_source_kind: AudioSourceKind::Music,
        audio_source_segment_id: Some(id(2)),
        placement: Default::default(),
    });

    assert_eq!(rebind_visualizer(&mut tl, &id(5)), Some(id(1)));
    assert_eq!(tl.visualizers[0].audio_source_segment_id, Some(id(1)));

    tl.visualizers[0].audio_source_kind = AudioSourceKind::Narration;
    assert_eq!(rebind_visualizer(&mut tl, &id(5)), None);
    assert_eq!(tl.visualizers[0].audio_source_segment_id, None);

    assert_eq!(rebind_visualizer(&mut tl, &id(99)), None);
}

fn bound_visualizer(n: u32, start: f64, end: f64, kind: AudioSourceKind, to: u32) -> Visualizer {
    Visualizer {
        id: id(n),
        preset_id: None,
        start_seconds: start,
        end_seconds: end,
        audio_source_kind: kind,
        audio_source_segment_id: Some(id(to)),
        placement: Default::default(),
    }
}

#[test]
fn split_music_moves_visualizer_bindings_to_halves() {
    let mut tl = Timeline::new();
    tl.audio_segments = vec![audio(1, 0.0, 10.0, 0.0), audio(2, 10.0, 20.0, 0.0)];
    tl.visualizers = vec![
        bound_visualizer(5, 6.0, 9.0, AudioSourceKind::Music, 1),
        bound_visualizer(6, 1.0, 3.0, AudioSourceKind::Music, 1),
        bound_visualizer(7, 12.0, 14.0, AudioSourceKind::Music, 2),
    ];
    tl.playhead_seconds = 5.0;
    let mut ids = Seq(1000);
    let right = split_at_playhead(&mut tl, SplitTarget::Music, &id(1), &mut ids).unwrap();
    let left = tl.audio_segments[0].id.clone();
    assert_eq!(left, id(1000));

    let bound: Vec<Option<Identifier>> = tl
        .visualizers
        .iter()
        .map(|v| v.audio_source_segment_id.clone())
        .collect();
    assert_eq!(bound, [Some(right), Some(left), Some(id(2))]);
    for v in &tl.visualizers {
        let target = v.audio_source_segment_id.as_ref().unwrap();
        assert!(tl.find(target).is_some(), "{target} dangles");
    }
    tl.validate().unwrap();
}

#[test]
fn split_clip_moves_video_visualizer_binding() {
    let mut tl = two_clip_timeline();
    tl.visualizers.push(bound_visualizer(5, 2.5, 3.5, AudioSourceKind::Video, 1));
    tl.playhead_seconds = 1.5;
    let mut ids = Seq(1000);
    let right = split_at_playhead(&mut tl, SplitTarget::Clip, &id(1), &mut ids).unwrap();
    assert_eq!(tl.visualizers[0].audio_source_segment_id, Some(right));
}

#[test]
fn refused_or_caption_split_leaves_bindings_alone() {
    let mut tl = Timeline::new();
    tl.audio_segments.push(audio(1, 0.0, 10.0, 0.0));
    tl.lower_thirds.push(lower_third(3, 0.0, 4.0, TimingRuleConfig::entire()));
    tl.visualizers.push(bound_visualizer(5, 6.0, 9.0, AudioSourceKind::Music, 1));
    let mut ids = Seq(1000);

    tl.playhead_seconds = 9.9;
    assert!(split_at_playhead(&mut tl, SplitTarget::Music, &id(1), &mut ids).is_none());
    tl.playhead_seconds = 2.0;
    split_at_playhead(&mut tl, SplitTarget::LowerThird, &id(3), &mut ids).unwrap();
    assert_eq!(tl.visualizers[0].audio_source_segment_id, Some(id(1)));
}

#[test]
fn retime_rejects_non_finite_bounds() {
    let mut tl = Timeline::new();
    let timing = TimingRuleConfig::new(TimingRule::FirstOnly, Some(3.0));
    tl.lower_thirds.push(lower_third(1, 2.0, 5.0, timing));
    let before = tl.clone();

    assert!(!retime_lower_third(&mut tl, &id(1), f64::NAN, 4.0));
    assert!(!retime_lower_third(&mut tl, &id(1), f64::NEG_INFINITY, 4.0));
    assert!(!retime_lower_third(&mut tl, &id(1), 2.0, f64::INFINITY));
    assert!(!retime_lower_third(&mut tl, &id(1), 2.0, f64::NAN));
    assert_eq!(tl, before);

    assert!(retime_lower_third(&mut tl, &id(1), -1.0, 3.0));
    assert_eq!(tl.lower_thirds[0].start_seconds, 0.0);
    assert_eq!(tl.lower_thirds[0].config_snapshot.timing, timing);
}
