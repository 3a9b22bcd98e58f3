use super::*;
use crate::composition::config::{FadeMode, TimingRule};

fn id(n: u32) -> Identifier {
    Identifier::parse(&format!("{n:026}")).unwrap()
}

fn clip(n: u32, src: (f64, f64), start: Option<f64>) -> Clip {
    Clip {
        id: id(n),
        upload_id: Some(u64::from(n)),
        source_start_seconds: src.0,
        source_end_seconds: src.1,
        start_seconds: start,
    }
}

fn lower_third(n: u32, start: f64, end: f64) -> LowerThird {
    LowerThird {
        id: id(n),
        upload_id: None,
        start_seconds: start,
        end_seconds: end,
        config_snapshot: LowerThirdConfig::default(),
    }
}

#[test]
fn clips_pack_sequentially_unless_explicit() {
    let mut tl = Timeline::new();
    tl.clips = vec![
        clip(1, (0.0, 4.0), None),
        clip(2, (10.0, 12.5), None),
        clip(3, (0.0, 1.0), Some(20.0)),
        clip(4, (0.0, 1.0), None),
    ];
    let spans: Vec<(f64, f64)> = tl
        .elements()
        .iter()
        .map(|e| (e.start_seconds(), e.end_seconds()))
        .collect();
    assert_eq!(spans, [(0.0, 4.0), (4.0, 6.5), (20.0, 21.0), (21.0, 22.0)]);
}

#[test]
fn elements_follow_document_order() {
    let mut tl = Timeline::new();
    tl.guidelines.push(Guideline { id: id(9), seconds: 1.0 });
    tl.lower_thirds.push(lower_third(5, 0.0, 2.0));
    tl.clips.push(clip(1, (0.0, 3.0), None));
    let kinds: Vec<&str> = tl.elements().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, ["clip", "lower_third", "guideline"]);
    assert_eq!(tl.find(&id(5)).map(|e| e.kind()), Some("lower_third"));
    assert!(tl.find(&id(42)).is_none());
}

#[test]
fn validate_accepts_well_formed_document() {
    let mut tl = Timeline::new();
    tl.clips.push(clip(1, (0.0, 3.0), None));
    tl.lower_thirds.push(lower_third(2, 0.5, 2.5));
    tl.guidelines.push(Guideline { id: id(3), seconds: 1.0 });
    tl.validate().unwrap();
}

#[test]
fn validate_rejects_broken_invariants() {
    let mut tl = Timeline::new();
    tl.lower_thirds.push(lower_third(1, 2.0, 2.0));
    assert!(matches!(tl.validate(), Err(ClipdeckError::Validation(_))));

    let mut tl = Timeline::new();
    tl.lower_thirds.push(lower_third(1, 0.0, 1.0));
    tl.guidelines.push(Guideline { id: id(1), seconds: 0.5 });
    let err = tl.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate identifier"));

    let mut tl = Timeline::new();
    tl.clips.push(clip(1, (3.0, 1.0), None));
    assert!(tl.validate().is_err());

    let mut tl = Timeline::new();
    tl.version = "create_video_v0".to_owned();
    assert!(tl.validate().is_err());

    let mut tl = Timeline::new();
    tl.guidelines.push(Guideline { id: id(1), seconds: -1.0 });
    assert!(tl.validate().is_err());

    let mut tl = Timeline::new();
    let mut lt = lower_third(1, 0.0, 1.0);
    lt.config_snapshot.opacity_pct = 140.0;
    tl.lower_thirds.push(lt);
    assert!(tl.validate().is_err());
}

#[test]
fn partial_json_document_loads_with_defaults() {
    let json = r#"{
        "clips": [
            { "id": "00000000000000000000000001", "sourceStartSeconds": 0, "sourceEndSeconds": 5 }
        ],
        "lowerThirds": [
            {
                "id": "00000000000000000000000002",
                "startSeconds": 1,
                "endSeconds": 4,
                "configSnapshot": {
                    "position": "top_left",
                    "timingRule": "first_only",
                    "timingSeconds": 2,
                    "fade": "in_out"
                }
            }
        ],
        "visualizers": [
            {
                "id": "00000000000000000000000003",
                "startSeconds": 0,
                "endSeconds": 5,
                "audioSourceKind": "mystery",
                "sizePctWidth": 40
            }
        ]
    }"#;
    let tl: Timeline = serde_json::from_str(json).unwrap();
    assert_eq!(tl.version, TIMELINE_VERSION);
    assert_eq!(tl.playhead_seconds, 0.0);

    let cfg = tl.lower_thirds[0].config_snapshot;
    assert_eq!(cfg.placement.position.as_str(), "top_left");
    assert_eq!(cfg.timing.timing_rule, TimingRule::FirstOnly);
    assert_eq!(cfg.timing.timing_seconds, Some(2.0));
    assert_eq!(cfg.fade.fade, FadeMode::InOut);
    assert_eq!(cfg.opacity_pct, 100.0);

    let viz = &tl.visualizers[0];
    assert_eq!(viz.audio_source_kind, AudioSourceKind::Narration);
    assert_eq!(viz.placement.size_pct_width, 40.0);
    assert!(viz.audio_source_segment_id.is_none());

    tl.validate().unwrap();
}

#[test]
fn malformed_identifier_fails_to_load() {
    let json = r#"{"guidelines":[{"id":"guide-1","seconds":1}]}"#;
    assert!(serde_json::from_str::<Timeline>(json).is_err());
}

#[test]
fn document_survives_json_round_trip() {
    let mut tl = Timeline::new();
    tl.clips.push(clip(1, (0.0, 3.0), Some(0.0)));
    let mut lt = lower_third(2, 0.0, 3.0);
    lt.config_snapshot.timing = TimingRuleConfig::new(TimingRule::LastOnly, Some(1.0));
    tl.lower_thirds.push(lt);
    let json = serde_json::to_string(&tl).unwrap();
    let back: Timeline = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tl);
}
