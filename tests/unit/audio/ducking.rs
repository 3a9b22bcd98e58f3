use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn defaults_apply_without_ducking() {
    let mix = resolve_music_mix(&MusicMixConfig::default());
    assert_eq!(mix.video_gain_db, 0.0);
    assert_eq!(mix.music_gain_db, -18.0);
    assert_eq!(mix.ducking_amount_db, 12.0);
    assert!(mix.sidechain.is_none());
}

#[test]
fn ducking_maps_amount_to_ratio_and_levels() {
    let mix = resolve_music_mix(&MusicMixConfig {
        ducking_enabled: true,
        ..MusicMixConfig::default()
    });
    let sc = mix.sidechain.unwrap();
    assert_eq!(sc.ratio, 7.0);
    assert_eq!(sc.threshold, 0.1);
    assert_eq!(sc.attack_ms, 20.0);
    assert_eq!(sc.release_ms, 250.0);
    assert!(approx(sc.level_in, 10f64.powf(-18.0 / 20.0)));
    assert_eq!(sc.level_sc, 1.0);
}

#[test]
fn ratio_and_levels_are_clamped() {
    let cfg = |amount: f64, music: f64, video: f64| MusicMixConfig {
        video_gain_db: Some(video),
        music_gain_db: Some(music),
        ducking_enabled: true,
        ducking_amount_db: Some(amount),
    };
    let sc = resolve_music_mix(&cfg(0.0, -60.0, 60.0)).sidechain.unwrap();
    assert_eq!(sc.ratio, 2.0);
    assert_eq!(sc.level_in, 1.0 / 64.0);
    assert_eq!(sc.level_sc, 64.0);

    let sc = resolve_music_mix(&cfg(80.0, 0.0, 0.0)).sidechain.unwrap();
    assert_eq!(sc.ratio, 20.0);
}

#[test]
fn gains_round_and_reject_non_finite() {
    let mix = resolve_music_mix(&MusicMixConfig {
        video_gain_db: Some(-3.5),
        music_gain_db: Some(f64::NAN),
        ducking_enabled: false,
        ducking_amount_db: Some(f64::INFINITY),
    });
    assert_eq!(mix.video_gain_db, -3.0);
    assert_eq!(mix.music_gain_db, -18.0);
    assert_eq!(mix.ducking_amount_db, 12.0);
}

#[test]
fn config_loads_from_partial_json() {
    let cfg: MusicMixConfig = serde_json::from_str(r#"{"duckingEnabled":true,"musicGainDb":-12}"#).unwrap();
    assert!(cfg.ducking_enabled);
    assert_eq!(cfg.music_gain_db, Some(-12.0));
    assert_eq!(cfg.video_gain_db, None);
}
