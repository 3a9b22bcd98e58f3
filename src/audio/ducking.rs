use crate::foundation::math::{finite_or, round_half_up};

pub const DEFAULT_VIDEO_GAIN_DB: f64 = 0.0;
pub const DEFAULT_MUSIC_GAIN_DB: f64 = -18.0;
pub const DEFAULT_DUCKING_AMOUNT_DB: f64 = 12.0;

/// Sidechain threshold, linear `0..1`.
pub const SIDECHAIN_THRESHOLD: f64 = 0.1;
pub const SIDECHAIN_ATTACK_MS: f64 = 20.0;
pub const SIDECHAIN_RELEASE_MS: f64 = 250.0;

const LEVEL_MIN: f64 = 1.0 / 64.0;
const LEVEL_MAX: f64 = 64.0;

/// How background music is mixed under the program audio, as stored with the
/// timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicMixConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_gain_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_gain_db: Option<f64>,
    pub ducking_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ducking_amount_db: Option<f64>,
}

/// Sidechain compressor settings that duck the music under the program audio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidechainParams {
    pub threshold: f64,
    pub ratio: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
    /// Linear gain applied to the music input of the compressor.
    pub level_in: f64,
    /// Linear gain applied to the sidechain (program audio) input.
    pub level_sc: f64,
}

/// Resolved mix, consumed as-is by the export pipeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicMix {
    pub video_gain_db: f64,
    pub music_gain_db: f64,
    pub ducking_amount_db: f64,
    pub sidechain: Option<SidechainParams>,
}

fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

fn resolve_db(v: Option<f64>, fallback: f64) -> f64 {
    round_half_up(v.map_or(fallback, |db| finite_or(db, fallback)))
}

/// Resolve gains and, when ducking is on, the sidechain parameters.
///
/// Gains round to whole dB; missing or non-finite values take the defaults.
pub fn resolve_music_mix(cfg: &MusicMixConfig) -> MusicMix {
    let video_gain_db = resolve_db(cfg.video_gain_db, DEFAULT_VIDEO_GAIN_DB);
    let music_gain_db = resolve_db(cfg.music_gain_db, DEFAULT_MUSIC_GAIN_DB);
    let ducking_amount_db = resolve_db(cfg.ducking_amount_db, DEFAULT_DUCKING_AMOUNT_DB);

    let sidechain = cfg.ducking_enabled.then(|| SidechainParams {
        threshold: SIDECHAIN_THRESHOLD,
        ratio: (1.0 + round_half_up(ducking_amount_db / 2.0)).clamp(2.0, 20.0),
        attack_ms: SIDECHAIN_ATTACK_MS,
        release_ms: SIDECHAIN_RELEASE_MS,
        level_in: db_to_linear(music_gain_db).clamp(LEVEL_MIN, LEVEL_MAX),
        level_sc: db_to_linear(video_gain_db).clamp(LEVEL_MIN, LEVEL_MAX),
    });

    MusicMix {
        video_gain_db,
        music_gain_db,
        ducking_amount_db,
        sidechain,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/ducking.rs"]
mod tests;
