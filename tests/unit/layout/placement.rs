use super::*;
use crate::composition::config::{Anchor, InsetPreset};

fn cfg(position: &str) -> PlacementConfig {
    PlacementConfig {
        position: Anchor::parse(position),
        ..PlacementConfig::default()
    }
}

#[test]
fn bottom_right_uses_medium_presets_by_default() {
    let p = resolve_placement(&PlacementConfig::default());
    assert_eq!(p.width_pct, 15.0);
    assert_eq!(p.right(), Some(10.0));
    assert_eq!(p.bottom(), Some(10.0));
    assert_eq!(p.left(), None);
    assert_eq!(p.top(), None);
    assert_eq!(p.centering_axes(), CenteringAxes::default());
}

#[test]
fn legacy_center_centers_both_axes() {
    let p = resolve_placement(&cfg("center"));
    assert_eq!(p.horizontal, HorizontalPlacement::Center);
    assert_eq!(p.vertical, VerticalPlacement::Middle);
    assert_eq!(p.centering_axes(), CenteringAxes { x: true, y: true });
}

#[test]
fn pixel_insets_take_precedence_over_presets() {
    let mut c = cfg("top_left");
    c.inset_x_px = Some(108.0);
    c.inset_y_px = Some(192.0);
    c.inset_x_preset = InsetPreset::Large;
    c.inset_y_preset = InsetPreset::Small;
    let p = resolve_placement(&c);
    assert_eq!(p.left(), Some(10.0));
    assert_eq!(p.top(), Some(10.0));
}

#[test]
fn non_finite_pixel_inset_falls_back_to_preset() {
    let mut c = cfg("top_left");
    c.inset_x_px = Some(f64::NAN);
    c.inset_x_preset = InsetPreset::Small;
    let p = resolve_placement(&c);
    assert_eq!(p.left(), Some(6.0));
}

#[test]
fn pixel_insets_are_clamped_before_conversion() {
    let mut c = cfg("bottom_left");
    c.inset_x_px = Some(-50.0);
    c.inset_y_px = Some(50_000.0);
    let p = resolve_placement(&c);
    assert_eq!(p.left(), Some(0.0));
    assert_eq!(p.bottom(), Some(9999.0 / 1920.0 * 100.0));
}

#[test]
fn centered_axis_ignores_inset() {
    let mut c = cfg("top_center");
    c.inset_x_px = Some(500.0);
    let p = resolve_placement(&c);
    assert_eq!(p.horizontal, HorizontalPlacement::Center);
    assert_eq!(p.left(), None);
    assert_eq!(p.right(), None);
}

#[test]
fn size_is_clamped_and_nan_falls_to_minimum() {
    let mut c = cfg("bottom_right");
    c.size_pct_width = 250.0;
    assert_eq!(resolve_placement(&c).width_pct, 100.0);
    c.size_pct_width = 0.0;
    assert_eq!(resolve_placement(&c).width_pct, 1.0);
    c.size_pct_width = f64::NAN;
    assert_eq!(resolve_placement(&c).width_pct, 1.0);
}

#[test]
fn no_anchor_pins_opposing_edges() {
    for row in ["top", "middle", "bottom", "garbage"] {
        for col in ["left", "center", "right", "garbage"] {
            let p = resolve_placement(&cfg(&format!("{row}_{col}")));
            assert!(!(p.left().is_some() && p.right().is_some()));
            assert!(!(p.top().is_some() && p.bottom().is_some()));
        }
    }
}

#[test]
fn css_declarations_match_preview_contract() {
    let css = resolve_placement(&cfg("middle_center")).css_declarations();
    assert!(css.contains(&("left", "50%".to_owned())));
    assert!(css.contains(&("top", "50%".to_owned())));
    assert!(css.contains(&("transform", "translateX(-50%) translateY(-50%)".to_owned())));

    let css = resolve_placement(&cfg("top_right")).css_declarations();
    assert!(css.contains(&("right", "10%".to_owned())));
    assert!(css.contains(&("top", "10%".to_owned())));
    assert!(!css.iter().any(|(k, _)| *k == "transform"));
}

#[test]
fn resolution_is_idempotent_across_persistence() {
    let mut c = cfg("bottom_left");
    c.inset_x_px = Some(37.5);
    let json = serde_json::to_string(&c).unwrap();
    let back: PlacementConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(resolve_placement(&c), resolve_placement(&back));
}
