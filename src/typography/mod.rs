pub mod presets;
pub mod size_curve;
