//! Per-feature display colors derived from identity.

use bevy::prelude::*;

use super::FeatureId;

const HUE_STEPS: u64 = 360;
const SATURATION_MIN: f32 = 0.55;
const SATURATION_STEPS: u64 = 31;
const LIGHTNESS_MIN: f32 = 0.40;
const LIGHTNESS_STEPS: u64 = 21;

/// Hue in degrees, saturation and lightness for a feature.
///
/// Saturation stays within 0.55..=0.85 and lightness within 0.40..=0.60 so no
/// feature washes out to white or disappears into black.
pub fn unique_hsl(id: &FeatureId) -> (f32, f32, f32) {
    // Identity bits are already uniformly spread
    let hash = id.low_bits();
    let hue = (hash % HUE_STEPS) as f32;
    let saturation = SATURATION_MIN + ((hash >> 16) % SATURATION_STEPS) as f32 / 100.0;
    let lightness = LIGHTNESS_MIN + ((hash >> 32) % LIGHTNESS_STEPS) as f32 / 100.0;
    (hue, saturation, lightness)
}

pub fn unique_color(id: &FeatureId) -> Color {
    let (hue, saturation, lightness) = unique_hsl(id);
    Color::hsl(hue, saturation, lightness)
}
