use nalgebra::Vector2;
use serde::Serialize;

/// Relative coordinates of one instance, as handed out by the export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportedOffset {
    pub x: f32,
    pub y: f32,
}

impl From<Vector2<f32>> for ExportedOffset {
    fn from(offset: Vector2<f32>) -> Self {
        Self {
            x: round3(offset.x),
            y: round3(offset.y),
        }
    }
}

/// Rounds half away from zero to 3 decimals.
fn round3(value: f32) -> f32 {
    let rounded = ((value as f64) * 1000.).round() / 1000.;
    // Avoid exporting -0
    if rounded == 0. {
        0.
    } else {
        rounded as f32
    }
}

/// Pretty printed json array of `{ "x": .., "y": .. }` objects.
pub fn to_json(offsets: &[ExportedOffset]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(offsets)
}
