use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

#[derive(Constructor, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size<T> {
    pub w: T,
    pub h: T,
}

impl<T> From<(T, T)> for Size<T> {
    fn from((w, h): (T, T)) -> Self {
        Self { w, h }
    }
}

/// Anchor of an image expressed as a fraction of its size.
/// `[0; 0]` is the top left corner, `[1; 1]` the bottom right one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub x: f32,
    pub y: f32,
}

impl Pivot {
    pub const CENTER: Pivot = Pivot { x: 0.5, y: 0.5 };

    /// Both components are clamped into `[0; 1]`, NaN falls back to the center.
    pub fn new(x: f32, y: f32) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.5 } else { v.clamp(0., 1.) };
        Self {
            x: clamp(x),
            y: clamp(y),
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Alignment choices offered for image groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum PivotPreset {
    #[strum(serialize = "top center")]
    TopCenter,
    #[strum(serialize = "center")]
    Center,
    #[strum(serialize = "bottom center")]
    BottomCenter,
}

impl From<PivotPreset> for Pivot {
    fn from(preset: PivotPreset) -> Self {
        match preset {
            PivotPreset::TopCenter => Pivot::new(0.5, 0.),
            PivotPreset::Center => Pivot::CENTER,
            PivotPreset::BottomCenter => Pivot::new(0.5, 1.),
        }
    }
}
