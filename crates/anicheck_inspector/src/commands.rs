//! Parsing of the text typed into the control panel.
//!
//! Every helper returns `None` for input that must not reach a mutator:
//! text that is not a number, or a number out of the accepted range.

use anicheck_geometry::PivotPreset;
use strum::IntoEnumIterator;

fn number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// A group scale, strictly positive.
pub fn parse_scale(text: &str) -> Option<f32> {
    number(text).filter(|v| *v > 0.)
}

/// A position or offset component, any finite value.
pub fn parse_coordinate(text: &str) -> Option<f32> {
    number(text)
}

/// Columns per row, at least one.
pub fn parse_columns(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|v| *v >= 1)
}

/// A cell width or height, strictly positive.
pub fn parse_dimension(text: &str) -> Option<f32> {
    number(text).filter(|v| *v > 0.)
}

/// Matches the labels shown in the pivot dropdown.
pub fn parse_pivot_preset(text: &str) -> Option<PivotPreset> {
    let text = text.trim();
    PivotPreset::iter().find(|preset| preset.to_string().eq_ignore_ascii_case(text))
}
