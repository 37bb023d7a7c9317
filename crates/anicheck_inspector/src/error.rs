use thiserror::Error;

use crate::GroupId;

#[derive(Debug, Error, PartialEq)]
pub enum InspectorError {
    #[error("no resource group is selected")]
    NoSelection,
    #[error("no instance is selected, enable relative mode and pick one first")]
    NoInstanceSelected,
    #[error("group {0:?} does not exist")]
    UnknownGroup(GroupId),
    #[error("a resource group needs at least one resource")]
    EmptyGroup,
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f32),
    #[error("position must be finite, got ({0}, {1})")]
    InvalidPosition(f32, f32),
    #[error("columns per row must be at least 1, got {0}")]
    InvalidColumns(usize),
    #[error("cell size must be positive and finite, got {0}x{1}")]
    InvalidCellSize(f32, f32),
    #[error("the selected group has no skeletal resources")]
    NotSkeletal,
    #[error("unable to export coordinates: {0}")]
    Export(String),
}
