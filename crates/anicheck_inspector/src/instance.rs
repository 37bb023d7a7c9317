//! Components of a resource instance entity.
//!
//! An instance is one placement of a group's resource inside one grid cell.
//! Mutators write these components and tag the entity `Dirty`; the inspector
//! later pushes dirty instances to the scene.

use anicheck_geometry::Pivot;
use anicheck_scene::NodeId;
use derive_more::{Deref, DerefMut, From};
use nalgebra::{Point2, Vector2};

use crate::GroupId;

/// The group an instance belongs to. Never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref, From)]
pub struct Owner(pub GroupId);

/// Zero based index of the grid cell hosting the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref, From)]
pub struct Host(pub usize);

/// Index into the owner's resources of the descriptor this instance shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref, From)]
pub struct DescriptorIndex(pub usize);

/// Visual placement inside the cell, in unscaled cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point2<f32>,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut, From)]
pub struct Anchor(pub Pivot);

/// Offset from the group position, only applied while the group is in relative mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut, From)]
pub struct RelativeOffset(pub Vector2<f32>);

/// Animation a skeletal instance should be playing.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub animation: String,
    pub looping: bool,
    /// Set when the animation has to be started over on the next sync.
    pub restart: bool,
}

impl Playback {
    pub fn start(animation: impl Into<String>, looping: bool) -> Self {
        Self {
            animation: animation.into(),
            looping,
            restart: true,
        }
    }
}

/// The scene node drawing this instance. Added when the instance gets realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref, From)]
pub struct Node(pub NodeId);

/// Marks an instance whose components changed since the last sync.
#[derive(Debug, Clone, Copy)]
pub struct Dirty;
