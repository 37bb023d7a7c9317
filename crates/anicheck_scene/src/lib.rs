use anicheck_assets::{AtlasHandle, SkeletonHandle, TextureHandle};
use anicheck_geometry::{Pivot, Size};
use derive_more::{Constructor, Display};
use nalgebra::Point2;

pub mod headless;

pub use headless::HeadlessScene;

/// Opaque identifier of a node owned by the rendering backend.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Constructor)]
#[display(fmt = "node#{}", _0)]
pub struct NodeId(pub u32);

/// The rendering backend as seen by the inspector.
///
/// Nodes form a tree under an implicit root: cells are attached to the root,
/// resource nodes to their cell. Positions are in the parent's coordinate
/// space, so every resource node of one group shares the same coordinates
/// no matter which cell it is drawn in.
pub trait Scene {
    /// A textured quad anchored at its center.
    fn create_quad(&mut self, texture: TextureHandle) -> NodeId;

    fn create_skeleton(&mut self, skeleton: SkeletonHandle, atlas: AtlasHandle) -> NodeId;

    /// A cell container attached to the root. `index` is only used for display.
    fn create_cell(&mut self, index: usize) -> NodeId;

    /// Destroys a node and everything attached to it. Unknown nodes are ignored.
    fn destroy(&mut self, node: NodeId);

    fn attach(&mut self, parent: NodeId, child: NodeId);

    fn set_position(&mut self, node: NodeId, position: Point2<f32>);

    fn set_scale(&mut self, node: NodeId, scale: f32);

    /// Image alignment, a fraction of the texture size.
    fn set_anchor(&mut self, node: NodeId, pivot: Pivot);

    /// Resizes the cell background and its clip region.
    fn set_bounds(&mut self, cell: NodeId, size: Size<f32>);

    /// Starts `name` from its first frame.
    fn play_animation(&mut self, node: NodeId, name: &str, looping: bool);

    /// Animations actually present in the skeleton data of `node`.
    fn animation_names(&self, node: NodeId) -> Vec<String>;

    /// Vertical translation of the whole grid, used for scrolling.
    fn set_root_offset(&mut self, y: f32);
}
