//! An inspector for sprite sequences and Spine skeletons.
//!
//! Resources are loaded as groups and shown side by side in a grid of
//! equally sized cells. Every cell holds one instance of every group, and
//! every instance of a group follows the group's transform and animation.

pub use anicheck_assets as assets;
pub use anicheck_collections as collections;
pub use anicheck_events as events;
pub use anicheck_geometry as geometry;
pub use anicheck_input as input;
pub use anicheck_inspector as inspector;
pub use anicheck_scene as scene;

pub use anicheck_inspector::{
    Config, ConfigStore, GroupId, Inspector, InspectorError, InspectorEvent, JsonFileStore,
    MemoryStore,
};
pub use anicheck_scene::{HeadlessScene, Scene};
