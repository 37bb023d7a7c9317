use std::collections::HashMap;

use anicheck_assets::{
    atlas::SpineAtlas,
    ingest::{SkeletonFormat, SpineFileGroup},
    png::decode_png,
    skeleton::SpineSkeletonFile,
    AssetDecoder, AssetError, AssetFile, AtlasHandle, ImageAsset, SkeletalAsset, SkeletonHandle,
    TextureHandle,
};
use anicheck_geometry::{Pivot, Size};
use anyhow::{Context, Result};
use nalgebra::Point2;

use crate::{NodeId, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Cell(usize),
    Quad(TextureHandle),
    Skeleton(SkeletonHandle, AtlasHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub animation: String,
    pub looping: bool,
    /// How many times playback was (re)started from the first frame
    pub starts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub position: Point2<f32>,
    pub scale: f32,
    pub anchor: Pivot,
    pub bounds: Option<Size<f32>>,
    pub playback: Option<Playback>,
}

impl NodeState {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            position: Point2::origin(),
            scale: 1.,
            anchor: Pivot::CENTER,
            bounds: None,
            playback: None,
        }
    }
}

/// A scene that draws nothing and remembers everything.
///
/// Used to run the inspector without a window and to observe
/// what it asks the renderer to do. It also decodes assets:
/// PNG images, atlases and JSON skeletons.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: HashMap<NodeId, NodeState>,
    next_node: u32,
    root_offset: f32,

    textures: HashMap<TextureHandle, Size<u32>>,
    skeletons: HashMap<SkeletonHandle, Vec<String>>,
    next_asset: u32,
}

impl HeadlessScene {
    pub fn node(&self, node: NodeId) -> Option<&NodeState> {
        self.nodes.get(&node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of `parent` in creation order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, state)| state.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect();
        children.sort();
        children
    }

    /// Cells in creation order.
    pub fn cells(&self) -> Vec<NodeId> {
        let mut cells: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, state)| matches!(state.kind, NodeKind::Cell(_)))
            .map(|(id, _)| *id)
            .collect();
        cells.sort();
        cells
    }

    pub fn root_offset(&self) -> f32 {
        self.root_offset
    }

    pub fn texture_size(&self, texture: TextureHandle) -> Option<Size<u32>> {
        self.textures.get(&texture).copied()
    }

    /// Registers skeleton data with the given animations without decoding any file.
    pub fn insert_skeleton<S: Into<String>>(
        &mut self,
        animations: impl IntoIterator<Item = S>,
    ) -> SkeletalAsset {
        let animations: Vec<String> = animations.into_iter().map(Into::into).collect();
        let id = self.next_asset();
        let skeleton = SkeletonHandle(id);
        self.skeletons.insert(skeleton, animations.clone());

        SkeletalAsset::new(skeleton, AtlasHandle(id), animations)
    }

    /// Replaces the animations a loaded skeleton really has, leaving
    /// what was declared at decode time untouched.
    pub fn replace_skeleton_animations<S: Into<String>>(
        &mut self,
        skeleton: SkeletonHandle,
        animations: impl IntoIterator<Item = S>,
    ) {
        self.skeletons
            .insert(skeleton, animations.into_iter().map(Into::into).collect());
    }

    pub fn insert_texture(&mut self, size: Size<u32>) -> ImageAsset {
        let texture = TextureHandle(self.next_asset());
        self.textures.insert(texture, size);
        ImageAsset::new(texture, size)
    }

    fn next_asset(&mut self) -> u32 {
        self.next_asset += 1;
        self.next_asset
    }

    fn spawn(&mut self, kind: NodeKind) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        self.nodes.insert(id, NodeState::new(kind));
        id
    }

    fn with_node(&mut self, node: NodeId, f: impl FnOnce(&mut NodeState)) {
        match self.nodes.get_mut(&node) {
            Some(state) => f(state),
            None => log::warn!("{node} does not exist"),
        }
    }
}

impl Scene for HeadlessScene {
    fn create_quad(&mut self, texture: TextureHandle) -> NodeId {
        self.spawn(NodeKind::Quad(texture))
    }

    fn create_skeleton(&mut self, skeleton: SkeletonHandle, atlas: AtlasHandle) -> NodeId {
        self.spawn(NodeKind::Skeleton(skeleton, atlas))
    }

    fn create_cell(&mut self, index: usize) -> NodeId {
        self.spawn(NodeKind::Cell(index))
    }

    fn destroy(&mut self, node: NodeId) {
        if self.nodes.remove(&node).is_none() {
            return;
        }

        for child in self.children(node) {
            self.destroy(child);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.with_node(child, |state| state.parent = Some(parent));
    }

    fn set_position(&mut self, node: NodeId, position: Point2<f32>) {
        self.with_node(node, |state| state.position = position);
    }

    fn set_scale(&mut self, node: NodeId, scale: f32) {
        self.with_node(node, |state| state.scale = scale);
    }

    fn set_anchor(&mut self, node: NodeId, pivot: Pivot) {
        self.with_node(node, |state| state.anchor = pivot);
    }

    fn set_bounds(&mut self, cell: NodeId, size: Size<f32>) {
        self.with_node(cell, |state| state.bounds = Some(size));
    }

    fn play_animation(&mut self, node: NodeId, name: &str, looping: bool) {
        self.with_node(node, |state| {
            let starts = state.playback.as_ref().map_or(0, |p| p.starts);
            state.playback = Some(Playback {
                animation: name.to_owned(),
                looping,
                starts: starts + 1,
            });
        });
    }

    fn animation_names(&self, node: NodeId) -> Vec<String> {
        match self.nodes.get(&node).map(|state| state.kind) {
            Some(NodeKind::Skeleton(skeleton, _)) => {
                self.skeletons.get(&skeleton).cloned().unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }

    fn set_root_offset(&mut self, y: f32) {
        self.root_offset = y;
    }
}

impl AssetDecoder for HeadlessScene {
    fn decode_image(&mut self, file: &AssetFile) -> Result<ImageAsset> {
        if file.extension().as_deref() != Some("png") {
            return Err(AssetError::UnsupportedImage(file.name.clone()).into());
        }

        let (_, size) =
            decode_png(&file.bytes).with_context(|| format!("decoding {}", file.name))?;
        Ok(self.insert_texture(size))
    }

    fn decode_skeleton(&mut self, group: &SpineFileGroup) -> Result<SkeletalAsset> {
        if group.skeleton_format() != SkeletonFormat::Json {
            return Err(AssetError::UnsupportedSkeleton(group.skeleton.name.clone()).into());
        }

        let atlas_text = std::str::from_utf8(&group.atlas.bytes)
            .with_context(|| format!("{} is not utf-8", group.atlas.name))?;
        let atlas = SpineAtlas::parse(atlas_text);
        for (page, image) in atlas.resolve_pages(&group.atlas.name, &group.images)? {
            decode_png(&image.bytes)
                .with_context(|| format!("decoding atlas page {}", page.name))?;
        }

        let skeleton_text = std::str::from_utf8(&group.skeleton.bytes)
            .with_context(|| format!("{} is not utf-8", group.skeleton.name))?;
        let skeleton = SpineSkeletonFile::decode(skeleton_text)?;

        Ok(self.insert_skeleton(skeleton.animation_names()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_removes_attached_children() {
        let mut scene = HeadlessScene::default();
        let cell = scene.create_cell(1);
        let quad = scene.create_quad(TextureHandle(1));
        let other = scene.create_quad(TextureHandle(2));
        scene.attach(cell, quad);

        scene.destroy(cell);

        assert!(scene.node(cell).is_none());
        assert!(scene.node(quad).is_none());
        assert!(scene.node(other).is_some());
    }

    #[test]
    fn test_play_animation_counts_restarts() {
        let mut scene = HeadlessScene::default();
        let asset = scene.insert_skeleton(["idle", "run"]);
        let node = scene.create_skeleton(asset.skeleton, asset.atlas);

        scene.play_animation(node, "idle", true);
        scene.play_animation(node, "idle", false);

        let playback = scene.node(node).unwrap().playback.clone().unwrap();
        assert_eq!(playback.animation, "idle");
        assert!(!playback.looping);
        assert_eq!(playback.starts, 2);
        assert_eq!(scene.animation_names(node), vec!["idle", "run"]);
    }

    #[test]
    fn test_decode_json_skeleton_group() {
        let page = lodepng_page();
        let group = SpineFileGroup {
            name: "slime".into(),
            skeleton: AssetFile::new("slime.json", r#"{"animations":{"jump":{},"idle":{}}}"#),
            atlas: AssetFile::new("slime.atlas", "slime.png\nsize: 1,1\nbody\n  xy: 0, 0\n"),
            images: vec![AssetFile::new("slime.png", page)],
        };

        let mut scene = HeadlessScene::default();
        let asset = scene.decode_skeleton(&group).unwrap();
        assert_eq!(asset.animations, vec!["jump", "idle"]);

        let node = scene.create_skeleton(asset.skeleton, asset.atlas);
        assert_eq!(scene.animation_names(node), vec!["jump", "idle"]);
    }

    #[test]
    fn test_binary_skeletons_are_rejected() {
        let group = SpineFileGroup {
            name: "hero".into(),
            skeleton: AssetFile::new("hero.skel", vec![0u8, 1, 2]),
            atlas: AssetFile::new("hero.atlas", ""),
            images: vec![],
        };

        let mut scene = HeadlessScene::default();
        assert!(scene.decode_skeleton(&group).is_err());
    }

    #[test]
    fn test_decode_image_requires_png() {
        let mut scene = HeadlessScene::default();
        assert!(scene
            .decode_image(&AssetFile::new("photo.jpg", vec![1u8, 2, 3]))
            .is_err());

        let asset = scene
            .decode_image(&AssetFile::new("frame.png", lodepng_page()))
            .unwrap();
        assert_eq!(scene.texture_size(asset.texture), Some(Size::new(1, 1)));
    }

    fn lodepng_page() -> Vec<u8> {
        lodepng::encode32(&[rgb::RGBA8::new(0, 0, 0, 255)], 1, 1).unwrap()
    }
}
