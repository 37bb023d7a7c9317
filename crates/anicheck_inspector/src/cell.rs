use anicheck_geometry::Size;
use anicheck_scene::{NodeId, Scene};
use hecs::Entity;
use indexmap::IndexMap;
use nalgebra::Point2;

use crate::GroupId;

/// A fixed-size slot of the grid, hosting one instance of every group.
#[derive(Debug)]
pub struct GridCell {
    /// One based, as shown to the user
    index: usize,
    node: NodeId,
    origin: Point2<f32>,
    instances: IndexMap<GroupId, Entity>,
}

impl GridCell {
    pub fn new(scene: &mut dyn Scene, index: usize, size: Size<f32>) -> Self {
        let node = scene.create_cell(index);
        scene.set_bounds(node, size);

        Self {
            index,
            node,
            origin: Point2::origin(),
            instances: IndexMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Container node the instance nodes get attached to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn origin(&self) -> Point2<f32> {
        self.origin
    }

    /// Registers the instance of `group`. A cell holds at most one instance
    /// per group: a second one is ignored and the first one kept.
    pub fn add_instance(&mut self, group: GroupId, entity: Entity) {
        debug_assert!(
            !self.instances.contains_key(&group),
            "cell {} already hosts an instance of {group:?}",
            self.index
        );

        self.instances.entry(group).or_insert(entity);
    }

    /// No-op when the cell does not host `entity`.
    pub fn remove_instance(&mut self, entity: Entity) {
        self.instances.retain(|_, instance| *instance != entity);
    }

    /// Removes the instance of `group`, handing it back for despawning.
    pub fn remove_group(&mut self, group: GroupId) -> Option<Entity> {
        self.instances.shift_remove(&group)
    }

    pub fn has_group(&self, group: GroupId) -> bool {
        self.instances.contains_key(&group)
    }

    pub fn instance_of(&self, group: GroupId) -> Option<Entity> {
        self.instances.get(&group).copied()
    }

    /// Instances in the order their groups were added.
    pub fn instances(&self) -> impl Iterator<Item = (GroupId, Entity)> + '_ {
        self.instances.iter().map(|(group, entity)| (*group, *entity))
    }

    /// Changes the background and clip region. Instances are left alone.
    pub fn resize(&mut self, scene: &mut dyn Scene, size: Size<f32>) {
        scene.set_bounds(self.node, size);
    }

    /// Places the cell on screen. Everything inside is scaled by `scale`.
    pub fn place(&mut self, scene: &mut dyn Scene, origin: Point2<f32>, scale: f32) {
        self.origin = origin;
        scene.set_position(self.node, origin);
        scene.set_scale(self.node, scale);
    }

    /// Destroys the container node together with every attached instance node.
    /// Returns the instances so the caller can despawn them.
    pub fn destroy(self, scene: &mut dyn Scene) -> Vec<(GroupId, Entity)> {
        scene.destroy(self.node);
        self.instances.into_iter().collect()
    }
}
