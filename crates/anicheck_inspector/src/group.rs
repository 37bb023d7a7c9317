use anicheck_assets::{ResourceDescriptor, ResourceKind};
use anicheck_geometry::Pivot;
use hecs::{Entity, EntityBuilder, World};
use nalgebra::{Point2, Vector2};

use crate::{
    instance::{
        Anchor, DescriptorIndex, Dirty, Host, Owner, Playback, RelativeOffset, Transform,
    },
    InspectorError, GroupId,
};

/// One logical asset, replicated once in every grid cell.
///
/// The group owns the shared transform and playback state. Every mutator
/// writes the new state to all member instances right away, tagging them
/// `Dirty` so the next sync pushes them to the scene.
#[derive(Debug)]
pub struct ResourceGroup {
    resources: Vec<ResourceDescriptor>,
    position: Point2<f32>,
    scale: f32,
    pivot: Pivot,
    /// Anchor of the image members, set apart by pivot presets
    image_pivot: Pivot,
    current_animation: Option<String>,
    loop_enabled: bool,
    use_relative_position: bool,
    members: Vec<Entity>,
}

fn mark_dirty(world: &mut World, entity: Entity) {
    if world.insert_one(entity, Dirty).is_err() {
        log::warn!("Instance {entity:?} vanished from the world");
    }
}

impl ResourceGroup {
    pub fn new(resources: Vec<ResourceDescriptor>) -> Result<Self, InspectorError> {
        if resources.is_empty() {
            return Err(InspectorError::EmptyGroup);
        }

        Ok(Self {
            resources,
            position: Point2::origin(),
            scale: 1.,
            pivot: Pivot::CENTER,
            image_pivot: Pivot::CENTER,
            current_animation: None,
            loop_enabled: true,
            use_relative_position: false,
            members: Vec::new(),
        })
    }

    /// Spawns the instance shown in the cell with the zero based `cell_index`.
    /// Cells cycle through the resources, so the cell `i` shows `resources[i % len]`.
    pub fn create_instance(&mut self, world: &mut World, id: GroupId, cell_index: usize) -> Entity {
        let index = cell_index % self.resources.len();
        let kind = self.resources[index].kind();
        let anchor = match kind {
            ResourceKind::Image => self.image_pivot,
            ResourceKind::Skeletal => self.pivot,
        };

        let mut builder = EntityBuilder::new();
        builder
            .add(Owner(id))
            .add(Host(cell_index))
            .add(DescriptorIndex(index))
            .add(kind)
            .add(Transform {
                position: self.position,
                scale: self.scale,
            })
            .add(Anchor(anchor))
            .add(RelativeOffset::default())
            .add(Dirty);

        if kind == ResourceKind::Skeletal {
            if let Some(animation) = &self.current_animation {
                builder.add(Playback::start(animation.clone(), self.loop_enabled));
            }
        }

        let entity = world.spawn(builder.build());
        self.members.push(entity);
        entity
    }

    /// Forgets a member. The caller despawns it.
    pub fn remove_member(&mut self, entity: Entity) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != entity);
        self.members.len() != before
    }

    pub fn set_position(&mut self, world: &mut World, x: f32, y: f32) -> Result<(), InspectorError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(InspectorError::InvalidPosition(x, y));
        }

        self.position = Point2::new(x, y);
        for &member in &self.members {
            if let Ok((transform, offset)) =
                world.query_one_mut::<(&mut Transform, &RelativeOffset)>(member)
            {
                transform.position = self.visual_position(offset);
            }
            mark_dirty(world, member);
        }

        Ok(())
    }

    pub fn set_scale(&mut self, world: &mut World, scale: f32) -> Result<(), InspectorError> {
        if !scale.is_finite() || scale <= 0. {
            return Err(InspectorError::InvalidScale(scale));
        }

        self.scale = scale;
        for &member in &self.members {
            if let Ok(transform) = world.query_one_mut::<&mut Transform>(member) {
                transform.scale = scale;
            }
            mark_dirty(world, member);
        }

        Ok(())
    }

    /// Anchors every member at the pivot.
    pub fn set_pivot(&mut self, world: &mut World, x: f32, y: f32) {
        let pivot = Pivot::new(x, y);
        self.pivot = pivot;
        self.image_pivot = pivot;
        self.apply_pivot(world, pivot, |_| true);
    }

    /// Anchors the image members only, skeletons keep their anchor.
    pub fn set_image_pivot(&mut self, world: &mut World, x: f32, y: f32) {
        let pivot = Pivot::new(x, y);
        self.image_pivot = pivot;
        self.apply_pivot(world, pivot, |kind| kind == ResourceKind::Image);
    }

    fn apply_pivot(&self, world: &mut World, pivot: Pivot, filter: impl Fn(ResourceKind) -> bool) {
        for &member in &self.members {
            let Ok((kind, anchor)) = world.query_one_mut::<(&ResourceKind, &mut Anchor)>(member)
            else {
                continue;
            };

            if filter(*kind) {
                anchor.0 = pivot;
                mark_dirty(world, member);
            }
        }
    }

    /// Every skeletal member plays `name` from its first frame. The name is
    /// not checked against the skeletons, unknown names are up to the scene.
    pub fn set_spine_animation(&mut self, world: &mut World, name: &str, looping: bool) {
        self.current_animation = Some(name.to_owned());
        self.loop_enabled = looping;

        for &member in &self.members {
            let skeletal = world
                .get::<&ResourceKind>(member)
                .is_ok_and(|kind| *kind == ResourceKind::Skeletal);

            if skeletal {
                // Replaces the previous playback, if any
                if world.insert(member, (Playback::start(name, looping), Dirty)).is_err() {
                    log::warn!("Instance {member:?} vanished from the world");
                }
            }
        }
    }

    /// Only remembers the flag, running animations are not restarted.
    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Switching modes does not move anything: offsets start or stop
    /// applying with the next position change.
    pub fn set_use_relative_position(&mut self, enabled: bool) {
        self.use_relative_position = enabled;
    }

    /// Stores the offset of one member. In relative mode the member moves
    /// to `position + offset` while the others stay put.
    pub fn set_instance_offset(
        &mut self,
        world: &mut World,
        entity: Entity,
        offset: Vector2<f32>,
    ) -> Result<(), InspectorError> {
        if !self.members.contains(&entity) {
            return Err(InspectorError::NoInstanceSelected);
        }
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return Err(InspectorError::InvalidPosition(offset.x, offset.y));
        }

        if let Ok((transform, relative)) =
            world.query_one_mut::<(&mut Transform, &mut RelativeOffset)>(entity)
        {
            relative.0 = offset;
            transform.position = self.visual_position(relative);
        }
        mark_dirty(world, entity);

        Ok(())
    }

    /// Relative offsets of every member in creation order.
    pub fn instance_offsets(&self, world: &World) -> Vec<Vector2<f32>> {
        self.members
            .iter()
            .map(|&member| {
                world
                    .get::<&RelativeOffset>(member)
                    .map(|offset| offset.0)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Where a member with the given offset is drawn.
    pub fn visual_position(&self, offset: &RelativeOffset) -> Point2<f32> {
        if self.use_relative_position {
            self.position + offset.0
        } else {
            self.position
        }
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn has_image_type(&self) -> bool {
        self.resources
            .iter()
            .any(|resource| resource.kind() == ResourceKind::Image)
    }

    pub fn has_spine_type(&self) -> bool {
        self.resources
            .iter()
            .any(|resource| resource.kind() == ResourceKind::Skeletal)
    }

    /// Animations of the first skeletal resource, empty for image groups.
    pub fn spine_animations(&self) -> &[String] {
        self.resources
            .iter()
            .find_map(ResourceDescriptor::animations)
            .unwrap_or(&[])
    }

    /// The name of the first resource.
    pub fn name(&self) -> &str {
        self.resources[0].name()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn position(&self) -> Point2<f32> {
        self.position
    }

    /// Anchor of the skeletal members.
    pub fn pivot(&self) -> Pivot {
        self.pivot
    }

    pub fn image_pivot(&self) -> Pivot {
        self.image_pivot
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.current_animation.as_deref()
    }

    pub fn use_relative_position(&self) -> bool {
        self.use_relative_position
    }

    /// Member instances in creation order.
    pub fn instances(&self) -> &[Entity] {
        &self.members
    }
}
