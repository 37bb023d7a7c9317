use anicheck_assets::{ingest, AssetDecoder, AssetFile, ResourceDescriptor, ResourceKind};
use anicheck_collections::SlotArena;
use anicheck_events::Events;
use anicheck_geometry::{PivotPreset, Size};
use anicheck_input::{
    buttons::ButtonAction,
    pointer::{Pointer, PointerAction, PointerButton, PointerEvent},
};
use anicheck_scene::{NodeId, Scene};
use hecs::{Entity, With, Without, World};
use nalgebra::{Point2, Vector2};

use crate::{
    export::{self, ExportedOffset},
    instance::{Anchor, DescriptorIndex, Dirty, Host, Node, Owner, Playback, Transform},
    layout::LayoutEngine,
    selection::SelectionController,
    Config, ConfigStore, GridCell, GroupId, InspectorError, InspectorEvent, ResourceGroup,
};

/// The inspector: resource groups laid out over a grid of cells, and the
/// commands the control panel drives them with.
///
/// Every public operation leaves the scene in sync with the model:
/// missing scene nodes are created and every changed instance is pushed.
pub struct Inspector<S: Scene> {
    scene: S,
    world: World,
    groups: SlotArena<ResourceGroup>,
    cells: Vec<GridCell>,
    layout: LayoutEngine,
    selection: SelectionController,
    pointer: Pointer,
    store: Box<dyn ConfigStore>,
    events: Events<InspectorEvent>,
}

impl<S: Scene> Inspector<S> {
    /// Creates an empty inspector using the config kept in `store`.
    pub fn new(scene: S, store: Box<dyn ConfigStore>, viewport: Size<f32>) -> Self {
        let config = Config::load(store.as_ref());
        log::info!(
            "Grid config: {} per row, cells {}x{}",
            config.columns_per_row,
            config.cell_width,
            config.cell_height
        );

        let mut inspector = Self {
            scene,
            world: World::new(),
            groups: SlotArena::default(),
            cells: Vec::new(),
            layout: LayoutEngine::new(&config, viewport),
            selection: SelectionController::default(),
            pointer: Pointer::default(),
            store,
            events: Events::default(),
        };
        inspector.relayout();
        inspector
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn group(&self, id: GroupId) -> Option<&ResourceGroup> {
        self.groups.get(id)
    }

    /// Live groups in creation order, unless slots of deleted groups got reused.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &ResourceGroup)> {
        self.groups.iter()
    }

    pub fn selected_group(&self) -> Option<&ResourceGroup> {
        self.selection
            .selected_group()
            .and_then(|id| self.groups.get(id))
    }

    /// Takes the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<InspectorEvent> {
        self.events.take()
    }

    /// The scene node drawing `instance`, once realized.
    pub fn node_of(&self, instance: Entity) -> Option<NodeId> {
        self.world.get::<&Node>(instance).ok().map(|node| node.0)
    }

    /// The instance drawn by `node`, if it is one.
    pub fn instance_at(&self, node: NodeId) -> Option<Entity> {
        self.world
            .query::<&Node>()
            .iter()
            .find(|(_, n)| n.0 == node)
            .map(|(entity, _)| entity)
    }

    /// Adds a group over `resources`, giving it an instance in every cell
    /// and adding cells if it has more resources than there are cells.
    pub fn add_group(&mut self, resources: Vec<ResourceDescriptor>) -> Result<GroupId, InspectorError> {
        let group = ResourceGroup::new(resources)?;
        log::info!(
            "Adding group {} with {} resources",
            group.name(),
            group.resource_count()
        );

        let id = self.groups.insert(group);
        self.events.send(InspectorEvent::GroupAdded(id));
        self.reconcile();
        self.sync();
        Ok(id)
    }

    pub fn select_group(&mut self, id: GroupId) -> Result<(), InspectorError> {
        if !self.groups.contains(id) {
            return Err(InspectorError::UnknownGroup(id));
        }

        self.selection.end_drag();
        if let Some(event) = self.selection.select_group(Some(id)) {
            self.events.send(event);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.end_drag();
        if let Some(event) = self.selection.select_group(None) {
            self.events.send(event);
        }
    }

    fn selected(&mut self) -> Result<(GroupId, &mut ResourceGroup, &mut World), InspectorError> {
        let id = self
            .selection
            .selected_group()
            .ok_or(InspectorError::NoSelection)?;
        let group = self
            .groups
            .get_mut(id)
            .ok_or(InspectorError::NoSelection)?;
        Ok((id, group, &mut self.world))
    }

    /// Runs a command on the selected group and syncs the scene afterwards.
    fn with_selected<T>(
        &mut self,
        command: impl FnOnce(&mut ResourceGroup, &mut World) -> Result<T, InspectorError>,
    ) -> Result<T, InspectorError> {
        let (_, group, world) = self.selected()?;
        let result = command(group, world)?;
        self.sync();
        Ok(result)
    }

    pub fn set_group_scale(&mut self, scale: f32) -> Result<(), InspectorError> {
        self.with_selected(|group, world| group.set_scale(world, scale))
    }

    pub fn set_group_position(&mut self, x: f32, y: f32) -> Result<(), InspectorError> {
        self.with_selected(|group, world| group.set_position(world, x, y))
    }

    /// Aligns the images of the selected group.
    pub fn set_group_pivot_preset(&mut self, preset: PivotPreset) -> Result<(), InspectorError> {
        let pivot = anicheck_geometry::Pivot::from(preset);
        self.with_selected(|group, world| {
            group.set_image_pivot(world, pivot.x, pivot.y);
            Ok(())
        })
    }

    /// Plays `name` on every skeleton of the selected group, keeping its loop flag.
    pub fn set_group_animation(&mut self, name: &str) -> Result<(), InspectorError> {
        self.with_selected(|group, world| {
            if !group.has_spine_type() {
                return Err(InspectorError::NotSkeletal);
            }

            let looping = group.loop_enabled();
            group.set_spine_animation(world, name, looping);
            Ok(())
        })
    }

    /// Flips the loop flag and restarts the current animation with it.
    /// Returns the new flag.
    pub fn toggle_loop(&mut self) -> Result<bool, InspectorError> {
        self.with_selected(|group, world| {
            let looping = !group.loop_enabled();
            group.set_loop_enabled(looping);

            if let Some(animation) = group.current_animation().map(str::to_owned) {
                group.set_spine_animation(world, &animation, looping);
            }
            Ok(looping)
        })
    }

    /// Starts the current animation over. Does nothing without one.
    pub fn replay_animation(&mut self) -> Result<(), InspectorError> {
        self.with_selected(|group, world| {
            if let Some(animation) = group.current_animation().map(str::to_owned) {
                let looping = group.loop_enabled();
                group.set_spine_animation(world, &animation, looping);
            }
            Ok(())
        })
    }

    /// Switches the selected group between absolute and relative mode.
    /// Returns the new mode, `true` being relative.
    pub fn toggle_relative_mode(&mut self) -> Result<bool, InspectorError> {
        let relative = self.with_selected(|group, _| {
            let relative = !group.use_relative_position();
            group.set_use_relative_position(relative);
            Ok(relative)
        })?;

        if !relative {
            if let Some(instance) = self.selection.selected_instance() {
                if let Some(event) = self.selection.forget_instance(instance) {
                    self.events.send(event);
                }
            }
        }

        Ok(relative)
    }

    /// Sets the offset of the selected instance from its group position.
    pub fn set_selected_instance_offset(&mut self, x: f32, y: f32) -> Result<(), InspectorError> {
        let instance = self.selection.selected_instance();
        self.with_selected(|group, world| {
            let instance = instance.ok_or(InspectorError::NoInstanceSelected)?;
            group.set_instance_offset(world, instance, Vector2::new(x, y))
        })
    }

    /// Relative coordinates of every instance of the selected group, in
    /// creation order, rounded to 3 decimals.
    pub fn export_selected_group_coordinates(&self) -> Result<Vec<ExportedOffset>, InspectorError> {
        let group = self.selected_group().ok_or(InspectorError::NoSelection)?;

        Ok(group
            .instance_offsets(&self.world)
            .into_iter()
            .map(ExportedOffset::from)
            .collect())
    }

    pub fn export_selected_group_json(&self) -> Result<String, InspectorError> {
        let offsets = self.export_selected_group_coordinates()?;
        export::to_json(&offsets).map_err(|e| InspectorError::Export(e.to_string()))
    }

    /// Deletes the selected group with all its instances. Cells that only
    /// existed for this group are removed too.
    pub fn delete_selected_group(&mut self) -> Result<GroupId, InspectorError> {
        let id = self
            .selection
            .selected_group()
            .ok_or(InspectorError::NoSelection)?;
        let group = self.groups.remove(id).ok_or(InspectorError::NoSelection)?;
        log::info!("Deleting group {}", group.name());

        for cell in &mut self.cells {
            cell.remove_group(id);
        }
        for &instance in group.instances() {
            self.despawn(instance);
        }

        if let Some(event) = self.selection.forget_group(id) {
            self.events.send(event);
        }
        self.events.send(InspectorEvent::GroupRemoved(id));

        self.reconcile();
        self.sync();
        Ok(id)
    }

    pub fn set_columns(&mut self, columns: usize) -> Result<(), InspectorError> {
        self.layout.set_columns(columns)?;
        self.relayout();
        self.save_config();
        Ok(())
    }

    pub fn set_cell_size(&mut self, width: f32, height: f32) -> Result<(), InspectorError> {
        self.layout.set_cell_size(width, height)?;
        self.relayout();
        self.save_config();
        Ok(())
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.layout.resize_viewport(width, height);
        self.relayout();
    }

    /// Scrolls the grid, clamped to its bounds. Positive values scroll up.
    pub fn scroll_by(&mut self, dy: f32) {
        if self.layout.scroll_by(dy) {
            self.scene.set_root_offset(self.layout.scroll_offset_y());
        }
    }

    /// Routes a pointer event. `hit` is the topmost scene node under the
    /// pointer, as found by the host.
    pub fn handle_pointer(&mut self, event: &PointerEvent, hit: Option<NodeId>) {
        self.pointer.handle(event);
        let position = Point2::new(self.pointer.position.x, self.pointer.position.y);

        match event.action {
            PointerAction::Button(PointerButton::Primary, ButtonAction::Down) => {
                // Presses on empty space leave the selection alone, a press
                // on an instance restarts any drag on the new target
                if let Some(instance) = hit.and_then(|node| self.instance_at(node)) {
                    let event =
                        self.selection
                            .begin_drag(&self.world, &self.groups, instance, position);
                    if let Some(event) = event {
                        self.events.send(event);
                    }
                }
            }
            PointerAction::Move => {
                let scale_factor = self.layout.scale_factor();
                self.selection
                    .drag_to(&mut self.world, &mut self.groups, position, scale_factor);
            }
            PointerAction::Button(PointerButton::Primary, ButtonAction::Up) | PointerAction::Leave => {
                self.selection.end_drag();
            }
            PointerAction::Wheel(_) => self.scroll_by(-self.pointer.wheel.y),
            _ => {}
        }

        self.pointer.flush();
        self.sync();
    }

    fn save_config(&mut self) {
        if let Err(e) = self.layout.config().save(self.store.as_mut()) {
            log::warn!("Failed to save config: {e}");
        }
    }

    fn despawn(&mut self, instance: Entity) {
        if let Ok(node) = self.world.get::<&Node>(instance).map(|node| node.0) {
            self.scene.destroy(node);
        }
        if self.world.despawn(instance).is_err() {
            log::warn!("Instance {instance:?} was already despawned");
        }
        if let Some(event) = self.selection.forget_instance(instance) {
            self.events.send(event);
        }
    }

    /// Brings the cell count to what the groups need and gives every group
    /// exactly one instance in every cell.
    fn reconcile(&mut self) {
        let required =
            LayoutEngine::required_cell_count(self.groups.values().map(ResourceGroup::resource_count));

        while self.cells.len() < required {
            let index = self.cells.len() + 1;
            let cell = GridCell::new(&mut self.scene, index, self.layout.cell_size());
            self.cells.push(cell);
        }

        while self.cells.len() > required {
            let Some(cell) = self.cells.pop() else { break };
            for (group, instance) in cell.destroy(&mut self.scene) {
                if let Some(group) = self.groups.get_mut(group) {
                    group.remove_member(instance);
                }
                // The node is gone with its cell
                if self.world.despawn(instance).is_err() {
                    log::warn!("Instance {instance:?} was already despawned");
                }
                if let Some(event) = self.selection.forget_instance(instance) {
                    self.events.send(event);
                }
            }
        }

        for (index, cell) in self.cells.iter_mut().enumerate() {
            for (id, group) in self.groups.iter_mut() {
                if !cell.has_group(id) {
                    let instance = group.create_instance(&mut self.world, id, index);
                    cell.add_instance(id, instance);
                }
            }
        }

        self.relayout();
    }

    /// Places and sizes every cell for the current layout.
    fn relayout(&mut self) {
        self.layout.recompute(self.cells.len());

        let scale = self.layout.scale_factor();
        let size = self.layout.cell_size();
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.place(&mut self.scene, self.layout.cell_origin(index), scale);
            cell.resize(&mut self.scene, size);
        }
        self.scene.set_root_offset(self.layout.scroll_offset_y());

        self.events.send(InspectorEvent::LayoutChanged {
            cells: self.cells.len(),
            scale_factor: scale,
            max_scroll_y: self.layout.max_scroll_y(),
        });
    }

    /// Creates scene nodes for new instances and pushes changed instances.
    fn sync(&mut self) {
        self.realize();

        let mut synced = Vec::new();
        for (entity, (node, transform, anchor, playback)) in self
            .world
            .query_mut::<With<(&Node, &Transform, &Anchor, Option<&mut Playback>), &Dirty>>()
        {
            self.scene.set_position(node.0, transform.position);
            self.scene.set_scale(node.0, transform.scale);
            self.scene.set_anchor(node.0, anchor.0);

            if let Some(playback) = playback {
                if playback.restart {
                    self.scene
                        .play_animation(node.0, &playback.animation, playback.looping);
                    playback.restart = false;
                }
            }

            synced.push(entity);
        }

        for entity in synced {
            let _ = self.world.remove_one::<Dirty>(entity);
        }
    }

    fn realize(&mut self) {
        let pending: Vec<(Entity, GroupId, usize, usize)> = self
            .world
            .query::<Without<(&Owner, &Host, &DescriptorIndex), &Node>>()
            .iter()
            .map(|(entity, (owner, host, index))| (entity, owner.0, host.0, index.0))
            .collect();

        for (entity, owner, host, index) in pending {
            let (Some(group), Some(cell)) = (self.groups.get(owner), self.cells.get(host)) else {
                log::warn!("Instance {entity:?} has no group or cell to live in");
                continue;
            };

            let descriptor = &group.resources()[index];
            let node = match descriptor {
                ResourceDescriptor::Image { texture, .. } => self.scene.create_quad(*texture),
                ResourceDescriptor::Skeletal {
                    skeleton, atlas, ..
                } => self.scene.create_skeleton(*skeleton, *atlas),
            };
            self.scene.attach(cell.node(), node);

            if descriptor.kind() == ResourceKind::Skeletal {
                let actual = self.scene.animation_names(node);
                let missing: Vec<String> = group
                    .spine_animations()
                    .iter()
                    .filter(|name| !actual.contains(*name))
                    .cloned()
                    .collect();

                if !missing.is_empty() {
                    log::warn!(
                        "{} is missing animations: {}",
                        descriptor.name(),
                        missing.join(", ")
                    );
                    self.events.send(InspectorEvent::MissingAnimations {
                        asset: descriptor.name().to_owned(),
                        missing,
                    });
                }
            }

            if self.world.insert(entity, (Node(node), Dirty)).is_err() {
                self.scene.destroy(node);
            }
        }
    }
}

impl<S: Scene + AssetDecoder> Inspector<S> {
    /// Decodes a dropped directory and adds its contents as a new group.
    /// Returns `None` when nothing in it could be loaded.
    pub fn load_directory(&mut self, files: Vec<AssetFile>) -> Option<GroupId> {
        let resources = ingest::load_directory(&mut self.scene, files)?;
        match self.add_group(resources) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Failed to add loaded resources: {e}");
                None
            }
        }
    }
}
