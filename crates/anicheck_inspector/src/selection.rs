//! Selection and the drag protocol.
//!
//! Pressing on an instance selects its group and starts a drag. In absolute
//! mode the drag moves the whole group, in relative mode only the pressed
//! instance moves and its offset from the group position is recorded.
//! Pointer deltas are in screen pixels and get divided by the grid scale
//! factor, so the dragged thing stays under the cursor.

use anicheck_collections::SlotArena;
use hecs::{Entity, World};
use nalgebra::Point2;

use crate::{
    events::InspectorEvent,
    instance::{Owner, Transform},
    GroupId, ResourceGroup,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        instance: Entity,
        group: GroupId,
        /// Pointer position at press time, in screen pixels
        start: Point2<f32>,
        /// Instance position (relative) or group position (absolute) at press time
        reference: Point2<f32>,
        relative: bool,
    },
}

#[derive(Debug, Default)]
pub struct SelectionController {
    group: Option<GroupId>,
    instance: Option<Entity>,
    drag: DragState,
}

impl SelectionController {
    pub fn selected_group(&self) -> Option<GroupId> {
        self.group
    }

    /// Only set while the selected group is in relative mode.
    pub fn selected_instance(&self) -> Option<Entity> {
        self.instance
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Selects a group as a whole, dropping any instance selection.
    pub fn select_group(&mut self, group: Option<GroupId>) -> Option<InspectorEvent> {
        self.select(group, None)
    }

    fn select(&mut self, group: Option<GroupId>, instance: Option<Entity>) -> Option<InspectorEvent> {
        if self.group == group && self.instance == instance {
            return None;
        }

        self.group = group;
        self.instance = instance;
        Some(InspectorEvent::SelectionChanged { group, instance })
    }

    /// Starts dragging `instance`. A drag in progress is dropped first.
    pub fn begin_drag(
        &mut self,
        world: &World,
        groups: &SlotArena<ResourceGroup>,
        instance: Entity,
        pointer: Point2<f32>,
    ) -> Option<InspectorEvent> {
        self.drag = DragState::Idle;

        let Ok(owner) = world.get::<&Owner>(instance).map(|owner| owner.0) else {
            return None;
        };
        let Some(group) = groups.get(owner) else {
            return None;
        };

        let relative = group.use_relative_position();
        let reference = if relative {
            match world.get::<&Transform>(instance) {
                Ok(transform) => transform.position,
                Err(_) => return None,
            }
        } else {
            group.position()
        };

        self.drag = DragState::Dragging {
            instance,
            group: owner,
            start: pointer,
            reference,
            relative,
        };

        self.select(Some(owner), relative.then_some(instance))
    }

    /// Follows the pointer. Ends the drag if its instance or group is gone.
    pub fn drag_to(
        &mut self,
        world: &mut World,
        groups: &mut SlotArena<ResourceGroup>,
        pointer: Point2<f32>,
        scale_factor: f32,
    ) {
        let DragState::Dragging {
            instance,
            group: id,
            start,
            reference,
            relative,
        } = self.drag
        else {
            return;
        };

        let Some(group) = groups.get_mut(id) else {
            self.end_drag();
            return;
        };
        if !world.contains(instance) {
            self.end_drag();
            return;
        }

        let target = reference + (pointer - start) / scale_factor;
        let result = if relative {
            let offset = target - group.position();
            group.set_instance_offset(world, instance, offset)
        } else {
            group.set_position(world, target.x, target.y)
        };

        if let Err(e) = result {
            log::debug!("Drag ignored: {e}");
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Drops every reference to a removed group.
    pub fn forget_group(&mut self, group: GroupId) -> Option<InspectorEvent> {
        if matches!(self.drag, DragState::Dragging { group: g, .. } if g == group) {
            self.end_drag();
        }

        if self.group != Some(group) {
            return None;
        }
        self.select(None, None)
    }

    /// Drops every reference to a despawned instance.
    pub fn forget_instance(&mut self, instance: Entity) -> Option<InspectorEvent> {
        if matches!(self.drag, DragState::Dragging { instance: i, .. } if i == instance) {
            self.end_drag();
        }

        if self.instance != Some(instance) {
            return None;
        }
        self.select(self.group, None)
    }
}

#[cfg(test)]
mod tests {
    use anicheck_assets::{ImageAsset, ResourceDescriptor, TextureHandle};
    use anicheck_geometry::Size;
    use nalgebra::Vector2;

    use super::*;

    struct Fixture {
        world: World,
        groups: SlotArena<ResourceGroup>,
        id: GroupId,
        members: Vec<Entity>,
    }

    fn fixture(relative: bool) -> Fixture {
        let mut world = World::new();
        let mut groups = SlotArena::default();
        let descriptor =
            ResourceDescriptor::image("a.png", ImageAsset::new(TextureHandle(1), Size::new(4, 4)));
        let id = groups.insert(ResourceGroup::new(vec![descriptor]).unwrap());

        let group = &mut groups[id];
        group.set_use_relative_position(relative);
        let members = (0..2)
            .map(|cell| group.create_instance(&mut world, id, cell))
            .collect();

        Fixture {
            world,
            groups,
            id,
            members,
        }
    }

    fn position(world: &World, entity: Entity) -> Point2<f32> {
        world.get::<&Transform>(entity).unwrap().position
    }

    #[test]
    fn test_absolute_drag_moves_the_group() {
        let Fixture {
            mut world,
            mut groups,
            id,
            members,
        } = fixture(false);
        let mut selection = SelectionController::default();

        let event = selection.begin_drag(&world, &groups, members[1], Point2::new(100., 100.));
        assert_eq!(
            event,
            Some(InspectorEvent::SelectionChanged {
                group: Some(id),
                instance: None
            })
        );

        selection.drag_to(&mut world, &mut groups, Point2::new(110., 90.), 0.5);
        assert_eq!(groups[id].position(), Point2::new(20., -20.));
        for member in &members {
            assert_eq!(position(&world, *member), Point2::new(20., -20.));
        }

        selection.end_drag();
        selection.drag_to(&mut world, &mut groups, Point2::new(500., 500.), 0.5);
        assert_eq!(groups[id].position(), Point2::new(20., -20.));
    }

    #[test]
    fn test_relative_drag_moves_one_instance() {
        let Fixture {
            mut world,
            mut groups,
            id,
            members,
        } = fixture(true);
        groups[id].set_position(&mut world, 5., 5.).unwrap();
        let mut selection = SelectionController::default();

        selection.begin_drag(&world, &groups, members[0], Point2::new(0., 0.));
        assert_eq!(selection.selected_instance(), Some(members[0]));

        selection.drag_to(&mut world, &mut groups, Point2::new(3., 4.), 1.);
        selection.drag_to(&mut world, &mut groups, Point2::new(6., 8.), 1.);

        assert_eq!(position(&world, members[0]), Point2::new(11., 13.));
        assert_eq!(position(&world, members[1]), Point2::new(5., 5.));
        assert_eq!(groups[id].position(), Point2::new(5., 5.));
        assert_eq!(
            groups[id].instance_offsets(&world),
            vec![Vector2::new(6., 8.), Vector2::zeros()]
        );
    }

    #[test]
    fn test_drag_ends_when_the_group_disappears() {
        let Fixture {
            mut world,
            mut groups,
            id,
            members,
        } = fixture(false);
        let mut selection = SelectionController::default();
        selection.begin_drag(&world, &groups, members[0], Point2::origin());

        groups.remove(id);
        selection.drag_to(&mut world, &mut groups, Point2::new(1., 1.), 1.);
        assert!(!selection.is_dragging());

        assert!(selection.forget_group(id).is_some());
        assert_eq!(selection.selected_group(), None);
    }

    #[test]
    fn test_second_press_restarts_on_new_target() {
        let Fixture {
            world,
            groups,
            members,
            ..
        } = fixture(true);
        let mut selection = SelectionController::default();

        selection.begin_drag(&world, &groups, members[0], Point2::origin());
        let event = selection.begin_drag(&world, &groups, members[1], Point2::new(7., 7.));

        assert!(event.is_some());
        assert!(matches!(
            selection.drag_state(),
            DragState::Dragging { instance, start, .. } if instance == members[1] && start == Point2::new(7., 7.)
        ));
    }

    #[test]
    fn test_press_on_unknown_entity_keeps_selection() {
        let Fixture {
            mut world,
            groups,
            id,
            members,
        } = fixture(false);
        let mut selection = SelectionController::default();
        selection.select_group(Some(id));

        let stranger = world.spawn(());
        assert_eq!(selection.begin_drag(&world, &groups, stranger, Point2::origin()), None);
        assert_eq!(selection.selected_group(), Some(id));
        assert!(!selection.is_dragging());

        assert_eq!(selection.forget_instance(members[0]), None);
    }
}
