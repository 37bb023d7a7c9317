use crate::GroupId;
use hecs::Entity;

/// Notifications for the control panel and other outer widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectorEvent {
    /// A freshly realized skeleton lacks animations its descriptor declares.
    MissingAnimations {
        asset: String,
        missing: Vec<String>,
    },
    SelectionChanged {
        group: Option<GroupId>,
        instance: Option<Entity>,
    },
    GroupAdded(GroupId),
    GroupRemoved(GroupId),
    /// Grid geometry changed: cell count, columns, cell size or viewport.
    LayoutChanged {
        cells: usize,
        scale_factor: f32,
        max_scroll_y: f32,
    },
}
