use anicheck_collections::Slot;

pub mod cell;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod group;
pub mod inspector;
pub mod instance;
pub mod layout;
pub mod selection;

/// Identifies a resource group for as long as it lives.
/// Stale ids of deleted groups never resolve to a newer group.
pub type GroupId = Slot;

pub use cell::GridCell;
pub use config::{Config, ConfigStore, JsonFileStore, MemoryStore};
pub use error::InspectorError;
pub use events::InspectorEvent;
pub use export::ExportedOffset;
pub use group::ResourceGroup;
pub use inspector::Inspector;
pub use layout::LayoutEngine;
