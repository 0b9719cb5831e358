//! Shared enums and the attachment object model

use crate::attachable::Attachable;
use crate::equipment_item::EquipmentItem;
use crate::scene::SceneComponent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use void_core::Name;

/// Attachment state of an attachable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentState {
    Attached,
    #[default]
    Detached,
}

/// State of a single slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// Nothing attached, accepts attachments
    #[default]
    Empty,
    /// Holds exactly one attachment
    Occupied,
    /// Disabled, rejects gated attachment
    Locked,
}

/// Physical attachment strategy of a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    /// Attach to a named socket on the target component
    #[default]
    Socket,
    /// Attach to the target component origin
    Component,
}

/// Aggregate container state, mirrors "any slot occupied"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerState {
    #[default]
    Empty,
    Occupied,
}

/// Anything that can sit in a slot.
///
/// Capabilities are discovered at runtime: an object may expose the
/// [`Attachable`] contract, a scene node to parent, both, or neither.
pub trait AttachmentObject: Send + Sync {
    /// Stable name used for logging and replication
    fn object_name(&self) -> Name;

    /// The attachable capability, if implemented
    fn as_attachable(&self) -> Option<&dyn Attachable> {
        None
    }

    /// Scene node that is parented when attached
    fn scene_node(&self) -> Option<&SceneComponent> {
        None
    }

    /// The equipment item capability, if implemented
    fn as_equipment_item(&self) -> Option<&dyn EquipmentItem> {
        None
    }
}

/// Owning handle to an attachment
pub type AttachmentRef = Arc<dyn AttachmentObject>;

/// Identity comparison between two attachment handles
pub fn same_attachment(a: &AttachmentRef, b: &AttachmentRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// Identity comparison between an attachment and an attachable
pub fn is_attachable(object: &AttachmentRef, attachable: &dyn Attachable) -> bool {
    object
        .as_attachable()
        .is_some_and(|own| std::ptr::addr_eq(own as *const dyn Attachable, attachable as *const dyn Attachable))
}
