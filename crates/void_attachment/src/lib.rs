//! # void_attachment - Attachment System
//!
//! Containers own a fixed set of named, tagged slots. Attachables (weapons,
//! armor pieces, props) are bound to slots, physically parented to a scene
//! component of the container's owner and tracked on both sides.
//!
//! # Overview
//!
//! - [`slot::AttachmentSlot`] validates and performs a single binding
//! - [`container::AttachmentContainer`] is the capability gameplay code talks to
//! - [`attachable::Attachable`] is the capability of anything that can be bound
//! - [`equipment::EquipmentComponent`] adds item level equip and unequip
//! - [`equipment_item::EquipmentItem`] tracks an item's equipment state
//! - [`settings::EquipmentSettings`] configures equipment slots
//! - [`replication`] forwards requests from remote peers and replays snapshots
//!
//! # Example
//!
//! ```ignore
//! use void_attachment::prelude::*;
//!
//! let hero = SceneActor::builder("Hero")
//!     .component(SceneComponent::new("Mesh").with_socket("hand_r"))
//!     .build();
//! let rig: ContainerRef = AttachmentContainerComponent::builder("Rig")
//!     .owner(&hero)
//!     .slot(SlotDefinition::new("MainHand").with_tag(Tag::new("Slot.Weapon")?).with_socket("hand_r"))
//!     .build()?;
//!
//! let sword = AttachableComponent::builder("sword")
//!     .display_name("Sword")
//!     .tag(Tag::new("Slot.Weapon")?)
//!     .build();
//! assert!(sword.attach_to_container(&rig));
//! ```

pub mod attachable;
pub mod container;
pub mod equipment;
pub mod equipment_item;
pub mod error;
pub mod replication;
pub mod scene;
pub mod settings;
pub mod slot;
pub mod statics;
pub mod types;

pub use attachable::{Attachable, AttachableComponent};
pub use container::{AttachmentContainer, AttachmentContainerComponent, ContainerRef};
pub use equipment::EquipmentComponent;
pub use equipment_item::{EquipmentItem, EquipmentItemComponent, EquipmentItemState};
pub use error::{AttachError, ConfigError, ReplicationError};
pub use slot::{AttachmentSlot, SlotDefinition};
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attachable::{
        Attachable, AttachableAttached, AttachableComponent, AttachableDetached,
    };
    pub use crate::container::{
        AttachmentChanged, AttachmentContainer, AttachmentContainerComponent, ContainerBuilder,
        ContainerCleared, ContainerKind, ContainerRef, SlotStateChanged, WeakContainerRef,
    };
    pub use crate::equipment::{EquipmentComponent, EquipmentEvent};
    pub use crate::equipment_item::{
        EquipmentItem, EquipmentItemBuilder, EquipmentItemComponent, EquipmentItemState,
        EquipmentItemStateChanged,
    };
    pub use crate::error::{AttachError, AttachResult, ConfigError, ReplicationError, Severity};
    pub use crate::replication::{
        AttachmentRequest, ContainerSnapshot, NetRole, ReplicationBridge, RequestQueue,
        SlotSnapshot,
    };
    pub use crate::scene::{AttachmentRule, AttachmentRules, SceneActor, SceneComponent};
    pub use crate::settings::{stable_slot_id, EquipmentSettings, SlotHeader};
    pub use crate::slot::{AttachmentSlot, SlotDefinition};
    pub use crate::types::*;
    pub use void_core::{Name, Tag, TagContainer};
}
