//! Equipment items
//!
//! An equipment item is an attachable that also knows where it prefers to be
//! equipped and tracks its own equipment state. The equipment rig moves that
//! state as the item is equipped, activated and unequipped.

use crate::attachable::{Attachable, AttachableBuilder, AttachableComponent};
use crate::scene::SceneComponent;
use crate::types::AttachmentObject;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use void_core::{Name, Tag};
use void_event::Delegate;

/// Equipment lifecycle of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentItemState {
    /// Not held by an equipment slot
    #[default]
    Idle,
    /// Held by an equipment slot
    Equipped,
    /// Equipped and in use
    Active,
}

/// Raised when an item's equipment state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentItemStateChanged {
    pub item: Name,
    pub state: EquipmentItemState,
}

#[derive(Default)]
pub struct EquipmentItemEvents {
    pub state_changed: Delegate<EquipmentItemStateChanged>,
}

/// Capability of attachments that can be equipped.
///
/// Setters are change-only and return whether the value changed.
pub trait EquipmentItem: Send + Sync {
    /// Slot tried first when equipping; the "none" name for no preference
    fn preferred_slot(&self) -> Name;

    /// Tag used to pick a slot when the preferred slot is unavailable
    fn preferred_slot_tag(&self) -> Option<Tag>;

    fn equipment_item_state(&self) -> EquipmentItemState;
    fn set_equipment_item_state(&self, state: EquipmentItemState) -> bool;

    /// Activate as soon as the item is equipped
    fn does_auto_active(&self) -> bool;
    fn set_auto_active(&self, value: bool) -> bool;

    /// Auto activation waits for an explicit activation call
    fn requires_activation_event(&self) -> bool;
    fn set_requires_activation_event(&self, value: bool) -> bool;

    fn equipment_events(&self) -> &EquipmentItemEvents;
}

struct EquipmentItemData {
    state: EquipmentItemState,
    auto_active: bool,
    requires_activation_event: bool,
}

/// Default equipment item, layered on an [`AttachableComponent`]
pub struct EquipmentItemComponent {
    attachable: AttachableComponent,
    preferred_slot: Name,
    preferred_slot_tag: Option<Tag>,
    data: RwLock<EquipmentItemData>,
    events: EquipmentItemEvents,
}

impl EquipmentItemComponent {
    pub fn builder(id: impl Into<Name>) -> EquipmentItemBuilder {
        EquipmentItemBuilder {
            attachable: AttachableComponent::builder(id),
            preferred_slot: Name::none(),
            preferred_slot_tag: None,
            auto_active: false,
            requires_activation_event: false,
        }
    }

    /// Attachable part of the item
    pub fn attachable(&self) -> &AttachableComponent {
        &self.attachable
    }
}

impl EquipmentItem for EquipmentItemComponent {
    fn preferred_slot(&self) -> Name {
        self.preferred_slot.clone()
    }

    fn preferred_slot_tag(&self) -> Option<Tag> {
        self.preferred_slot_tag.clone()
    }

    fn equipment_item_state(&self) -> EquipmentItemState {
        self.data.read().state
    }

    fn set_equipment_item_state(&self, state: EquipmentItemState) -> bool {
        {
            let mut data = self.data.write();
            if data.state == state {
                return false;
            }
            data.state = state;
        }

        let item = self.attachable.id();
        log::debug!("'{}' equipment state is now {:?}", item, state);
        self.events
            .state_changed
            .broadcast(&EquipmentItemStateChanged { item, state });
        true
    }

    fn does_auto_active(&self) -> bool {
        self.data.read().auto_active
    }

    fn set_auto_active(&self, value: bool) -> bool {
        let mut data = self.data.write();
        let changed = data.auto_active != value;
        data.auto_active = value;
        changed
    }

    fn requires_activation_event(&self) -> bool {
        self.data.read().requires_activation_event
    }

    fn set_requires_activation_event(&self, value: bool) -> bool {
        let mut data = self.data.write();
        let changed = data.requires_activation_event != value;
        data.requires_activation_event = value;
        changed
    }

    fn equipment_events(&self) -> &EquipmentItemEvents {
        &self.events
    }
}

impl AttachmentObject for EquipmentItemComponent {
    fn object_name(&self) -> Name {
        self.attachable.id()
    }

    fn as_attachable(&self) -> Option<&dyn Attachable> {
        Some(&self.attachable)
    }

    fn as_equipment_item(&self) -> Option<&dyn EquipmentItem> {
        Some(self)
    }

    fn scene_node(&self) -> Option<&SceneComponent> {
        self.attachable.scene_component().map(|node| node.as_ref())
    }
}

impl std::fmt::Debug for EquipmentItemComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquipmentItemComponent")
            .field("attachable", &self.attachable)
            .field("preferred_slot", &self.preferred_slot)
            .field("state", &self.equipment_item_state())
            .finish()
    }
}

/// Builder for [`EquipmentItemComponent`]
pub struct EquipmentItemBuilder {
    attachable: AttachableBuilder,
    preferred_slot: Name,
    preferred_slot_tag: Option<Tag>,
    auto_active: bool,
    requires_activation_event: bool,
}

impl EquipmentItemBuilder {
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.attachable = self.attachable.display_name(display_name);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.attachable = self.attachable.tag(tag);
        self
    }

    pub fn scene_node(mut self, node: SceneComponent) -> Self {
        self.attachable = self.attachable.scene_node(node);
        self
    }

    pub fn preferred_slot(mut self, slot: impl Into<Name>) -> Self {
        self.preferred_slot = slot.into();
        self
    }

    pub fn preferred_slot_tag(mut self, tag: Tag) -> Self {
        self.preferred_slot_tag = Some(tag);
        self
    }

    pub fn auto_active(mut self, value: bool) -> Self {
        self.auto_active = value;
        self
    }

    pub fn requires_activation_event(mut self, value: bool) -> Self {
        self.requires_activation_event = value;
        self
    }

    pub fn build(self) -> Arc<EquipmentItemComponent> {
        Arc::new_cyclic(|this: &Weak<EquipmentItemComponent>| {
            let owner: Weak<dyn AttachmentObject> = this.clone();
            EquipmentItemComponent {
                attachable: self.attachable.build_for(owner),
                preferred_slot: self.preferred_slot,
                preferred_slot_tag: self.preferred_slot_tag,
                data: RwLock::new(EquipmentItemData {
                    state: EquipmentItemState::Idle,
                    auto_active: self.auto_active,
                    requires_activation_event: self.requires_activation_event,
                }),
                events: EquipmentItemEvents::default(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{AttachmentContainerComponent, ContainerRef};
    use crate::scene::SceneActor;
    use crate::slot::SlotDefinition;
    use parking_lot::Mutex;

    fn helmet() -> Arc<EquipmentItemComponent> {
        EquipmentItemComponent::builder("helmet")
            .display_name("Helmet")
            .tag(Tag::new("Slot.Head").unwrap())
            .scene_node(SceneComponent::new("HelmetMesh"))
            .preferred_slot("Head")
            .build()
    }

    #[test]
    fn test_state_setter_is_change_only() {
        let item = helmet();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        item.equipment_events()
            .state_changed
            .subscribe(move |e: &EquipmentItemStateChanged| captured.lock().push(e.state));

        assert_eq!(item.equipment_item_state(), EquipmentItemState::Idle);
        assert!(!item.set_equipment_item_state(EquipmentItemState::Idle));
        assert!(item.set_equipment_item_state(EquipmentItemState::Equipped));
        assert!(!item.set_equipment_item_state(EquipmentItemState::Equipped));
        assert_eq!(*seen.lock(), vec![EquipmentItemState::Equipped]);
    }

    #[test]
    fn test_activation_flags() {
        let item = helmet();
        assert!(!item.does_auto_active());
        assert!(item.set_auto_active(true));
        assert!(!item.set_auto_active(true));
        assert!(item.does_auto_active());

        assert!(item.set_requires_activation_event(true));
        assert!(!item.set_requires_activation_event(true));
        assert!(item.requires_activation_event());
    }

    #[test]
    fn test_slot_holds_the_item_handle() {
        let owner = SceneActor::builder("Hero")
            .component(SceneComponent::new("Root"))
            .build();
        let rig: ContainerRef = AttachmentContainerComponent::builder("Rig")
            .owner(&owner)
            .slot(
                SlotDefinition::new("Head")
                    .with_tag(Tag::new("Slot.Head").unwrap())
                    .with_component_attachment(),
            )
            .build()
            .unwrap();
        let item = helmet();

        assert!(item.attachable().attach_to_container(&rig));
        let occupant = rig.get_slot(&Name::new("Head")).and_then(|s| s.occupant());
        assert!(occupant
            .as_ref()
            .is_some_and(|o| o.as_equipment_item().is_some()));
        assert_eq!(
            rig.get_slot_id_for_attachable(item.attachable()),
            Some(Name::new("Head"))
        );
        assert_eq!(
            item.scene_node().and_then(|n| n.attach_parent()).map(|p| p.name().clone()),
            Some(Name::new("Root"))
        );

        assert!(item.attachable().detach());
        assert!(!rig.is_slot_occupied(&Name::new("Head")));
    }
}
