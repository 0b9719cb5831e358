//! Equipment component
//!
//! An equipment rig is an attachment container whose slots follow the
//! equipment settings. It adds item-level equip and unequip operations,
//! fallback slots, the optional pre/post equip notifications and the
//! equipment state of items implementing [`EquipmentItem`].
//!
//! [`EquipmentItem`]: crate::equipment_item::EquipmentItem

use crate::container::{AttachmentContainer, AttachmentContainerComponent, ContainerKind, ContainerRef};
use crate::equipment_item::EquipmentItemState;
use crate::settings::SlotHeader;
use crate::types::{same_attachment, AttachmentObject, AttachmentRef};
use std::sync::Arc;
use void_core::{Name, TagContainer};
use void_event::Delegate;

/// Item entering a slot
#[derive(Clone)]
pub struct EquipmentEvent {
    pub slot: Name,
    pub item: AttachmentRef,
}

/// Equip notifications, gated per slot by the settings
#[derive(Default)]
pub struct EquipmentEvents {
    pub pre_equip: Delegate<EquipmentEvent>,
    pub post_equip: Delegate<EquipmentEvent>,
    /// An auto-active item that waits for [`EquipmentComponent::activate_item`]
    pub activation_requested: Delegate<EquipmentEvent>,
}

/// Equipment rig over an attachment container
pub struct EquipmentComponent {
    container: Arc<AttachmentContainerComponent>,
    events: EquipmentEvents,
}

impl EquipmentComponent {
    /// Wrap a container
    pub fn new(container: Arc<AttachmentContainerComponent>) -> Self {
        if container.kind() != ContainerKind::Equipment {
            log::debug!(
                "Container '{}' used as equipment but built as {:?}",
                container.name(),
                container.kind()
            );
        }
        Self {
            container,
            events: EquipmentEvents::default(),
        }
    }

    pub fn container(&self) -> &Arc<AttachmentContainerComponent> {
        &self.container
    }

    /// The rig as a container capability handle
    pub fn as_container(&self) -> ContainerRef {
        self.container.clone()
    }

    pub fn events(&self) -> &EquipmentEvents {
        &self.events
    }

    /// Equip into the item's preferred slot, else the first free slot with
    /// its preferred slot tag, else the first free slot with all its tags
    pub fn equip_item(&self, item: AttachmentRef) -> bool {
        match self.find_slot_for(item.as_ref()) {
            Some(slot) => self.equip_item_to_slot(&slot, item),
            None => {
                log::debug!(
                    "'{}': no free equipment slot for '{}'",
                    self.container.name(),
                    item.object_name()
                );
                false
            }
        }
    }

    /// Equip into a named slot
    pub fn equip_item_to_slot(&self, slot: &Name, item: AttachmentRef) -> bool {
        let (fire_pre, fire_post) = self
            .header(slot)
            .map(|h| (h.fire_pre_equip_event, h.fire_post_equip_event))
            .unwrap_or_default();
        let event = EquipmentEvent {
            slot: slot.clone(),
            item: item.clone(),
        };

        if fire_pre {
            self.events.pre_equip.broadcast(&event);
        }
        if !self.container.try_attach(slot, item.clone()) {
            return false;
        }
        // A forwarded request leaves the item where it was
        if self.slot_of(&item).as_ref() == Some(slot) {
            self.enter_equipped(&event);
        }
        if fire_post {
            self.events.post_equip.broadcast(&event);
        }
        true
    }

    /// Unequip wherever the item is equipped
    pub fn unequip_item(&self, item: &AttachmentRef, use_fallback: bool) -> bool {
        match self.slot_of(item) {
            Some(slot) => self.unequip_item_from_slot(&slot, use_fallback),
            None => false,
        }
    }

    /// Unequip a slot. With `use_fallback` the item moves to the slot's
    /// configured fallback slot when that slot can take it.
    pub fn unequip_item_from_slot(&self, slot: &Name, use_fallback: bool) -> bool {
        let Some(item) = self.container.get_slot(slot).and_then(|s| s.occupant()) else {
            return false;
        };
        if !self.container.try_detach(slot) {
            return false;
        }
        if self.slot_of(&item).is_some() {
            // Forwarded to the authority
            return true;
        }

        let mut moved = false;
        let fallback = self
            .header(slot)
            .map(|h| h.fallback_slot.clone())
            .and_then(Name::into_option)
            .filter(|_| use_fallback);
        if let Some(fallback) = fallback {
            if self.accepts(&fallback) && self.container.try_attach(&fallback, item.clone()) {
                log::debug!("Moved item from '{}' to fallback '{}'", slot, fallback);
                moved = self.slot_of(&item).is_some();
            } else {
                log::debug!("Fallback slot '{}' cannot take the item", fallback);
            }
        }

        if let Some(equipment) = item.as_equipment_item() {
            let state = if moved {
                EquipmentItemState::Equipped
            } else {
                EquipmentItemState::Idle
            };
            equipment.set_equipment_item_state(state);
        }
        true
    }

    /// Move an item equipped here to `Active`
    pub fn activate_item(&self, item: &AttachmentRef) -> bool {
        if self.slot_of(item).is_none() {
            return false;
        }
        item.as_equipment_item()
            .is_some_and(|e| e.set_equipment_item_state(EquipmentItemState::Active))
    }

    /// Move an active item equipped here back to `Equipped`
    pub fn deactivate_item(&self, item: &AttachmentRef) -> bool {
        if self.slot_of(item).is_none() {
            return false;
        }
        item.as_equipment_item().is_some_and(|e| {
            e.equipment_item_state() == EquipmentItemState::Active
                && e.set_equipment_item_state(EquipmentItemState::Equipped)
        })
    }

    pub fn is_equipment_item_equipped(&self, item: &AttachmentRef) -> bool {
        self.slot_of(item).is_some()
    }

    fn find_slot_for(&self, item: &dyn AttachmentObject) -> Option<Name> {
        if let Some(equipment) = item.as_equipment_item() {
            let preferred = equipment.preferred_slot();
            if self.accepts(&preferred) {
                return Some(preferred);
            }
            let by_tag = equipment
                .preferred_slot_tag()
                .and_then(|tag| self.container.find_first_free_slot_with_tags(&TagContainer::from(tag)));
            if by_tag.is_some() {
                return by_tag;
            }
        }

        let tags = item
            .as_attachable()
            .map(|a| a.tags())
            .unwrap_or_else(TagContainer::new);
        self.container.find_first_free_slot_with_tags(&tags)
    }

    /// Free, unlocked and not blocked by another occupied slot
    fn accepts(&self, slot: &Name) -> bool {
        self.container
            .get_slot(slot)
            .is_some_and(|s| s.can_attach() && !self.container.is_slot_blocked(&s))
    }

    fn enter_equipped(&self, event: &EquipmentEvent) {
        let Some(equipment) = event.item.as_equipment_item() else {
            return;
        };
        equipment.set_equipment_item_state(EquipmentItemState::Equipped);
        if !equipment.does_auto_active() {
            return;
        }
        if equipment.requires_activation_event() {
            self.events.activation_requested.broadcast(event);
        } else {
            equipment.set_equipment_item_state(EquipmentItemState::Active);
        }
    }

    fn slot_of(&self, item: &AttachmentRef) -> Option<Name> {
        self.container
            .attachment_slots()
            .iter()
            .find(|s| s.occupant().is_some_and(|o| same_attachment(&o, item)))
            .map(|s| s.name().clone())
    }

    fn header(&self, slot: &Name) -> Option<&SlotHeader> {
        self.container.settings()?.header(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachable::AttachableComponent;
    use crate::equipment_item::{
        EquipmentItem, EquipmentItemBuilder, EquipmentItemComponent, EquipmentItemStateChanged,
    };
    use crate::scene::{SceneActor, SceneComponent};
    use crate::settings::EquipmentSettings;
    use crate::slot::SlotDefinition;
    use parking_lot::Mutex;
    use void_core::Tag;

    const SETTINGS: &str = r#"{
        "allowed_slots": {
            "MainHand": {
                "display_name": "Main Hand",
                "tags": ["Slot.Weapon"],
                "fallback_slot": "Back",
                "fire_pre_equip_event": true,
                "fire_post_equip_event": true
            },
            "Back": {
                "display_name": "Back",
                "tags": ["Slot.Weapon", "Slot.Back"]
            }
        }
    }"#;

    fn rig(owner: &Arc<SceneActor>) -> EquipmentComponent {
        let settings = Arc::new(EquipmentSettings::from_json(SETTINGS).unwrap());
        let container = AttachmentContainerComponent::builder("Equipment")
            .owner(owner)
            .kind(ContainerKind::Equipment)
            .settings(settings)
            .slot(SlotDefinition::new("MainHand").with_component_attachment())
            .slot(SlotDefinition::new("Back").with_component_attachment())
            .build()
            .unwrap();
        EquipmentComponent::new(container)
    }

    fn owner() -> Arc<SceneActor> {
        SceneActor::builder("Hero")
            .component(SceneComponent::new("Root"))
            .build()
    }

    fn sword() -> Arc<AttachableComponent> {
        AttachableComponent::builder("sword")
            .display_name("Sword")
            .tag(Tag::new("Slot.Weapon").unwrap())
            .build()
    }

    fn spear() -> EquipmentItemBuilder {
        EquipmentItemComponent::builder("spear")
            .display_name("Spear")
            .tag(Tag::new("Slot.Weapon").unwrap())
    }

    fn record_states(item: &EquipmentItemComponent) -> Arc<Mutex<Vec<EquipmentItemState>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        item.equipment_events()
            .state_changed
            .subscribe(move |e: &EquipmentItemStateChanged| captured.lock().push(e.state));
        seen
    }

    #[test]
    fn test_equip_and_events() {
        let owner = owner();
        let equipment = rig(&owner);
        let fired = Arc::new(Mutex::new(Vec::new()));

        let pre = fired.clone();
        equipment
            .events()
            .pre_equip
            .subscribe(move |e: &EquipmentEvent| pre.lock().push(("pre", e.slot.clone())));
        let post = fired.clone();
        equipment
            .events()
            .post_equip
            .subscribe(move |e: &EquipmentEvent| post.lock().push(("post", e.slot.clone())));

        let item: AttachmentRef = sword();
        assert!(equipment.equip_item(item.clone()));
        assert!(equipment.is_equipment_item_equipped(&item));
        assert_eq!(
            *fired.lock(),
            vec![("pre", Name::new("MainHand")), ("post", Name::new("MainHand"))]
        );
    }

    #[test]
    fn test_unequip_to_fallback() {
        let owner = owner();
        let equipment = rig(&owner);
        let item = sword();
        let handle: AttachmentRef = item.clone();

        assert!(equipment.equip_item_to_slot(&Name::new("MainHand"), handle.clone()));
        assert!(equipment.unequip_item(&handle, true));

        let container = equipment.container();
        assert!(!container.is_slot_occupied(&Name::new("MainHand")));
        assert!(container.is_slot_occupied(&Name::new("Back")));
        assert_eq!(item.attached_slot(), Some(Name::new("Back")));
    }

    #[test]
    fn test_unequip_without_fallback() {
        let owner = owner();
        let equipment = rig(&owner);
        let item = sword();
        let handle: AttachmentRef = item.clone();

        assert!(equipment.equip_item_to_slot(&Name::new("MainHand"), handle.clone()));
        assert!(equipment.unequip_item_from_slot(&Name::new("MainHand"), false));
        assert!(!equipment.is_equipment_item_equipped(&handle));
        assert!(!item.is_attached());
        assert!(!equipment.unequip_item_from_slot(&Name::new("MainHand"), false));
    }

    #[test]
    fn test_post_equip_not_fired_without_flag() {
        let owner = owner();
        let equipment = rig(&owner);
        let fired = Arc::new(Mutex::new(0));
        let counter = fired.clone();
        equipment.events().post_equip.subscribe(move |_| *counter.lock() += 1);

        assert!(equipment.equip_item_to_slot(&Name::new("Back"), sword()));
        assert_eq!(*fired.lock(), 0);
    }

    #[test]
    fn test_preferred_slot_comes_first() {
        let owner = owner();
        let equipment = rig(&owner);
        let item: AttachmentRef = spear().preferred_slot("Back").build();

        assert!(equipment.equip_item(item.clone()));
        assert_eq!(equipment.slot_of(&item), Some(Name::new("Back")));
        assert!(!equipment.container().is_slot_occupied(&Name::new("MainHand")));
    }

    #[test]
    fn test_preferred_slot_tag_before_item_tags() {
        let owner = owner();
        let equipment = rig(&owner);
        let item: AttachmentRef = spear()
            .preferred_slot_tag(Tag::new("Slot.Back").unwrap())
            .build();

        assert!(equipment.equip_item(item.clone()));
        assert_eq!(equipment.slot_of(&item), Some(Name::new("Back")));
    }

    #[test]
    fn test_taken_preferred_slot_falls_through() {
        let owner = owner();
        let equipment = rig(&owner);
        assert!(equipment.equip_item_to_slot(&Name::new("Back"), sword()));

        let item: AttachmentRef = spear().preferred_slot("Back").build();
        assert!(equipment.equip_item(item.clone()));
        assert_eq!(equipment.slot_of(&item), Some(Name::new("MainHand")));
    }

    #[test]
    fn test_item_state_follows_equipment() {
        let owner = owner();
        let equipment = rig(&owner);
        let spear = spear().build();
        let states = record_states(&spear);
        let item: AttachmentRef = spear.clone();

        assert!(equipment.equip_item_to_slot(&Name::new("MainHand"), item.clone()));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Equipped);

        // Moving to the fallback slot keeps it equipped
        assert!(equipment.unequip_item(&item, true));
        assert_eq!(equipment.slot_of(&item), Some(Name::new("Back")));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Equipped);

        assert!(equipment.unequip_item(&item, false));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Idle);
        assert_eq!(
            *states.lock(),
            vec![EquipmentItemState::Equipped, EquipmentItemState::Idle]
        );
    }

    #[test]
    fn test_auto_active_item() {
        let owner = owner();
        let equipment = rig(&owner);
        let spear = spear().auto_active(true).build();
        let states = record_states(&spear);
        let item: AttachmentRef = spear.clone();

        assert!(equipment.equip_item(item.clone()));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Active);

        assert!(equipment.deactivate_item(&item));
        assert!(!equipment.deactivate_item(&item));
        assert!(equipment.activate_item(&item));
        assert!(!equipment.activate_item(&item));
        assert_eq!(
            *states.lock(),
            vec![
                EquipmentItemState::Equipped,
                EquipmentItemState::Active,
                EquipmentItemState::Equipped,
                EquipmentItemState::Active,
            ]
        );
    }

    #[test]
    fn test_activation_waits_for_request() {
        let owner = owner();
        let equipment = rig(&owner);
        let requested = Arc::new(Mutex::new(Vec::new()));
        let captured = requested.clone();
        equipment
            .events()
            .activation_requested
            .subscribe(move |e: &EquipmentEvent| captured.lock().push(e.slot.clone()));

        let spear = spear()
            .auto_active(true)
            .requires_activation_event(true)
            .build();
        let item: AttachmentRef = spear.clone();

        assert!(equipment.equip_item(item.clone()));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Equipped);
        assert_eq!(*requested.lock(), vec![Name::new("MainHand")]);

        assert!(equipment.activate_item(&item));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Active);
    }

    #[test]
    fn test_activation_needs_an_equipped_item() {
        let owner = owner();
        let equipment = rig(&owner);
        let spear = spear().build();
        let item: AttachmentRef = spear.clone();

        assert!(!equipment.activate_item(&item));
        assert_eq!(spear.equipment_item_state(), EquipmentItemState::Idle);

        // Plain attachables have no equipment state to move
        let plain: AttachmentRef = sword();
        assert!(equipment.equip_item(plain.clone()));
        assert!(!equipment.activate_item(&plain));
    }
}
