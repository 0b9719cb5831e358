//! Attachment containers
//!
//! A container owns a fixed, ordered set of slots. It is the gameplay entry
//! point for attaching and detaching: it applies the authority rule, checks
//! blocking tags, keeps the aggregate state current and raises events.

use crate::attachable::Attachable;
use crate::error::{AttachError, AttachResult};
use crate::replication::{ContainerSnapshot, NetRole, ReplicationBridge};
use crate::scene::{SceneActor, SceneComponent};
use crate::settings::EquipmentSettings;
use crate::slot::{AttachmentSlot, SlotDefinition};
use crate::statics;
use crate::types::{is_attachable, same_attachment, AttachmentRef, ContainerState, SlotState};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use void_core::{Name, TagContainer};
use void_event::Delegate;

/// Owning handle to a container
pub type ContainerRef = Arc<dyn AttachmentContainer>;

/// Non-owning back-reference to a container
pub type WeakContainerRef = Weak<dyn AttachmentContainer>;

/// Slot contents changed
#[derive(Clone)]
pub struct AttachmentChanged {
    pub slot: Name,
    pub new_attachment: Option<AttachmentRef>,
    pub old_attachment: Option<AttachmentRef>,
}

/// Slot was enabled or disabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStateChanged {
    pub slot: Name,
    pub enabled: bool,
}

/// Every slot was cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCleared {
    pub container: Name,
}

/// Container notification hooks
#[derive(Default)]
pub struct ContainerEvents {
    pub attachment_changed: Delegate<AttachmentChanged>,
    pub slot_state_changed: Delegate<SlotStateChanged>,
    pub container_cleared: Delegate<ContainerCleared>,
}

/// What a container is used for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Generic attachment rig
    #[default]
    Attachment,
    /// Equipment rig, slots follow the equipment settings
    Equipment,
}

/// Capability implemented by anything owning attachment slots.
///
/// Lookups have default implementations over [`attachment_slots`]; the
/// mutating entry points belong to the implementation.
///
/// [`attachment_slots`]: AttachmentContainer::attachment_slots
pub trait AttachmentContainer: Send + Sync {
    fn name(&self) -> &Name;

    /// Actor the container belongs to
    fn owning_actor(&self) -> Option<Arc<SceneActor>>;

    /// Name of the component new attachments are parented to
    fn default_attachment_target(&self) -> Name;

    /// Change the default target; only succeeds if the owner has a component
    /// with that name
    fn set_default_attachment_target_component(&self, component: &Name) -> bool;

    /// Fixed slot collection, in declaration order
    fn attachment_slots(&self) -> &[Arc<AttachmentSlot>];

    fn events(&self) -> &ContainerEvents;

    /// Aggregate state, `Occupied` while any slot is occupied
    fn state(&self) -> ContainerState;

    fn disable_slot(&self, slot: &Name) -> bool;
    fn try_attach(&self, slot: &Name, attachment: AttachmentRef) -> bool;
    fn try_detach(&self, slot: &Name) -> bool;
    fn force_attach(&self, slot: &Name, attachment: AttachmentRef) -> bool;
    fn force_detach(&self, slot: &Name) -> bool;
    fn clear_all(&self);

    /// Resolved default target component, falling back to the owner root
    fn attachment_target_component(&self) -> Option<Arc<SceneComponent>> {
        let owner = self.owning_actor()?;
        statics::available_component_by_name(Some(owner.as_ref()), &self.default_attachment_target())
            .or_else(|| owner.root_component().cloned())
    }

    fn get_slot(&self, slot: &Name) -> Option<Arc<AttachmentSlot>> {
        self.attachment_slots()
            .iter()
            .find(|s| s.name() == slot)
            .cloned()
    }

    fn is_valid_slot(&self, slot: &Name) -> bool {
        self.get_slot(slot).is_some_and(|s| s.is_slot_valid())
    }

    fn is_slot_occupied(&self, slot: &Name) -> bool {
        self.get_slot(slot).is_some_and(|s| s.is_occupied())
    }

    /// True while another occupied slot carries one of this slot's blocking
    /// tags, either on the slot itself or on its occupant
    fn is_slot_blocked(&self, slot: &AttachmentSlot) -> bool {
        let blocking = slot.blocking_tags();
        if blocking.is_empty() {
            return false;
        }
        self.attachment_slots()
            .iter()
            .filter(|other| other.name() != slot.name() && other.is_occupied())
            .any(|other| {
                let occupant_tags = other
                    .occupant()
                    .and_then(|o| o.as_attachable().map(|a| a.tags()))
                    .unwrap_or_default();
                other.tags().has_any(blocking) || occupant_tags.has_any(blocking)
            })
    }

    /// First slot in declaration order that accepts an attachment carrying
    /// all of `required`
    fn find_first_free_slot_with_tags(&self, required: &TagContainer) -> Option<Name> {
        self.attachment_slots()
            .iter()
            .find(|s| s.can_attach() && s.matches_tags(required, true) && !self.is_slot_blocked(s))
            .map(|s| s.name().clone())
    }

    /// Name of the occupied slot holding `attachable`
    fn get_slot_id_for_attachable(&self, attachable: &dyn Attachable) -> Option<Name> {
        self.attachment_slots()
            .iter()
            .find(|s| {
                s.is_occupied()
                    && s.occupant()
                        .is_some_and(|occupant| is_attachable(&occupant, attachable))
            })
            .map(|s| s.name().clone())
    }

    /// First slot in declaration order that is not occupied
    fn get_first_empty_slot(&self) -> Option<Name> {
        self.attachment_slots()
            .iter()
            .find(|s| !s.is_occupied())
            .map(|s| s.name().clone())
    }
}

/// Default container implementation
pub struct AttachmentContainerComponent {
    name: Name,
    kind: ContainerKind,
    owner: Weak<SceneActor>,
    default_target: RwLock<Name>,
    role: NetRole,
    slots: Vec<Arc<AttachmentSlot>>,
    state: RwLock<ContainerState>,
    settings: Option<Arc<EquipmentSettings>>,
    bridge: Option<Arc<dyn ReplicationBridge>>,
    events: ContainerEvents,
}

impl AttachmentContainerComponent {
    /// Start building a container
    pub fn builder(name: impl Into<Name>) -> ContainerBuilder {
        ContainerBuilder::new(name)
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    pub fn settings(&self) -> Option<&Arc<EquipmentSettings>> {
        self.settings.as_ref()
    }

    /// Resolve slot target overrides and announce every slot
    pub fn begin_play(&self) {
        for slot in &self.slots {
            slot.begin_play();
        }
        log::debug!(
            "Container '{}' ready with {} slots",
            self.name,
            self.slots.len()
        );
    }

    /// Replicable state of the whole container
    pub fn snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            container: self.name.clone(),
            state: self.state(),
            slots: self.slots.iter().map(|s| s.snapshot()).collect(),
        }
    }

    /// Replay an authoritative snapshot.
    ///
    /// `resolver` maps replicated occupant names back to live attachments.
    /// Unknown slot names are skipped. Returns the number of slots whose
    /// occupant changed; each of those raises `attachment_changed`.
    pub fn apply_snapshot(
        &self,
        snapshot: &ContainerSnapshot,
        resolver: &dyn Fn(&Name) -> Option<AttachmentRef>,
    ) -> usize {
        let mut changed = 0;
        for entry in &snapshot.slots {
            let Some(slot) = self.get_slot(&entry.slot) else {
                log::debug!(
                    "Container '{}': snapshot names unknown slot '{}'",
                    self.name,
                    entry.slot
                );
                continue;
            };

            let old = slot.occupant();
            let occupant = entry.occupant.as_ref().and_then(resolver);
            slot.apply_replicated_state(entry.state, occupant);
            if self.notify_if_changed(&entry.slot, old, slot.occupant()) {
                changed += 1;
            }
        }
        self.refresh_state();
        changed
    }

    fn attach_checked(&self, slot_name: &Name, attachment: AttachmentRef) -> AttachResult<()> {
        let slot = self
            .get_slot(slot_name)
            .ok_or_else(|| AttachError::SlotNotFound(slot_name.clone()))?;
        if self.is_slot_blocked(&slot) {
            return Err(AttachError::SlotBlocked(slot_name.clone()));
        }

        let old = slot.occupant();
        slot.try_attach(attachment.clone())?;
        self.refresh_state();
        self.events.attachment_changed.broadcast(&AttachmentChanged {
            slot: slot_name.clone(),
            new_attachment: Some(attachment),
            old_attachment: old,
        });
        Ok(())
    }

    /// Hand a request to the bridge. Remote containers never mutate
    /// replicated state themselves.
    fn forward(&self, request: &str, send: impl FnOnce(&dyn ReplicationBridge)) {
        match &self.bridge {
            Some(bridge) => send(bridge.as_ref()),
            None => log::debug!(
                "Container '{}': no replication bridge, {} request dropped",
                self.name,
                request
            ),
        }
    }

    /// Raise `attachment_changed` when the occupant of `slot` was replaced
    fn notify_if_changed(
        &self,
        slot: &Name,
        old: Option<AttachmentRef>,
        new: Option<AttachmentRef>,
    ) -> bool {
        let changed = match (&old, &new) {
            (Some(a), Some(b)) => !same_attachment(a, b),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.events.attachment_changed.broadcast(&AttachmentChanged {
                slot: slot.clone(),
                new_attachment: new,
                old_attachment: old,
            });
        }
        changed
    }

    /// Recompute the aggregate state from the slots
    fn refresh_state(&self) {
        let next = if self.slots.iter().any(|s| s.is_occupied()) {
            ContainerState::Occupied
        } else {
            ContainerState::Empty
        };
        let mut state = self.state.write();
        if *state != next {
            log::debug!("Container '{}': {:?} -> {:?}", self.name, *state, next);
            *state = next;
        }
    }
}

impl AttachmentContainer for AttachmentContainerComponent {
    fn name(&self) -> &Name {
        &self.name
    }

    fn owning_actor(&self) -> Option<Arc<SceneActor>> {
        self.owner.upgrade()
    }

    fn default_attachment_target(&self) -> Name {
        self.default_target.read().clone()
    }

    fn set_default_attachment_target_component(&self, component: &Name) -> bool {
        let owner = self.owning_actor();
        if statics::available_component_by_name(owner.as_deref(), component).is_none() {
            log::debug!(
                "Container '{}': '{}' is not a component of the owner",
                self.name,
                component
            );
            return false;
        }
        *self.default_target.write() = component.clone();
        true
    }

    fn attachment_slots(&self) -> &[Arc<AttachmentSlot>] {
        &self.slots
    }

    fn events(&self) -> &ContainerEvents {
        &self.events
    }

    fn state(&self) -> ContainerState {
        *self.state.read()
    }

    fn disable_slot(&self, slot_name: &Name) -> bool {
        if self.role == NetRole::Remote {
            self.forward("disable", |bridge| bridge.forward_disable(&self.name, slot_name));
            return true;
        }

        let Some(slot) = self.get_slot(slot_name) else {
            AttachError::SlotNotFound(slot_name.clone()).report();
            return false;
        };

        let old = slot.occupant();
        slot.disable();
        self.refresh_state();

        if old.is_some() {
            self.events.attachment_changed.broadcast(&AttachmentChanged {
                slot: slot_name.clone(),
                new_attachment: None,
                old_attachment: old,
            });
        }
        self.events.slot_state_changed.broadcast(&SlotStateChanged {
            slot: slot_name.clone(),
            enabled: false,
        });
        true
    }

    fn try_attach(&self, slot: &Name, attachment: AttachmentRef) -> bool {
        if self.role == NetRole::Remote {
            self.forward("attach", |bridge| bridge.forward_attach(&self.name, slot, &attachment));
            return true;
        }

        match self.attach_checked(slot, attachment) {
            Ok(()) => true,
            Err(err) => {
                err.report();
                false
            }
        }
    }

    fn try_detach(&self, slot_name: &Name) -> bool {
        if self.role == NetRole::Remote {
            self.forward("detach", |bridge| bridge.forward_detach(&self.name, slot_name));
            return true;
        }

        let Some(slot) = self.get_slot(slot_name) else {
            AttachError::SlotNotFound(slot_name.clone()).report();
            return false;
        };

        let old = slot.occupant();
        if !slot.detach() {
            return false;
        }
        self.refresh_state();
        self.events.attachment_changed.broadcast(&AttachmentChanged {
            slot: slot_name.clone(),
            new_attachment: None,
            old_attachment: old,
        });
        true
    }

    fn force_attach(&self, slot_name: &Name, attachment: AttachmentRef) -> bool {
        let Some(slot) = self.get_slot(slot_name) else {
            AttachError::SlotNotFound(slot_name.clone()).report();
            return false;
        };
        let old = slot.occupant();
        let attached = slot.force_attach(attachment);
        self.refresh_state();
        self.notify_if_changed(slot_name, old, slot.occupant());
        attached
    }

    fn force_detach(&self, slot_name: &Name) -> bool {
        let Some(slot) = self.get_slot(slot_name) else {
            AttachError::SlotNotFound(slot_name.clone()).report();
            return false;
        };
        let old = slot.occupant();
        let detached = slot.force_detach();
        self.refresh_state();
        self.notify_if_changed(slot_name, old, None);
        detached
    }

    fn clear_all(&self) {
        if self.role == NetRole::Remote {
            self.forward("clear", |bridge| bridge.forward_clear_all(&self.name));
            return;
        }

        for slot in &self.slots {
            if !slot.is_occupied() {
                continue;
            }
            let old = slot.occupant();
            if slot.detach() {
                self.events.attachment_changed.broadcast(&AttachmentChanged {
                    slot: slot.name().clone(),
                    new_attachment: None,
                    old_attachment: old,
                });
            }
        }
        self.refresh_state();
        self.events.container_cleared.broadcast(&ContainerCleared {
            container: self.name.clone(),
        });
    }
}

impl std::fmt::Debug for AttachmentContainerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentContainerComponent")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("role", &self.role)
            .field("state", &self.state())
            .field("slots", &self.slots)
            .finish()
    }
}

/// Builder for [`AttachmentContainerComponent`]
pub struct ContainerBuilder {
    name: Name,
    kind: ContainerKind,
    owner: Weak<SceneActor>,
    default_target: Name,
    role: NetRole,
    settings: Option<Arc<EquipmentSettings>>,
    bridge: Option<Arc<dyn ReplicationBridge>>,
    slots: Vec<SlotDefinition>,
}

impl ContainerBuilder {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            kind: ContainerKind::default(),
            owner: Weak::new(),
            default_target: Name::none(),
            role: NetRole::default(),
            settings: None,
            bridge: None,
            slots: Vec::new(),
        }
    }

    /// Actor owning the container; only a weak reference is kept
    pub fn owner(mut self, owner: &Arc<SceneActor>) -> Self {
        self.owner = Arc::downgrade(owner);
        self
    }

    pub fn kind(mut self, kind: ContainerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn default_attachment_target(mut self, component: impl Into<Name>) -> Self {
        self.default_target = component.into();
        self
    }

    pub fn role(mut self, role: NetRole) -> Self {
        self.role = role;
        self
    }

    /// Settings used to populate slot metadata
    pub fn settings(mut self, settings: Arc<EquipmentSettings>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Where non-authoritative requests are forwarded
    pub fn bridge(mut self, bridge: Arc<dyn ReplicationBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn slot(mut self, definition: SlotDefinition) -> Self {
        self.slots.push(definition);
        self
    }

    /// Build the container, rejecting duplicate slot names
    pub fn build(self) -> AttachResult<Arc<AttachmentContainerComponent>> {
        let mut seen = HashSet::new();
        for definition in &self.slots {
            if !seen.insert(definition.name.clone()) {
                return Err(AttachError::DuplicateSlot(definition.name.clone()));
            }
        }

        let prepared: Vec<(SlotDefinition, SlotState)> = self
            .slots
            .into_iter()
            .map(|mut definition| {
                let mut state = SlotState::Empty;
                if let Some(settings) = &self.settings {
                    settings.populate(&mut definition);
                    if settings.header(&definition.name).is_some_and(|h| !h.enabled) {
                        state = SlotState::Locked;
                    }
                }
                (definition, state)
            })
            .collect();

        let name = self.name;
        let container = Arc::new_cyclic(|weak: &Weak<AttachmentContainerComponent>| {
            let parent: WeakContainerRef = weak.clone();
            let slots = prepared
                .into_iter()
                .map(|(definition, state)| {
                    Arc::new(AttachmentSlot::new(definition, parent.clone()).with_initial_state(state))
                })
                .collect();

            AttachmentContainerComponent {
                name: name.clone(),
                kind: self.kind,
                owner: self.owner,
                default_target: RwLock::new(self.default_target),
                role: self.role,
                slots,
                state: RwLock::new(ContainerState::Empty),
                settings: self.settings,
                bridge: self.bridge,
                events: ContainerEvents::default(),
            }
        });

        log::debug!(
            "Built container '{}' with {} slots ({:?})",
            name,
            container.slots.len(),
            container.role
        );
        Ok(container)
    }
}
