//! Attachment slots
//!
//! A slot is a named, tagged position on a container that holds at most one
//! attachment. Slots validate candidates, parent their scene node to the
//! resolved target component and notify attachables about the change.
//!
//! Slots never broadcast container events; the owning container does that
//! after a slot operation succeeds.

use crate::container::{ContainerRef, WeakContainerRef};
use crate::error::{AttachError, AttachResult};
use crate::replication::SlotSnapshot;
use crate::scene::{AttachmentRules, SceneActor, SceneComponent};
use crate::statics;
use crate::types::{same_attachment, AttachmentObject, AttachmentRef, SlotState, SlotType};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use void_core::{Name, Tag, TagContainer};
use void_event::Delegate;

/// Authored description of a slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    /// Unique name within the container
    pub name: Name,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub tags: TagContainer,
    /// Occupied slots carrying any of these tags block this slot
    #[serde(default)]
    pub blocking_tags: TagContainer,
    #[serde(default)]
    pub slot_type: SlotType,
    #[serde(default)]
    pub socket_name: Name,
    /// Component name used instead of the container default target
    #[serde(default)]
    pub target_override: Name,
}

impl SlotDefinition {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_tags(mut self, tags: TagContainer) -> Self {
        self.tags.append(&tags);
        self
    }

    pub fn with_blocking_tag(mut self, tag: Tag) -> Self {
        self.blocking_tags.insert(tag);
        self
    }

    /// Attach to a named socket on the target component
    pub fn with_socket(mut self, socket: impl Into<Name>) -> Self {
        self.slot_type = SlotType::Socket;
        self.socket_name = socket.into();
        self
    }

    /// Attach to the target component origin
    pub fn with_component_attachment(mut self) -> Self {
        self.slot_type = SlotType::Component;
        self.socket_name = Name::none();
        self
    }

    pub fn with_target_override(mut self, component: impl Into<Name>) -> Self {
        self.target_override = component.into();
        self
    }
}

/// Broadcast once a slot finished its startup resolution
#[derive(Debug, Clone)]
pub struct SlotBeginPlay {
    pub slot: Name,
    /// Name of the resolved target override, if any
    pub target_override: Option<Name>,
}

#[derive(Default)]
struct SlotRuntime {
    state: SlotState,
    occupant: Option<AttachmentRef>,
    last_occupant: Option<Weak<dyn AttachmentObject>>,
    target_override: Option<Arc<SceneComponent>>,
}

/// A single attachment slot owned by a container
pub struct AttachmentSlot {
    definition: SlotDefinition,
    parent: WeakContainerRef,
    runtime: RwLock<SlotRuntime>,
    /// Fired by [`AttachmentSlot::begin_play`]
    pub on_begin_play: Delegate<SlotBeginPlay>,
}

impl AttachmentSlot {
    /// Create a slot bound to its parent container
    pub fn new(definition: SlotDefinition, parent: WeakContainerRef) -> Self {
        Self {
            definition,
            parent,
            runtime: RwLock::new(SlotRuntime::default()),
            on_begin_play: Delegate::new(),
        }
    }

    /// Start in the given state instead of `Empty`
    pub(crate) fn with_initial_state(self, state: SlotState) -> Self {
        self.runtime.write().state = state;
        self
    }

    pub fn name(&self) -> &Name {
        &self.definition.name
    }

    pub fn definition(&self) -> &SlotDefinition {
        &self.definition
    }

    pub fn display_name(&self) -> &str {
        &self.definition.display_name
    }

    pub fn tags(&self) -> &TagContainer {
        &self.definition.tags
    }

    pub fn blocking_tags(&self) -> &TagContainer {
        &self.definition.blocking_tags
    }

    pub fn slot_type(&self) -> SlotType {
        self.definition.slot_type
    }

    pub fn socket_name(&self) -> &Name {
        &self.definition.socket_name
    }

    pub fn state(&self) -> SlotState {
        self.runtime.read().state
    }

    /// Owning container, if still alive
    pub fn parent_container(&self) -> Option<ContainerRef> {
        self.parent.upgrade()
    }

    pub fn owning_actor(&self) -> Option<Arc<SceneActor>> {
        self.parent_container()?.owning_actor()
    }

    pub fn occupant(&self) -> Option<AttachmentRef> {
        self.runtime.read().occupant.clone()
    }

    /// Most recent occupant, kept after a normal detach
    pub fn last_occupant(&self) -> Option<AttachmentRef> {
        self.runtime
            .read()
            .last_occupant
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// A slot is usable only with a name, at least one tag and a live parent
    pub fn is_slot_valid(&self) -> bool {
        !self.definition.name.is_none()
            && !self.definition.tags.is_empty()
            && self.parent.strong_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        let runtime = self.runtime.read();
        runtime.state == SlotState::Empty && runtime.occupant.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        let runtime = self.runtime.read();
        runtime.state == SlotState::Occupied && runtime.occupant.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.state() == SlotState::Locked
    }

    pub fn can_attach(&self) -> bool {
        self.check_can_attach().is_ok()
    }

    pub fn can_detach(&self) -> bool {
        self.is_slot_valid() && self.is_occupied()
    }

    /// Tag match including descendants of slot tags
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.definition.tags.has_tag(tag)
    }

    /// All (or any) of `query` present in the slot tags
    pub fn matches_tags(&self, query: &TagContainer, require_all: bool) -> bool {
        self.definition.tags.matches(query, require_all)
    }

    /// Resolve the target override and announce the slot
    pub fn begin_play(&self) {
        let resolved = self.resolve_target_override();
        if !self.definition.target_override.is_none() && resolved.is_none() {
            log::warn!(
                "Slot '{}': target override '{}' not found on owner",
                self.definition.name,
                self.definition.target_override
            );
        }
        self.on_begin_play.broadcast(&SlotBeginPlay {
            slot: self.definition.name.clone(),
            target_override: resolved.map(|c| c.name().clone()),
        });
    }

    /// Component this slot parents attachments to
    pub fn attachment_target(&self) -> Option<Arc<SceneComponent>> {
        let cached = self.runtime.read().target_override.clone();
        cached
            .or_else(|| self.resolve_target_override())
            .or_else(|| self.parent_container()?.attachment_target_component())
    }

    /// Sockets offered by the resolved target component
    pub fn available_socket_names(&self) -> Vec<Name> {
        match self.definition.slot_type {
            SlotType::Socket => self
                .attachment_target()
                .map(|target| target.socket_names().to_vec())
                .unwrap_or_default(),
            SlotType::Component => Vec::new(),
        }
    }

    /// Components of the owner that can serve as target override
    pub fn available_target_names(&self) -> Vec<Name> {
        statics::available_component_names(self.owning_actor().as_deref())
    }

    /// Gated attach: the slot must be valid, empty and unlocked and the
    /// candidate must agree to it.
    pub fn attach(&self, candidate: AttachmentRef) -> bool {
        self.try_attach(candidate).map_err(|e| e.report()).is_ok()
    }

    /// Gated attach with the failure reason
    pub fn try_attach(&self, candidate: AttachmentRef) -> AttachResult<()> {
        self.check_can_attach()?;
        let target = self
            .attachment_target()
            .ok_or_else(|| AttachError::MissingTarget(self.definition.name.clone()))?;

        self.check_candidate(candidate.as_ref())?;
        self.attach_scene_node(candidate.as_ref(), &target)?;
        self.complete_attachment(candidate);
        Ok(())
    }

    /// Attach ignoring lock, occupancy and the candidate's own checks.
    ///
    /// A different current occupant is detached first. Succeeds logically
    /// even when the target cannot be resolved.
    pub fn force_attach(&self, candidate: AttachmentRef) -> bool {
        if !self.is_slot_valid() {
            AttachError::InvalidSlot(self.definition.name.clone()).report();
            return false;
        }

        if let Some(current) = self.occupant() {
            if same_attachment(&current, &candidate) {
                self.runtime.write().state = SlotState::Occupied;
                return true;
            }
            self.runtime.write().occupant = None;
            self.release(current.as_ref());
        }

        match self.attachment_target() {
            Some(target) => {
                if let Err(err) = self.attach_scene_node(candidate.as_ref(), &target) {
                    err.report();
                }
            }
            None => log::warn!(
                "Slot '{}': no attachment target, forcing '{}' logically",
                self.definition.name,
                candidate.object_name()
            ),
        }

        self.complete_attachment(candidate);
        true
    }

    /// Detach the current occupant; false when there is none
    pub fn detach(&self) -> bool {
        let occupant = {
            let mut runtime = self.runtime.write();
            if runtime.state != SlotState::Occupied {
                None
            } else {
                let occupant = runtime.occupant.take();
                runtime.state = SlotState::Empty;
                occupant
            }
        };

        match occupant {
            Some(occupant) => {
                self.release(occupant.as_ref());
                log::debug!(
                    "Slot '{}': detached '{}'",
                    self.definition.name,
                    occupant.object_name()
                );
                true
            }
            None => {
                AttachError::SlotEmpty(self.definition.name.clone()).report();
                false
            }
        }
    }

    /// Clear the slot unconditionally, cleaning up a dangling attachment
    /// when only the last occupant is known. Always succeeds.
    pub fn force_detach(&self) -> bool {
        let (occupant, last) = {
            let mut runtime = self.runtime.write();
            runtime.state = SlotState::Empty;
            (runtime.occupant.take(), runtime.last_occupant.clone())
        };

        if let Some(occupant) = occupant {
            self.release(occupant.as_ref());
        } else if let Some(last) = last.and_then(|weak| weak.upgrade()) {
            self.release_dangling(&last);
        }
        true
    }

    /// Detach any occupant and lock the slot
    pub fn disable(&self) {
        if self.is_occupied() {
            self.detach();
        }
        self.runtime.write().state = SlotState::Locked;
    }

    /// Replay an authoritative slot state.
    ///
    /// `Occupied` force-attaches `occupant`, `Empty` force-detaches and
    /// `Locked` is assigned directly after releasing any occupant. Returns
    /// true when the occupant changed.
    pub fn apply_replicated_state(&self, state: SlotState, occupant: Option<AttachmentRef>) -> bool {
        let before = self.occupant();
        match (state, occupant) {
            (SlotState::Occupied, Some(occupant)) => {
                self.force_attach(occupant);
            }
            (SlotState::Occupied, None) => {
                log::warn!(
                    "Slot '{}': replicated occupant could not be resolved",
                    self.definition.name
                );
                self.force_detach();
            }
            (SlotState::Empty, _) => {
                if self.state() != SlotState::Empty || before.is_some() {
                    self.force_detach();
                }
            }
            (SlotState::Locked, _) => {
                let released = {
                    let mut runtime = self.runtime.write();
                    runtime.state = SlotState::Locked;
                    runtime.occupant.take()
                };
                if let Some(released) = released {
                    self.release(released.as_ref());
                }
            }
        }

        let after = self.occupant();
        match (&before, &after) {
            (Some(a), Some(b)) => !same_attachment(a, b),
            (None, None) => false,
            _ => true,
        }
    }

    /// Replicable view of this slot
    pub fn snapshot(&self) -> SlotSnapshot {
        let runtime = self.runtime.read();
        SlotSnapshot {
            slot: self.definition.name.clone(),
            state: runtime.state,
            occupant: runtime.occupant.as_ref().map(|o| o.object_name()),
        }
    }

    fn check_can_attach(&self) -> AttachResult<()> {
        let name = &self.definition.name;
        if !self.is_slot_valid() {
            return Err(AttachError::InvalidSlot(name.clone()));
        }
        match self.state() {
            SlotState::Locked => Err(AttachError::SlotLocked(name.clone())),
            SlotState::Occupied => Err(AttachError::SlotOccupied(name.clone())),
            SlotState::Empty => Ok(()),
        }
    }

    fn check_candidate(&self, candidate: &dyn AttachmentObject) -> AttachResult<()> {
        match candidate.as_attachable() {
            Some(attachable) if !attachable.can_attach() => Err(AttachError::AttachableRejected {
                slot: self.definition.name.clone(),
                candidate: candidate.object_name(),
            }),
            Some(_) => Ok(()),
            None => {
                log::warn!(
                    "Slot '{}': '{}' is not attachable, attaching without its consent",
                    self.definition.name,
                    candidate.object_name()
                );
                Ok(())
            }
        }
    }

    fn resolve_target_override(&self) -> Option<Arc<SceneComponent>> {
        if self.definition.target_override.is_none() {
            return None;
        }
        let owner = self.owning_actor();
        let found =
            statics::available_component_by_name(owner.as_deref(), &self.definition.target_override);
        if found.is_some() {
            self.runtime.write().target_override = found.clone();
        }
        found
    }

    /// Socket to use on `target`, degrading to the component origin when the
    /// socket is missing
    fn resolve_socket(&self, target: &SceneComponent) -> Option<Name> {
        if self.definition.slot_type == SlotType::Component || self.definition.socket_name.is_none() {
            return None;
        }
        if target.has_socket(&self.definition.socket_name) {
            Some(self.definition.socket_name.clone())
        } else {
            log::warn!(
                "Slot '{}': socket '{}' missing on '{}', using component origin",
                self.definition.name,
                self.definition.socket_name,
                target.name()
            );
            None
        }
    }

    fn attach_scene_node(
        &self,
        candidate: &dyn AttachmentObject,
        target: &Arc<SceneComponent>,
    ) -> AttachResult<()> {
        let Some(node) = candidate.scene_node() else {
            log::debug!(
                "Slot '{}': '{}' has no scene node, attaching logically",
                self.definition.name,
                candidate.object_name()
            );
            return Ok(());
        };

        let socket = self.resolve_socket(target);
        if node.attach_to(target, socket.as_ref(), AttachmentRules::SNAP_TO_TARGET_INCLUDING_SCALE) {
            Ok(())
        } else {
            Err(AttachError::PhysicalAttachFailed {
                slot: self.definition.name.clone(),
                candidate: candidate.object_name(),
            })
        }
    }

    fn complete_attachment(&self, candidate: AttachmentRef) {
        {
            let mut runtime = self.runtime.write();
            runtime.last_occupant = Some(Arc::downgrade(&candidate));
            runtime.occupant = Some(candidate.clone());
            runtime.state = SlotState::Occupied;
        }

        if let Some(attachable) = candidate.as_attachable() {
            attachable.on_slot_attached(&self.parent, &self.definition.name);
        }
        log::debug!(
            "Slot '{}': attached '{}'",
            self.definition.name,
            candidate.object_name()
        );
    }

    fn release(&self, occupant: &dyn AttachmentObject) {
        if let Some(node) = occupant.scene_node() {
            node.detach_from_parent(AttachmentRules::KEEP_WORLD);
        }
        if let Some(attachable) = occupant.as_attachable() {
            attachable.on_slot_detached();
        }
    }

    /// The last occupant may have moved on; only undo what still points here
    fn release_dangling(&self, last: &AttachmentRef) {
        if let (Some(node), Some(target)) = (last.scene_node(), self.attachment_target()) {
            if node.is_attached_to(&target) {
                node.detach_from_parent(AttachmentRules::KEEP_WORLD);
            }
        }

        let Some(attachable) = last.as_attachable() else {
            return;
        };
        let Some(parent) = self.parent_container() else {
            return;
        };
        let still_here = attachable
            .attached_to()
            .is_some_and(|container| Arc::ptr_eq(&container, &parent));
        if still_here && parent.get_slot_id_for_attachable(attachable).is_none() {
            attachable.on_slot_detached();
        }
    }
}

impl std::fmt::Debug for AttachmentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let runtime = self.runtime.read();
        f.debug_struct("AttachmentSlot")
            .field("name", &self.definition.name)
            .field("state", &runtime.state)
            .field(
                "occupant",
                &runtime.occupant.as_ref().map(|o| o.object_name()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachable::AttachableComponent;
    use crate::container::{AttachmentContainer, AttachmentContainerComponent};

    fn tag(name: &str) -> Tag {
        Tag::new(name).unwrap()
    }

    struct Fixture {
        owner: Arc<SceneActor>,
        rig: Arc<AttachmentContainerComponent>,
    }

    impl Fixture {
        fn new() -> Self {
            let owner = SceneActor::builder("Hero")
                .component(SceneComponent::new("Root"))
                .component(SceneComponent::new("Mesh").with_socket("hand_r"))
                .build();
            let rig = AttachmentContainerComponent::builder("Rig")
                .owner(&owner)
                .default_attachment_target("Mesh")
                .slot(
                    SlotDefinition::new("MainHand")
                        .with_tag(tag("Slot.Weapon"))
                        .with_socket("hand_r"),
                )
                .slot(
                    SlotDefinition::new("Hip")
                        .with_tag(tag("Slot.Weapon"))
                        .with_socket("hip_l"),
                )
                .slot(
                    SlotDefinition::new("Head")
                        .with_tag(tag("Slot.Head"))
                        .with_component_attachment()
                        .with_target_override("Root"),
                )
                .slot(SlotDefinition::new("Untagged"))
                .build()
                .unwrap();
            Self { owner, rig }
        }

        fn slot(&self, name: &str) -> Arc<AttachmentSlot> {
            self.rig.get_slot(&Name::new(name)).unwrap()
        }
    }

    fn item(id: &str) -> Arc<AttachableComponent> {
        AttachableComponent::builder(id)
            .display_name(id)
            .tag(tag("Slot.Weapon"))
            .scene_node(SceneComponent::new(format!("{id}_mesh")))
            .build()
    }

    #[test]
    fn test_validity() {
        let fixture = Fixture::new();
        assert!(fixture.slot("MainHand").is_slot_valid());
        assert!(!fixture.slot("Untagged").is_slot_valid());
        assert!(!fixture.slot("Untagged").can_attach());
    }

    #[test]
    fn test_attach_detach_cycle() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        let sword = item("sword");

        assert!(slot.is_empty() && !slot.is_occupied());
        assert!(slot.attach(sword.clone()));
        assert!(slot.is_occupied() && !slot.is_empty());
        assert!(sword.is_attached());
        assert!(!slot.attach(item("axe")));

        assert!(slot.detach());
        assert!(slot.is_empty());
        assert!(!slot.detach());
        assert!(slot.occupant().is_none());
        assert!(slot.last_occupant().is_some());
        assert!(!sword.is_attached());
    }

    #[test]
    fn test_missing_socket_degrades_to_origin() {
        let fixture = Fixture::new();
        let slot = fixture.slot("Hip");
        let dagger = item("dagger");

        assert!(slot.attach(dagger.clone()));
        let node = dagger.scene_component().unwrap();
        assert_eq!(node.attach_parent().map(|p| p.name().clone()), Some(Name::new("Mesh")));
        assert!(node.attach_socket().is_none());
    }

    #[test]
    fn test_target_override() {
        let fixture = Fixture::new();
        let slot = fixture.slot("Head");
        let announced = Arc::new(parking_lot::Mutex::new(None));
        let captured = announced.clone();
        slot.on_begin_play
            .subscribe(move |e: &SlotBeginPlay| *captured.lock() = e.target_override.clone());

        fixture.rig.begin_play();
        assert_eq!(*announced.lock(), Some(Name::new("Root")));
        assert_eq!(
            slot.attachment_target().map(|t| t.name().clone()),
            Some(Name::new("Root"))
        );
        assert!(slot.available_socket_names().is_empty());
        assert_eq!(
            slot.available_target_names(),
            vec![Name::new("Root"), Name::new("Mesh")]
        );
    }

    #[test]
    fn test_force_attach_bypasses_lock() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        slot.disable();
        assert!(slot.is_locked());

        let sword = item("sword");
        assert!(!slot.attach(sword.clone()));
        assert!(slot.occupant().is_none());

        assert!(slot.force_attach(sword.clone()));
        assert!(slot.is_occupied());
    }

    #[test]
    fn test_force_attach_replaces_occupant() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        let sword = item("sword");
        let axe = item("axe");

        assert!(slot.attach(sword.clone()));
        assert!(slot.force_attach(axe.clone()));
        assert!(!sword.is_attached());
        assert!(sword.scene_component().unwrap().attach_parent().is_none());
        assert!(axe.is_attached());

        // Replaying the same occupant changes nothing
        assert!(slot.force_attach(axe.clone()));
        assert!(axe.is_attached());
    }

    #[test]
    fn test_force_detach_cleans_dangling_attachment() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        let sword = item("sword");
        assert!(slot.attach(sword.clone()));

        // Drop the logical occupant but keep the physical parenting around
        slot.runtime.write().occupant = None;
        slot.runtime.write().state = SlotState::Empty;

        assert!(slot.force_detach());
        assert!(sword.scene_component().unwrap().attach_parent().is_none());
        assert!(!sword.is_attached());
        assert!(slot.force_detach());
    }

    #[test]
    fn test_replicated_lock() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        let sword = item("sword");
        assert!(slot.attach(sword.clone()));

        assert!(slot.apply_replicated_state(SlotState::Locked, None));
        assert!(slot.is_locked());
        assert!(!sword.is_attached());
        assert!(!slot.apply_replicated_state(SlotState::Locked, None));
    }

    #[test]
    fn test_raw_scene_objects_attach_without_consent() {
        let fixture = Fixture::new();
        let lantern = Arc::new(SceneComponent::new("Lantern"));
        let main_hand = fixture.slot("MainHand");

        assert!(main_hand.attach(lantern.clone()));
        assert!(main_hand.is_occupied());
        assert_eq!(
            lantern.attach_parent().map(|p| p.name().clone()),
            Some(Name::new("Mesh"))
        );

        let torch = SceneActor::builder("Torch")
            .component(SceneComponent::new("TorchRoot"))
            .build();
        let hip = fixture.slot("Hip");
        assert!(hip.attach(torch.clone()));
        assert_eq!(hip.occupant().map(|o| o.object_name()), Some(Name::new("Torch")));
        assert!(torch.root_component().unwrap().attach_parent().is_some());

        assert!(hip.detach());
        assert!(torch.root_component().unwrap().attach_parent().is_none());
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let rig = AttachmentContainerComponent::builder("Loose")
            .slot(
                SlotDefinition::new("MainHand")
                    .with_tag(tag("Slot.Weapon"))
                    .with_socket("hand_r"),
            )
            .build()
            .unwrap();
        let slot = rig.get_slot(&Name::new("MainHand")).unwrap();
        let sword = item("sword");

        assert!(slot.is_slot_valid());
        assert_eq!(
            slot.try_attach(sword.clone()),
            Err(AttachError::MissingTarget(Name::new("MainHand")))
        );
        assert!(!slot.attach(sword.clone()));
        assert!(slot.is_empty());
        assert!(!sword.is_attached());
    }

    #[test]
    fn test_scene_cycle_is_rejected() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        let mesh = fixture.owner.component_by_name(&Name::new("Mesh")).unwrap().clone();

        assert_eq!(
            slot.try_attach(mesh.clone()),
            Err(AttachError::PhysicalAttachFailed {
                slot: Name::new("MainHand"),
                candidate: Name::new("Mesh"),
            })
        );
        assert!(slot.is_empty());
        assert!(slot.last_occupant().is_none());
        assert!(mesh.attach_parent().is_none());
    }

    #[test]
    fn test_snapshot() {
        let fixture = Fixture::new();
        let slot = fixture.slot("MainHand");
        assert!(slot.attach(item("sword")));

        let snapshot = slot.snapshot();
        assert_eq!(snapshot.state, SlotState::Occupied);
        assert_eq!(snapshot.occupant, Some(Name::new("sword")));
    }
}
