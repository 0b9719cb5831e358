//! Attachable capability and its default component

use crate::container::{ContainerRef, WeakContainerRef};
use crate::scene::SceneComponent;
use crate::types::{AttachmentObject, AttachmentRef, AttachmentState};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use void_core::{Name, Tag, TagContainer};
use void_event::Delegate;

/// Raised when an attachable lands in a slot
#[derive(Clone)]
pub struct AttachableAttached {
    pub container: Option<ContainerRef>,
    pub slot: Name,
}

/// Raised when an attachable leaves its container
#[derive(Clone)]
pub struct AttachableDetached {
    /// The container that was just left
    pub container: Option<ContainerRef>,
}

/// Attachable notification hooks
#[derive(Default)]
pub struct AttachableEvents {
    pub attached: Delegate<AttachableAttached>,
    pub detached: Delegate<AttachableDetached>,
}

/// Capability of anything that can be bound to a slot.
///
/// Setters are change-only: assigning the current value does nothing.
pub trait Attachable: Send + Sync {
    fn id(&self) -> Name;
    fn set_id(&self, id: Name);
    fn display_name(&self) -> String;
    fn set_display_name(&self, display_name: String);
    fn tags(&self) -> TagContainer;
    fn set_tags(&self, tags: TagContainer);
    fn state(&self) -> AttachmentState;
    fn set_state(&self, state: AttachmentState);

    /// Container currently holding this attachable
    fn attached_to(&self) -> Option<ContainerRef>;

    /// Ask `container` to attach this attachable to `slot`
    fn attach_to_slot(&self, container: &ContainerRef, slot: &Name) -> bool;

    /// Leave the current container
    fn detach(&self) -> bool;

    /// Called by a slot after it recorded this attachable as occupant
    fn on_slot_attached(&self, container: &WeakContainerRef, slot: &Name);

    /// Called by a slot after it released this attachable
    fn on_slot_detached(&self);

    fn events(&self) -> &AttachableEvents;

    fn is_valid_attachable(&self) -> bool {
        !self.display_name().is_empty() && !self.id().is_none()
    }

    fn can_attach(&self) -> bool {
        self.is_valid_attachable() && self.state() != AttachmentState::Attached
    }

    /// Attach to the first free slot of `container` matching all own tags
    fn attach_to_container(&self, container: &ContainerRef) -> bool {
        if !self.can_attach() {
            return false;
        }
        match container.find_first_free_slot_with_tags(&self.tags()) {
            Some(slot) => self.attach_to_slot(container, &slot),
            None => {
                log::debug!(
                    "'{}': no free slot in '{}' matches {:?}",
                    self.id(),
                    container.name(),
                    self.tags()
                );
                false
            }
        }
    }

    fn has_tag(&self, tag: &Tag) -> bool {
        self.tags().has_tag(tag)
    }

    fn matches_tags(&self, tags: &TagContainer, require_all: bool) -> bool {
        self.tags().matches(tags, require_all)
    }
}

struct AttachableData {
    id: Name,
    display_name: String,
    tags: TagContainer,
    state: AttachmentState,
    attached_to: Option<WeakContainerRef>,
    slot: Name,
}

/// Default attachable, optionally carrying the scene node that gets parented.
///
/// The component may be embedded in a larger attachment object; `this` then
/// points at the embedding object so slots hold the outer handle.
pub struct AttachableComponent {
    this: Weak<dyn AttachmentObject>,
    node: Option<Arc<SceneComponent>>,
    data: RwLock<AttachableData>,
    events: AttachableEvents,
}

impl AttachableComponent {
    pub fn builder(id: impl Into<Name>) -> AttachableBuilder {
        AttachableBuilder {
            id: id.into(),
            display_name: String::new(),
            tags: TagContainer::new(),
            node: None,
        }
    }

    /// Scene node moved by physical attachment
    pub fn scene_component(&self) -> Option<&Arc<SceneComponent>> {
        self.node.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.data.read().state == AttachmentState::Attached
    }

    /// Slot this attachable was last attached to
    pub fn attached_slot(&self) -> Option<Name> {
        self.data.read().slot.clone().into_option()
    }

    /// Owning handle to the attachment object this component belongs to
    pub fn as_attachment(&self) -> Option<AttachmentRef> {
        self.this.upgrade()
    }

    fn mark_attached(&self, container: &WeakContainerRef, slot: &Name) {
        let changed = {
            let mut data = self.data.write();
            let unchanged = data.state == AttachmentState::Attached
                && data.slot == *slot
                && data
                    .attached_to
                    .as_ref()
                    .is_some_and(|current| Weak::ptr_eq(current, container));
            if !unchanged {
                data.attached_to = Some(container.clone());
                data.slot = slot.clone();
                data.state = AttachmentState::Attached;
            }
            !unchanged
        };

        if changed {
            log::debug!("'{}' attached to slot '{}'", self.id(), slot);
            self.events.attached.broadcast(&AttachableAttached {
                container: container.upgrade(),
                slot: slot.clone(),
            });
        }
    }

    fn mark_detached(&self) {
        let previous = {
            let mut data = self.data.write();
            if data.state != AttachmentState::Attached && data.attached_to.is_none() {
                return;
            }
            data.state = AttachmentState::Detached;
            data.slot = Name::none();
            data.attached_to.take()
        };

        log::debug!("'{}' detached", self.id());
        self.events.detached.broadcast(&AttachableDetached {
            container: previous.and_then(|weak| weak.upgrade()),
        });
    }
}

impl Attachable for AttachableComponent {
    fn id(&self) -> Name {
        self.data.read().id.clone()
    }

    fn set_id(&self, id: Name) {
        let mut data = self.data.write();
        if data.id != id {
            data.id = id;
        }
    }

    fn display_name(&self) -> String {
        self.data.read().display_name.clone()
    }

    fn set_display_name(&self, display_name: String) {
        let mut data = self.data.write();
        if data.display_name != display_name {
            data.display_name = display_name;
        }
    }

    fn tags(&self) -> TagContainer {
        self.data.read().tags.clone()
    }

    fn set_tags(&self, tags: TagContainer) {
        let mut data = self.data.write();
        if data.tags != tags {
            data.tags = tags;
        }
    }

    fn state(&self) -> AttachmentState {
        self.data.read().state
    }

    fn set_state(&self, state: AttachmentState) {
        let mut data = self.data.write();
        if data.state != state {
            data.state = state;
        }
    }

    fn attached_to(&self) -> Option<ContainerRef> {
        self.data.read().attached_to.as_ref()?.upgrade()
    }

    fn attach_to_slot(&self, container: &ContainerRef, slot: &Name) -> bool {
        if !self.can_attach() {
            log::debug!("'{}' cannot attach right now", self.id());
            return false;
        }
        let Some(attachment) = self.as_attachment() else {
            return false;
        };
        // The slot commits the binding through `on_slot_attached`. A remote
        // container only forwards the request, so nothing is bound yet.
        container.try_attach(slot, attachment)
    }

    fn detach(&self) -> bool {
        let attached_to = {
            let data = self.data.read();
            if data.state != AttachmentState::Attached {
                return false;
            }
            data.attached_to.clone()
        };

        let Some(container) = attached_to.and_then(|weak| weak.upgrade()) else {
            log::debug!("'{}': container is gone, clearing local state", self.id());
            self.mark_detached();
            return false;
        };

        if let Some(slot) = container.get_slot_id_for_attachable(self) {
            if !container.try_detach(&slot) {
                return false;
            }
        }
        // Still held after a forwarded request: wait for the authority
        if container.get_slot_id_for_attachable(self).is_none() {
            self.mark_detached();
        }
        true
    }

    fn on_slot_attached(&self, container: &WeakContainerRef, slot: &Name) {
        self.mark_attached(container, slot);
    }

    fn on_slot_detached(&self) {
        self.mark_detached();
    }

    fn events(&self) -> &AttachableEvents {
        &self.events
    }
}

impl AttachmentObject for AttachableComponent {
    fn object_name(&self) -> Name {
        self.id()
    }

    fn as_attachable(&self) -> Option<&dyn Attachable> {
        Some(self)
    }

    fn scene_node(&self) -> Option<&SceneComponent> {
        self.node.as_deref()
    }
}

impl std::fmt::Debug for AttachableComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.read();
        f.debug_struct("AttachableComponent")
            .field("id", &data.id)
            .field("display_name", &data.display_name)
            .field("tags", &data.tags)
            .field("state", &data.state)
            .field("slot", &data.slot)
            .finish()
    }
}

/// Builder for [`AttachableComponent`]
pub struct AttachableBuilder {
    id: Name,
    display_name: String,
    tags: TagContainer,
    node: Option<SceneComponent>,
}

impl AttachableBuilder {
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn tags(mut self, tags: TagContainer) -> Self {
        self.tags.append(&tags);
        self
    }

    /// Scene node parented on attach
    pub fn scene_node(mut self, node: SceneComponent) -> Self {
        self.node = Some(node);
        self
    }

    pub fn build(self) -> Arc<AttachableComponent> {
        Arc::new_cyclic(|this: &Weak<AttachableComponent>| {
            let owner: Weak<dyn AttachmentObject> = this.clone();
            self.build_for(owner)
        })
    }

    /// Build a component embedded in `owner`
    pub(crate) fn build_for(self, owner: Weak<dyn AttachmentObject>) -> AttachableComponent {
        AttachableComponent {
            this: owner,
            node: self.node.map(Arc::new),
            data: RwLock::new(AttachableData {
                id: self.id,
                display_name: self.display_name,
                tags: self.tags,
                state: AttachmentState::Detached,
                attached_to: None,
                slot: Name::none(),
            }),
            events: AttachableEvents::default(),
        }
    }
}
