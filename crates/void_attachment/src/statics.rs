//! Static helpers: component and socket discovery on actors, plus null-safe
//! wrappers over an optional container handle.
//!
//! Every wrapper returns the neutral failure value (`false`, `None`, empty)
//! when the handle is missing.

use crate::attachable::Attachable;
use crate::container::ContainerRef;
use crate::scene::{SceneActor, SceneComponent};
use crate::slot::AttachmentSlot;
use crate::types::AttachmentRef;
use std::sync::Arc;
use void_core::{Name, TagContainer};

/// All scene components of an actor, root first
pub fn available_components(target: Option<&SceneActor>) -> Vec<Arc<SceneComponent>> {
    target.map(|actor| actor.components().to_vec()).unwrap_or_default()
}

/// Names of all scene components of an actor
pub fn available_component_names(target: Option<&SceneActor>) -> Vec<Name> {
    available_components(target)
        .iter()
        .map(|c| c.name().clone())
        .collect()
}

/// Find a component by name
pub fn available_component_by_name(
    target: Option<&SceneActor>,
    component: &Name,
) -> Option<Arc<SceneComponent>> {
    if component.is_none() {
        return None;
    }
    target?.component_by_name(component).cloned()
}

/// Socket names exposed by the named component
pub fn available_socket_names(target: Option<&SceneActor>, component: &Name) -> Vec<Name> {
    available_component_by_name(target, component)
        .map(|c| c.socket_names().to_vec())
        .unwrap_or_default()
}

pub fn owning_actor(target: Option<&ContainerRef>) -> Option<Arc<SceneActor>> {
    target?.owning_actor()
}

pub fn default_attachment_target(target: Option<&ContainerRef>) -> Name {
    target
        .map(|c| c.default_attachment_target())
        .unwrap_or_default()
}

pub fn is_valid_slot(target: Option<&ContainerRef>, slot: &Name) -> bool {
    target.is_some_and(|c| c.is_valid_slot(slot))
}

pub fn get_slot(target: Option<&ContainerRef>, slot: &Name) -> Option<Arc<AttachmentSlot>> {
    target?.get_slot(slot)
}

pub fn is_slot_occupied(target: Option<&ContainerRef>, slot: &Name) -> bool {
    target.is_some_and(|c| c.is_slot_occupied(slot))
}

pub fn disable_slot(target: Option<&ContainerRef>, slot: &Name) -> bool {
    target.is_some_and(|c| c.disable_slot(slot))
}

pub fn try_attach(target: Option<&ContainerRef>, slot: &Name, attachment: AttachmentRef) -> bool {
    target.is_some_and(|c| c.try_attach(slot, attachment))
}

pub fn try_detach(target: Option<&ContainerRef>, slot: &Name) -> bool {
    target.is_some_and(|c| c.try_detach(slot))
}

pub fn force_attach(target: Option<&ContainerRef>, slot: &Name, attachment: AttachmentRef) -> bool {
    target.is_some_and(|c| c.force_attach(slot, attachment))
}

pub fn force_detach(target: Option<&ContainerRef>, slot: &Name) -> bool {
    target.is_some_and(|c| c.force_detach(slot))
}

pub fn find_first_free_slot_with_tags(
    target: Option<&ContainerRef>,
    required: &TagContainer,
) -> Option<Name> {
    target?.find_first_free_slot_with_tags(required)
}

pub fn get_slot_id_for_attachable(
    target: Option<&ContainerRef>,
    attachable: &dyn Attachable,
) -> Option<Name> {
    target?.get_slot_id_for_attachable(attachable)
}

pub fn clear_all(target: Option<&ContainerRef>) {
    if let Some(container) = target {
        container.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Arc<SceneActor> {
        SceneActor::builder("Hero")
            .component(SceneComponent::new("Root"))
            .component(
                SceneComponent::new("Mesh")
                    .with_socket("hand_r")
                    .with_socket("hand_l"),
            )
            .build()
    }

    #[test]
    fn test_component_discovery() {
        let actor = actor();
        assert_eq!(
            available_component_names(Some(&*actor)),
            vec![Name::new("Root"), Name::new("Mesh")]
        );
        assert!(available_component_by_name(Some(&*actor), &Name::new("Mesh")).is_some());
        assert!(available_component_by_name(Some(&*actor), &Name::none()).is_none());
        assert!(available_components(None).is_empty());
    }

    #[test]
    fn test_socket_discovery() {
        let actor = actor();
        assert_eq!(
            available_socket_names(Some(&*actor), &Name::new("Mesh")),
            vec![Name::new("hand_r"), Name::new("hand_l")]
        );
        assert!(available_socket_names(Some(&*actor), &Name::new("Missing")).is_empty());
    }

    #[test]
    fn test_missing_container_is_neutral() {
        let slot = Name::new("MainHand");
        assert!(!is_valid_slot(None, &slot));
        assert!(!is_slot_occupied(None, &slot));
        assert!(!try_detach(None, &slot));
        assert!(get_slot(None, &slot).is_none());
        assert!(default_attachment_target(None).is_none());
        assert!(find_first_free_slot_with_tags(None, &TagContainer::new()).is_none());
        clear_all(None);
    }
}
