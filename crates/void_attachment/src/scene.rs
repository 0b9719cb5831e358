//! Minimal scene graph used for physical attachment
//!
//! Only parenting is modeled: which component a node hangs from, on which
//! socket, and with which transform rules. Transforms themselves belong to the
//! renderer.

use crate::types::AttachmentObject;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use void_core::Name;

/// How one transform channel is treated when parenting changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentRule {
    /// Keep the current relative transform
    KeepRelative,
    /// Keep the current world transform
    KeepWorld,
    /// Snap to the parent (socket) transform
    SnapToTarget,
}

/// Per-channel rules applied when attaching or detaching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentRules {
    pub location: AttachmentRule,
    pub rotation: AttachmentRule,
    pub scale: AttachmentRule,
}

impl AttachmentRules {
    /// Snap location, rotation and scale to the target
    pub const SNAP_TO_TARGET_INCLUDING_SCALE: Self = Self::uniform(AttachmentRule::SnapToTarget);
    /// Keep world transform on every channel
    pub const KEEP_WORLD: Self = Self::uniform(AttachmentRule::KeepWorld);
    /// Keep relative transform on every channel
    pub const KEEP_RELATIVE: Self = Self::uniform(AttachmentRule::KeepRelative);

    /// Same rule on every channel
    pub const fn uniform(rule: AttachmentRule) -> Self {
        Self {
            location: rule,
            rotation: rule,
            scale: rule,
        }
    }
}

/// Current parent of a scene component
#[derive(Debug, Clone)]
pub struct SceneParent {
    pub component: Weak<SceneComponent>,
    pub socket: Option<Name>,
    pub rules: AttachmentRules,
}

/// A named node in the scene graph, optionally exposing sockets
#[derive(Debug)]
pub struct SceneComponent {
    name: Name,
    sockets: Vec<Name>,
    parent: RwLock<Option<SceneParent>>,
}

impl SceneComponent {
    /// Create a component with no sockets
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            sockets: Vec::new(),
            parent: RwLock::new(None),
        }
    }

    /// Add a socket
    pub fn with_socket(mut self, socket: impl Into<Name>) -> Self {
        let socket = socket.into();
        if !socket.is_none() && !self.sockets.contains(&socket) {
            self.sockets.push(socket);
        }
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Check if a socket exists on this component
    pub fn has_socket(&self, socket: &Name) -> bool {
        self.sockets.contains(socket)
    }

    /// All socket names, in declaration order
    pub fn socket_names(&self) -> &[Name] {
        &self.sockets
    }

    /// Parent this component to `target`.
    ///
    /// Returns false when the attachment would parent the component to itself
    /// or to one of its descendants.
    pub fn attach_to(
        &self,
        target: &Arc<SceneComponent>,
        socket: Option<&Name>,
        rules: AttachmentRules,
    ) -> bool {
        if self.is_ancestor_of(target) {
            log::warn!(
                "Refusing to attach '{}' to '{}': would create a cycle",
                self.name,
                target.name
            );
            return false;
        }

        *self.parent.write() = Some(SceneParent {
            component: Arc::downgrade(target),
            socket: socket.filter(|s| !s.is_none()).cloned(),
            rules,
        });
        log::debug!("Attached '{}' to '{}' ({:?})", self.name, target.name, socket);
        true
    }

    /// Remove parenting, returning the previous parent link
    pub fn detach_from_parent(&self, rules: AttachmentRules) -> Option<SceneParent> {
        let previous = self.parent.write().take();
        if let Some(previous) = &previous {
            log::debug!(
                "Detached '{}' from {:?} ({:?})",
                self.name,
                previous.component.upgrade().map(|c| c.name.clone()),
                rules
            );
        }
        previous
    }

    /// Component this node is attached to, if it is still alive
    pub fn attach_parent(&self) -> Option<Arc<SceneComponent>> {
        self.parent
            .read()
            .as_ref()
            .and_then(|p| p.component.upgrade())
    }

    /// Socket this node is attached to
    pub fn attach_socket(&self) -> Option<Name> {
        self.parent.read().as_ref().and_then(|p| p.socket.clone())
    }

    /// Rules used by the current attachment
    pub fn attach_rules(&self) -> Option<AttachmentRules> {
        self.parent.read().as_ref().map(|p| p.rules)
    }

    /// True if the direct parent is `target`
    pub fn is_attached_to(&self, target: &SceneComponent) -> bool {
        self.attach_parent()
            .is_some_and(|parent| std::ptr::eq(Arc::as_ptr(&parent), target))
    }

    fn is_ancestor_of(&self, node: &Arc<SceneComponent>) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if std::ptr::eq(Arc::as_ptr(&candidate), self) {
                return true;
            }
            current = candidate.attach_parent();
        }
        false
    }
}

impl AttachmentObject for SceneComponent {
    fn object_name(&self) -> Name {
        self.name.clone()
    }

    fn scene_node(&self) -> Option<&SceneComponent> {
        Some(self)
    }
}

/// An actor: a named, ordered set of scene components. The first component
/// is the root.
#[derive(Debug)]
pub struct SceneActor {
    name: Name,
    components: Vec<Arc<SceneComponent>>,
}

impl SceneActor {
    /// Start building an actor
    pub fn builder(name: impl Into<Name>) -> SceneActorBuilder {
        SceneActorBuilder {
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// All components, root first
    pub fn components(&self) -> &[Arc<SceneComponent>] {
        &self.components
    }

    /// Root component
    pub fn root_component(&self) -> Option<&Arc<SceneComponent>> {
        self.components.first()
    }

    /// First component with the given name
    pub fn component_by_name(&self, name: &Name) -> Option<&Arc<SceneComponent>> {
        self.components.iter().find(|c| c.name() == name)
    }
}

impl AttachmentObject for SceneActor {
    fn object_name(&self) -> Name {
        self.name.clone()
    }

    fn scene_node(&self) -> Option<&SceneComponent> {
        self.root_component().map(|c| c.as_ref())
    }
}

/// Builder for [`SceneActor`]
pub struct SceneActorBuilder {
    name: Name,
    components: Vec<Arc<SceneComponent>>,
}

impl SceneActorBuilder {
    /// Add a component; the first one added becomes the root
    pub fn component(mut self, component: SceneComponent) -> Self {
        self.components.push(Arc::new(component));
        self
    }

    pub fn build(self) -> Arc<SceneActor> {
        Arc::new(SceneActor {
            name: self.name,
            components: self.components,
        })
    }
}
