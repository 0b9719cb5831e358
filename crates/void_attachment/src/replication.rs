//! Authority bridge and replicated container state
//!
//! The authority mutates containers directly. Remote peers forward their
//! requests through a [`ReplicationBridge`] and only change local state by
//! replaying the authority's [`ContainerSnapshot`].

use crate::container::AttachmentContainer;
use crate::error::ReplicationError;
use crate::types::{AttachmentRef, ContainerState, SlotState};
use serde::{Deserialize, Serialize};
use void_core::Name;
use void_event::EventChannel;

/// Network role of a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetRole {
    /// Owns the true state, mutates synchronously
    #[default]
    Authority,
    /// Observer, forwards requests and replays snapshots
    Remote,
}

/// Replicated state of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub slot: Name,
    pub state: SlotState,
    /// Name of the occupant, resolved on the receiving peer
    pub occupant: Option<Name>,
}

/// Replicated state of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub container: Name,
    pub state: ContainerState,
    pub slots: Vec<SlotSnapshot>,
}

impl ContainerSnapshot {
    /// Encode for the wire
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplicationError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from the wire
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplicationError> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn slot(&self, slot: &Name) -> Option<&SlotSnapshot> {
        self.slots.iter().find(|s| &s.slot == slot)
    }
}

/// Carries requests from a remote container to the authority
pub trait ReplicationBridge: Send + Sync {
    fn forward_attach(&self, container: &Name, slot: &Name, attachment: &AttachmentRef);
    fn forward_detach(&self, container: &Name, slot: &Name);
    fn forward_disable(&self, container: &Name, slot: &Name);
    fn forward_clear_all(&self, container: &Name);
}

/// A forwarded gameplay request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentRequest {
    Attach {
        container: Name,
        slot: Name,
        attachment: Name,
    },
    Detach {
        container: Name,
        slot: Name,
    },
    Disable {
        container: Name,
        slot: Name,
    },
    ClearAll {
        container: Name,
    },
}

impl AttachmentRequest {
    /// Container the request targets
    pub fn container(&self) -> &Name {
        match self {
            Self::Attach { container, .. }
            | Self::Detach { container, .. }
            | Self::Disable { container, .. }
            | Self::ClearAll { container } => container,
        }
    }

    /// Run the request against the authority's container.
    ///
    /// `resolver` maps the attachment name to a live attachment. Requests
    /// for another container or with an unknown attachment fail.
    pub fn apply(
        &self,
        target: &dyn AttachmentContainer,
        resolver: &dyn Fn(&Name) -> Option<AttachmentRef>,
    ) -> bool {
        if self.container() != target.name() {
            log::debug!(
                "Request for '{}' ignored by '{}'",
                self.container(),
                target.name()
            );
            return false;
        }

        match self {
            Self::Attach {
                slot, attachment, ..
            } => match resolver(attachment) {
                Some(resolved) => target.try_attach(slot, resolved),
                None => {
                    log::warn!("Attach request names unknown attachment '{}'", attachment);
                    false
                }
            },
            Self::Detach { slot, .. } => target.try_detach(slot),
            Self::Disable { slot, .. } => target.disable_slot(slot),
            Self::ClearAll { .. } => {
                target.clear_all();
                true
            }
        }
    }
}

/// Queue-backed bridge drained by the authority
#[derive(Default)]
pub struct RequestQueue {
    channel: EventChannel<AttachmentRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending request
    pub fn drain(&self) -> Vec<AttachmentRequest> {
        self.channel.drain()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl ReplicationBridge for RequestQueue {
    fn forward_attach(&self, container: &Name, slot: &Name, attachment: &AttachmentRef) {
        self.channel.send(AttachmentRequest::Attach {
            container: container.clone(),
            slot: slot.clone(),
            attachment: attachment.object_name(),
        });
    }

    fn forward_detach(&self, container: &Name, slot: &Name) {
        self.channel.send(AttachmentRequest::Detach {
            container: container.clone(),
            slot: slot.clone(),
        });
    }

    fn forward_disable(&self, container: &Name, slot: &Name) {
        self.channel.send(AttachmentRequest::Disable {
            container: container.clone(),
            slot: slot.clone(),
        });
    }

    fn forward_clear_all(&self, container: &Name) {
        self.channel.send(AttachmentRequest::ClearAll {
            container: container.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = ContainerSnapshot {
            container: Name::new("Rig"),
            state: ContainerState::Occupied,
            slots: vec![
                SlotSnapshot {
                    slot: Name::new("MainHand"),
                    state: SlotState::Occupied,
                    occupant: Some(Name::new("sword")),
                },
                SlotSnapshot {
                    slot: Name::new("Back"),
                    state: SlotState::Locked,
                    occupant: None,
                },
            ],
        };

        let bytes = snapshot.to_bytes().unwrap();
        let decoded = ContainerSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(
            decoded.slot(&Name::new("Back")).map(|s| s.state),
            Some(SlotState::Locked)
        );
    }

    #[test]
    fn test_truncated_snapshot_fails() {
        assert!(matches!(
            ContainerSnapshot::from_bytes(&[1, 2, 3]),
            Err(ReplicationError::Codec(_))
        ));
    }

    #[test]
    fn test_queue_order() {
        let queue = RequestQueue::new();
        queue.forward_detach(&Name::new("Rig"), &Name::new("Back"));
        queue.forward_disable(&Name::new("Rig"), &Name::new("Belt"));
        queue.forward_clear_all(&Name::new("Rig"));
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(
            drained,
            vec![
                AttachmentRequest::Detach {
                    container: Name::new("Rig"),
                    slot: Name::new("Back")
                },
                AttachmentRequest::Disable {
                    container: Name::new("Rig"),
                    slot: Name::new("Belt")
                },
                AttachmentRequest::ClearAll {
                    container: Name::new("Rig")
                },
            ]
        );
    }
}
