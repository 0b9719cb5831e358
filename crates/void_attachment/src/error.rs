//! Attachment, configuration and replication errors

use thiserror::Error;
use void_core::Name;

/// How a failed operation is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Unknown slot, unresolved target and similar bad input
    InvalidInput,
    /// Gameplay rule rejected the operation
    PolicyViolation,
}

/// Reasons an attach or detach can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("Slot '{0}' does not exist")]
    SlotNotFound(Name),
    #[error("Slot '{0}' is invalid: it needs a name, tags and a live container")]
    InvalidSlot(Name),
    #[error("Slot '{0}' is locked")]
    SlotLocked(Name),
    #[error("Slot '{0}' is already occupied")]
    SlotOccupied(Name),
    #[error("Slot '{0}' is blocked by another attachment")]
    SlotBlocked(Name),
    #[error("Slot '{0}' is empty")]
    SlotEmpty(Name),
    #[error("Slot '{0}' has no attachment target component")]
    MissingTarget(Name),
    #[error("'{candidate}' refused to attach to slot '{slot}'")]
    AttachableRejected { slot: Name, candidate: Name },
    #[error("'{candidate}' could not be parented to the target of slot '{slot}'")]
    PhysicalAttachFailed { slot: Name, candidate: Name },
    #[error("Duplicate slot name '{0}'")]
    DuplicateSlot(Name),
}

impl AttachError {
    /// Severity class of this error
    pub fn severity(&self) -> Severity {
        match self {
            Self::SlotNotFound(_)
            | Self::InvalidSlot(_)
            | Self::SlotEmpty(_)
            | Self::MissingTarget(_)
            | Self::PhysicalAttachFailed { .. }
            | Self::DuplicateSlot(_) => Severity::InvalidInput,
            Self::SlotLocked(_)
            | Self::SlotOccupied(_)
            | Self::SlotBlocked(_)
            | Self::AttachableRejected { .. } => Severity::PolicyViolation,
        }
    }

    /// Emit the diagnostic for a swallowed error
    pub(crate) fn report(&self) {
        match self.severity() {
            Severity::InvalidInput => log::debug!("{}", self),
            Severity::PolicyViolation => log::warn!("{}", self),
        }
    }
}

/// Equipment settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse equipment settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Equipment settings contain a slot with an empty name")]
    EmptySlotName,
}

/// Snapshot encoding errors
#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("Failed to encode or decode snapshot: {0}")]
    Codec(#[from] bincode::Error),
}

/// Result alias for attachment operations
pub type AttachResult<T> = Result<T, AttachError>;
