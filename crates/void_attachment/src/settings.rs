//! Equipment slot configuration
//!
//! Settings are passed explicitly to the containers that use them. Each
//! configured slot carries a stable identifier derived from its tags, so
//! reordering tags never changes the identity of a slot definition.

use crate::error::ConfigError;
use crate::slot::SlotDefinition;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;
use void_core::{Name, TagContainer};

/// Per-slot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotHeader {
    pub display_name: String,
    pub tags: TagContainer,
    pub blocking_tags: TagContainer,
    /// Disabled slots start locked
    pub enabled: bool,
    pub fire_pre_equip_event: bool,
    pub fire_post_equip_event: bool,
    /// Slot an unequipped item falls back to
    pub fallback_slot: Name,
    /// Derived from `tags`, see [`stable_slot_id`]
    pub slot_id: Uuid,
}

impl Default for SlotHeader {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            tags: TagContainer::new(),
            blocking_tags: TagContainer::new(),
            enabled: true,
            fire_pre_equip_event: false,
            fire_post_equip_event: false,
            fallback_slot: Name::none(),
            slot_id: Uuid::nil(),
        }
    }
}

impl SlotHeader {
    /// Recompute `slot_id` from the current tags
    pub fn regenerate_slot_id(&mut self) {
        self.slot_id = stable_slot_id(&self.tags);
    }
}

/// SHA-256 over the tag names in ascending order, each followed by a zero
/// byte; the first 16 digest bytes form the id.
pub fn stable_slot_id(tags: &TagContainer) -> Uuid {
    let mut hasher = Sha256::new();
    for name in tags.sorted_names() {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes)
}

/// Allowed equipment slots keyed by slot name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSettings {
    #[serde(default)]
    pub allowed_slots: BTreeMap<Name, SlotHeader>,
}

impl EquipmentSettings {
    /// Create validated settings
    pub fn new(allowed_slots: BTreeMap<Name, SlotHeader>) -> Self {
        let mut settings = Self { allowed_slots };
        settings.validate();
        settings
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Self = serde_json::from_str(json)?;
        if settings.allowed_slots.keys().any(Name::is_none) {
            return Err(ConfigError::EmptySlotName);
        }
        settings.validate();
        log::info!(
            "Loaded equipment settings with {} slots",
            settings.allowed_slots.len()
        );
        Ok(settings)
    }

    /// Clear fallbacks that point at the slot itself or at an unknown slot,
    /// then regenerate every slot id
    pub fn validate(&mut self) {
        let names: Vec<Name> = self.allowed_slots.keys().cloned().collect();
        for (name, header) in self.allowed_slots.iter_mut() {
            let fallback = &header.fallback_slot;
            let is_self = fallback == name;
            let exists = fallback.is_none() || names.contains(fallback);
            if is_self || !exists {
                log::warn!(
                    "Slot '{}': fallback '{}' is not usable, clearing it",
                    name,
                    fallback
                );
                header.fallback_slot = Name::none();
            }
            header.regenerate_slot_id();
        }
    }

    pub fn header(&self, slot: &Name) -> Option<&SlotHeader> {
        self.allowed_slots.get(slot)
    }

    /// Configured slot names, sorted
    pub fn available_slot_names(&self) -> Vec<Name> {
        self.allowed_slots.keys().cloned().collect()
    }

    /// `None` followed by every configured slot name
    pub fn fallback_slot_options(&self) -> Vec<Name> {
        std::iter::once(Name::none())
            .chain(self.allowed_slots.keys().cloned())
            .collect()
    }

    /// Fill a slot definition from its header. Returns false when the slot
    /// is not configured.
    pub fn populate(&self, definition: &mut SlotDefinition) -> bool {
        let Some(header) = self.header(&definition.name) else {
            return false;
        };
        definition.tags = header.tags.clone();
        definition.blocking_tags = header.blocking_tags.clone();
        if !header.display_name.is_empty() {
            definition.display_name = header.display_name.clone();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"{
        "allowed_slots": {
            "MainHand": {
                "display_name": "Main Hand",
                "tags": ["Slot.Weapon", "Slot.Hand.Right"],
                "fallback_slot": "Back",
                "fire_post_equip_event": true
            },
            "Back": {
                "display_name": "Back",
                "tags": ["Slot.Back"],
                "fallback_slot": "Back"
            },
            "Belt": {
                "tags": ["Slot.Belt"],
                "fallback_slot": "Missing",
                "enabled": false
            }
        }
    }"#;

    #[test]
    fn test_stable_id_ignores_order() {
        let a = TagContainer::from_names(["Slot.Weapon", "Slot.Hand.Right"]).unwrap();
        let b = TagContainer::from_names(["Slot.Hand.Right", "Slot.Weapon"]).unwrap();
        assert_eq!(stable_slot_id(&a), stable_slot_id(&b));

        let c = TagContainer::from_names(["Slot.Weapon"]).unwrap();
        assert_ne!(stable_slot_id(&a), stable_slot_id(&c));
    }

    #[test]
    fn test_stable_id_of_empty_set() {
        let expected = Sha256::digest(b"");
        let id = stable_slot_id(&TagContainer::new());
        assert_eq!(id.as_bytes()[..], expected[..16]);
    }

    #[test]
    fn test_from_json_validates() {
        let settings = EquipmentSettings::from_json(SETTINGS).unwrap();

        let main_hand = settings.header(&Name::new("MainHand")).unwrap();
        assert_eq!(main_hand.fallback_slot, Name::new("Back"));
        assert!(main_hand.enabled);
        assert_eq!(main_hand.slot_id, stable_slot_id(&main_hand.tags));

        let back = settings.header(&Name::new("Back")).unwrap();
        assert!(back.fallback_slot.is_none());

        let belt = settings.header(&Name::new("Belt")).unwrap();
        assert!(belt.fallback_slot.is_none());
        assert!(!belt.enabled);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            EquipmentSettings::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            EquipmentSettings::from_json(r#"{ "allowed_slots": { "": {} } }"#),
            Err(ConfigError::EmptySlotName)
        ));
    }

    #[test]
    fn test_slot_name_options() {
        let settings = EquipmentSettings::from_json(SETTINGS).unwrap();
        assert_eq!(
            settings.available_slot_names(),
            vec![Name::new("Back"), Name::new("Belt"), Name::new("MainHand")]
        );

        let options = settings.fallback_slot_options();
        assert_eq!(options.len(), 4);
        assert!(options[0].is_none());
    }

    #[test]
    fn test_populate() {
        let settings = EquipmentSettings::from_json(SETTINGS).unwrap();

        let mut definition = SlotDefinition::new("MainHand");
        assert!(settings.populate(&mut definition));
        assert_eq!(definition.display_name, "Main Hand");
        assert_eq!(definition.tags.len(), 2);

        let mut unknown = SlotDefinition::new("Head");
        assert!(!settings.populate(&mut unknown));
        assert!(unknown.tags.is_empty());
    }
}
