//! Hierarchical gameplay tags
//!
//! Tags are dot-separated labels such as `Equipment.Weapon.Sword`. A tag
//! matches itself and every ancestor, so a container holding
//! `Equipment.Weapon.Sword` answers `true` to `has_tag(Equipment.Weapon)`.

use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator between tag segments
pub const TAG_SEPARATOR: char = '.';

/// A single hierarchical tag
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(Box<str>);

impl Tag {
    /// Parse and validate a tag
    pub fn new(tag: impl AsRef<str>) -> Result<Self> {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            return Err(Error::InvalidTag {
                tag: tag.into(),
                reason: "tag is empty",
            });
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(Error::InvalidTag {
                tag: tag.into(),
                reason: "tag contains whitespace",
            });
        }
        if tag.split(TAG_SEPARATOR).any(str::is_empty) {
            return Err(Error::InvalidTag {
                tag: tag.into(),
                reason: "tag has an empty segment",
            });
        }
        Ok(Self(tag.into()))
    }

    /// Get the full tag string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `self` equals `other` or is a descendant of it
    pub fn matches(&self, other: &Tag) -> bool {
        if self.0.len() == other.0.len() {
            return self.0 == other.0;
        }
        self.0.len() > other.0.len()
            && self.0.starts_with(&*other.0)
            && self.0[other.0.len()..].starts_with(TAG_SEPARATOR)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tag::new(s)
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Tag::new(s)
    }
}

impl TryFrom<&str> for Tag {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Tag::new(s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0.into()
    }
}

/// An ordered set of tags
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagContainer {
    tags: BTreeSet<Tag>,
}

impl TagContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container from tag strings
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(Tag::new).collect()
    }

    /// Add a tag, returns false if it was already present
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    /// Add every tag of another container
    pub fn append(&mut self, other: &TagContainer) {
        self.tags.extend(other.tags.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Tag names in ascending order
    pub fn sorted_names(&self) -> Vec<&str> {
        self.tags.iter().map(Tag::as_str).collect()
    }

    /// True if any owned tag matches `tag` (exact or descendant)
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|owned| owned.matches(tag))
    }

    /// AND semantics. An empty query is satisfied.
    pub fn has_all(&self, other: &TagContainer) -> bool {
        other.tags.iter().all(|tag| self.has_tag(tag))
    }

    /// OR semantics. An empty query never matches.
    pub fn has_any(&self, other: &TagContainer) -> bool {
        other.tags.iter().any(|tag| self.has_tag(tag))
    }

    /// `has_all` when `require_all`, otherwise `has_any`
    pub fn matches(&self, other: &TagContainer, require_all: bool) -> bool {
        if require_all {
            self.has_all(other)
        } else {
            self.has_any(other)
        }
    }
}

impl fmt::Debug for TagContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags.iter().map(Tag::as_str)).finish()
    }
}

impl FromIterator<Tag> for TagContainer {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl Extend<Tag> for TagContainer {
    fn extend<T: IntoIterator<Item = Tag>>(&mut self, iter: T) {
        self.tags.extend(iter);
    }
}

impl From<Tag> for TagContainer {
    fn from(tag: Tag) -> Self {
        core::iter::once(tag).collect()
    }
}

impl<'a> IntoIterator for &'a TagContainer {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> TagContainer {
        TagContainer::from_names(names).unwrap()
    }

    #[test]
    fn test_tag_validation() {
        assert!(Tag::new("Equipment.Weapon").is_ok());
        assert!(Tag::new("").is_err());
        assert!(Tag::new("Equipment..Weapon").is_err());
        assert!(Tag::new(".Weapon").is_err());
        assert!(Tag::new("Equip ment").is_err());
    }

    #[test]
    fn test_hierarchy() {
        let sword = Tag::new("Weapon.Sword").unwrap();
        let weapon = Tag::new("Weapon").unwrap();
        let weapons = Tag::new("Weapons").unwrap();

        assert!(sword.matches(&weapon));
        assert!(!weapon.matches(&sword));
        assert!(!weapons.matches(&weapon));
        assert!(sword.matches(&sword));
    }

    #[test]
    fn test_require_all_and_any() {
        let slot = tags(&["A", "B"]);

        assert!(slot.matches(&tags(&["A"]), false));
        assert!(!slot.matches(&tags(&["A", "C"]), true));
        assert!(slot.matches(&tags(&["A", "B"]), true));
        assert!(slot.matches(&tags(&["A", "C"]), false));
        assert!(!slot.matches(&tags(&["C"]), false));
    }

    #[test]
    fn test_empty_queries() {
        let slot = tags(&["A"]);
        assert!(slot.has_all(&TagContainer::new()));
        assert!(!slot.has_any(&TagContainer::new()));
    }

    #[test]
    fn test_parent_query_matches_child_tag() {
        let owned = tags(&["Weapon.Sword"]);
        assert!(owned.has_tag(&Tag::new("Weapon").unwrap()));
        assert!(!tags(&["Weapon"]).has_tag(&Tag::new("Weapon.Sword").unwrap()));
    }

    #[test]
    fn test_serde_round_trip() {
        let owned = tags(&["B", "A"]);
        let json = serde_json::to_string(&owned).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
        assert!(serde_json::from_str::<TagContainer>(r#"["A..B"]"#).is_err());
    }
}
