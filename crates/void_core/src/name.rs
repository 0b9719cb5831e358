//! Engine names
//!
//! A [`Name`] identifies slots, components, sockets and attachables. The empty
//! name is the "none" value, so lookups can return a neutral name instead of
//! failing.

use core::borrow::Borrow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A string identifier with a distinguished "none" value
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(Box<str>);

impl Name {
    /// Create a new name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().into())
    }

    /// The "none" name
    #[inline]
    pub fn none() -> Self {
        Self(Box::from(""))
    }

    /// Check if this is the "none" name
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `None` for the "none" name
    pub fn into_option(self) -> Option<Self> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Name(None)")
        } else {
            write!(f, "Name({:?})", self.0)
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "None")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Name> for Name {
    fn from(n: &Name) -> Self {
        n.clone()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_name() {
        assert!(Name::none().is_none());
        assert!(Name::default().is_none());
        assert!(Name::new("   ").is_none());
        assert!(!Name::new("MainHand").is_none());
        assert_eq!(Name::none().into_option(), None);
    }

    #[test]
    fn test_name_compare() {
        let name = Name::from("MainHand");
        assert_eq!(name, "MainHand");
        assert_eq!(name.to_string(), "MainHand");
        assert_eq!(Name::none().to_string(), "None");
    }
}
