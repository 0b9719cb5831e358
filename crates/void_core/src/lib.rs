//! # void_core - Void Engine Core
//!
//! Core primitives shared by the gameplay crates:
//! - **Names**: engine-style identifiers with a "none" value
//! - **Tags**: hierarchical gameplay tags and tag containers
//! - **Errors**: the common error type

pub mod error;
pub mod name;
pub mod tag;

pub use error::*;
pub use name::*;
pub use tag::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::name::Name;
    pub use crate::tag::{Tag, TagContainer};
}
