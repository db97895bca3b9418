//! Content registration helpers: namespaced ids, display names and
//! block/item/tab registries.
#![forbid(unsafe_code)]

pub mod config;
pub mod id;
pub mod names;
pub mod registry;

pub use id::{IdError, ModContext, ResourceId};
pub use names::{display_name, display_name_with};
pub use registry::{ContentRegistry, Registry, RegistryError};
