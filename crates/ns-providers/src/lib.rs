//! Bundled providers for the nsroute namespace router.
//!
//! - [`MemoryProvider`]: fixed in-memory entries, built with
//!   [`MemoryProviderBuilder`]
//! - [`DirectoryProvider`]: read-only view of a local directory
//!
//! [`build_tree`] assembles a [`NamespaceTree`] from a [`MountTable`].
//!
//! # Examples
//!
//! ```
//! use nsroute_core::MountTable;
//! use nsroute_providers::build_tree;
//!
//! let table = MountTable::from_toml_str(r#"
//!     [[mount]]
//!     path = "/apps"
//!     provider = { kind = "memory", entries = { "/apps/html.js" = "render()" } }
//! "#)?;
//!
//! let tree = build_tree(&table)?;
//! assert!(tree.resolve_str("/apps/html.js")?.unwrap().is_concrete());
//! assert!(tree.resolve_str("/")?.unwrap().is_synthetic());
//! # Ok::<(), nsroute_core::Error>(())
//! ```
//!
//! [`NamespaceTree`]: nsroute_tree::NamespaceTree
//! [`MountTable`]: nsroute_core::MountTable

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod builder;
mod directory;
mod factory;
mod memory;

pub use builder::MemoryProviderBuilder;
pub use directory::{DirectoryProvider, FsResource, ResourceKind};
pub use factory::{build_provider, build_tree};
pub use memory::{MemoryEntry, MemoryProvider};
