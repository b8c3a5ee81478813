//! Mount-point tree for the nsroute namespace router.
//!
//! Assembles one virtual namespace from many [`Provider`]s, each mounted at
//! a path prefix, and resolves paths by longest-prefix match.
//!
//! # Design
//!
//! ```text
//! /                      # root provider (always present)
//! ├── /apps/sling/sample # provider C
//! └── /rootel            # provider A
//!     └── child          # provider B, stored relative to /rootel
//! ```
//!
//! The tree is a persistent structure: mutations copy the nodes on the path
//! from the change to the root and publish the new root with one reference
//! swap. Readers work on the snapshot they started with and never wait for
//! a mutation to finish.
//!
//! # Examples
//!
//! ```
//! use nsroute_core::{Entity, EntityIter, NsPath, Payload, Provider, ProviderResult};
//! use nsroute_tree::NamespaceTree;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Label(&'static str);
//!
//! impl Provider for Label {
//!     fn root_paths(&self) -> Vec<NsPath> {
//!         vec![NsPath::root()]
//!     }
//!     fn lookup(&self, path: &NsPath) -> ProviderResult<Option<Entity>> {
//!         Ok(Some(Entity::concrete(path.clone(), Payload::new(self.0))))
//!     }
//!     fn list_children(&self, _parent: &Entity) -> ProviderResult<EntityIter> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//! }
//!
//! let tree = NamespaceTree::new(Arc::new(Label("root")));
//! tree.mount("/rootel", Arc::new(Label("rootel")))?;
//!
//! let entity = tree.resolve_str("/rootel/html.js")?.unwrap();
//! assert_eq!(entity.payload().unwrap().downcast_ref::<&str>(), Some(&"rootel"));
//! # Ok::<(), nsroute_core::Error>(())
//! ```
//!
//! [`Provider`]: nsroute_core::Provider

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod merger;
mod mount_point;
mod tree;

pub use merger::ChildMerger;
pub use mount_point::MountPoint;
pub use tree::{MountInfo, NamespaceTree};
