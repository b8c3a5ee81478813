//! The capability exposed by backing data stores.
//!
//! A [`Provider`] answers point lookups and child enumeration for paths at
//! and below the roots it is mounted at. The namespace tree never inspects
//! provider data and never retries or translates provider failures.
//!
//! # Examples
//!
//! ```
//! use nsroute_core::{Entity, EntityIter, NsPath, Payload, Provider, ProviderResult};
//!
//! #[derive(Debug)]
//! struct Constant;
//!
//! impl Provider for Constant {
//!     fn root_paths(&self) -> Vec<NsPath> {
//!         vec![NsPath::root()]
//!     }
//!
//!     fn lookup(&self, path: &NsPath) -> ProviderResult<Option<Entity>> {
//!         Ok(Some(Entity::concrete(path.clone(), Payload::new("constant"))))
//!     }
//!
//!     fn list_children(&self, _parent: &Entity) -> ProviderResult<EntityIter> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//! }
//!
//! let entity = Constant.lookup(&NsPath::new("/anything")?).unwrap().unwrap();
//! assert!(entity.is_concrete());
//! # Ok::<(), nsroute_core::Error>(())
//! ```

use crate::entity::Entity;
use crate::error::ProviderError;
use crate::path::NsPath;

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Owning iterator of child entities produced by a provider.
///
/// The iterator must not borrow from the provider: the tree keeps it alive
/// independently while callers pull from a merged child sequence.
pub type EntityIter = Box<dyn Iterator<Item = ProviderResult<Entity>> + Send>;

/// Backing data source mounted into the namespace.
///
/// Implementations must be thread-safe: lookups and enumerations may run
/// concurrently from many threads.
pub trait Provider: Send + Sync {
    /// Paths this provider serves. Used by multi-root registration.
    fn root_paths(&self) -> Vec<NsPath>;

    /// Looks up the entity at an absolute path.
    ///
    /// Returns `Ok(None)` when the provider has nothing at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` if the backing store fails.
    fn lookup(&self, path: &NsPath) -> ProviderResult<Option<Entity>>;

    /// Enumerates the direct children of `parent`.
    ///
    /// Providers may yield `Synthetic` entities for intermediate paths they
    /// know have descendants; concrete entities at the same path take
    /// precedence when children are merged.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` if enumeration cannot start. Failures for
    /// individual children are yielded as `Err` items.
    fn list_children(&self, parent: &Entity) -> ProviderResult<EntityIter>;

    /// Label used in logs and mount listings.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
