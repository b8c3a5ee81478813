//! Entities returned by resolution and child enumeration.
//!
//! An [`Entity`] is a path plus an [`Origin`]: either data supplied by a
//! provider (`Concrete`) or a placeholder fabricated because something is
//! mounted below an otherwise absent path (`Synthetic`).
//!
//! # Examples
//!
//! ```
//! use nsroute_core::{Entity, NsPath, Payload};
//!
//! let concrete = Entity::concrete(NsPath::new("/apps/a.js")?, Payload::new(42_u32));
//! assert!(concrete.is_concrete());
//! assert_eq!(concrete.payload().and_then(|p| p.downcast_ref::<u32>()), Some(&42));
//!
//! let synthetic = Entity::synthetic(NsPath::new("/apps")?);
//! assert!(synthetic.is_synthetic());
//! assert!(synthetic.payload().is_none());
//! # Ok::<(), nsroute_core::Error>(())
//! ```

use crate::path::NsPath;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque provider-owned data attached to a concrete entity.
///
/// The tree never looks inside a payload. Callers that know which provider
/// produced an entity recover the data with [`Payload::downcast_ref`].
/// Cloning is cheap (reference counted).
#[derive(Clone)]
pub struct Payload(Arc<dyn Any + Send + Sync>);

impl Payload {
    /// Wraps provider data.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the payload as `T` if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` if the payload holds a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

/// Where an entity came from.
#[derive(Debug, Clone)]
pub enum Origin {
    /// Backed by a real provider answer.
    Concrete(Payload),
    /// Placeholder signalling that children exist below an absent path.
    Synthetic,
}

/// The unit returned by resolution and child enumeration.
///
/// Entities are immutable value objects created per call.
#[derive(Debug, Clone)]
pub struct Entity {
    path: NsPath,
    origin: Origin,
}

impl Entity {
    /// Creates a concrete entity carrying provider data.
    #[must_use]
    pub const fn concrete(path: NsPath, payload: Payload) -> Self {
        Self {
            path,
            origin: Origin::Concrete(payload),
        }
    }

    /// Creates a synthetic placeholder entity.
    #[must_use]
    pub const fn synthetic(path: NsPath) -> Self {
        Self {
            path,
            origin: Origin::Synthetic,
        }
    }

    /// Absolute path of this entity.
    #[must_use]
    pub const fn path(&self) -> &NsPath {
        &self.path
    }

    /// Origin tag of this entity.
    #[must_use]
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns `true` for provider-backed entities.
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        matches!(self.origin, Origin::Concrete(_))
    }

    /// Returns `true` for placeholder entities.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.origin, Origin::Synthetic)
    }

    /// Provider data, if this entity is concrete.
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        match &self.origin {
            Origin::Concrete(payload) => Some(payload),
            Origin::Synthetic => None,
        }
    }
}
