//! In-memory provider with fixed entries.
//!
//! # Examples
//!
//! ```
//! use nsroute_core::{NsPath, Provider};
//! use nsroute_providers::{MemoryEntry, MemoryProvider};
//!
//! let provider = MemoryProvider::builder()
//!     .name("scripts")
//!     .root("/apps")
//!     .entry("/apps/sling/html.js", "render()")
//!     .build()?;
//!
//! let entity = provider.lookup(&NsPath::new("/apps/sling/html.js")?)?.unwrap();
//! let entry = entity.payload().unwrap().downcast_ref::<MemoryEntry>().unwrap();
//! assert_eq!(entry.content(), "render()");
//!
//! // Intermediate directories resolve as synthetic entities.
//! assert!(provider.lookup(&NsPath::new("/apps/sling")?)?.unwrap().is_synthetic());
//! assert!(provider.lookup(&NsPath::new("/apps/other")?)?.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::builder::MemoryProviderBuilder;
use nsroute_core::{Entity, EntityIter, NsPath, Payload, Provider, ProviderResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Data attached to entities served by a [`MemoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    content: Arc<str>,
    source: Arc<str>,
}

impl MemoryEntry {
    pub(crate) fn new(content: &str, source: &str) -> Self {
        Self {
            content: Arc::from(content),
            source: Arc::from(source),
        }
    }

    /// Entry content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Name of the provider holding the entry.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A read-only provider serving a fixed map of entries.
///
/// Explicit entries inside the provider's roots resolve as concrete
/// entities. Paths that merely lead to deeper entries resolve and list as
/// synthetic, so everything the provider lists can be looked up again.
///
/// # Thread Safety
///
/// The entry map is immutable after construction, so lookups need no
/// locking.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    name: String,
    roots: Vec<NsPath>,
    entries: BTreeMap<NsPath, MemoryEntry>,
}

impl MemoryProvider {
    /// Starts building a provider.
    #[must_use]
    pub fn builder() -> MemoryProviderBuilder {
        MemoryProviderBuilder::new()
    }

    /// A provider rooted at `/` with no entries.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), vec![NsPath::root()], BTreeMap::new())
    }

    pub(crate) const fn from_parts(
        name: String,
        roots: Vec<NsPath>,
        entries: BTreeMap<NsPath, MemoryEntry>,
    ) -> Self {
        Self {
            name,
            roots,
            entries,
        }
    }

    /// Content of the entry at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &NsPath) -> Option<&str> {
        self.entries.get(path).map(MemoryEntry::content)
    }

    /// Number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the provider has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn in_roots(&self, path: &NsPath) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    /// Returns `true` if an entry inside the roots lies strictly below `path`.
    fn has_entries_below(&self, path: &NsPath) -> bool {
        self.entries
            .range(path.clone()..)
            .map(|(candidate, _)| candidate)
            // `/apps-x` sorts between `/apps` and `/apps/...`
            .take_while(|candidate| candidate.as_str().starts_with(path.as_str()))
            .any(|candidate| path.is_ancestor_of(candidate) && self.in_roots(candidate))
    }

    fn concrete(path: &NsPath, entry: &MemoryEntry) -> Entity {
        Entity::concrete(path.clone(), Payload::new(entry.clone()))
    }
}

impl Provider for MemoryProvider {
    fn root_paths(&self) -> Vec<NsPath> {
        self.roots.clone()
    }

    fn lookup(&self, path: &NsPath) -> ProviderResult<Option<Entity>> {
        if let Some(entry) = self.entries.get(path)
            && self.in_roots(path)
        {
            return Ok(Some(Self::concrete(path, entry)));
        }
        if self.has_entries_below(path) {
            return Ok(Some(Entity::synthetic(path.clone())));
        }
        Ok(None)
    }

    fn list_children(&self, parent: &Entity) -> ProviderResult<EntityIter> {
        let parent = parent.path();
        let mut children: BTreeMap<NsPath, Entity> = BTreeMap::new();

        for (path, entry) in self.entries.range(parent.clone()..) {
            if !self.in_roots(path) {
                continue;
            }
            let Some(relative) = path.strip_prefix(parent) else {
                // Entries below `parent` sort right after it; stop at the first
                // path that is not below unless it shares the textual prefix.
                if path.as_str().starts_with(parent.as_str()) {
                    continue;
                }
                break;
            };
            if relative.is_empty() {
                continue;
            }

            match relative.split_once('/') {
                None => {
                    children.insert(path.clone(), Self::concrete(path, entry));
                }
                Some((first, _)) => {
                    let Ok(child) = parent.join(first) else {
                        continue;
                    };
                    children
                        .entry(child.clone())
                        .or_insert_with(|| Entity::synthetic(child));
                }
            }
        }

        Ok(Box::new(children.into_values().map(Ok)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
