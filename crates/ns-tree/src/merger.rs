//! Lazy merged enumeration of children across providers.

use nsroute_core::{Entity, EntityIter, NsPath, Provider, ProviderResult};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::vec;
use tracing::trace;

/// Iterator over the children of an entity, merged across providers.
///
/// Providers are consulted one after another, in the order the tree chose
/// for the listed path. Each path is yielded at most once:
///
/// - the first concrete entity at a path wins; later ones are dropped
/// - a synthetic entity is held back until all providers are exhausted,
///   and dropped if a concrete entity claims its path in the meantime
/// - held-back synthetic entities are yielded last, in the order first seen
///
/// Provider failures are yielded as `Err` items and the merge continues
/// with the remaining candidates. The merger owns everything it needs;
/// dropping it early is always fine.
pub struct ChildMerger {
    parent: Entity,
    providers: vec::IntoIter<Arc<dyn Provider>>,
    current: Option<EntityIter>,
    mount_children: Vec<Entity>,
    seen: HashSet<NsPath>,
    pending: Vec<Option<Entity>>,
    pending_index: HashMap<NsPath, usize>,
    drain: Option<vec::IntoIter<Option<Entity>>>,
}

impl ChildMerger {
    pub(crate) fn new(
        parent: Entity,
        providers: Vec<Arc<dyn Provider>>,
        mount_children: Vec<Entity>,
    ) -> Self {
        Self {
            parent,
            providers: providers.into_iter(),
            current: None,
            mount_children,
            seen: HashSet::new(),
            pending: Vec::new(),
            pending_index: HashMap::new(),
            drain: None,
        }
    }

    /// The entity whose children are listed.
    #[must_use]
    pub const fn parent(&self) -> &Entity {
        &self.parent
    }

    /// Applies the precedence rules to one candidate; returns it if it
    /// should be yielded now.
    fn admit(&mut self, entity: Entity) -> Option<Entity> {
        if entity.is_synthetic() {
            self.defer(entity);
            return None;
        }

        if self.seen.contains(entity.path()) {
            trace!("Dropping duplicate child {}", entity.path());
            return None;
        }

        if let Some(index) = self.pending_index.remove(entity.path()) {
            trace!("Concrete child replaces synthetic {}", entity.path());
            self.pending[index] = None;
        }
        self.seen.insert(entity.path().clone());
        Some(entity)
    }

    /// Holds a synthetic child back until the providers are exhausted,
    /// unless a concrete child or an earlier synthetic one has its path.
    fn defer(&mut self, entity: Entity) {
        if self.seen.contains(entity.path()) {
            trace!("Dropping synthetic child {} shadowed by a concrete one", entity.path());
        } else if self.pending_index.contains_key(entity.path()) {
            trace!("Dropping repeated synthetic child {}", entity.path());
        } else {
            self.pending_index
                .insert(entity.path().clone(), self.pending.len());
            self.pending.push(Some(entity));
        }
    }

    /// Pulls the next candidate from the providers, opening the next
    /// provider's enumeration when the current one is exhausted.
    fn next_candidate(&mut self) -> Option<ProviderResult<Entity>> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                match iter.next() {
                    Some(item) => return Some(item),
                    None => self.current = None,
                }
            }

            let provider = self.providers.next()?;
            match provider.list_children(&self.parent) {
                Ok(iter) => self.current = Some(iter),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl Iterator for ChildMerger {
    type Item = ProviderResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.drain.is_none() {
            while let Some(candidate) = self.next_candidate() {
                match candidate {
                    Ok(entity) => {
                        if let Some(entity) = self.admit(entity) {
                            return Some(Ok(entity));
                        }
                    }
                    Err(err) => return Some(Err(err)),
                }
            }

            for entity in std::mem::take(&mut self.mount_children) {
                self.defer(entity);
            }
            self.pending_index.clear();
            self.drain = Some(std::mem::take(&mut self.pending).into_iter());
        }

        self.drain.as_mut()?.find_map(|entity| entity).map(Ok)
    }
}

impl fmt::Debug for ChildMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildMerger")
            .field("parent", self.parent.path())
            .field("providers_left", &self.providers.len())
            .field("seen", &self.seen.len())
            .field("pending", &self.pending_index.len())
            .finish_non_exhaustive()
    }
}
