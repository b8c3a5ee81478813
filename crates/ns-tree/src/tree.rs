//! The namespace tree: mounting, resolution, and child enumeration.

use crate::merger::ChildMerger;
use crate::mount_point::{Conflict, MountPoint};
use nsroute_core::{Entity, Error, NsPath, Provider, Result, TreeOptions};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Summary of one mount point, as reported by [`NamespaceTree::mounts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    /// Absolute mount path
    pub path: NsPath,
    /// Name of the bound provider
    pub provider: String,
    /// Nesting depth; the root mount point has depth 0
    pub depth: usize,
}

/// A virtual namespace assembled from mounted providers.
///
/// The root path `/` is always bound to the provider given at construction
/// and can never be unmounted. Every other mount point is added with
/// [`mount`](Self::mount) or [`register`](Self::register).
///
/// `NamespaceTree` is `Send + Sync`; share it behind an `Arc` to resolve
/// from many threads while mounts change.
///
/// # Examples
///
/// ```
/// use nsroute_core::{Entity, EntityIter, NsPath, Payload, Provider, ProviderResult};
/// use nsroute_tree::NamespaceTree;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Empty;
///
/// impl Provider for Empty {
///     fn root_paths(&self) -> Vec<NsPath> {
///         Vec::new()
///     }
///     fn lookup(&self, _path: &NsPath) -> ProviderResult<Option<Entity>> {
///         Ok(None)
///     }
///     fn list_children(&self, _parent: &Entity) -> ProviderResult<EntityIter> {
///         Ok(Box::new(std::iter::empty()))
///     }
/// }
///
/// let tree = NamespaceTree::new(Arc::new(Empty));
/// tree.mount("/apps/sling/sample", Arc::new(Empty))?;
///
/// // Ancestors of a mount point always resolve.
/// assert!(tree.resolve_str("/apps")?.unwrap().is_synthetic());
/// assert!(tree.resolve_str("/libs")?.is_none());
///
/// assert!(tree.unmount("/apps/sling/sample")?);
/// assert!(tree.resolve_str("/apps")?.is_none());
/// # Ok::<(), nsroute_core::Error>(())
/// ```
#[derive(Debug)]
pub struct NamespaceTree {
    /// Currently published snapshot
    current: RwLock<Arc<MountPoint>>,

    /// Serializes mutations
    writer: Mutex<()>,

    options: TreeOptions,
}

impl NamespaceTree {
    /// Creates a tree with `root` bound at `/` and default options.
    #[must_use]
    pub fn new(root: Arc<dyn Provider>) -> Self {
        Self::with_options(root, TreeOptions::default())
    }

    /// Creates a tree with `root` bound at `/`.
    #[must_use]
    pub fn with_options(root: Arc<dyn Provider>, options: TreeOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(MountPoint::root(root))),
            writer: Mutex::new(()),
            options,
        }
    }

    /// Options this tree was created with.
    #[must_use]
    pub const fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Returns the currently published root mount point.
    ///
    /// The snapshot is immutable; later mutations publish a new one.
    #[must_use]
    pub fn snapshot(&self) -> Arc<MountPoint> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Mounts `provider` at `path`.
    ///
    /// Existing mount points below `path` move under the new one and keep
    /// their own providers.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPath` if `path` is malformed
    /// - `Error::MountConflict` if a mount point already exists at exactly
    ///   `path` (including `/`)
    ///
    /// The tree is unchanged on error.
    pub fn mount(&self, path: impl AsRef<str>, provider: Arc<dyn Provider>) -> Result<()> {
        let path = NsPath::new(path)?;
        let name = provider.name().to_string();

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let next = self
            .snapshot()
            .grafted(path.relative(), provider, Vec::new())
            .map_err(|Conflict| conflict(&path))?;
        self.publish(next);

        info!("Mounted provider '{name}' at {path}");
        Ok(())
    }

    /// Removes the mount point at exactly `path`.
    ///
    /// Mount points below it are re-attached at their original paths.
    /// Returns `Ok(false)` if nothing is mounted at `path`; the root mount
    /// point is never removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` if `path` is malformed.
    pub fn unmount(&self, path: impl AsRef<str>) -> Result<bool> {
        let path = NsPath::new(path)?;
        if path.is_root() {
            debug!("Ignoring unmount of the root mount point");
            return Ok(false);
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let Some((next, removed)) = self
            .snapshot()
            .without(path.relative())
            .map_err(|Conflict| conflict(&path))?
        else {
            debug!("Nothing mounted at {path}");
            return Ok(false);
        };
        self.publish(next);

        info!("Unmounted provider '{}' from {path}", removed.provider().name());
        Ok(true)
    }

    /// Mounts `provider` at every path it reports from
    /// [`Provider::root_paths`].
    ///
    /// All-or-nothing: if any path conflicts, nothing is mounted.
    ///
    /// # Errors
    ///
    /// Returns `Error::MountConflict` for the first conflicting path.
    pub fn register(&self, provider: Arc<dyn Provider>) -> Result<()> {
        let roots = provider.root_paths();

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = MountPoint::clone(&self.snapshot());
        for root in &roots {
            next = next
                .grafted(root.relative(), Arc::clone(&provider), Vec::new())
                .map_err(|Conflict| conflict(root))?;
        }
        self.publish(next);

        info!(
            "Registered provider '{}' at {} root(s)",
            provider.name(),
            roots.len()
        );
        Ok(())
    }

    /// Unmounts every mount point bound to `provider`.
    ///
    /// Providers are matched by reference, not by name. The root mount point
    /// is kept even if it is bound to `provider`. Returns the number of
    /// mount points removed.
    pub fn unregister(&self, provider: &Arc<dyn Provider>) -> usize {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot();

        if Arc::ptr_eq(snapshot.provider(), provider) {
            warn!(
                "Provider '{}' is bound at / which cannot be unregistered",
                provider.name()
            );
        }

        let mut bound = Vec::new();
        collect_bound(&snapshot, &NsPath::root(), provider, &mut bound);
        if bound.is_empty() {
            warn!("Provider '{}' is not mounted", provider.name());
            return 0;
        }

        let mut next = MountPoint::clone(&snapshot);
        let mut removed = 0;
        for path in &bound {
            match next.without(path.relative()) {
                Ok(Some((without, _))) => {
                    next = without;
                    removed += 1;
                }
                Ok(None) | Err(Conflict) => warn!("Could not unmount {path}"),
            }
        }
        self.publish(next);

        info!("Unregistered provider '{}' from {removed} mount point(s)", provider.name());
        removed
    }

    /// Resolves `path` to an entity.
    ///
    /// The provider of the most specific mount point is asked first. If it
    /// has nothing, a synthetic entity is returned when `path` is a mount
    /// point or leads to one, otherwise `None`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Provider` if a provider lookup fails.
    pub fn resolve(&self, path: &NsPath) -> Result<Option<Entity>> {
        let root = self.snapshot();
        let chain = descend(&root, path.relative());
        let (node, rest) = chain[chain.len() - 1];

        if let Some(entity) = node.provider().lookup(path)? {
            debug!("Resolved {path} via '{}'", node.provider().name());
            return Ok(Some(entity));
        }

        if self.options.fallback_to_ancestors {
            let mut asked = vec![node.provider()];
            for (ancestor, _) in chain.iter().rev().skip(1) {
                let provider = ancestor.provider();
                if asked.iter().any(|p| Arc::ptr_eq(*p, provider)) {
                    continue;
                }
                asked.push(provider);
                if let Some(entity) = provider.lookup(path)? {
                    debug!("Resolved {path} via enclosing provider '{}'", provider.name());
                    return Ok(Some(entity));
                }
            }
        }

        if rest.is_empty() || node.has_mounts_below(rest) {
            debug!("Synthesized entity for {path}");
            return Ok(Some(Entity::synthetic(path.clone())));
        }

        debug!("Nothing found at {path}");
        Ok(None)
    }

    /// Validates `path` and resolves it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` for malformed input, otherwise the
    /// errors of [`resolve`](Self::resolve).
    pub fn resolve_str(&self, path: &str) -> Result<Option<Entity>> {
        self.resolve(&NsPath::new(path)?)
    }

    /// Lists the children of `entity`, merged across all providers that
    /// can contribute to its path.
    ///
    /// The returned iterator works on the snapshot taken now and holds no
    /// lock. See [`ChildMerger`] for the precedence rules.
    #[must_use]
    pub fn list_children(&self, entity: &Entity) -> ChildMerger {
        let root = self.snapshot();
        let path = entity.path();
        let chain = descend(&root, path.relative());
        let (node, rest) = chain[chain.len() - 1];

        let mut providers: Vec<Arc<dyn Provider>> = vec![Arc::clone(node.provider())];
        if self.options.fallback_to_ancestors {
            for (ancestor, _) in chain.iter().rev().skip(1) {
                push_unique(&mut providers, ancestor.provider());
            }
        }
        for child in node.children_below(rest) {
            collect_providers(child, &mut providers);
        }

        let mount_children = if self.options.synthesize_mount_children {
            mount_children(node, rest, path)
        } else {
            Vec::new()
        };

        debug!(
            "Listing children of {path} across {} provider(s)",
            providers.len()
        );
        ChildMerger::new(entity.clone(), providers, mount_children)
    }

    /// Every mount point in pre-order, root first.
    #[must_use]
    pub fn mounts(&self) -> Vec<MountInfo> {
        let mut out = Vec::new();
        collect_mounts(&self.snapshot(), &NsPath::root(), 0, &mut out);
        out
    }

    /// Returns `true` if a mount point exists at exactly `path`.
    ///
    /// The root is always mounted.
    #[must_use]
    pub fn is_mounted(&self, path: &NsPath) -> bool {
        let root = self.snapshot();
        let chain = descend(&root, path.relative());
        chain[chain.len() - 1].1.is_empty()
    }

    /// Number of mount points, including the root.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        fn count(node: &MountPoint) -> usize {
            1 + node.children().iter().map(|c| count(c)).sum::<usize>()
        }
        count(&self.snapshot())
    }

    fn publish(&self, next: MountPoint) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(next);
    }
}

fn conflict(path: &NsPath) -> Error {
    Error::MountConflict {
        path: path.to_string(),
    }
}

/// Walks from `root` towards `relative`, returning each visited node with
/// the part of `relative` still below it. Never empty; the last element is
/// the most specific mount point.
fn descend<'a>(root: &'a MountPoint, relative: &'a str) -> Vec<(&'a MountPoint, &'a str)> {
    let mut chain = vec![(root, relative)];
    let mut node = root;
    let mut rest = relative;
    while let Some((child, below)) = node.child_for(rest) {
        chain.push((child.as_ref(), below));
        node = child;
        rest = below;
    }
    chain
}

fn push_unique(providers: &mut Vec<Arc<dyn Provider>>, provider: &Arc<dyn Provider>) {
    if !providers.iter().any(|p| Arc::ptr_eq(p, provider)) {
        providers.push(Arc::clone(provider));
    }
}

fn collect_providers(node: &MountPoint, providers: &mut Vec<Arc<dyn Provider>>) {
    push_unique(providers, node.provider());
    for child in node.children() {
        collect_providers(child, providers);
    }
}

/// Synthetic entries for the direct children of `path` that lead to mount
/// points below `node`.
fn mount_children(node: &MountPoint, rest: &str, path: &NsPath) -> Vec<Entity> {
    let mut children: Vec<Entity> = Vec::new();
    for child in node.children_below(rest) {
        let below = if rest.is_empty() {
            child.segment_path()
        } else {
            &child.segment_path()[rest.len() + 1..]
        };
        let first = below.split('/').next().unwrap_or(below);
        let Ok(child_path) = path.join(first) else {
            continue;
        };
        if !children.iter().any(|e| e.path() == &child_path) {
            children.push(Entity::synthetic(child_path));
        }
    }
    children
}

fn collect_mounts(node: &MountPoint, path: &NsPath, depth: usize, out: &mut Vec<MountInfo>) {
    out.push(MountInfo {
        path: path.clone(),
        provider: node.provider().name().to_string(),
        depth,
    });
    for child in node.children() {
        if let Ok(child_path) = path.descendant(child.segment_path()) {
            collect_mounts(child, &child_path, depth + 1, out);
        }
    }
}

fn collect_bound(
    node: &MountPoint,
    path: &NsPath,
    provider: &Arc<dyn Provider>,
    out: &mut Vec<NsPath>,
) {
    for child in node.children() {
        let Ok(child_path) = path.descendant(child.segment_path()) else {
            continue;
        };
        if Arc::ptr_eq(child.provider(), provider) {
            out.push(child_path.clone());
        }
        collect_bound(child, &child_path, provider, out);
    }
}
