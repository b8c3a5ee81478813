//! Tree nodes binding providers to path prefixes.
//!
//! Nodes are immutable once published. Every structural change returns a new
//! node that shares untouched children with the old one through `Arc`.

use nsroute_core::Provider;
use std::cmp::Ordering;
use std::fmt;
use std::iter;
use std::sync::Arc;

/// An exact mount point already exists where a graft was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict;

/// A node of the mount tree.
///
/// `segment_path` is relative to the parent node and has no leading or
/// trailing separator; it may span several path segments (`apps/sling`).
/// The root node has an empty segment path and covers `/`.
///
/// Siblings never share a segment path, and no sibling's segment path is an
/// ancestor of another's: such a node always lives below its nearest
/// mounted ancestor instead.
#[derive(Clone)]
pub struct MountPoint {
    segment_path: String,
    provider: Arc<dyn Provider>,
    children: Vec<Arc<MountPoint>>,
}

impl MountPoint {
    pub(crate) fn root(provider: Arc<dyn Provider>) -> Self {
        Self::new(String::new(), provider, Vec::new())
    }

    fn new(segment_path: String, provider: Arc<dyn Provider>, children: Vec<Arc<Self>>) -> Self {
        Self {
            segment_path,
            provider,
            children,
        }
    }

    /// Path of this node relative to its parent.
    #[must_use]
    pub fn segment_path(&self) -> &str {
        &self.segment_path
    }

    /// Provider bound at this node.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Child mount points in prefix order.
    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    /// Strips this node's segment path from `relative`.
    ///
    /// Returns `Some("")` on an exact match, the remainder when `relative`
    /// lies below this node, and `None` otherwise.
    pub(crate) fn strip<'a>(&self, relative: &'a str) -> Option<&'a str> {
        let rest = relative.strip_prefix(self.segment_path.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Finds the child governing `relative` and the remainder below it.
    pub(crate) fn child_for<'a>(&self, relative: &'a str) -> Option<(&Arc<Self>, &'a str)> {
        if relative.is_empty() {
            return None;
        }
        self.children
            .iter()
            .find_map(|child| child.strip(relative).map(|rest| (child, rest)))
    }

    /// Children whose segment path lies strictly below `relative`.
    ///
    /// An empty `relative` selects every child.
    pub(crate) fn children_below<'s>(&'s self, relative: &'s str) -> impl Iterator<Item = &'s Arc<Self>> {
        self.children
            .iter()
            .filter(move |child| relative.is_empty() || is_below(&child.segment_path, relative))
    }

    /// Returns a copy of this node with `provider` mounted at `relative`.
    ///
    /// `children` becomes the new node's initial subtree; existing nodes
    /// that fall below `relative` are moved under the new node.
    pub(crate) fn grafted(
        &self,
        relative: &str,
        provider: Arc<dyn Provider>,
        children: Vec<Arc<Self>>,
    ) -> Result<Self, Conflict> {
        if relative.is_empty() {
            return Err(Conflict);
        }

        for (index, child) in self.children.iter().enumerate() {
            if let Some(rest) = child.strip(relative) {
                if rest.is_empty() {
                    return Err(Conflict);
                }
                let replaced = child.grafted(rest, provider, children)?;
                let mut next = self.clone();
                next.children[index] = Arc::new(replaced);
                return Ok(next);
            }
        }

        let (absorbed, mut kept): (Vec<_>, Vec<_>) = self
            .children
            .iter()
            .cloned()
            .partition(|child| is_below(&child.segment_path, relative));

        let mut inserted = Self::new(relative.to_string(), provider, children);
        for moved in absorbed {
            let below = &moved.segment_path[relative.len() + 1..];
            inserted = inserted.grafted(below, Arc::clone(&moved.provider), moved.children.clone())?;
        }

        kept.push(Arc::new(inserted));
        kept.sort_by(|a, b| prefix_order(a, b));
        Ok(Self::new(self.segment_path.clone(), Arc::clone(&self.provider), kept))
    }

    /// Returns a copy of this node without the mount point at `relative`,
    /// together with the removed node.
    ///
    /// The removed node's children are grafted back at their original
    /// paths. Returns `Ok(None)` if nothing is mounted exactly at `relative`.
    pub(crate) fn without(&self, relative: &str) -> Result<Option<(Self, Arc<Self>)>, Conflict> {
        let Some((index, rest)) = self
            .children
            .iter()
            .enumerate()
            .find_map(|(index, child)| child.strip(relative).map(|rest| (index, rest)))
        else {
            return Ok(None);
        };

        if !rest.is_empty() {
            let Some((replaced, removed)) = self.children[index].without(rest)? else {
                return Ok(None);
            };
            let mut next = self.clone();
            next.children[index] = Arc::new(replaced);
            return Ok(Some((next, removed)));
        }

        let mut next = self.clone();
        let removed = next.children.remove(index);
        for orphan in &removed.children {
            let original = format!("{}/{}", removed.segment_path, orphan.segment_path);
            next = next.grafted(&original, Arc::clone(&orphan.provider), orphan.children.clone())?;
        }
        Ok(Some((next, removed)))
    }

    /// Returns `true` if any child lies strictly below `relative`.
    pub(crate) fn has_mounts_below(&self, relative: &str) -> bool {
        self.children_below(relative).next().is_some()
    }
}

impl fmt::Debug for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountPoint")
            .field("segment_path", &self.segment_path)
            .field("provider", &self.provider.name())
            .field("children", &self.children)
            .finish()
    }
}

/// `true` if `path` lies strictly below `base` (both relative).
fn is_below(path: &str, base: &str) -> bool {
    path.len() > base.len() && path.starts_with(base) && path.as_bytes()[base.len()] == b'/'
}

/// Sibling order: segment by segment, with the separator ranked below every
/// other byte, so `a` and `a/x` sort before `a-b`.
fn prefix_order(a: &MountPoint, b: &MountPoint) -> Ordering {
    prefix_key(&a.segment_path).cmp(prefix_key(&b.segment_path))
}

fn prefix_key(segment_path: &str) -> impl Iterator<Item = u8> + '_ {
    segment_path
        .bytes()
        .chain(iter::once(b'/'))
        .map(|byte| if byte == b'/' { 0 } else { byte })
}
