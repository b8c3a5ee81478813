//! Shared test providers for tree integration tests.

#![allow(dead_code)]

use nsroute_core::{Entity, EntityIter, NsPath, Payload, Provider, ProviderError, ProviderResult};
use nsroute_tree::NamespaceTree;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Provider serving a fixed set of paths, tagging each entity with its name.
#[derive(Debug)]
pub struct Fixture {
    name: &'static str,
    roots: Vec<NsPath>,
    paths: BTreeSet<NsPath>,
    failing: bool,
}

impl Fixture {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            roots: Vec::new(),
            paths: BTreeSet::new(),
            failing: false,
        }
    }

    pub fn root(mut self, path: &str) -> Self {
        self.roots.push(NsPath::new(path).unwrap());
        self
    }

    pub fn with(mut self, path: &str) -> Self {
        self.paths.insert(NsPath::new(path).unwrap());
        self
    }

    /// Every call fails with a `ProviderError`.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn shared(self) -> Arc<dyn Provider> {
        Arc::new(self)
    }

    fn fail(&self, path: &NsPath) -> ProviderError {
        ProviderError::new(self.name, path.as_str(), "fixture offline")
    }
}

impl Provider for Fixture {
    fn root_paths(&self) -> Vec<NsPath> {
        self.roots.clone()
    }

    fn lookup(&self, path: &NsPath) -> ProviderResult<Option<Entity>> {
        if self.failing {
            return Err(self.fail(path));
        }
        Ok(self
            .paths
            .contains(path)
            .then(|| Entity::concrete(path.clone(), Payload::new(self.name))))
    }

    fn list_children(&self, parent: &Entity) -> ProviderResult<EntityIter> {
        if self.failing {
            return Err(self.fail(parent.path()));
        }
        let name = self.name;
        let children: Vec<ProviderResult<Entity>> = self
            .paths
            .iter()
            .filter(|p| p.parent().as_ref() == Some(parent.path()))
            .map(|p| Ok(Entity::concrete(p.clone(), Payload::new(name))))
            .collect();
        Ok(Box::new(children.into_iter()))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Name of the provider that produced the entity at `path`, `"synthetic"`
/// for placeholders, `None` when nothing resolves.
pub fn source_of(tree: &NamespaceTree, path: &str) -> Option<&'static str> {
    let entity = tree.resolve_str(path).unwrap()?;
    Some(
        entity
            .payload()
            .and_then(|p| p.downcast_ref::<&'static str>().copied())
            .unwrap_or("synthetic"),
    )
}

/// Paths and sources of the merged children of `path`.
pub fn children_of(tree: &NamespaceTree, path: &str) -> Vec<(String, &'static str)> {
    let parent = tree
        .resolve_str(path)
        .unwrap()
        .unwrap_or_else(|| Entity::synthetic(NsPath::new(path).unwrap()));
    tree.list_children(&parent)
        .map(|item| {
            let entity = item.unwrap();
            let source = entity
                .payload()
                .and_then(|p| p.downcast_ref::<&'static str>().copied())
                .unwrap_or("synthetic");
            (entity.path().to_string(), source)
        })
        .collect()
}
