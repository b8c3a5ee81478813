//! Assembling providers and trees from a mount table.

use crate::directory::DirectoryProvider;
use crate::memory::MemoryProvider;
use nsroute_core::{MountTable, NsPath, Provider, ProviderSpec, Result};
use nsroute_tree::NamespaceTree;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the empty provider installed at `/` when the table has no root
/// mount.
const IMPLICIT_ROOT: &str = "root";

/// Creates the provider described by `spec` for a mount at `mount`.
///
/// Providers without an explicit name are named after their kind and mount
/// path, e.g. `memory:/apps`.
///
/// # Errors
///
/// Returns an error if a memory entry is malformed or lies outside `mount`.
///
/// # Examples
///
/// ```
/// use nsroute_core::{NsPath, Provider, ProviderSpec};
/// use nsroute_providers::build_provider;
///
/// let spec = ProviderSpec::Directory {
///     name: None,
///     root: "./content".into(),
/// };
/// let provider = build_provider(&spec, &NsPath::new("/content")?)?;
/// assert_eq!(provider.name(), "directory:/content");
/// # Ok::<(), nsroute_core::Error>(())
/// ```
pub fn build_provider(spec: &ProviderSpec, mount: &NsPath) -> Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match spec {
        ProviderSpec::Memory { name, entries } => {
            let name = name.clone().unwrap_or_else(|| format!("memory:{mount}"));
            Arc::new(
                MemoryProvider::builder()
                    .name(name)
                    .root(mount)
                    .entries(entries)
                    .build()?,
            )
        }
        ProviderSpec::Directory { name, root } => {
            let name = name.clone().unwrap_or_else(|| format!("directory:{mount}"));
            Arc::new(DirectoryProvider::new(name, mount.clone(), root.clone()))
        }
    };

    debug!("Built provider '{}' for {mount}", provider.name());
    Ok(provider)
}

/// Builds a namespace tree from a mount table.
///
/// The table is validated first. Mounts are applied in table order; if no
/// mount targets `/`, an empty in-memory provider is bound there.
///
/// # Errors
///
/// Returns the first validation, provider construction, or mount error.
pub fn build_tree(table: &MountTable) -> Result<NamespaceTree> {
    table.validate()?;

    let mut root = None;
    let mut mounts = Vec::with_capacity(table.mounts.len());
    for spec in &table.mounts {
        let path = NsPath::new(&spec.path)?;
        let provider = build_provider(&spec.provider, &path)?;
        if path.is_root() {
            root = Some(provider);
        } else {
            mounts.push((path, provider));
        }
    }

    let root = root.unwrap_or_else(|| {
        debug!("No root mount configured; using an empty provider at /");
        Arc::new(MemoryProvider::empty(IMPLICIT_ROOT))
    });

    let tree = NamespaceTree::with_options(root, table.options);
    for (path, provider) in mounts {
        tree.mount(&path, provider)?;
    }

    info!("Assembled namespace with {} mount point(s)", tree.mount_count());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsroute_core::TreeOptions;

    #[test]
    fn test_build_memory_provider_default_name() {
        let spec = ProviderSpec::Memory {
            name: None,
            entries: [("/apps/a.js".to_string(), "a".to_string())].into(),
        };
        let provider = build_provider(&spec, &NsPath::new("/apps").unwrap()).unwrap();
        assert_eq!(provider.name(), "memory:/apps");
        assert_eq!(provider.root_paths(), vec![NsPath::new("/apps").unwrap()]);
    }

    #[test]
    fn test_build_memory_provider_rejects_foreign_entries() {
        let spec = ProviderSpec::Memory {
            name: Some("bad".to_string()),
            entries: [("/libs/a.js".to_string(), "a".to_string())].into(),
        };
        let Err(err) = build_provider(&spec, &NsPath::new("/apps").unwrap()) else {
            panic!("entries outside the mount path must be rejected");
        };
        assert!(err.is_config_error());
    }

    #[test]
    fn test_build_tree_uses_configured_root() {
        let table = MountTable::from_toml_str(
            r#"
            [options]
            fallback_to_ancestors = true

            [[mount]]
            path = "/apps"
            provider = { kind = "memory", name = "apps" }

            [[mount]]
            path = "/"
            provider = { kind = "memory", name = "site", entries = { "/apps/a.js" = "a" } }
            "#,
        )
        .unwrap();

        let tree = build_tree(&table).unwrap();
        assert_eq!(tree.options(), &TreeOptions::builder().fallback_to_ancestors(true).build());
        let names: Vec<_> = tree.mounts().into_iter().map(|m| m.provider).collect();
        assert_eq!(names, vec!["site", "apps"]);
        assert!(tree.resolve_str("/apps/a.js").unwrap().unwrap().is_concrete());
    }

    #[test]
    fn test_build_tree_implicit_root() {
        let table = MountTable::from_toml_str(
            r#"
            [[mount]]
            path = "/apps"
            provider = { kind = "memory" }
            "#,
        )
        .unwrap();

        let tree = build_tree(&table).unwrap();
        assert_eq!(tree.mounts()[0].provider, IMPLICIT_ROOT);
        assert_eq!(tree.mount_count(), 2);
    }

    #[test]
    fn test_build_tree_rejects_empty_table() {
        let err = build_tree(&MountTable::default()).unwrap_err();
        assert!(err.is_config_error());
    }
}
