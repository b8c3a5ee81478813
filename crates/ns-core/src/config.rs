//! Configuration types for assembling a namespace.
//!
//! A [`MountTable`] describes which providers to mount where, plus the
//! [`TreeOptions`] that tune resolution. Tables are usually loaded from TOML.
//!
//! # Examples
//!
//! ```
//! use nsroute_core::{MountTable, ProviderSpec};
//!
//! let table = MountTable::from_toml_str(r#"
//!     [options]
//!     fallback_to_ancestors = true
//!
//!     [[mount]]
//!     path = "/"
//!     provider = { kind = "memory", entries = { "/index.html" = "<html/>" } }
//!
//!     [[mount]]
//!     path = "/content"
//!     provider = { kind = "directory", root = "./content" }
//! "#)?;
//!
//! assert!(table.options.fallback_to_ancestors);
//! assert_eq!(table.mounts.len(), 2);
//! assert!(matches!(table.mounts[1].provider, ProviderSpec::Directory { .. }));
//! # Ok::<(), nsroute_core::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::path::NsPath;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options that tune resolution and child enumeration.
///
/// # Examples
///
/// ```
/// use nsroute_core::TreeOptions;
///
/// let options = TreeOptions::default();
/// assert!(!options.fallback_to_ancestors);
/// assert!(options.synthesize_mount_children);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Retry a lookup miss against the providers of enclosing mount points,
    /// innermost first, before fabricating a synthetic entity.
    ///
    /// Also makes those providers take part in child enumeration.
    /// Default: false
    pub fallback_to_ancestors: bool,

    /// Add synthetic children for paths that lead to mount points below the
    /// listed entity, so mount points stay navigable even when no provider
    /// lists them.
    /// Default: true
    pub synthesize_mount_children: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            fallback_to_ancestors: false,
            synthesize_mount_children: true,
        }
    }
}

impl TreeOptions {
    /// Creates a new options builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::TreeOptions;
    ///
    /// let options = TreeOptions::builder()
    ///     .fallback_to_ancestors(true)
    ///     .synthesize_mount_children(false)
    ///     .build();
    ///
    /// assert!(options.fallback_to_ancestors);
    /// assert!(!options.synthesize_mount_children);
    /// ```
    #[must_use]
    pub fn builder() -> TreeOptionsBuilder {
        TreeOptionsBuilder::new()
    }
}

/// Builder for `TreeOptions`.
#[derive(Debug)]
pub struct TreeOptionsBuilder {
    options: TreeOptions,
}

impl TreeOptionsBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: TreeOptions::default(),
        }
    }

    /// Enables or disables fallback to enclosing providers.
    #[must_use]
    pub const fn fallback_to_ancestors(mut self, enable: bool) -> Self {
        self.options.fallback_to_ancestors = enable;
        self
    }

    /// Enables or disables synthetic children for mount points.
    #[must_use]
    pub const fn synthesize_mount_children(mut self, enable: bool) -> Self {
        self.options.synthesize_mount_children = enable;
        self
    }

    /// Builds the options.
    #[must_use]
    pub const fn build(self) -> TreeOptions {
        self.options
    }
}

impl Default for TreeOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider declaration inside a mount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderSpec {
    /// In-memory provider with fixed entries.
    Memory {
        /// Label used in logs and listings
        #[serde(default)]
        name: Option<String>,
        /// Absolute entry path → content
        #[serde(default)]
        entries: BTreeMap<String, String>,
    },
    /// Read-only view of a local directory.
    Directory {
        /// Label used in logs and listings
        #[serde(default)]
        name: Option<String>,
        /// Directory mapped onto the mount path
        root: PathBuf,
    },
}

/// One mount declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    /// Absolute mount path
    pub path: String,
    /// Provider bound at `path`
    pub provider: ProviderSpec,
}

/// A complete namespace description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountTable {
    /// Resolution options
    #[serde(default)]
    pub options: TreeOptions,
    /// Mounts, applied in order
    #[serde(default, rename = "mount")]
    pub mounts: Vec<MountSpec>,
}

impl MountTable {
    /// Parses and validates a TOML mount table.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` for malformed TOML and any error from
    /// [`MountTable::validate`].
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let table: Self = toml::from_str(input).map_err(|source| Error::ConfigParse { source })?;
        table.validate()?;
        Ok(table)
    }

    /// Reads, parses and validates a TOML mount table from disk.
    ///
    /// Relative directory roots are resolved against the directory that
    /// contains the file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, otherwise the errors
    /// of [`MountTable::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut table = Self::from_toml_str(&input)?;
        if let Some(base) = path.parent() {
            table.rebase(base);
        }
        debug!(
            "Loaded mount table from {} ({} mounts)",
            path.display(),
            table.mounts.len()
        );
        Ok(table)
    }

    /// Joins every relative directory root onto `base`.
    pub fn rebase(&mut self, base: &Path) {
        for mount in &mut self.mounts {
            if let ProviderSpec::Directory { root, .. } = &mut mount.provider
                && root.is_relative()
            {
                *root = base.join(&*root);
            }
        }
    }

    /// Validates the table.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The table has no mounts
    /// - A mount path is not a valid `NsPath`
    /// - Two mounts share the same path
    /// - A memory entry lies outside its mount path
    pub fn validate(&self) -> Result<()> {
        if self.mounts.is_empty() {
            return Err(Error::Config {
                message: "mount table has no mounts".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for mount in &self.mounts {
            let path = NsPath::new(&mount.path)?;
            if !seen.insert(path.clone()) {
                return Err(Error::Config {
                    message: format!("duplicate mount path: {path}"),
                });
            }

            if let ProviderSpec::Memory { entries, .. } = &mount.provider {
                for entry in entries.keys() {
                    let entry_path = NsPath::new(entry)?;
                    if !entry_path.starts_with(&path) {
                        return Err(Error::Config {
                            message: format!("entry {entry_path} lies outside mount {path}"),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_options_default() {
        let options = TreeOptions::default();
        assert!(!options.fallback_to_ancestors);
        assert!(options.synthesize_mount_children);
    }

    #[test]
    fn test_tree_options_builder() {
        let options = TreeOptions::builder().fallback_to_ancestors(true).build();
        assert!(options.fallback_to_ancestors);
        assert!(options.synthesize_mount_children);
    }

    #[test]
    fn test_parse_minimal_table() {
        let table = MountTable::from_toml_str(
            r#"
            [[mount]]
            path = "/"
            provider = { kind = "memory" }
            "#,
        )
        .unwrap();

        assert_eq!(table.options, TreeOptions::default());
        assert_eq!(table.mounts.len(), 1);
        assert_eq!(
            table.mounts[0].provider,
            ProviderSpec::Memory {
                name: None,
                entries: BTreeMap::new()
            }
        );
    }

    #[test]
    fn test_parse_directory_provider() {
        let table = MountTable::from_toml_str(
            r#"
            [[mount]]
            path = "/content"
            provider = { kind = "directory", name = "docs", root = "/srv/docs" }
            "#,
        )
        .unwrap();

        match &table.mounts[0].provider {
            ProviderSpec::Directory { name, root } => {
                assert_eq!(name.as_deref(), Some("docs"));
                assert_eq!(root, &PathBuf::from("/srv/docs"));
            }
            other => panic!("unexpected provider spec: {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = MountTable::from_toml_str("").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = MountTable::from_toml_str("[[mount]\npath=").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_duplicate_mount_rejected() {
        let err = MountTable::from_toml_str(
            r#"
            [[mount]]
            path = "/a"
            provider = { kind = "memory" }

            [[mount]]
            path = "/a/"
            provider = { kind = "memory" }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate mount path"));
    }

    #[test]
    fn test_invalid_mount_path_rejected() {
        let err = MountTable::from_toml_str(
            r#"
            [[mount]]
            path = "relative"
            provider = { kind = "memory" }
            "#,
        )
        .unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_memory_entry_outside_mount_rejected() {
        let err = MountTable::from_toml_str(
            r#"
            [[mount]]
            path = "/apps"
            provider = { kind = "memory", entries = { "/libs/x" = "" } }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside mount"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = MountTable::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("mounts.toml");
        std::fs::write(
            &file,
            "[[mount]]\npath = \"/\"\nprovider = { kind = \"memory\", name = \"root\" }\n",
        )
        .unwrap();

        let table = MountTable::load(&file).unwrap();
        assert_eq!(table.mounts[0].path, "/");
    }

    #[test]
    fn test_load_rebases_relative_roots() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("mounts.toml");
        std::fs::write(
            &file,
            r#"
            [[mount]]
            path = "/content"
            provider = { kind = "directory", root = "content" }

            [[mount]]
            path = "/abs"
            provider = { kind = "directory", root = "/srv/abs" }
            "#,
        )
        .unwrap();

        let table = MountTable::load(&file).unwrap();
        let roots: Vec<_> = table
            .mounts
            .iter()
            .map(|m| match &m.provider {
                ProviderSpec::Directory { root, .. } => root.clone(),
                ProviderSpec::Memory { .. } => PathBuf::new(),
            })
            .collect();
        assert_eq!(roots, vec![dir.path().join("content"), PathBuf::from("/srv/abs")]);
    }
}
