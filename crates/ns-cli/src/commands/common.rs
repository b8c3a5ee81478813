//! Common utilities shared across CLI commands.
//!
//! Loads the mount table, assembles the tree, and turns entities into
//! serializable views.

use anyhow::{Context, Result};
use nsroute_core::cli::ExitCode;
use nsroute_core::{Entity, Error, MountTable};
use nsroute_providers::{FsResource, MemoryEntry, build_tree};
use nsroute_tree::NamespaceTree;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location of the mount table when `--config` is not given:
/// `<config_dir>/nsroute/mounts.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nsroute").join("mounts.toml"))
}

/// Loads the mount table at `config` and assembles the namespace.
///
/// # Errors
///
/// Returns an error if the table cannot be read, parsed, validated, or
/// mounted.
pub fn load_tree(config: &Path) -> Result<NamespaceTree> {
    debug!("Loading mount table from {}", config.display());
    let table = MountTable::load(config)
        .with_context(|| format!("failed to load mount table {}", config.display()))?;
    build_tree(&table).context("failed to assemble namespace")
}

/// Maps a namespace error to the exit code reported by the CLI.
#[must_use]
pub const fn exit_code_for(error: &Error) -> ExitCode {
    if error.is_provider_error() {
        ExitCode::PROVIDER_ERROR
    } else {
        ExitCode::INVALID_INPUT
    }
}

/// Serializable description of an entity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntityView {
    /// Absolute namespace path
    pub path: String,
    /// `concrete` or `synthetic`
    pub origin: &'static str,
    /// Provider that produced the entity, when known
    pub provider: Option<String>,
    /// File system kind for directory-backed entities
    pub kind: Option<&'static str>,
    /// Size in bytes
    pub size: Option<u64>,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        let mut view = Self {
            path: entity.path().to_string(),
            origin: if entity.is_concrete() {
                "concrete"
            } else {
                "synthetic"
            },
            provider: None,
            kind: None,
            size: None,
        };

        if let Some(payload) = entity.payload() {
            if let Some(entry) = payload.downcast_ref::<MemoryEntry>() {
                view.provider = Some(entry.source().to_string());
                view.size = Some(entry.content().len() as u64);
            } else if let Some(resource) = payload.downcast_ref::<FsResource>() {
                view.kind = Some(resource.kind().as_str());
                view.size = Some(resource.size());
            }
        }

        view
    }
}

impl fmt::Display for EntityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.path, self.origin)?;
        if let Some(provider) = &self.provider {
            write!(f, "\t{provider}")?;
        }
        if let Some(kind) = self.kind {
            write!(f, "\t{kind}")?;
        }
        if let Some(size) = self.size {
            write!(f, "\t{size}")?;
        }
        Ok(())
    }
}
