//! Mounts command implementation.
//!
//! Shows every mount point of the assembled namespace together with the
//! options the tree resolves with.

use crate::formatters::format_output;
use anyhow::Result;
use nsroute_core::TreeOptions;
use nsroute_core::cli::{ExitCode, OutputFormat};
use nsroute_tree::NamespaceTree;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// One mount point as shown by the CLI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MountView {
    /// Absolute mount path
    pub path: String,
    /// Name of the bound provider
    pub provider: String,
    /// Nesting depth below the root mount point
    pub depth: usize,
}

/// Mount table of a namespace.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MountsReport {
    /// Mount points in pre-order, root first
    pub mounts: Vec<MountView>,
    /// Resolution options of the tree
    pub options: TreeOptions,
}

impl fmt::Display for MountsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mount) in self.mounts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}{}\t{}",
                "  ".repeat(mount.depth),
                mount.path,
                mount.provider
            )?;
        }
        Ok(())
    }
}

/// Collects the mount table of `tree`.
#[must_use]
pub fn collect(tree: &NamespaceTree) -> MountsReport {
    MountsReport {
        mounts: tree
            .mounts()
            .into_iter()
            .map(|info| MountView {
                path: info.path.to_string(),
                provider: info.provider,
                depth: info.depth,
            })
            .collect(),
        options: *tree.options(),
    }
}

/// Runs the mounts command.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn run(tree: &NamespaceTree, output_format: OutputFormat) -> Result<ExitCode> {
    let report = collect(tree);
    info!("Namespace has {} mount points", report.mounts.len());

    println!("{}", format_output(&report, output_format)?);
    Ok(ExitCode::SUCCESS)
}
