//! Resolve command implementation.
//!
//! Resolves a single path and prints the resulting entity.

use super::common::{EntityView, exit_code_for};
use crate::formatters::format_output;
use anyhow::Result;
use nsroute_core::cli::{ExitCode, OutputFormat};
use nsroute_tree::NamespaceTree;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Outcome of resolving one path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolveReport {
    /// Path as requested
    pub path: String,
    /// Whether anything resolved
    pub found: bool,
    /// Resolved entity, if any
    pub entity: Option<EntityView>,
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "{entity}"),
            None => write!(f, "{}\tnot-found", self.path),
        }
    }
}

/// Resolves `path` in `tree` into a report.
///
/// # Errors
///
/// Returns the namespace error for malformed paths or failing providers.
pub fn resolve(tree: &NamespaceTree, path: &str) -> nsroute_core::Result<ResolveReport> {
    let entity = tree.resolve_str(path)?;
    Ok(ResolveReport {
        path: path.to_string(),
        found: entity.is_some(),
        entity: entity.as_ref().map(EntityView::from),
    })
}

/// Runs the resolve command.
///
/// Exits with `NOT_FOUND` when nothing resolves.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn run(tree: &NamespaceTree, path: &str, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Resolving {path}");

    let report = match resolve(tree, path) {
        Ok(report) => report,
        Err(e) => {
            warn!("Resolution of {path} failed: {e}");
            eprintln!("error: {e}");
            return Ok(exit_code_for(&e));
        }
    };

    println!("{}", format_output(&report, output_format)?);

    Ok(if report.found {
        ExitCode::SUCCESS
    } else {
        ExitCode::NOT_FOUND
    })
}
