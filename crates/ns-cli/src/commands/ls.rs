//! List command implementation.
//!
//! Prints the merged children of a path. Provider failures during the
//! listing are reported next to the children that could be read.

use super::common::{EntityView, exit_code_for};
use crate::formatters::format_output;
use anyhow::Result;
use nsroute_core::cli::{ExitCode, OutputFormat};
use nsroute_tree::NamespaceTree;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Children of one path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListReport {
    /// Listed path
    pub path: String,
    /// Merged children in enumeration order
    pub children: Vec<EntityView>,
    /// Provider failures encountered while listing
    pub errors: Vec<String>,
}

impl fmt::Display for ListReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for child in &self.children {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{child}")?;
            first = false;
        }
        Ok(())
    }
}

/// Lists the children of `path`.
///
/// Returns `Ok(None)` when `path` itself does not resolve.
///
/// # Errors
///
/// Returns the namespace error for malformed paths or a failing lookup of
/// `path` itself.
pub fn list(tree: &NamespaceTree, path: &str) -> nsroute_core::Result<Option<ListReport>> {
    let Some(parent) = tree.resolve_str(path)? else {
        return Ok(None);
    };

    let mut children = Vec::new();
    let mut errors = Vec::new();
    for item in tree.list_children(&parent) {
        match item {
            Ok(child) => children.push(EntityView::from(&child)),
            Err(e) => {
                warn!("Listing {path}: {e}");
                errors.push(e.to_string());
            }
        }
    }

    Ok(Some(ListReport {
        path: path.to_string(),
        children,
        errors,
    }))
}

/// Runs the ls command.
///
/// Exits with `NOT_FOUND` when `path` does not resolve and with
/// `PROVIDER_ERROR` when any provider failed during the listing.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn run(tree: &NamespaceTree, path: &str, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Listing children of {path}");

    let report = match list(tree, path) {
        Ok(Some(report)) => report,
        Ok(None) => {
            eprintln!("error: {path} not found");
            return Ok(ExitCode::NOT_FOUND);
        }
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(exit_code_for(&e));
        }
    };

    println!("{}", format_output(&report, output_format)?);
    for error in &report.errors {
        eprintln!("error: {error}");
    }

    Ok(if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::PROVIDER_ERROR
    })
}
