//! Command implementations for the nsroute CLI.
//!
//! Each command builds a serializable report from a [`NamespaceTree`],
//! prints it in the requested format, and returns the exit code.
//!
//! [`NamespaceTree`]: nsroute_tree::NamespaceTree

pub mod common;
pub mod completions;
pub mod ls;
pub mod mounts;
pub mod resolve;
