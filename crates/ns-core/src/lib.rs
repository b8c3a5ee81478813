//! Core types, traits, and errors for the nsroute namespace router.
//!
//! This crate provides the foundational types shared by the tree, the
//! bundled providers, and the CLI.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`NsPath`, `Entity`, `Origin`, `Payload`)
//! - The `Provider` capability implemented by backing stores
//! - Error hierarchy with contextual information
//! - Mount-table configuration types

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod entity;
mod error;
mod path;
mod provider;

pub mod cli;

pub use config::{MountSpec, MountTable, ProviderSpec, TreeOptions, TreeOptionsBuilder};
pub use entity::{Entity, Origin, Payload};
pub use error::{Error, ProviderError, Result};
pub use path::NsPath;
pub use provider::{EntityIter, Provider, ProviderResult};
