//! Builder pattern for constructing in-memory providers.
//!
//! # Examples
//!
//! ```
//! use nsroute_providers::MemoryProviderBuilder;
//!
//! let provider = MemoryProviderBuilder::new()
//!     .root("/apps")
//!     .entry("/apps/a.js", "a")
//!     .entry("/apps/b.js", "b")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(provider.len(), 2);
//! ```

use crate::memory::{MemoryEntry, MemoryProvider};
use nsroute_core::{Error, NsPath, Result};
use std::collections::BTreeMap;

const DEFAULT_NAME: &str = "memory";

/// Builder for a [`MemoryProvider`].
///
/// Invalid paths do not interrupt the chain; they are collected and the
/// first one is reported by [`build`](Self::build).
///
/// Without an explicit [`root`](Self::root) the provider is rooted at `/`.
///
/// # Examples
///
/// ```
/// use nsroute_providers::MemoryProviderBuilder;
///
/// let result = MemoryProviderBuilder::new()
///     .entry("/valid.js", "ok")
///     .entry("relative/path", "rejected")
///     .build();
///
/// assert!(result.unwrap_err().is_invalid_path());
/// ```
#[derive(Debug, Default)]
pub struct MemoryProviderBuilder {
    name: Option<String>,
    roots: Vec<NsPath>,
    entries: BTreeMap<NsPath, String>,
    errors: Vec<Error>,
}

impl MemoryProviderBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider name used in logs and listings.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a root path the provider is responsible for.
    #[must_use]
    pub fn root(mut self, path: impl AsRef<str>) -> Self {
        match NsPath::new(path) {
            Ok(root) => self.roots.push(root),
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Adds an entry. A later entry at the same path replaces the earlier one.
    #[must_use]
    pub fn entry(mut self, path: impl AsRef<str>, content: impl Into<String>) -> Self {
        match NsPath::new(path) {
            Ok(path) => {
                self.entries.insert(path, content.into());
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Adds multiple entries at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_providers::MemoryProviderBuilder;
    ///
    /// let provider = MemoryProviderBuilder::new()
    ///     .entries([("/a", "1"), ("/b", "2")])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(provider.len(), 2);
    /// ```
    #[must_use]
    pub fn entries<P, C>(self, entries: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<String>,
    {
        entries
            .into_iter()
            .fold(self, |builder, (path, content)| builder.entry(path, content))
    }

    /// Number of entries added so far.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Consumes the builder and returns the provider.
    ///
    /// # Errors
    ///
    /// Returns the first invalid path encountered, or `Error::Config` if an
    /// entry lies outside every root.
    pub fn build(self) -> Result<MemoryProvider> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let roots = if self.roots.is_empty() {
            vec![NsPath::root()]
        } else {
            self.roots
        };
        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());

        let mut entries = BTreeMap::new();
        for (path, content) in self.entries {
            if !roots.iter().any(|root| path.starts_with(root)) {
                return Err(Error::Config {
                    message: format!("entry {path} lies outside the roots of provider '{name}'"),
                });
            }
            let entry = MemoryEntry::new(&content, &name);
            entries.insert(path, entry);
        }

        Ok(MemoryProvider::from_parts(name, roots, entries))
    }
}
