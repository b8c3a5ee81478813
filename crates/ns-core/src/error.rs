//! Error types for the namespace router.
//!
//! Structural errors (`MountConflict`, `InvalidPath`) are raised by the tree
//! itself. Errors coming from a backing provider are carried as
//! [`ProviderError`] and pass through the tree without translation.
//!
//! # Examples
//!
//! ```
//! use nsroute_core::{Error, NsPath, Result};
//!
//! fn parse(path: &str) -> Result<NsPath> {
//!     NsPath::new(path)
//! }
//!
//! let err = parse("relative/path").unwrap_err();
//! assert!(err.is_invalid_path());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for namespace operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A mount point already exists at exactly this path.
    ///
    /// Recoverable: callers decide whether to unmount first.
    #[error("Mount point already exists: {path}")]
    MountConflict {
        /// The conflicting absolute path
        path: String,
    },

    /// Path is syntactically invalid.
    ///
    /// Raised for empty, relative, or non-normalized paths. Indicates a
    /// caller bug; normalization is never performed by the tree.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The rejected input
        path: String,
        /// Why the path was rejected
        reason: &'static str,
    },

    /// Error raised by a backing provider, passed through unmodified.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Mount table is structurally invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Mount table could not be parsed.
    #[error("Failed to parse mount table")]
    ConfigParse {
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Mount table could not be read from disk.
    #[error("Failed to read {}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a mount conflict.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::Error;
    ///
    /// let err = Error::MountConflict {
    ///     path: "/apps".to_string(),
    /// };
    /// assert!(err.is_mount_conflict());
    /// ```
    #[must_use]
    pub const fn is_mount_conflict(&self) -> bool {
        matches!(self, Self::MountConflict { .. })
    }

    /// Returns `true` if this is an invalid path error.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::Error;
    ///
    /// let err = Error::InvalidPath {
    ///     path: String::new(),
    ///     reason: "path is empty",
    /// };
    /// assert!(err.is_invalid_path());
    /// ```
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this error originated in a provider.
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// Returns `true` if this is a configuration error of any kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::Error;
    ///
    /// let err = Error::Config {
    ///     message: "no mounts".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::ConfigParse { .. } | Self::Io { .. }
        )
    }
}

/// Error raised by a provider during `lookup` or `list_children`.
///
/// Carries the provider's name and the path being served so failures can be
/// attributed without the tree wrapping them further.
///
/// # Examples
///
/// ```
/// use nsroute_core::ProviderError;
///
/// let err = ProviderError::new("content", "/content/a", "backend offline");
/// assert_eq!(err.provider(), "content");
/// assert!(err.to_string().contains("/content/a"));
/// ```
#[derive(Error, Debug)]
#[error("Provider '{provider}' failed at {path}")]
pub struct ProviderError {
    provider: String,
    path: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl ProviderError {
    /// Creates a provider error from any error source.
    pub fn new(
        provider: impl Into<String>,
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            provider: provider.into(),
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a provider error from an I/O failure.
    pub fn io(provider: impl Into<String>, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::new(provider, path, source)
    }

    /// Name of the provider that failed.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Namespace path the provider was serving.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Result type alias for namespace operations.
pub type Result<T> = std::result::Result<T, Error>;
