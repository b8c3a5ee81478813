//! Validated namespace paths.
//!
//! # Examples
//!
//! ```
//! use nsroute_core::NsPath;
//!
//! let path = NsPath::new("/apps/sling/sample")?;
//! assert_eq!(path.name(), "sample");
//! assert_eq!(path.parent().unwrap().as_str(), "/apps/sling");
//! # Ok::<(), nsroute_core::Error>(())
//! ```

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '/';

/// A validated absolute path in the virtual namespace.
///
/// `NsPath` uses `/`-separated segments on all platforms:
/// - Must start with '/' (absolute paths only)
/// - No empty segments ('//') and no '.' or '..' segments
/// - No trailing separator, except for the root path `/`
///
/// A single trailing separator on input is dropped. Anything else that
/// would require normalization is rejected; cleaning up user input is the
/// caller's responsibility.
///
/// # Examples
///
/// ```
/// use nsroute_core::NsPath;
///
/// assert_eq!(NsPath::new("/rootel/")?.as_str(), "/rootel");
///
/// assert!(NsPath::new("").is_err());
/// assert!(NsPath::new("relative/path").is_err());
/// assert!(NsPath::new("/a//b").is_err());
/// assert!(NsPath::new("/a/../b").is_err());
/// # Ok::<(), nsroute_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NsPath(String);

impl NsPath {
    /// Creates a new `NsPath` from a string.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` if the path is empty, relative, or
    /// contains empty, `.` or `..` segments.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref();
        let invalid = |reason| Error::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }
        if !raw.starts_with(SEPARATOR) {
            return Err(invalid("path must be absolute"));
        }
        if raw.len() == 1 {
            return Ok(Self::root());
        }

        let trimmed = raw.strip_suffix(SEPARATOR).unwrap_or(raw);
        for segment in trimmed[1..].split(SEPARATOR) {
            match segment {
                "" => return Err(invalid("path contains an empty segment")),
                "." | ".." => return Err(invalid("path contains a relative segment")),
                _ => {}
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root path `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Returns the path without its leading separator.
    ///
    /// The root path yields an empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::NsPath;
    ///
    /// assert_eq!(NsPath::new("/a/b")?.relative(), "a/b");
    /// assert_eq!(NsPath::root().relative(), "");
    /// # Ok::<(), nsroute_core::Error>(())
    /// ```
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Returns the last segment, or an empty string for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0
            .rfind(SEPARATOR)
            .map_or("", |pos| &self.0[pos + 1..])
    }

    /// Returns the parent path.
    ///
    /// Returns `None` for the root path.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::NsPath;
    ///
    /// let path = NsPath::new("/rootel")?;
    /// assert!(path.parent().unwrap().is_root());
    /// assert!(NsPath::root().parent().is_none());
    /// # Ok::<(), nsroute_core::Error>(())
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.0.rfind(SEPARATOR).map(|pos| {
            if pos == 0 {
                Self::root()
            } else {
                Self(self.0[..pos].to_string())
            }
        })
    }

    /// Appends a single segment to this path.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` if `segment` is empty, contains a
    /// separator, or is `.` / `..`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::NsPath;
    ///
    /// let child = NsPath::root().join("apps")?.join("sling")?;
    /// assert_eq!(child.as_str(), "/apps/sling");
    /// assert!(child.join("a/b").is_err());
    /// # Ok::<(), nsroute_core::Error>(())
    /// ```
    pub fn join(&self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains(SEPARATOR) || segment == "." || segment == ".." {
            return Err(Error::InvalidPath {
                path: segment.to_string(),
                reason: "not a single path segment",
            });
        }
        if self.is_root() {
            Ok(Self(format!("/{segment}")))
        } else {
            Ok(Self(format!("{}/{segment}", self.0)))
        }
    }

    /// Appends a relative path of one or more segments.
    ///
    /// An empty `relative` returns a copy of `self`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` if any segment is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::NsPath;
    ///
    /// let path = NsPath::new("/apps")?.descendant("sling/sample")?;
    /// assert_eq!(path.as_str(), "/apps/sling/sample");
    /// assert!(NsPath::root().descendant("a//b").is_err());
    /// # Ok::<(), nsroute_core::Error>(())
    /// ```
    pub fn descendant(&self, relative: &str) -> Result<Self> {
        if relative.is_empty() {
            return Ok(self.clone());
        }
        relative
            .split(SEPARATOR)
            .try_fold(self.clone(), |path, segment| path.join(segment))
    }

    /// Iterates over the path segments; the root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative().split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::NsPath;
    ///
    /// let base = NsPath::new("/rootel")?;
    /// assert!(base.is_ancestor_of(&NsPath::new("/rootel/child")?));
    /// assert!(!base.is_ancestor_of(&NsPath::new("/rootel2")?));
    /// assert!(!base.is_ancestor_of(&base));
    /// # Ok::<(), nsroute_core::Error>(())
    /// ```
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }

    /// Returns `true` if `self` equals `base` or lies below it.
    #[must_use]
    pub fn starts_with(&self, base: &Self) -> bool {
        self == base || base.is_ancestor_of(self)
    }

    /// Returns the part of `self` below `base`, without a leading separator.
    ///
    /// Returns `Some("")` when the paths are equal and `None` when `self`
    /// is not at or below `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsroute_core::NsPath;
    ///
    /// let path = NsPath::new("/rootel/child/html.js")?;
    /// let base = NsPath::new("/rootel")?;
    /// assert_eq!(path.strip_prefix(&base), Some("child/html.js"));
    /// assert_eq!(path.strip_prefix(&NsPath::root()), Some("rootel/child/html.js"));
    /// # Ok::<(), nsroute_core::Error>(())
    /// ```
    #[must_use]
    pub fn strip_prefix(&self, base: &Self) -> Option<&str> {
        if self == base {
            Some("")
        } else if base.is_root() {
            Some(self.relative())
        } else if base.is_ancestor_of(self) {
            Some(&self.0[base.0.len() + 1..])
        } else {
            None
        }
    }
}

impl fmt::Display for NsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NsPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for NsPath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ns_path_new_valid() {
        let path = NsPath::new("/apps/sling/sample").unwrap();
        assert_eq!(path.as_str(), "/apps/sling/sample");
    }

    #[test]
    fn test_ns_path_root() {
        let path = NsPath::new("/").unwrap();
        assert!(path.is_root());
        assert_eq!(path, NsPath::root());
        assert_eq!(path.name(), "");
        assert_eq!(path.segments().count(), 0);
    }

    #[test]
    fn test_ns_path_trailing_separator_dropped() {
        let path = NsPath::new("/rootel/").unwrap();
        assert_eq!(path.as_str(), "/rootel");
    }

    #[test]
    fn test_ns_path_rejects_malformed() {
        for bad in ["", "rootel", "/a//b", "/a/./b", "/a/../b", "//", "/a//"] {
            let err = NsPath::new(bad).unwrap_err();
            assert!(err.is_invalid_path(), "expected rejection of {bad:?}");
        }
    }

    #[test]
    fn test_ns_path_allows_dots_inside_segments() {
        let path = NsPath::new("/apps/html.js").unwrap();
        assert_eq!(path.name(), "html.js");
        assert!(NsPath::new("/a/..b").is_ok());
    }

    #[test]
    fn test_ns_path_parent_chain() {
        let path = NsPath::new("/a/b/c").unwrap();
        let parent = path.parent().unwrap();
        assert_eq!(parent.as_str(), "/a/b");
        let grandparent = parent.parent().unwrap();
        assert_eq!(grandparent.as_str(), "/a");
        assert!(grandparent.parent().unwrap().is_root());
    }

    #[test]
    fn test_ns_path_segments() {
        let path = NsPath::new("/a/b/c").unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ns_path_ancestry() {
        let root = NsPath::root();
        let a = NsPath::new("/a").unwrap();
        let ab = NsPath::new("/a/b").unwrap();
        let ax = NsPath::new("/ab").unwrap();

        assert!(root.is_ancestor_of(&a));
        assert!(!root.is_ancestor_of(&root));
        assert!(a.is_ancestor_of(&ab));
        assert!(!a.is_ancestor_of(&ax));
        assert!(ab.starts_with(&a));
        assert!(a.starts_with(&a));
        assert!(!ax.starts_with(&a));
    }

    #[test]
    fn test_ns_path_strip_prefix() {
        let path = NsPath::new("/a/b").unwrap();
        assert_eq!(path.strip_prefix(&path), Some(""));
        assert_eq!(path.strip_prefix(&NsPath::new("/a").unwrap()), Some("b"));
        assert_eq!(path.strip_prefix(&NsPath::new("/b").unwrap()), None);
    }

    #[test]
    fn test_ns_path_descendant() {
        let base = NsPath::new("/rootel").unwrap();
        assert_eq!(base.descendant("").unwrap(), base);
        assert_eq!(base.descendant("child/x").unwrap().as_str(), "/rootel/child/x");
        assert!(base.descendant("child/..").is_err());
    }

    #[test]
    fn test_ns_path_display_and_parse() {
        let path: NsPath = "/test/x".parse().unwrap();
        assert_eq!(format!("{path}"), "/test/x");
        assert!(NsPath::try_from("nope").is_err());
    }
}
