//! Read-only provider backed by a local directory.
//!
//! The directory is mapped onto a single mount path: `/mount/a/b` is served
//! from `<root>/a/b`. Namespace paths never contain `.` or `..` segments, so
//! every lookup stays inside `root` unless the directory itself contains
//! symbolic links pointing elsewhere.

use nsroute_core::{Entity, EntityIter, NsPath, Payload, Provider, ProviderError, ProviderResult};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Kind of a file system object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else (sockets, devices, ...)
    Other,
}

impl ResourceKind {
    fn of(metadata: &Metadata) -> Self {
        if metadata.is_file() {
            Self::File
        } else if metadata.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }

    /// Returns the kind as a lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Other => "other",
        }
    }
}

/// Data attached to entities served by a [`DirectoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsResource {
    file: PathBuf,
    kind: ResourceKind,
    size: u64,
}

impl FsResource {
    fn new(file: PathBuf, metadata: &Metadata) -> Self {
        Self {
            file,
            kind: ResourceKind::of(metadata),
            size: metadata.len(),
        }
    }

    /// Location on disk.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// File system object kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Size in bytes as reported by the file system.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// A provider that maps a local directory onto a mount path.
///
/// # Examples
///
/// ```
/// use nsroute_core::{NsPath, Provider};
/// use nsroute_providers::{DirectoryProvider, FsResource};
/// # use tempfile::TempDir;
///
/// # let temp_dir = TempDir::new().unwrap();
/// std::fs::write(temp_dir.path().join("index.html"), "<html/>")?;
///
/// let provider = DirectoryProvider::new("docs", NsPath::new("/content")?, temp_dir.path());
/// let entity = provider.lookup(&NsPath::new("/content/index.html")?)?.unwrap();
/// let resource = entity.payload().unwrap().downcast_ref::<FsResource>().unwrap();
/// assert_eq!(resource.size(), 7);
///
/// // Outside the mount path the provider has nothing to say.
/// assert!(provider.lookup(&NsPath::new("/index.html")?)?.is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    name: String,
    mount: NsPath,
    root: PathBuf,
}

impl DirectoryProvider {
    /// Creates a provider serving `root` at `mount`.
    ///
    /// The directory is not checked here; a missing directory simply
    /// resolves nothing.
    #[must_use]
    pub fn new(name: impl Into<String>, mount: NsPath, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            mount,
            root: root.into(),
        }
    }

    /// Directory mapped onto the mount path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Namespace path the directory is mapped to.
    #[must_use]
    pub const fn mount_path(&self) -> &NsPath {
        &self.mount
    }

    /// Maps a namespace path to its location on disk.
    ///
    /// Returns `None` for paths outside the mount path.
    #[must_use]
    pub fn disk_path(&self, path: &NsPath) -> Option<PathBuf> {
        let relative = path.strip_prefix(&self.mount)?;
        Some(
            relative
                .split('/')
                .filter(|s| !s.is_empty())
                .fold(self.root.clone(), |acc, segment| acc.join(segment)),
        )
    }

    fn error(&self, path: &NsPath, source: io::Error) -> ProviderError {
        ProviderError::io(&self.name, path.as_str(), source)
    }
}

/// Errors that mean "nothing here" rather than a failing backend.
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl Provider for DirectoryProvider {
    fn root_paths(&self) -> Vec<NsPath> {
        vec![self.mount.clone()]
    }

    fn lookup(&self, path: &NsPath) -> ProviderResult<Option<Entity>> {
        let Some(file) = self.disk_path(path) else {
            return Ok(None);
        };

        match fs::metadata(&file) {
            Ok(metadata) => {
                let resource = FsResource::new(file, &metadata);
                Ok(Some(Entity::concrete(path.clone(), Payload::new(resource))))
            }
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(self.error(path, e)),
        }
    }

    fn list_children(&self, parent: &Entity) -> ProviderResult<EntityIter> {
        let parent = parent.path();
        let Some(dir) = self.disk_path(parent) else {
            return Ok(Box::new(std::iter::empty()));
        };

        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if is_absent(&e) => {
                debug!("No directory at {} for {parent}", dir.display());
                return Ok(Box::new(std::iter::empty()));
            }
            Err(e) => return Err(self.error(parent, e)),
        };

        let mut named = Vec::new();
        let mut failures = Vec::new();
        for item in read_dir {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    failures.push(Err(self.error(parent, e)));
                    continue;
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                trace!("Skipping non-UTF-8 name in {}", dir.display());
                continue;
            };
            let Ok(child) = parent.join(&name) else {
                continue;
            };

            let file = entry.path();
            match fs::metadata(&file) {
                Ok(metadata) => named.push((
                    name,
                    Ok(Entity::concrete(child, Payload::new(FsResource::new(file, &metadata)))),
                )),
                Err(e) if is_absent(&e) => {}
                Err(e) => named.push((name, Err(self.error(&child, e)))),
            }
        }

        named.sort_by(|a, b| a.0.cmp(&b.0));
        let children: Vec<ProviderResult<Entity>> = named
            .into_iter()
            .map(|(_, item)| item)
            .chain(failures)
            .collect();
        Ok(Box::new(children.into_iter()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
