/// File organization: moving files into category directories.
///
/// This module creates the category subdirectories of a target directory,
/// takes a one-time snapshot of its top-level files, and moves each file into
/// the folder of its category, picking a free name when the destination is
/// already taken.
use crate::config::{ConfigError, FailurePolicy, OrganizerConfig};
use crate::file_category::file_extension;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Errors that can occur while organizing a directory.
///
/// Setup failures (see [`OrganizeError::is_setup_failure`]) happen before any
/// file is touched. [`OrganizeError::Inspect`] and [`OrganizeError::FileMove`]
/// concern a single entry and go through the [`FailurePolicy`].
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// The configuration was rejected before starting.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// The target directory is missing, not a directory, or cannot be listed.
    #[error("target directory {} is unavailable: {source}", .path.display())]
    TargetUnavailable { path: PathBuf, source: io::Error },
    /// A category directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },
    /// A top-level entry could not be inspected.
    #[error("failed to inspect {}: {source}", .path.display())]
    Inspect { path: PathBuf, source: io::Error },
    /// A file could not be moved to its category directory.
    #[error("failed to move {} to {}: {source}", .path.display(), .destination.display())]
    FileMove {
        path: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },
}

impl OrganizeError {
    /// Returns true for errors raised before any file was moved.
    pub fn is_setup_failure(&self) -> bool {
        self.file_path().is_none()
    }

    /// The entry a per-file failure concerns.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Inspect { path, .. } | Self::FileMove { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A top-level file captured by [`Organizer::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, lossily converted for display and classification.
    pub name: String,
    /// Full path of the file inside the target directory.
    pub path: PathBuf,
    /// Lowercased extension including the dot, or "" if none.
    pub extension: String,
}

/// A file that was moved into a category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    /// Original file name.
    pub name: String,
    /// Category the file was sorted into.
    pub category: String,
    /// Final location, possibly renamed to avoid a collision.
    pub destination: PathBuf,
}

/// A file that could not be moved, recorded under [`FailurePolicy::Continue`].
#[derive(Debug)]
pub struct FileFailure {
    /// Path of the file that stayed in place.
    pub path: PathBuf,
    /// Why the move failed.
    pub error: OrganizeError,
}

/// Outcome of a full organization run.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Files moved, in processing order.
    pub moved: Vec<MovedFile>,
    /// Files left behind because their move failed.
    pub failures: Vec<FileFailure>,
}

impl OrganizeReport {
    /// Number of moved files per category.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for moved in &self.moved {
            *counts.entry(moved.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns true if every file in the snapshot was moved.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sorts the files of one directory into category subdirectories.
#[derive(Debug)]
pub struct Organizer {
    config: OrganizerConfig,
}

impl Organizer {
    /// Creates an organizer after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidConfig`] if the category table is unusable.
    pub fn new(config: OrganizerConfig) -> OrganizeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this organizer runs with.
    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Organizes the target directory.
    ///
    /// Creates every category directory, snapshots the top-level files, then
    /// moves each one. Under [`FailurePolicy::Abort`] the first entry that
    /// cannot be inspected or moved ends the run with that error; files moved
    /// before it stay moved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use declutter::{Organizer, OrganizerConfig};
    ///
    /// let organizer = Organizer::new(OrganizerConfig::new("/path/to/Downloads"))?;
    /// let report = organizer.organize()?;
    /// println!("Moved {} files", report.moved.len());
    /// # Ok::<(), declutter::OrganizeError>(())
    /// ```
    pub fn organize(&self) -> OrganizeResult<OrganizeReport> {
        self.ensure_category_dirs()?;
        let entries = self.snapshot()?;
        self.organize_entries(entries)
    }

    /// Moves snapshot entries in order, applying the failure policy to every
    /// entry that could not be inspected or moved.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the first per-file error.
    pub fn organize_entries(
        &self,
        entries: Vec<OrganizeResult<FileEntry>>,
    ) -> OrganizeResult<OrganizeReport> {
        let mut report = OrganizeReport::default();
        for entry in entries {
            match entry.and_then(|entry| self.organize_entry(&entry)) {
                Ok(moved) => {
                    info!("Moved: {} → {}", moved.name, moved.category);
                    report.moved.push(moved);
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Continue => {
                        let path = error.file_path().map(Path::to_path_buf).unwrap_or_default();
                        warn!("Skipped {}: {}", path.display(), error);
                        report.failures.push(FileFailure { path, error });
                    }
                },
            }
        }

        Ok(report)
    }

    /// Makes sure a directory exists for every category, fallback included.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::TargetUnavailable`] if the target directory
    /// does not exist, and [`OrganizeError::DirectoryCreation`] if a category
    /// directory cannot be created (for instance because a file has its name).
    pub fn ensure_category_dirs(&self) -> OrganizeResult<()> {
        let target = &self.config.target_dir;
        let metadata = fs::metadata(target).map_err(|e| OrganizeError::TargetUnavailable {
            path: target.clone(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(OrganizeError::TargetUnavailable {
                path: target.clone(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        for name in self.config.categories.names() {
            let category_path = target.join(name);
            match fs::create_dir(&category_path) {
                Ok(()) => debug!("Created {}", category_path.display()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && category_path.is_dir() => {}
                Err(e) => {
                    return Err(OrganizeError::DirectoryCreation {
                        path: category_path,
                        source: e,
                    });
                }
            }
        }

        Ok(())
    }

    /// Lists the top-level files of the target directory, sorted by name.
    ///
    /// Directories (and symlinks to directories) are left out. Entries that
    /// cannot be inspected stay in the list as [`OrganizeError::Inspect`] so
    /// the failure policy decides what happens to them. The result is taken
    /// once, so files created afterwards are not part of it.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::TargetUnavailable`] if the directory cannot be read.
    pub fn snapshot(&self) -> OrganizeResult<Vec<OrganizeResult<FileEntry>>> {
        let target = &self.config.target_dir;
        let unavailable = |e: io::Error| OrganizeError::TargetUnavailable {
            path: target.clone(),
            source: e,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(target).map_err(unavailable)? {
            paths.push(entry.map_err(unavailable)?.path());
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .filter_map(|path| inspect_entry(path).transpose())
            .collect())
    }

    /// Moves a single snapshot entry into its category directory.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::FileMove`] if the file cannot be moved.
    pub fn organize_entry(&self, entry: &FileEntry) -> OrganizeResult<MovedFile> {
        let category = self
            .config
            .categories
            .category_for_extension(&entry.extension);

        let file_name = entry.path.file_name().ok_or_else(|| OrganizeError::FileMove {
            path: entry.path.clone(),
            destination: self.config.target_dir.join(category),
            source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

        let desired = self.config.target_dir.join(category).join(file_name);
        let destination = resolve_collision(&desired);

        move_file(&entry.path, &destination).map_err(|e| OrganizeError::FileMove {
            path: entry.path.clone(),
            destination: destination.clone(),
            source: e,
        })?;

        Ok(MovedFile {
            name: entry.name.clone(),
            category: category.to_string(),
            destination,
        })
    }
}

/// Reads the metadata of a top-level entry.
///
/// Returns `Ok(None)` for directories, following symlinks. A symlink whose
/// target is missing is still a file entry and gets moved as a link.
///
/// # Errors
///
/// Returns [`OrganizeError::Inspect`] if the entry itself cannot be stat'ed.
pub fn inspect_entry(path: PathBuf) -> OrganizeResult<Option<FileEntry>> {
    let is_dir = match fs::metadata(&path) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) => match fs::symlink_metadata(&path) {
            Ok(metadata) if metadata.file_type().is_symlink() => false,
            _ => return Err(OrganizeError::Inspect { path, source: e }),
        },
    };

    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Err(OrganizeError::Inspect {
            path,
            source: io::Error::new(io::ErrorKind::InvalidInput, "entry has no file name"),
        });
    };

    if is_dir {
        debug!("Skipping directory {}", name);
        return Ok(None);
    }

    Ok(Some(FileEntry {
        extension: file_extension(&name),
        name,
        path,
    }))
}

/// Returns `desired` if nothing is there, otherwise the first free
/// `"stem (n).ext"` sibling, counting n from 1.
///
/// Existence is checked without following symlinks, so a dangling link is
/// never replaced.
///
/// ```
/// use declutter::file_organizer::resolve_collision;
/// use std::path::Path;
///
/// let free = Path::new("/definitely/not/here/report.pdf");
/// assert_eq!(resolve_collision(free), free);
/// ```
pub fn resolve_collision(desired: &Path) -> PathBuf {
    if !path_taken(desired) {
        return desired.to_path_buf();
    }

    let (stem, ext) = split_file_name(desired.file_name().unwrap_or_default());
    let parent = desired.parent().unwrap_or_else(|| Path::new(""));

    let mut counter: u64 = 1;
    loop {
        let mut candidate_name = stem.to_os_string();
        candidate_name.push(format!(" ({})", counter));
        candidate_name.push(ext);

        let candidate = parent.join(candidate_name);
        if !path_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits a file name like [`split_extension`](crate::file_category::split_extension),
/// on the raw bytes so names that are not UTF-8 survive intact.
#[cfg(unix)]
fn split_file_name(name: &OsStr) -> (&OsStr, &OsStr) {
    use std::os::unix::ffi::OsStrExt;

    let bytes = name.as_bytes();
    let leading = bytes.iter().take_while(|&&b| b == b'.').count();
    match bytes[leading..].iter().rposition(|&b| b == b'.') {
        Some(pos) => {
            let (stem, ext) = bytes.split_at(leading + pos);
            (OsStr::from_bytes(stem), OsStr::from_bytes(ext))
        }
        None => (name, OsStr::new("")),
    }
}

#[cfg(not(unix))]
fn split_file_name(name: &OsStr) -> (&OsStr, &OsStr) {
    match name.to_str() {
        Some(s) => {
            let (stem, ext) = crate::file_category::split_extension(s);
            (OsStr::new(stem), OsStr::new(ext))
        }
        None => (name, OsStr::new("")),
    }
}

fn path_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Moves `from` to `to`, copying then deleting when they sit on different
/// filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Cross-device move of {}, copying", from.display());
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
