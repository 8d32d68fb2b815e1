//! Copy engine for reorganizing a documentation tree.
//!
//! A run applies three phases against one base path, each driven by an ordered
//! mapping table: whole folder contents, single loose files, and the direct
//! files of system folders. Missing sources are reported and skipped; any other
//! filesystem failure aborts the run with a `ReorganizeError`.
use crate::config::{Mapping, ReorganizeConfig};
use crate::output::OutputFormatter;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors that abort a reorganization run.
#[derive(Debug)]
pub enum ReorganizeError {
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to list a source directory.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to remove a destination directory before replacing it.
    DirectoryRemovalFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to copy a file.
    FileCopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// The file was copied but its timestamps could not be carried over.
    MetadataPreservationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed while walking a subdirectory for a recursive copy.
    TreeWalkFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ReorganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, .. } => {
                write!(f, "Invalid base path {}", path.display())
            }
            Self::DirectoryCreationFailed { path, .. } => {
                write!(f, "Failed to create directory {}", path.display())
            }
            Self::DirectoryReadFailed { path, .. } => {
                write!(f, "Failed to read directory {}", path.display())
            }
            Self::DirectoryRemovalFailed { path, .. } => {
                write!(f, "Failed to remove directory {}", path.display())
            }
            Self::FileCopyFailed { from, to, .. } => {
                write!(f, "Failed to copy {} to {}", from.display(), to.display())
            }
            Self::MetadataPreservationFailed { path, .. } => {
                write!(f, "Failed to preserve timestamps of {}", path.display())
            }
            Self::TreeWalkFailed { path, .. } => {
                write!(f, "Failed to walk directory tree {}", path.display())
            }
        }
    }
}

impl std::error::Error for ReorganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::DirectoryReadFailed { source, .. }
            | Self::DirectoryRemovalFailed { source, .. }
            | Self::FileCopyFailed { source, .. }
            | Self::MetadataPreservationFailed { source, .. }
            | Self::TreeWalkFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for reorganization operations.
pub type ReorganizeResult<T> = Result<T, ReorganizeError>;

/// A recoverable condition: the entry is skipped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Phase 1 source folder does not exist.
    MissingFolder { name: String },
    /// Phase 2 source file does not exist.
    MissingFile { name: String },
    /// Phase 3 source folder does not exist or has no entries.
    SystemFolderEmptyOrMissing { name: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFolder { name } => write!(f, "Folder not found: {}", name),
            Self::MissingFile { name } => write!(f, "File not found: {}", name),
            Self::SystemFolderEmptyOrMissing { name } => {
                write!(f, "Folder is empty or missing: {}", name)
            }
        }
    }
}

/// What a single mapping entry did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The source was processed; holds the number of entries copied.
    Copied(usize),
    /// The source was skipped.
    Skipped(Warning),
}

/// Totals collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Successful top-level operations, the figure shown in the summary.
    pub operations: usize,
    /// Files and folders copied, counted per top-level entry.
    pub entries_copied: usize,
    /// Skipped entries in table order.
    pub warnings: Vec<Warning>,
    /// Whether the run only simulated its copies.
    pub dry_run: bool,
}

/// Applies the three copy phases of a `ReorganizeConfig`.
pub struct Reorganizer {
    config: ReorganizeConfig,
    dry_run: bool,
}

impl Reorganizer {
    pub fn new(config: ReorganizeConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Enables or disables simulation. A dry run reads the tree but never writes.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.config.base_path.join(relative)
    }

    /// Runs all three phases in table order and returns the collected totals.
    ///
    /// No skipped entry stops the run. The first unexpected filesystem error
    /// is returned as is; copies made before it stay in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docs_reorganizer::{ReorganizeConfig, Reorganizer};
    ///
    /// let config = ReorganizeConfig::default().with_base_path("/srv/docs/Documentation_Pro");
    /// match Reorganizer::new(config).run() {
    ///     Ok(report) => println!("{} operations", report.operations),
    ///     Err(e) => eprintln!("Reorganization failed: {}", e),
    /// }
    /// ```
    pub fn run(&self) -> ReorganizeResult<RunReport> {
        let base_path = &self.config.base_path;
        if !base_path.is_dir() {
            return Err(ReorganizeError::InvalidBasePath {
                path: base_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist or is not a directory",
                ),
            });
        }

        let mut report = RunReport {
            dry_run: self.dry_run,
            ..RunReport::default()
        };

        OutputFormatter::banner(&format!(
            "Starting reorganization of {}",
            base_path.display()
        ));

        OutputFormatter::phase(1, "copying files from the old folders");
        for Mapping { from, to } in &self.config.folders {
            OutputFormatter::info(&format!("\nProcessing: {} → {}", from, to));
            let outcome = self.copy_folder_contents(from, to)?;
            if let Outcome::Copied(count) = outcome
                && count > 0
            {
                report.operations += 1;
            }
            record(&mut report, outcome);
        }

        OutputFormatter::phase(2, "moving scattered files");
        for Mapping { from, to } in &self.config.scattered_files {
            let outcome = self.copy_named_file(from, to)?;
            if let Outcome::Copied(count) = outcome {
                report.operations += count;
            }
            record(&mut report, outcome);
        }

        OutputFormatter::phase(3, "moving system folders");
        for Mapping { from, to } in &self.config.system_folders {
            let outcome = self.relocate_system_folder_contents(from, to)?;
            if let Outcome::Copied(count) = outcome {
                report.operations += count;
            }
            record(&mut report, outcome);
        }

        OutputFormatter::summary(&report);
        Ok(report)
    }

    /// Copies every direct entry of `source` into `destination`.
    ///
    /// Files overwrite files of the same name. A subdirectory replaces any
    /// destination subdirectory of the same name entirely. A missing source is
    /// skipped with a warning and nothing is created; an existing but empty
    /// source still creates the destination and yields `Copied(0)`.
    pub fn copy_folder_contents(
        &self,
        source: &str,
        destination: &str,
    ) -> ReorganizeResult<Outcome> {
        let source_path = self.resolve(source);
        let destination_path = self.resolve(destination);

        if !source_path.is_dir() {
            let warning = Warning::MissingFolder {
                name: source.to_string(),
            };
            OutputFormatter::error(&warning.to_string());
            return Ok(Outcome::Skipped(warning));
        }

        if !self.dry_run {
            create_dir_all(&destination_path)?;
        }

        let mut copied = 0;
        for entry in sorted_entries(&source_path)? {
            let Some(file_name) = entry.file_name() else {
                continue;
            };
            let target = destination_path.join(file_name);
            let name = file_name.to_string_lossy();

            if entry.is_file() {
                if self.dry_run {
                    OutputFormatter::dry_run_notice(&format!(
                        "Would copy: {} → {}/",
                        name, destination
                    ));
                } else {
                    copy_file_preserving(&entry, &target)?;
                    OutputFormatter::success(&format!("Copied: {} → {}/", name, destination));
                }
                copied += 1;
            } else if entry.is_dir() {
                if self.dry_run {
                    OutputFormatter::dry_run_notice(&format!(
                        "Would copy folder: {}/ → {}/",
                        name, destination
                    ));
                } else {
                    replace_tree(&entry, &target)?;
                    OutputFormatter::success(&format!(
                        "Copied folder: {}/ → {}/",
                        name, destination
                    ));
                }
                copied += 1;
            }
        }

        Ok(Outcome::Copied(copied))
    }

    /// Copies `file_name` from the base path into `destination`.
    ///
    /// The destination folder is created whether or not the file exists.
    pub fn copy_named_file(&self, file_name: &str, destination: &str) -> ReorganizeResult<Outcome> {
        let source_path = self.resolve(file_name);
        let destination_path = self.resolve(destination);

        if !self.dry_run {
            create_dir_all(&destination_path)?;
        }

        if !source_path.is_file() {
            let warning = Warning::MissingFile {
                name: file_name.to_string(),
            };
            OutputFormatter::warning(&warning.to_string());
            return Ok(Outcome::Skipped(warning));
        }

        let message = format!("{} → {}", file_name, destination);
        if self.dry_run {
            OutputFormatter::dry_run_notice(&format!("Would move: {}", message));
        } else {
            let target = destination_path.join(leaf_name(&source_path, file_name));
            copy_file_preserving(&source_path, &target)?;
            OutputFormatter::success(&format!("Moved: {}", message));
        }

        Ok(Outcome::Copied(1))
    }

    /// Copies the direct files of `source` into the nested `destination`.
    ///
    /// Subdirectories are ignored. A missing or empty source is skipped with a
    /// warning and the destination is not created.
    pub fn relocate_system_folder_contents(
        &self,
        source: &str,
        destination: &str,
    ) -> ReorganizeResult<Outcome> {
        let source_path = self.resolve(source);
        let destination_path = self.resolve(destination);

        let entries = if source_path.is_dir() {
            sorted_entries(&source_path)?
        } else {
            Vec::new()
        };

        if entries.is_empty() {
            let warning = Warning::SystemFolderEmptyOrMissing {
                name: source.to_string(),
            };
            OutputFormatter::warning(&warning.to_string());
            return Ok(Outcome::Skipped(warning));
        }

        if !self.dry_run {
            create_dir_all(&destination_path)?;
        }

        let mut copied = 0;
        for entry in entries.iter().filter(|entry| entry.is_file()) {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let label = format!("{}/{}", source, name.to_string_lossy());
            if self.dry_run {
                OutputFormatter::dry_run_notice(&format!("Would move: {}", label));
            } else {
                copy_file_preserving(entry, &destination_path.join(name))?;
                OutputFormatter::success(&format!("Moved: {}", label));
            }
            copied += 1;
        }

        Ok(Outcome::Copied(copied))
    }
}

fn record(report: &mut RunReport, outcome: Outcome) {
    match outcome {
        Outcome::Copied(count) => report.entries_copied += count,
        Outcome::Skipped(warning) => report.warnings.push(warning),
    }
}

/// Uses the last component of `path`, falling back to the name as written.
fn leaf_name(path: &Path, fallback: &str) -> PathBuf {
    path.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Lists the direct entries of `dir`, sorted by name for stable output.
fn sorted_entries(dir: &Path) -> ReorganizeResult<Vec<PathBuf>> {
    let read_error = |e| ReorganizeError::DirectoryReadFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort();
    Ok(entries)
}

fn create_dir_all(path: &Path) -> ReorganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| ReorganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copies a file's content, permissions and access/modification times.
///
/// An existing file at `to` is overwritten.
pub fn copy_file_preserving(from: &Path, to: &Path) -> ReorganizeResult<()> {
    fs::copy(from, to).map_err(|e| ReorganizeError::FileCopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })?;

    let metadata_error = |e| ReorganizeError::MetadataPreservationFailed {
        path: to.to_path_buf(),
        source: e,
    };

    let metadata = fs::metadata(from).map_err(metadata_error)?;
    let mut times = FileTimes::new().set_modified(metadata.modified().map_err(metadata_error)?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    let file = open_for_set_times(to).map_err(metadata_error)?;
    file.set_times(times).map_err(metadata_error)
}

/// Opens a file so its timestamps can be changed, even when it is read-only.
#[cfg(windows)]
fn open_for_set_times(path: &Path) -> std::io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x100;
    File::options()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .open(path)
}

/// Opens a file so its timestamps can be changed; ownership is enough on Unix.
#[cfg(not(windows))]
fn open_for_set_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

/// Replaces `to` with a recursive copy of the directory `from`.
///
/// Any existing directory at `to` is removed first, so the result mirrors
/// `from` exactly.
pub fn replace_tree(from: &Path, to: &Path) -> ReorganizeResult<()> {
    if to.is_dir() {
        fs::remove_dir_all(to).map_err(|e| ReorganizeError::DirectoryRemovalFailed {
            path: to.to_path_buf(),
            source: e,
        })?;
    } else if to.exists() {
        fs::remove_file(to).map_err(|e| ReorganizeError::DirectoryRemovalFailed {
            path: to.to_path_buf(),
            source: e,
        })?;
    }

    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| ReorganizeError::TreeWalkFailed {
            path: e.path().unwrap_or(from).to_path_buf(),
            source: e.into(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| ReorganizeError::TreeWalkFailed {
                path: entry.path().to_path_buf(),
                source: std::io::Error::other(e),
            })?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            copy_file_preserving(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn reorganizer(base: &Path) -> Reorganizer {
        Reorganizer::new(ReorganizeConfig::empty(base))
    }

    #[test]
    fn test_copy_file_preserving_keeps_mtime() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("a.md");
        let to = temp_dir.path().join("b.md");
        fs::write(&from, "content").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600 * 24 * 30);
        File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(past)
            .unwrap();

        copy_file_preserving(&from, &to).expect("copy should succeed");

        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
        let copied_mtime = fs::metadata(&to).unwrap().modified().unwrap();
        let original_mtime = fs::metadata(&from).unwrap().modified().unwrap();
        assert_eq!(copied_mtime, original_mtime);
    }

    #[test]
    fn test_copy_file_preserving_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("a.md");
        let to = temp_dir.path().join("b.md");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old and longer").unwrap();

        copy_file_preserving(&from, &to).unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn test_copy_file_preserving_read_only_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("locked.md");
        let to = temp_dir.path().join("copy.md");
        fs::write(&from, "frozen").unwrap();
        let mut permissions = fs::metadata(&from).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&from, permissions).unwrap();

        copy_file_preserving(&from, &to).expect("read-only source should copy");

        assert_eq!(fs::read_to_string(&to).unwrap(), "frozen");
        assert!(fs::metadata(&to).unwrap().permissions().readonly());
        assert_eq!(
            fs::metadata(&to).unwrap().modified().unwrap(),
            fs::metadata(&from).unwrap().modified().unwrap()
        );

        for path in [&from, &to] {
            let mut permissions = fs::metadata(path).unwrap().permissions();
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            fs::set_permissions(path, permissions).unwrap();
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_copy_folder_contents_keeps_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("A");
        fs::create_dir(&source).unwrap();
        let latin1 = OsStr::from_bytes(b"caf\xe9.md");
        let other = OsStr::from_bytes(b"caf\xe8.md");
        fs::write(source.join(latin1), "e acute").unwrap();
        fs::write(source.join(other), "e grave").unwrap();

        let outcome = reorganizer(temp_dir.path())
            .copy_folder_contents("A", "Z")
            .unwrap();

        assert_eq!(outcome, Outcome::Copied(2));
        let destination = temp_dir.path().join("Z");
        assert_eq!(fs::read_to_string(destination.join(latin1)).unwrap(), "e acute");
        assert_eq!(fs::read_to_string(destination.join(other)).unwrap(), "e grave");
        assert_eq!(fs::read_dir(&destination).unwrap().count(), 2);
    }

    #[test]
    fn test_copy_file_preserving_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = copy_file_preserving(
            &temp_dir.path().join("missing.md"),
            &temp_dir.path().join("out.md"),
        );
        assert!(matches!(result, Err(ReorganizeError::FileCopyFailed { .. })));
    }

    #[test]
    fn test_replace_tree_removes_stale_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("src");
        let to = temp_dir.path().join("dst");
        fs::create_dir_all(from.join("inner")).unwrap();
        fs::write(from.join("inner").join("y.md"), "y").unwrap();
        fs::create_dir_all(&to).unwrap();
        fs::write(to.join("stale.md"), "stale").unwrap();

        replace_tree(&from, &to).unwrap();

        assert!(!to.join("stale.md").exists());
        assert_eq!(
            fs::read_to_string(to.join("inner").join("y.md")).unwrap(),
            "y"
        );
    }

    #[test]
    fn test_copy_folder_contents_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let outcome = reorganizer(temp_dir.path())
            .copy_folder_contents("missing", "dest")
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Skipped(Warning::MissingFolder {
                name: "missing".to_string()
            })
        );
        assert!(!temp_dir.path().join("dest").exists());
    }

    #[test]
    fn test_copy_folder_contents_empty_source_creates_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("empty")).unwrap();

        let outcome = reorganizer(temp_dir.path())
            .copy_folder_contents("empty", "dest")
            .unwrap();

        assert_eq!(outcome, Outcome::Copied(0));
        assert!(temp_dir.path().join("dest").is_dir());
    }

    #[test]
    fn test_copy_named_file_creates_destination_when_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let outcome = reorganizer(temp_dir.path())
            .copy_named_file("S.md", "D/E/")
            .unwrap();

        assert!(matches!(outcome, Outcome::Skipped(Warning::MissingFile { .. })));
        assert!(temp_dir.path().join("D").join("E").is_dir());
        assert!(!temp_dir.path().join("D").join("E").join("S.md").exists());
    }

    #[test]
    fn test_relocate_system_folder_ignores_subdirectories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let old = temp_dir.path().join("Old");
        fs::create_dir_all(old.join("sub")).unwrap();
        fs::write(old.join("a.md"), "a").unwrap();
        fs::write(old.join("sub").join("b.md"), "b").unwrap();

        let outcome = reorganizer(temp_dir.path())
            .relocate_system_folder_contents("Old", "New/Nested")
            .unwrap();

        assert_eq!(outcome, Outcome::Copied(1));
        let nested = temp_dir.path().join("New").join("Nested");
        assert!(nested.join("a.md").exists());
        assert!(!nested.join("sub").exists());
    }

    #[test]
    fn test_relocate_system_folder_with_only_subdirectories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(temp_dir.path().join("Old").join("sub")).unwrap();

        let outcome = reorganizer(temp_dir.path())
            .relocate_system_folder_contents("Old", "New")
            .unwrap();

        assert_eq!(outcome, Outcome::Copied(0));
        assert!(temp_dir.path().join("New").is_dir());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let old = temp_dir.path().join("A");
        fs::create_dir(&old).unwrap();
        fs::write(old.join("x.md"), "x").unwrap();

        let outcome = reorganizer(temp_dir.path())
            .with_dry_run(true)
            .copy_folder_contents("A", "Z")
            .unwrap();

        assert_eq!(outcome, Outcome::Copied(1));
        assert!(!temp_dir.path().join("Z").exists());
    }

    #[test]
    fn test_run_rejects_missing_base_path() {
        let result = Reorganizer::new(ReorganizeConfig::empty("/non/existent/path")).run();
        assert!(matches!(
            result,
            Err(ReorganizeError::InvalidBasePath { .. })
        ));
    }

    #[test]
    fn test_error_exposes_source() {
        use std::error::Error;

        let error = ReorganizeError::DirectoryCreationFailed {
            path: PathBuf::from("/x"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "Failed to create directory /x");
        assert_eq!(error.source().unwrap().to_string(), "denied");
    }
}
