#![warn(missing_docs)]

//! Extraction of Java archives into a scratch directory owned by the scan.

use crate::error::{Result, ScanError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

/// Prefix of the temporary directory archives are extracted into
const SCRATCH_PREFIX: &str = "jndicheck-";

/// Permissions used for file entries that do not store any
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Temporary directory shared by every archive of a scan.
///
/// The directory is only created when the first archive is extracted and is
/// removed by [`ScratchArea::cleanup`], or on drop if the scan unwinds.
#[derive(Debug, Default)]
pub struct ScratchArea {
    dir: Option<TempDir>,
}

impl ScratchArea {
    /// Creates an empty scratch area. Nothing is written to disk yet.
    pub fn new() -> Self {
        ScratchArea { dir: None }
    }

    /// Location of the scratch directory, if it has been created.
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Returns the scratch directory, creating it on first use.
    pub fn root(&mut self) -> io::Result<&Path> {
        let dir = match self.dir.take() {
            Some(dir) => dir,
            None => {
                let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
                debug!("Created scratch directory {}", dir.path().display());
                dir
            }
        };

        Ok(self.dir.insert(dir).path())
    }

    /// Deletes the scratch directory and everything extracted into it.
    /// Failures are logged and otherwise ignored.
    pub fn cleanup(self) {
        if let Some(dir) = self.dir {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!("Removed scratch directory {}", path.display()),
                Err(error) => warn!(
                    "Scratch directory {} could not be removed. Error:{}",
                    path.display(),
                    error
                ),
            }
        }
    }
}

/// Lexically resolves `.` and `..` components without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Computes where the entry `name` is written below `root`.
///
/// Absolute entry names are kept below `root` (`/etc/passwd` becomes
/// `root/etc/passwd`). Fails with [`ScanError::IllegalPath`] when the
/// normalized destination is not strictly inside `root`, e.g. `../../evil.sh`.
pub fn destination(root: &Path, name: &str) -> Result<PathBuf> {
    let root = normalize(root);

    let mut joined = root.clone();
    for component in Path::new(name).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => (),
            other => joined.push(other.as_os_str()),
        }
    }
    let path = normalize(&joined);

    if path != root && path.starts_with(&root) {
        Ok(path)
    } else {
        Err(ScanError::IllegalPath(path))
    }
}

/// Creates (or truncates) `path` with the permission bits stored in the archive.
fn create_file(path: &Path, mode: Option<u32>) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode.map_or(DEFAULT_FILE_MODE, |mode| mode & 0o777));
    }
    #[cfg(not(unix))]
    let _ = (mode, DEFAULT_FILE_MODE);

    options.open(path)
}

/// Extracts every entry of the archive at `path` below `root`.
///
/// The destination of each entry is pushed to `entries` before it is written,
/// so on error `entries` still lists everything that was reached. Extraction
/// stops at the first error; files already written stay in place until the
/// scratch area is cleaned up.
pub fn extract_archive(path: &Path, root: &Path, entries: &mut Vec<PathBuf>) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);
    let mut archive = zip::ZipArchive::new(reader)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let outpath = destination(root, file.name())?;

        entries.push(outpath.clone());

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut outfile = create_file(&outpath, file.unix_mode())?;
        io::copy(&mut file, &mut outfile)?;
        trace!("Extracted \"{}\" ({} bytes)", file.name(), file.size());
    }

    Ok(())
}
