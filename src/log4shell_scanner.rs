#![warn(missing_docs)]

use crate::cli::ScanArgs;
use crate::error::{Result, ScanError};
use crate::extractor::{extract_archive, ScratchArea};
use memchr::memmem;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::{fs, io};
use walkdir::WalkDir;

// Constants

/// Lower-cased name of the JndiLookup class file bundled by vulnerable log4j 2.x versions
const JNDI_LOOKUP_CLASS_FILE: &str = "jndilookup.class";

/// Extension of the archives to be scanned, compared ignoring ASCII case
const ARCHIVE_EXTENSION: &str = "jar";

/// Outcome of a scan, handed to the reporter.
#[derive(Debug)]
pub struct ScanReport {
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Wall-clock duration of the scan, cleanup included
    pub elapsed: Duration,
    /// Archives bundling the JndiLookup class, in discovery order
    pub vulnerable: Vec<PathBuf>,
    /// Number of files and directories visited
    pub visited: u64,
    /// Number of archives inspected
    pub archives: u64,
    /// Whether the walk stopped early on a traversal error
    pub interrupted: bool,
    /// Scratch directory used for extraction, already removed
    pub scratch_dir: Option<PathBuf>,
}

/// Checks that the directory to scan exists.
///
/// Only a missing path is rejected; other metadata errors are left for the
/// walker to report.
pub fn check_scan_root(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            Err(ScanError::MissingRoot(path.to_path_buf()))
        }
        _ => Ok(()),
    }
}

/// Identifies if the file name provided belongs to an archive to be analyzed
fn is_archive(path: &Path) -> bool {
    path.extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// Counts the extracted entries whose path, relative to `root`, contains the
/// JndiLookup class file name ignoring case.
fn count_jndi_lookup_entries(entries: &[PathBuf], root: &Path) -> usize {
    let finder = memmem::Finder::new(JNDI_LOOKUP_CLASS_FILE);

    entries
        .iter()
        .filter(|entry| {
            let relative = entry.strip_prefix(root).unwrap_or(entry.as_path());
            let lowered = relative.to_string_lossy().to_lowercase();
            finder.find(lowered.as_bytes()).is_some()
        })
        .count()
}

/// Mutable state of a running scan
struct Scan {
    scratch: ScratchArea,
    vulnerable: Vec<PathBuf>,
    visited: u64,
    archives: u64,
}

impl Scan {
    /// Extracts an archive and records it when it bundles the JndiLookup class
    fn process_archive(&mut self, path: &Path) {
        self.archives += 1;
        let name = path.file_name().unwrap_or(OsStr::new(""));
        info!("Found a Jar-File, extract {}", name.to_string_lossy());

        let root = match self.scratch.root() {
            Ok(root) => root.to_path_buf(),
            Err(error) => {
                warn!(
                    "{} can´t be extracted, no scratch directory. Error:{}",
                    path.display(),
                    error
                );
                return;
            }
        };

        let mut entries = Vec::new();
        match extract_archive(path, &root, &mut entries) {
            Ok(()) => trace!("Extracted {} entries from {}", entries.len(), path.display()),
            Err(error @ ScanError::IllegalPath(_)) => error!(
                "{} is a malicious archive, extraction aborted. Error:{}",
                path.display(),
                error
            ),
            Err(error) => warn!("{} can´t be extracted. Error:{}", path.display(), error),
        }

        info!("Checking {} for vulnerability", name.to_string_lossy());

        let matches = count_jndi_lookup_entries(&entries, &root);
        if matches > 0 {
            warn!(
                "{} contains JndiLookup.class ({} matching entries)",
                path.display(),
                matches
            );
            self.vulnerable.push(path.to_path_buf());
        }
    }

    /// Walks the tree below `root`, stopping at the first unreadable entry
    fn walk(&mut self, root: &Path, follow_links: bool) -> Result<()> {
        let mut it = WalkDir::new(root)
            .follow_links(follow_links)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = it.next() {
            let entry = entry?;

            // Extracted entries are never walked, e.g. when scanning `/`
            if let Some(scratch) = self.scratch.path() {
                if entry.path().starts_with(scratch) {
                    if entry.file_type().is_dir() {
                        it.skip_current_dir();
                    }
                    continue;
                }
            }

            self.visited += 1;

            info!("Scanning {}", entry.path().display());

            if entry.file_type().is_file() && is_archive(entry.path()) {
                self.process_archive(entry.path());
            }
        }

        Ok(())
    }
}

/// Runs the scan
///
/// Always returns a report: a traversal error stops the walk but the archives
/// found so far are still reported. The scratch directory is removed before
/// returning.
pub fn scan(args: &ScanArgs) -> ScanReport {
    let start = Instant::now();

    let mut scan = Scan {
        scratch: ScratchArea::new(),
        vulnerable: Vec::new(),
        visited: 0,
        archives: 0,
    };

    let interrupted = match scan.walk(&args.dir, args.follow_links) {
        Ok(()) => false,
        Err(error) => {
            error!("Scan of {} stopped. Error:{}", args.dir.display(), error);
            true
        }
    };

    info!(
        "Visited {} entries and inspected {} archives",
        scan.visited, scan.archives
    );

    let scratch_dir = scan.scratch.path().map(Path::to_path_buf);
    scan.scratch.cleanup();

    ScanReport {
        root: args.dir.clone(),
        elapsed: start.elapsed(),
        vulnerable: scan.vulnerable,
        visited: scan.visited,
        archives: scan.archives,
        interrupted,
        scratch_dir,
    }
}
