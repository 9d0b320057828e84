use super::document::DocumentRef;
use crate::core::config::{DEFAULT_FILE_PATTERNS, DEFAULT_MAX_DEPTH, SearchSettings};
use glob::{MatchOptions, Pattern};
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/*
 * This module enumerates the HTML documents of a local site. The walk visits
 * every subdirectory of a directory before that directory's own files, so all
 * documents of child subtrees precede the documents of their parent. Within a
 * directory, subdirectories and files are each taken in name order.
 *
 * Enumeration is best-effort: unreadable directories, races and a missing root
 * all reduce the result instead of failing it.
 */

#[derive(Debug)]
pub enum FileSystemError {
    Io(io::Error),
    InvalidPath(PathBuf),
}

impl From<io::Error> for FileSystemError {
    fn from(err: io::Error) -> Self {
        FileSystemError::Io(err)
    }
}

impl std::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSystemError::Io(e) => write!(f, "I/O error: {e}"),
            FileSystemError::InvalidPath(p) => write!(f, "Not a directory: {p:?}"),
        }
    }
}

impl std::error::Error for FileSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileSystemError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/*
 * Checks that `root_path` is an existing directory and returns its absolute form.
 * The search itself never needs this; shells use it to tell the user why a
 * search produced nothing.
 */
pub fn validate_root(root_path: &Path) -> Result<PathBuf> {
    if !root_path.is_dir() {
        return Err(FileSystemError::InvalidPath(root_path.to_path_buf()));
    }
    Ok(std::path::absolute(root_path)?)
}

/*
 * Defines the operation of listing candidate documents under a root directory.
 * Implementations must never fail: problems surface as missing entries.
 */
pub trait DocumentEnumeratorOperations: Send + Sync {
    fn enumerate_documents(&self, root_path: &Path) -> Vec<DocumentRef>;
}

/*
 * Walks the tree with `walkdir`, without following symbolic links, and keeps the
 * regular files whose names match one of the configured glob patterns.
 * Pattern matching ignores case on every platform, so `INDEX.HTML` is found on
 * Linux just as on Windows.
 */
pub struct CoreDocumentEnumerator {
    patterns: Vec<Pattern>,
    max_depth: usize,
}

impl CoreDocumentEnumerator {
    pub fn new() -> Self {
        Self::from_patterns(&DEFAULT_FILE_PATTERNS, DEFAULT_MAX_DEPTH)
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::from_patterns(&settings.file_patterns, settings.max_depth)
    }

    /*
     * Compiles the file name patterns. Invalid patterns are logged and skipped.
     * `max_depth` is the deepest subdirectory nesting below the root that is
     * still searched; 0 means only the root's own files.
     */
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S], max_depth: usize) -> Self {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let trimmed = pattern.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            match Pattern::new(trimmed) {
                Ok(p) => compiled.push(p),
                Err(err) => {
                    log::warn!("DocumentEnumerator: Invalid file pattern '{trimmed}': {err}");
                }
            }
        }
        CoreDocumentEnumerator {
            patterns: compiled,
            max_depth,
        }
    }

    /*
     * True if `file_name` matches any pattern, ignoring case.
     */
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(file_name, options))
    }

    fn is_candidate(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_file() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.matches_file_name(&name)
    }
}

impl Default for CoreDocumentEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Directories sort before files. Directories are ordered by name ignoring case
 * (raw name breaks ties); files keep exact byte order of their names.
 */
fn directories_first_by_name(a: &DirEntry, b: &DirEntry) -> Ordering {
    match (a.file_type().is_dir(), b.file_type().is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => {
            let a_folded = a.file_name().to_string_lossy().to_lowercase();
            let b_folded = b.file_name().to_string_lossy().to_lowercase();
            a_folded
                .cmp(&b_folded)
                .then_with(|| a.file_name().cmp(b.file_name()))
        }
        (false, false) => a.file_name().cmp(b.file_name()),
    }
}

impl DocumentEnumeratorOperations for CoreDocumentEnumerator {
    fn enumerate_documents(&self, root_path: &Path) -> Vec<DocumentRef> {
        log::debug!("DocumentEnumerator: Enumerating documents under {root_path:?}");
        let absolute_root =
            std::path::absolute(root_path).unwrap_or_else(|_| root_path.to_path_buf());

        let walker = WalkDir::new(&absolute_root)
            .follow_links(false)
            .max_depth(self.max_depth.saturating_add(1))
            .sort_by(directories_first_by_name);

        let mut documents = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("DocumentEnumerator: Skipping unreadable entry: {err}");
                    continue;
                }
            };
            if self.is_candidate(&entry) {
                documents.push(DocumentRef::from_path(entry.path()));
            }
        }

        log::debug!(
            "DocumentEnumerator: Found {} documents under {:?}.",
            documents.len(),
            absolute_root
        );
        documents
    }
}
