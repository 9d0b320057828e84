/*
 * Defines the value types exchanged between the site search engine and the shell
 * that displays its results. A `DocumentRef` identifies one candidate file, a
 * `SearchRequest` describes what to look for and where, and `SearchOutcome`
 * reports what the synchronous engine did with the request.
 */
use std::path::{Path, PathBuf};

/*
 * Identifies one HTML document found under the site root.
 * Created during enumeration and never mutated afterwards; the shell may keep
 * clones for its result list and later ask for `absolute_path` to be loaded.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    file_name: String,
    absolute_path: PathBuf,
}

impl DocumentRef {
    pub fn new(file_name: String, absolute_path: PathBuf) -> Self {
        DocumentRef {
            file_name,
            absolute_path,
        }
    }

    /*
     * Builds a reference from a path, using its final component as the display
     * name. Paths without a file name fall back to the lossy full path.
     */
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        DocumentRef::new(file_name, path.to_path_buf())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    CurrentDocument,
    AllDocumentsUnderRoot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub root_directory: PathBuf,
    pub term: String,
    pub scope: SearchScope,
}

impl SearchRequest {
    pub fn new(root_directory: PathBuf, term: impl Into<String>, scope: SearchScope) -> Self {
        SearchRequest {
            root_directory,
            term: term.into(),
            scope,
        }
    }

    /*
     * Returns the trimmed term, or `None` when it is blank. A blank term means
     * "do nothing", never "match everything".
     */
    pub fn effective_term(&self) -> Option<&str> {
        let trimmed = self.term.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/*
 * Result of running a `SearchRequest` through the synchronous engine.
 * `CurrentDocumentDelegated` signals that the request belongs to the
 * current-document finder, which reports a `FindOutcome` instead of a list.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Skipped,
    Documents(Vec<DocumentRef>),
    CurrentDocumentDelegated,
}

impl SearchOutcome {
    #[cfg(test)]
    pub fn documents(&self) -> &[DocumentRef] {
        match self {
            SearchOutcome::Documents(docs) => docs,
            _ => &[],
        }
    }

    pub fn into_documents(self) -> Vec<DocumentRef> {
        match self {
            SearchOutcome::Documents(docs) => docs,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    Found,
    NotFound,
}
