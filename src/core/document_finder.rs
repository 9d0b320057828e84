/*
 * Find-in-current-document. The shell asks whether the displayed document
 * contains a term and is told exactly once, through a `FnOnce` completion, on a
 * background thread. Matching ignores case, the same as the site-wide search.
 */
use crate::core::content_search::contains_ignore_case;
use crate::core::document::FindOutcome;
use crate::core::text_decoding;
use encoding_rs::{Encoding, WINDOWS_1252};
use std::path::{Path, PathBuf};
use std::thread;

pub type FindCompletion = Box<dyn FnOnce(FindOutcome) + Send + 'static>;

pub trait DocumentFinderOperations: Send + Sync {
    fn find_text(&self, document: &Path, term: &str, on_complete: FindCompletion);
}

pub struct CoreDocumentFinder {
    fallback_encoding: &'static Encoding,
}

impl CoreDocumentFinder {
    pub fn new(fallback_encoding: &'static Encoding) -> Self {
        CoreDocumentFinder { fallback_encoding }
    }
}

impl Default for CoreDocumentFinder {
    fn default() -> Self {
        Self::new(WINDOWS_1252)
    }
}

impl DocumentFinderOperations for CoreDocumentFinder {
    fn find_text(&self, document: &Path, term: &str, on_complete: FindCompletion) {
        let term = term.trim().to_string();
        if term.is_empty() {
            on_complete(FindOutcome::NotFound);
            return;
        }
        let document: PathBuf = document.to_path_buf();
        let fallback_encoding = self.fallback_encoding;

        thread::spawn(move || {
            let outcome = match text_decoding::read_document_text(&document, fallback_encoding) {
                Ok(text) if contains_ignore_case(&text, &term) => FindOutcome::Found,
                Ok(_) => FindOutcome::NotFound,
                Err(e) => {
                    log::debug!("DocumentFinder: Cannot read {document:?}: {e}");
                    FindOutcome::NotFound
                }
            };
            log::debug!("DocumentFinder: '{term}' in {document:?}: {outcome:?}");
            on_complete(outcome);
        });
    }
}
