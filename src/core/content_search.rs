/*
 * The site-wide content search. `CoreContentSearcher::search` enumerates the
 * documents under the request's root and keeps, in enumeration order, those
 * whose text contains the term ignoring case. Unreadable files count as
 * non-matching; the search as a whole cannot fail.
 */
use crate::core::config::SearchSettings;
use crate::core::document::{DocumentRef, SearchOutcome, SearchRequest, SearchScope};
use crate::core::file_system::{CoreDocumentEnumerator, DocumentEnumeratorOperations};
use crate::core::text_decoding;
use encoding_rs::{Encoding, WINDOWS_1252};
use std::path::Path;

pub trait ContentSearcherOperations: Send + Sync {
    fn search(&self, request: &SearchRequest) -> SearchOutcome;

    fn enumerate_documents(&self, root_path: &Path) -> Vec<DocumentRef>;

    /*
     * True if the document could be read and its text contains `term`
     * ignoring case. `term` is used as given; callers trim it.
     */
    fn document_contains(&self, document: &DocumentRef, term: &str) -> bool;
}

// Both sides are lowercased with Unicode rules before comparing.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub struct CoreContentSearcher {
    enumerator: Box<dyn DocumentEnumeratorOperations>,
    fallback_encoding: &'static Encoding,
}

impl CoreContentSearcher {
    pub fn new(
        enumerator: Box<dyn DocumentEnumeratorOperations>,
        fallback_encoding: &'static Encoding,
    ) -> Self {
        CoreContentSearcher {
            enumerator,
            fallback_encoding,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(
            Box::new(CoreDocumentEnumerator::from_settings(settings)),
            text_decoding::resolve_encoding(&settings.fallback_encoding),
        )
    }
}

impl Default for CoreContentSearcher {
    fn default() -> Self {
        Self::new(Box::new(CoreDocumentEnumerator::new()), WINDOWS_1252)
    }
}

impl ContentSearcherOperations for CoreContentSearcher {
    fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let Some(term) = request.effective_term() else {
            log::debug!("ContentSearcher: Blank search term, nothing to do.");
            return SearchOutcome::Skipped;
        };
        if request.scope == SearchScope::CurrentDocument {
            return SearchOutcome::CurrentDocumentDelegated;
        }

        let candidates = self.enumerator.enumerate_documents(&request.root_directory);
        let candidate_count = candidates.len();
        let matches: Vec<DocumentRef> = candidates
            .into_iter()
            .filter(|document| self.document_contains(document, term))
            .collect();

        log::info!(
            "ContentSearcher: '{}' matched {} of {} documents under {:?}.",
            term,
            matches.len(),
            candidate_count,
            request.root_directory
        );
        SearchOutcome::Documents(matches)
    }

    fn enumerate_documents(&self, root_path: &Path) -> Vec<DocumentRef> {
        self.enumerator.enumerate_documents(root_path)
    }

    fn document_contains(&self, document: &DocumentRef, term: &str) -> bool {
        match text_decoding::read_document_text(document.absolute_path(), self.fallback_encoding) {
            Ok(text) => contains_ignore_case(&text, term),
            Err(e) => {
                log::debug!(
                    "ContentSearcher: Skipping unreadable {:?}: {e}",
                    document.absolute_path()
                );
                false
            }
        }
    }
}
