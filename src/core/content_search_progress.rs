/*
 * Defines the data structures exchanged between the background site-search
 * worker and the application logic. Each `ContentSearchResult` reports whether a
 * specific document matches the active search term, while `ContentSearchProgress`
 * batches those results and tags whether the batch is the final message for the
 * request.
 */
use crate::core::document::DocumentRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSearchResult {
    pub document: DocumentRef,
    pub matches: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ContentSearchProgress {
    pub is_final: bool,
    pub was_cancelled: bool,
    pub results: Vec<ContentSearchResult>,
}

impl ContentSearchProgress {
    pub fn matching_documents(&self) -> impl Iterator<Item = &DocumentRef> {
        self.results
            .iter()
            .filter(|result| result.matches)
            .map(|result| &result.document)
    }
}
