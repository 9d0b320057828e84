/*
 * Runs a site-wide content search on a background thread so a UI thread is never
 * blocked by a large tree. Progress flows back over an `mpsc` channel as
 * `ContentSearchProgress` batches; exactly one batch per request carries
 * `is_final == true`, including when the search is cancelled or has nothing to do.
 *
 * Every worker owns its accumulator. The only state shared with the caller is
 * the cancel flag inside `SearchWorkerHandle`.
 */
use crate::core::content_search::ContentSearcherOperations;
use crate::core::content_search_progress::{ContentSearchProgress, ContentSearchResult};
use crate::core::document::{SearchRequest, SearchScope};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

pub struct SearchWorkerHandle {
    cancel_flag: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl SearchWorkerHandle {
    /*
     * Asks the worker to stop. It finishes the file it is reading, then sends
     * its final message with `was_cancelled` set.
     */
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /*
     * True once the worker thread has returned, so `join` will not block.
     */
    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /*
     * Waits for the worker thread. Returns false if the thread panicked.
     */
    pub fn join(mut self) -> bool {
        match self.join_handle.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}

pub fn spawn_site_search(
    request: SearchRequest,
    searcher: Arc<dyn ContentSearcherOperations>,
    batch_size: usize,
    sender: Sender<ContentSearchProgress>,
) -> SearchWorkerHandle {
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let worker_flag = Arc::clone(&cancel_flag);
    let batch_size = batch_size.max(1);

    let join_handle = thread::spawn(move || {
        run_site_search(&request, searcher.as_ref(), batch_size, &worker_flag, &sender);
    });

    SearchWorkerHandle {
        cancel_flag,
        join_handle: Some(join_handle),
    }
}

fn run_site_search(
    request: &SearchRequest,
    searcher: &dyn ContentSearcherOperations,
    batch_size: usize,
    cancel_flag: &AtomicBool,
    sender: &Sender<ContentSearchProgress>,
) {
    let term = match (request.effective_term(), request.scope) {
        (Some(term), SearchScope::AllDocumentsUnderRoot) => term,
        _ => {
            log::debug!("SearchWorker: Request has nothing to search, sending final message.");
            let _ = sender.send(ContentSearchProgress {
                is_final: true,
                ..ContentSearchProgress::default()
            });
            return;
        }
    };

    let documents = searcher.enumerate_documents(&request.root_directory);
    log::debug!(
        "SearchWorker: Checking {} documents for '{term}'.",
        documents.len()
    );

    let mut batch = Vec::with_capacity(batch_size);
    let mut was_cancelled = false;
    for document in documents {
        if cancel_flag.load(Ordering::SeqCst) {
            was_cancelled = true;
            break;
        }
        let matches = searcher.document_contains(&document, term);
        batch.push(ContentSearchResult { document, matches });

        if batch.len() >= batch_size {
            let progress = ContentSearchProgress {
                is_final: false,
                was_cancelled: false,
                results: std::mem::replace(&mut batch, Vec::with_capacity(batch_size)),
            };
            if sender.send(progress).is_err() {
                log::debug!("SearchWorker: Receiver dropped, stopping search.");
                return;
            }
        }
    }

    if was_cancelled {
        log::info!("SearchWorker: Search for '{term}' cancelled.");
    }
    let _ = sender.send(ContentSearchProgress {
        is_final: true,
        was_cancelled,
        results: batch,
    });
}
