/*
 * This module consolidates the core, toolkit-independent logic of the site viewer.
 * It re-exports the document model, the site-wide content search and its
 * abstractions (`DocumentEnumeratorOperations`, `ContentSearcherOperations`,
 * `DocumentFinderOperations`, `ConfigManagerOperations`), the background search
 * worker, and configuration utilities.
 */
pub mod config;
pub mod content_search;
pub mod content_search_progress;
pub mod document;
pub mod document_finder;
pub mod file_system;
pub mod path_utils;
pub mod search_worker;
pub mod text_decoding;

// Re-export key structures and enums
pub use document::{DocumentRef, FindOutcome, SearchOutcome, SearchRequest, SearchScope};

// Re-export file system related items
pub use file_system::{CoreDocumentEnumerator, validate_root};

// Re-export search related items
pub use content_search::{ContentSearcherOperations, CoreContentSearcher};
pub use content_search_progress::ContentSearchProgress;
pub use document_finder::{CoreDocumentFinder, DocumentFinderOperations};
pub use search_worker::{SearchWorkerHandle, spawn_site_search};

// Re-export config related items
pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager};
