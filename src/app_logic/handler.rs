use super::site_session::{HomeResolution, OpenPathOutcome, SiteSession};
use crate::core::{
    ConfigManagerOperations, ContentSearchProgress, ContentSearcherOperations, DocumentRef,
    DocumentFinderOperations, FindOutcome, SearchOutcome, SearchScope, SearchWorkerHandle,
    spawn_site_search,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

pub const APP_NAME: &str = "SiteSearchApp";

/*
 * One line of the shell's result list: what to show and what to load when the
 * line is activated.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultListItem {
    pub display_text: String,
    pub path: PathBuf,
}

impl From<&DocumentRef> for ResultListItem {
    fn from(document: &DocumentRef) -> Self {
        ResultListItem {
            display_text: format!(
                "{} — {}",
                document.file_name(),
                document.absolute_path().display()
            ),
            path: document.absolute_path().to_path_buf(),
        }
    }
}

/*
 * Instructions for the rendering/UI shell. The logic never touches widgets; it
 * only tells the shell what to show or load.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    ClearResults,
    AppendResult(ResultListItem),
    ShowStatus(String),
    LoadDocument(PathBuf),
    ShowMessage { title: String, text: String },
}

struct ActiveSiteSearch {
    term: String,
    handle: SearchWorkerHandle,
    receiver: Receiver<ContentSearchProgress>,
    any_match: bool,
}

/*
 * Presenter for the site viewer. It owns the `SiteSession`, turns user actions
 * (search, open path, home, result activation) into `ShellCommand`s, and
 * collects the results of background work when the shell polls.
 */
pub struct SiteSearchLogic {
    pub(crate) session: SiteSession,
    pub(crate) current_document: Option<PathBuf>,
    content_searcher: Arc<dyn ContentSearcherOperations>,
    document_finder: Arc<dyn DocumentFinderOperations>,
    config_manager: Arc<dyn ConfigManagerOperations>,
    progress_batch_size: usize,
    find_sender: Sender<(String, FindOutcome)>,
    find_receiver: Receiver<(String, FindOutcome)>,
    pending_finds: usize,
    active_search: Option<ActiveSiteSearch>,
    /* Cancelled workers not yet joined; reaped by `poll_background`. */
    pub(super) retired_searches: Vec<SearchWorkerHandle>,
}

impl SiteSearchLogic {
    pub fn new(
        session: SiteSession,
        content_searcher: Arc<dyn ContentSearcherOperations>,
        document_finder: Arc<dyn DocumentFinderOperations>,
        config_manager: Arc<dyn ConfigManagerOperations>,
        progress_batch_size: usize,
    ) -> Self {
        let (find_sender, find_receiver) = mpsc::channel();
        SiteSearchLogic {
            session,
            current_document: None,
            content_searcher,
            document_finder,
            config_manager,
            progress_batch_size,
            find_sender,
            find_receiver,
            pending_finds: 0,
            active_search: None,
            retired_searches: Vec::new(),
        }
    }

    pub fn session(&self) -> &SiteSession {
        &self.session
    }

    pub fn current_document(&self) -> Option<&Path> {
        self.current_document.as_deref()
    }

    pub fn has_pending_work(&self) -> bool {
        self.pending_finds > 0 || self.active_search.is_some()
    }

    pub fn status_for_site_dir(site_dir: &Path) -> String {
        format!("Site directory: {}", site_dir.display())
    }

    fn load_document(&mut self, path: PathBuf) -> Vec<ShellCommand> {
        let status = format!("Loaded: {}", path.display());
        self.current_document = Some(path.clone());
        vec![ShellCommand::LoadDocument(path), ShellCommand::ShowStatus(status)]
    }

    fn change_site_dir(&mut self, site_dir: PathBuf) -> Vec<ShellCommand> {
        self.session.set_site_dir(site_dir);
        if let Err(e) = self
            .config_manager
            .save_last_site_dir(APP_NAME, Some(self.session.site_dir()))
        {
            log::warn!("SiteSearchLogic: Failed to remember site directory: {e}");
        }
        vec![ShellCommand::ShowStatus(Self::status_for_site_dir(
            self.session.site_dir(),
        ))]
    }

    /*
     * Runs a search and returns the commands to display it. Directory scope runs
     * synchronously; current-document scope starts a find whose status arrives
     * through `poll_background`. A blank term does nothing at all.
     */
    pub fn on_search(&mut self, term: &str, scope: SearchScope) -> Vec<ShellCommand> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        let mut commands = vec![ShellCommand::ClearResults];

        match scope {
            SearchScope::CurrentDocument => {
                commands.extend(self.start_find_in_page(term));
            }
            SearchScope::AllDocumentsUnderRoot => {
                let request = self.session.search_request(term, scope);
                let outcome = self.content_searcher.search(&request);
                if !matches!(outcome, SearchOutcome::Documents(_)) {
                    log::error!("SiteSearchLogic: Unexpected outcome {outcome:?} for directory search.");
                }
                let documents = outcome.into_documents();
                let any_match = !documents.is_empty();
                commands.extend(
                    documents
                        .iter()
                        .map(|d| ShellCommand::AppendResult(ResultListItem::from(d))),
                );
                commands.push(ShellCommand::ShowStatus(site_search_status(term, any_match)));
            }
        }
        commands
    }

    fn start_find_in_page(&mut self, term: &str) -> Vec<ShellCommand> {
        let Some(document) = self.current_document.clone() else {
            return vec![ShellCommand::ShowStatus(no_page_match_status(term))];
        };
        let sender = self.find_sender.clone();
        let owned_term = term.to_string();
        self.pending_finds += 1;
        self.document_finder.find_text(
            &document,
            term,
            Box::new(move |outcome| {
                let _ = sender.send((owned_term, outcome));
            }),
        );
        Vec::new()
    }

    /*
     * Starts a directory-wide search on a worker thread. Any search already
     * running is cancelled first; its late progress is discarded.
     */
    pub fn on_search_in_background(&mut self, term: &str) -> Vec<ShellCommand> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        self.cancel_background_search();

        let (sender, receiver) = mpsc::channel();
        let request = self
            .session
            .search_request(term, SearchScope::AllDocumentsUnderRoot);
        let handle = spawn_site_search(
            request,
            Arc::clone(&self.content_searcher),
            self.progress_batch_size,
            sender,
        );
        self.active_search = Some(ActiveSiteSearch {
            term: term.to_string(),
            handle,
            receiver,
            any_match: false,
        });
        vec![
            ShellCommand::ClearResults,
            ShellCommand::ShowStatus(format!("Searching for '{term}'...")),
        ]
    }

    /*
     * Stops the running search. Its late progress is dropped with the receiver;
     * the worker thread is joined by a later `poll_background` once it returns.
     */
    pub fn cancel_background_search(&mut self) {
        if let Some(active) = self.active_search.take() {
            log::debug!("SiteSearchLogic: Cancelling search for '{}'.", active.term);
            active.handle.cancel();
            self.retired_searches.push(active.handle);
        }
    }

    fn reap_retired_searches(&mut self) {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.retired_searches)
            .into_iter()
            .partition(SearchWorkerHandle::is_finished);
        self.retired_searches = running;
        for handle in finished {
            if !handle.join() {
                log::error!("SiteSearchLogic: Cancelled search worker panicked.");
            }
        }
    }

    /*
     * Drains finished finds and search progress without blocking.
     */
    pub fn poll_background(&mut self) -> Vec<ShellCommand> {
        let mut commands = Vec::new();
        self.reap_retired_searches();

        while let Ok((term, outcome)) = self.find_receiver.try_recv() {
            self.pending_finds = self.pending_finds.saturating_sub(1);
            let status = match outcome {
                FindOutcome::Found => format!("Found on page: {term}"),
                FindOutcome::NotFound => no_page_match_status(&term),
            };
            commands.push(ShellCommand::ShowStatus(status));
        }

        let mut finished = false;
        if let Some(active) = self.active_search.as_mut() {
            while let Ok(progress) = active.receiver.try_recv() {
                for document in progress.matching_documents() {
                    active.any_match = true;
                    commands.push(ShellCommand::AppendResult(ResultListItem::from(document)));
                }
                if progress.is_final {
                    let status = if progress.was_cancelled {
                        format!("Search for '{}' cancelled", active.term)
                    } else {
                        site_search_status(&active.term, active.any_match)
                    };
                    commands.push(ShellCommand::ShowStatus(status));
                    finished = true;
                    break;
                }
            }
        }
        if finished {
            if let Some(active) = self.active_search.take() {
                if !active.handle.join() {
                    log::error!("SiteSearchLogic: Search worker for '{}' panicked.", active.term);
                }
            }
        }
        commands
    }

    /*
     * Polls until no background work is pending or `timeout` elapses.
     */
    pub fn wait_for_background(&mut self, timeout: Duration) -> Vec<ShellCommand> {
        let deadline = Instant::now() + timeout;
        let mut commands = self.poll_background();
        while self.has_pending_work() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            commands.extend(self.poll_background());
        }
        commands
    }

    pub fn on_result_activated(&mut self, item: &ResultListItem) -> Vec<ShellCommand> {
        if item.path.as_os_str().is_empty() {
            return Vec::new();
        }
        self.load_document(item.path.clone())
    }

    pub fn on_home(&mut self) -> Vec<ShellCommand> {
        match self.session.resolve_home() {
            HomeResolution::Found(path) => self.load_document(path),
            HomeResolution::NotFound => vec![ShellCommand::ShowMessage {
                title: "Home not found".to_string(),
                text: format!(
                    "No index.html, index.htm, or other HTML files found in {}",
                    self.session.site_dir().display()
                ),
            }],
        }
    }

    pub fn on_open_path(&mut self, text: &str) -> Vec<ShellCommand> {
        match self.session.open_path(text) {
            OpenPathOutcome::Ignored => Vec::new(),
            OpenPathOutcome::Directory(dir) => self.change_site_dir(dir),
            OpenPathOutcome::File(file) => {
                let parent = self.session.site_dir().to_path_buf();
                let mut commands = self.change_site_dir(parent);
                commands.extend(self.load_document(file));
                commands
            }
            OpenPathOutcome::Invalid => vec![ShellCommand::ShowMessage {
                title: "Invalid path".to_string(),
                text: "The path is not a file or directory.".to_string(),
            }],
        }
    }

    /*
     * A directory picked from a dialog: it becomes the site and its index page,
     * if any, is loaded.
     */
    pub fn on_open_directory(&mut self, dir: &Path) -> Vec<ShellCommand> {
        let mut commands = self.change_site_dir(dir.to_path_buf());
        match self.session.resolve_index() {
            Some(index) => commands.extend(self.load_document(index)),
            None => commands.push(ShellCommand::ShowMessage {
                title: "No index file".to_string(),
                text: format!("No index.html or index.htm found in {}", dir.display()),
            }),
        }
        commands
    }
}

fn site_search_status(term: &str, any_match: bool) -> String {
    if any_match {
        "Search complete".to_string()
    } else {
        format!("No matches for '{term}' in site directory")
    }
}

fn no_page_match_status(term: &str) -> String {
    format!("No matches for '{term}' on current page")
}
