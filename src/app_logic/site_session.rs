/*
 * This module defines `SiteSession`, the explicit application state of a site
 * viewer: which directory is the current site and where its index page lives.
 * The search engine receives the site directory from here as a parameter
 * instead of reading any global state.
 *
 * It also knows how to resolve the "Home" document of a site and how to
 * interpret a path typed by the user.
 */
use crate::core::{CoreDocumentEnumerator, SearchRequest, SearchScope};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SITE_SUBFOLDER: &str = "book";
const INDEX_HTML: &str = "index.html";
const INDEX_HTM: &str = "index.htm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeResolution {
    Found(PathBuf),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenPathOutcome {
    /* Blank input; nothing changes. */
    Ignored,
    /* The site directory was switched to this directory. */
    Directory(PathBuf),
    /* The site directory was switched to the parent of this file, which should be loaded. */
    File(PathBuf),
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSession {
    site_dir: PathBuf,
    index_path: PathBuf,
}

impl SiteSession {
    pub fn new(site_dir: PathBuf) -> Self {
        let index_path = site_dir.join(INDEX_HTML);
        log::debug!("SiteSession::new with site dir {site_dir:?}");
        SiteSession {
            site_dir,
            index_path,
        }
    }

    /*
     * The session used when nothing else is known: `<working_dir>/book/`.
     */
    pub fn default_for(working_dir: &Path) -> Self {
        Self::new(working_dir.join(DEFAULT_SITE_SUBFOLDER))
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    #[cfg(test)]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn set_site_dir(&mut self, site_dir: PathBuf) {
        self.index_path = site_dir.join(INDEX_HTML);
        self.site_dir = site_dir;
        log::debug!("SiteSession: Site directory is now {:?}", self.site_dir);
    }

    /*
     * Picks the document "Home" shows: `index.html`, then `index.htm`, then the
     * first HTML document (by name) directly inside the site directory.
     */
    pub fn resolve_home(&self) -> HomeResolution {
        if let Some(index) = self.resolve_index() {
            return HomeResolution::Found(index);
        }

        match first_html_document(&self.site_dir) {
            Some(path) => HomeResolution::Found(path),
            None => HomeResolution::NotFound,
        }
    }

    /*
     * Only looks for an index file (`index.html`, then `index.htm`), as happens
     * right after the user picks a new directory.
     */
    pub fn resolve_index(&self) -> Option<PathBuf> {
        [self.index_path.clone(), self.site_dir.join(INDEX_HTM)]
            .into_iter()
            .find(|candidate| candidate.is_file())
    }

    /*
     * Interprets a user-typed path. Directories become the site directory; files
     * make their parent the site directory and are returned for loading.
     */
    pub fn open_path(&mut self, text: &str) -> OpenPathOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return OpenPathOutcome::Ignored;
        }
        let path = Path::new(trimmed);
        let Ok(absolute) = std::path::absolute(path) else {
            return OpenPathOutcome::Invalid;
        };

        if absolute.is_dir() {
            self.set_site_dir(absolute.clone());
            OpenPathOutcome::Directory(absolute)
        } else if absolute.is_file() {
            let parent = absolute
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.site_dir.clone());
            self.set_site_dir(parent);
            OpenPathOutcome::File(absolute)
        } else {
            log::debug!("SiteSession: {absolute:?} is neither a file nor a directory.");
            OpenPathOutcome::Invalid
        }
    }

    pub fn search_request(&self, term: &str, scope: SearchScope) -> SearchRequest {
        SearchRequest::new(self.site_dir.clone(), term, scope)
    }
}

fn first_html_document(dir: &Path) -> Option<PathBuf> {
    let enumerator = CoreDocumentEnumerator::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("SiteSession: Cannot list {dir:?}: {e}");
            return None;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| enumerator.matches_file_name(name))
        .collect();
    names.sort();
    names.first().map(|name| dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::tempdir;

    #[test]
    fn test_default_session_uses_book_folder() {
        let session = SiteSession::default_for(Path::new("/work"));
        assert_eq!(session.site_dir(), Path::new("/work/book"));
        assert_eq!(session.index_path(), Path::new("/work/book/index.html"));
    }

    #[test]
    fn test_set_site_dir_resets_index_path() {
        let mut session = SiteSession::new(PathBuf::from("/a"));
        session.set_site_dir(PathBuf::from("/b"));
        assert_eq!(session.index_path(), Path::new("/b/index.html"));
    }

    #[test]
    fn test_home_prefers_index_html_then_htm_then_first_page() -> io::Result<()> {
        let dir = tempdir()?;
        let session = SiteSession::new(dir.path().to_path_buf());
        assert_eq!(session.resolve_home(), HomeResolution::NotFound);

        fs::write(dir.path().join("zeta.html"), "")?;
        fs::write(dir.path().join("beta.htm"), "")?;
        fs::write(dir.path().join("notes.txt"), "")?;
        assert_eq!(
            session.resolve_home(),
            HomeResolution::Found(dir.path().join("beta.htm"))
        );

        fs::write(dir.path().join("index.htm"), "")?;
        assert_eq!(
            session.resolve_home(),
            HomeResolution::Found(dir.path().join("index.htm"))
        );

        fs::write(dir.path().join("index.html"), "")?;
        assert_eq!(
            session.resolve_home(),
            HomeResolution::Found(dir.path().join("index.html"))
        );
        Ok(())
    }

    #[test]
    fn test_home_does_not_descend_into_subdirectories() -> io::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("chapter"))?;
        fs::write(dir.path().join("chapter/index.html"), "")?;
        let session = SiteSession::new(dir.path().to_path_buf());

        assert_eq!(session.resolve_home(), HomeResolution::NotFound);
        Ok(())
    }

    #[test]
    fn test_resolve_index_ignores_other_pages() -> io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("about.html"), "")?;
        let session = SiteSession::new(dir.path().to_path_buf());
        assert_eq!(session.resolve_index(), None);

        fs::write(dir.path().join("index.htm"), "")?;
        assert_eq!(session.resolve_index(), Some(dir.path().join("index.htm")));
        Ok(())
    }

    #[test]
    fn test_open_path_classifies_input() -> io::Result<()> {
        let dir = tempdir()?;
        let site = dir.path().join("site");
        fs::create_dir_all(&site)?;
        let page = site.join("page.html");
        fs::write(&page, "")?;
        let mut session = SiteSession::new(PathBuf::from("/elsewhere"));

        assert_eq!(session.open_path("   "), OpenPathOutcome::Ignored);
        assert_eq!(session.site_dir(), Path::new("/elsewhere"));

        assert_eq!(
            session.open_path(&format!("  {}  ", page.display())),
            OpenPathOutcome::File(page.clone())
        );
        assert_eq!(session.site_dir(), site.as_path());

        assert_eq!(
            session.open_path(&dir.path().display().to_string()),
            OpenPathOutcome::Directory(dir.path().to_path_buf())
        );
        assert_eq!(session.site_dir(), dir.path());

        assert_eq!(
            session.open_path(&dir.path().join("missing").display().to_string()),
            OpenPathOutcome::Invalid
        );
        assert_eq!(session.site_dir(), dir.path());
        Ok(())
    }

    #[test]
    fn test_search_request_is_rooted_at_site_dir() {
        let session = SiteSession::new(PathBuf::from("/site"));
        let request = session.search_request("term", SearchScope::AllDocumentsUnderRoot);
        assert_eq!(request.root_directory, PathBuf::from("/site"));
        assert_eq!(request.term, "term");
    }
}
