use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::core::SearchScope;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Every HTML document under the site directory
    All,
    /// Only the current document
    Current,
}

impl From<ScopeArg> for SearchScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::All => SearchScope::AllDocumentsUnderRoot,
            ScopeArg::Current => SearchScope::CurrentDocument,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Search the HTML documents of a local site", long_about = None)]
pub struct Args {
    /// Text to look for (case-insensitive)
    pub term: String,

    /// Site directory (defaults to the remembered one, else ./book/)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Search scope
    #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
    pub scope: ScopeArg,

    /// Document searched with `--scope current` (defaults to the site's home page)
    #[arg(short = 'D', long)]
    pub document: Option<PathBuf>,

    /// Report matches as they are found on a background worker
    #[arg(long)]
    pub stream: bool,

    /// Open a site directory, or a page whose folder becomes the site, and remember it
    #[arg(short, long, value_name = "PATH")]
    pub open: Option<String>,

    /// Remember the `--root` directory for later runs
    #[arg(long)]
    pub remember: bool,

    /// Write the effective search settings to the config directory
    #[arg(long)]
    pub save_settings: bool,

    /// Read settings and state from this directory instead of the user config dir
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["site_search", "ownership"]);
        assert_eq!(args.term, "ownership");
        assert_eq!(args.scope, ScopeArg::All);
        assert!(args.root.is_none());
        assert!(args.open.is_none());
        assert!(!args.stream);
        assert!(!args.save_settings);
    }

    #[test]
    fn test_open_and_remember_flags() {
        let args = Args::parse_from([
            "site_search",
            "--open",
            "docs/guide.html",
            "--remember",
            "--save-settings",
            "lifetimes",
        ]);
        assert_eq!(args.open.as_deref(), Some("docs/guide.html"));
        assert!(args.remember);
        assert!(args.save_settings);
        assert_eq!(args.term, "lifetimes");
    }

    #[test]
    fn test_current_scope_with_document() {
        let args = Args::parse_from([
            "site_search",
            "--scope",
            "current",
            "-D",
            "/site/page.html",
            "--root",
            "/site",
            "borrow",
        ]);
        assert_eq!(SearchScope::from(args.scope), SearchScope::CurrentDocument);
        assert_eq!(args.document, Some(PathBuf::from("/site/page.html")));
        assert_eq!(args.root, Some(PathBuf::from("/site")));
    }
}
