/*
 * This module provides the application logic layer: `SiteSession`, the explicit
 * state of the site being browsed, and `SiteSearchLogic`, the presenter that
 * turns user actions into commands for the rendering shell.
 * Unit tests for `SiteSearchLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod site_session;


pub use handler::{APP_NAME, ResultListItem, ShellCommand, SiteSearchLogic};
pub use site_session::SiteSession;
