/*
 * This module provides utility functions for locating the application's local
 * configuration directory, where search settings, the remembered site directory
 * and the log file are kept.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub const LOG_FILENAME: &str = "site_search.log";

/*
 * Retrieves the application's local configuration directory, creating it if needed.
 * The path is derived without an organization qualifier (e.g. AppData/Local/<app>
 * on Windows, ~/.config/<app> on Linux).
 *
 * Returns `None` if no suitable location exists or the directory cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving base app config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {config_path:?}: {e}"
                );
                return None;
            }
            log::debug!("PathUtils: Created base app config directory: {config_path:?}");
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Path of the log file inside the app config directory, if that directory is available.
 */
pub fn get_log_file_path(app_name: &str) -> Option<PathBuf> {
    get_base_app_config_local_dir(app_name).map(|dir| dir.join(LOG_FILENAME))
}
