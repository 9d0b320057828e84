// src/main.rs

mod app_logic;
mod args;
mod core;

use crate::app_logic::{APP_NAME, ResultListItem, ShellCommand, SiteSearchLogic, SiteSession};
use crate::args::Args;
use crate::core::{
    ConfigError, ConfigManagerOperations, CoreConfigManager, CoreContentSearcher,
    CoreDocumentFinder, DocumentRef, SearchScope, path_utils, text_decoding, validate_root,
};
use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const FIND_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/*
 * Sets up logging to the terminal (stderr) and, when a config directory is
 * available, to a log file there. Failing to open the log file only loses the
 * file logger.
 */
fn initialize_logging(debug: bool, config_dir: Option<&Path>) {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let term_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    let log_path = match config_dir {
        Some(dir) => fs::create_dir_all(dir).ok().map(|_| dir.join(path_utils::LOG_FILENAME)),
        None => path_utils::get_log_file_path(APP_NAME),
    };
    if let Some(path) = &log_path {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
            Err(e) => eprintln!("Could not create log file {path:?}: {e}"),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logger: {e}");
    }
    log::debug!("Logging initialized, log file: {log_path:?}");
}

fn render(commands: &[ShellCommand]) {
    for command in commands {
        match command {
            ShellCommand::ClearResults => {}
            ShellCommand::AppendResult(item) => println!("{}", item.display_text),
            ShellCommand::ShowStatus(status) => eprintln!("{status}"),
            ShellCommand::LoadDocument(path) => log::debug!("Shell: load {path:?}"),
            ShellCommand::ShowMessage { title, text } => eprintln!("{title}: {text}"),
        }
    }
}

fn resolve_site_dir(
    args: &Args,
    config_manager: &dyn ConfigManagerOperations,
    working_dir: &Path,
) -> PathBuf {
    if let Some(root) = &args.root {
        return std::path::absolute(root).unwrap_or_else(|_| root.clone());
    }
    match config_manager.load_last_site_dir(APP_NAME) {
        Ok(Some(dir)) => dir,
        Ok(None) => SiteSession::default_for(working_dir).site_dir().to_path_buf(),
        Err(e) => {
            log::warn!("Could not load last site directory: {e}");
            SiteSession::default_for(working_dir).site_dir().to_path_buf()
        }
    }
}

fn run(args: Args) -> Result<(), ConfigError> {
    let config_manager: Arc<dyn ConfigManagerOperations> = match &args.config_dir {
        Some(dir) => Arc::new(CoreConfigManager::with_config_dir(dir.clone())),
        None => Arc::new(CoreConfigManager::new()),
    };
    let settings = config_manager.load_search_settings(APP_NAME)?;
    let working_dir = std::env::current_dir()?;
    let site_dir = resolve_site_dir(&args, config_manager.as_ref(), &working_dir);
    if args.save_settings {
        config_manager.save_search_settings(APP_NAME, &settings)?;
    }

    let fallback_encoding = text_decoding::resolve_encoding(&settings.fallback_encoding);
    let mut logic = SiteSearchLogic::new(
        SiteSession::new(site_dir),
        Arc::new(CoreContentSearcher::from_settings(&settings)),
        Arc::new(CoreDocumentFinder::new(fallback_encoding)),
        Arc::clone(&config_manager),
        settings.progress_batch_size,
    );

    /* `--root --remember` picks the directory the way the open-directory dialog does. */
    let mut opened = if args.root.is_some() && args.remember {
        let root = logic.session().site_dir().to_path_buf();
        logic.on_open_directory(&root)
    } else {
        vec![ShellCommand::ShowStatus(SiteSearchLogic::status_for_site_dir(
            logic.session().site_dir(),
        ))]
    };
    if let Some(path) = &args.open {
        opened.extend(logic.on_open_path(path));
    }
    render(&opened);

    if let Err(e) = validate_root(logic.session().site_dir()) {
        log::info!("Site directory problem: {e}");
    }

    match SearchScope::from(args.scope) {
        SearchScope::CurrentDocument => {
            let loaded = match &args.document {
                Some(document) => {
                    let absolute =
                        std::path::absolute(document).unwrap_or_else(|_| document.clone());
                    logic.on_result_activated(&ResultListItem::from(&DocumentRef::from_path(
                        &absolute,
                    )))
                }
                None if logic.current_document().is_some() => Vec::new(),
                None => logic.on_home(),
            };
            render(&loaded);
            render(&logic.on_search(&args.term, SearchScope::CurrentDocument));
            render(&logic.wait_for_background(FIND_TIMEOUT));
        }
        SearchScope::AllDocumentsUnderRoot if args.stream => {
            render(&logic.on_search_in_background(&args.term));
            while logic.has_pending_work() {
                std::thread::sleep(POLL_INTERVAL);
                render(&logic.poll_background());
            }
        }
        SearchScope::AllDocumentsUnderRoot => {
            render(&logic.on_search(&args.term, SearchScope::AllDocumentsUnderRoot));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    initialize_logging(args.debug, args.config_dir.as_deref());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("site_search failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
