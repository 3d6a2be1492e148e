//! Application startup
//!
//! Staged startup for the headless batch scanner: parse arguments, bring up
//! logging, layer configuration, load the target files into a buffer store,
//! then run one batched scan with signal-wired cancellation and render the
//! report.

use crate::app::cli::{Args, OutputFormat};
use crate::app::display;
use crate::buffer::{BufferId, BufferStore};
use crate::checker::config::CheckerConfig;
use crate::checker::problem::Problem;
use crate::checker::runner::{MypyRunner, ProcessRunner};
use crate::common::logging::init_logging;
use crate::core::cancel::{cancel_on_signals, CancellationToken};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::version::version_string;
use crate::notifications::notifier::ChannelNotifier;
use crate::scan::facade::{CheckerContext, InspectionService};
use clap::Parser;
use colored::Colorize;
use std::collections::HashMap;
use std::fmt;
use std::process::ExitCode;
use std::sync::Arc;

/// Fatal startup failure, before any scan has run
#[derive(Debug)]
pub enum StartupError {
    Config { message: String },
    FileLoad { message: String },
    Runtime { message: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Config { message } => write!(f, "Configuration error: {}", message),
            StartupError::FileLoad { message } => write!(f, "Cannot load file: {}", message),
            StartupError::Runtime { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for StartupError {}

impl ContextualError for StartupError {
    fn is_user_actionable(&self) -> bool {
        match self {
            // The user can fix a bad config value or a missing input file
            StartupError::Config { .. } | StartupError::FileLoad { .. } => true,
            StartupError::Runtime { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            StartupError::Config { message } | StartupError::FileLoad { message } => Some(message),
            StartupError::Runtime { .. } => None,
        }
    }
}

/// Entry point for the `mypy-bridge` binary.
pub fn startup() -> ExitCode {
    let args = Args::parse();
    let use_color = !args.no_color;
    if !use_color {
        colored::control::set_override(false);
    }

    if let Err(err) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .as_deref(),
        use_color,
    ) {
        eprintln!("failed to initialise logging: {}", err);
        return ExitCode::from(2);
    }
    log::debug!("{} starting", version_string());

    match run(args, use_color) {
        Ok(code) => code,
        Err(err) => {
            log_error_with_context(&err, "mypy-bridge startup");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args, use_color: bool) -> Result<ExitCode, StartupError> {
    let mut config =
        CheckerConfig::load(args.config_file.as_deref()).map_err(|err| StartupError::Config {
            message: err.to_string(),
        })?;
    if let Some(mypy) = args.mypy {
        config.executable = mypy;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    let store = Arc::new(BufferStore::new());
    let mut buffers = Vec::new();
    for file in &args.files {
        let id = store
            .open_from_disk(file)
            .map_err(|err| StartupError::FileLoad {
                message: format!("{}: {}", file.display(), err),
            })?;
        buffers.push(id);
    }

    let runner = Arc::new(MypyRunner::new(config.clone()));
    if !runner.is_available() {
        // The façade would skip silently; a batch run should fail loudly
        return Err(StartupError::Config {
            message: format!(
                "mypy executable `{}` could not be resolved",
                config.executable.display()
            ),
        });
    }

    let runtime = tokio::runtime::Runtime::new().map_err(|err| StartupError::Runtime {
        message: err.to_string(),
    })?;

    let (results, cancelled) = runtime.block_on(scan_once(config, runner, store.clone(), &buffers));
    if cancelled {
        log::info!("scan cancelled");
        return Ok(ExitCode::from(130));
    }

    match args.format {
        OutputFormat::Text => print!("{}", display::render_text(&store, &results, use_color)),
        OutputFormat::Json => println!("{}", display::render_json(&store, &results)),
    }

    if display::has_hard_errors(&results) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn scan_once(
    config: CheckerConfig,
    runner: Arc<MypyRunner>,
    store: Arc<BufferStore>,
    buffers: &[BufferId],
) -> (HashMap<BufferId, Vec<Problem>>, bool) {
    let cancel = CancellationToken::new();
    cancel_on_signals(&cancel);

    let (notifier, mut notifications) = ChannelNotifier::channel();
    let ctx = CheckerContext::new(config, runner, store, notifier);
    let service = InspectionService::new(ctx);

    let results = service.scan(buffers, &cancel).await;

    // Surface anything the pipeline wanted the user to see
    while let Ok(event) = notifications.try_recv() {
        let tag = "warning".yellow();
        eprintln!("{}: {}", tag, event.message);
    }

    (results, cancel.is_cancelled())
}
