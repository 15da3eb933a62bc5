//! CLI entrypoint for synclab
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use synclab_application::{
    AgentCompletion, ConversationLogger, ErrorSink, NoConversationLogger, NoErrorSink,
    NoPersistence, PersistenceWorker, StatePersistence, Workspace,
};
use synclab_domain::ContextState;
use synclab_infrastructure::{
    ConfigLoader, FileConfig, JsonFileStatePersistence, JsonlConversationLogger, JsonlErrorSink,
};
use synclab_presentation::{Cli, Console, SimpleProgress};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // Keep the guard alive so buffered log lines reach the file on exit.
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting synclab");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    for warning in config.validate().context("Invalid configuration")? {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
    let (roster, _) = config.build_roster()?;

    // === Dependency Injection ===
    let completion = build_completion(&config)?;
    if !completion.has_credential() {
        bail!(
            "No API key found. Set the {} environment variable or change provider.api_key_env.",
            config.provider.api_key_env
        );
    }

    let persistence: Arc<dyn StatePersistence> = match config.storage.resolved_state_path() {
        Some(path) => Arc::new(JsonFileStatePersistence::new(path)),
        None => {
            warn!("No data directory available; shared state will not be saved");
            Arc::new(NoPersistence)
        }
    };

    let mut initial_state = if cli.fresh {
        ContextState::default()
    } else {
        match persistence.load().await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!("Could not restore shared state, starting empty: {}", e);
                ContextState::default()
            }
        }
    };
    if let Some(path) = &cli.load {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        initial_state = initial_state.with_artifact(name, content);
    }

    let error_sink = build_error_sink(&config);
    let conversation_logger: Arc<dyn ConversationLogger> =
        match &config.storage.conversation_log_path {
            Some(path) => match JsonlConversationLogger::new(path) {
                Some(logger) => Arc::new(logger),
                None => Arc::new(NoConversationLogger),
            },
            None => Arc::new(NoConversationLogger),
        };

    let workspace = Arc::new(
        Workspace::builder(completion)
            .roster(roster)
            .initial_state(initial_state)
            .params(config.orchestration.to_params())
            .sync_params(config.sync_params())
            .error_sink(error_sink)
            .conversation_logger(conversation_logger)
            .build(),
    );

    // === Background work ===
    let cancel = CancellationToken::new();
    let sync_handle = workspace.sync().spawn(cancel.clone());
    let persistence_worker = PersistenceWorker::new(
        persistence,
        workspace.store(),
        config.sync_params().save_debounce,
    );
    let persistence_handle = persistence_worker.spawn(cancel.clone());

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let mut console = Console::new(workspace.clone());
    if cli.quiet {
        console = console.with_progress(Box::new(SimpleProgress));
    }
    let result = console.run(cancel.clone()).await;

    // Stop background tasks; the persistence worker flushes pending changes.
    cancel.cancel();
    if let Err(e) = sync_handle.await {
        warn!("Sync coordinator task failed: {}", e);
    }
    if let Err(e) = persistence_handle.await {
        warn!("Persistence task failed: {}", e);
    }

    result.context("Console input failed")?;
    Ok(())
}

/// Initialize logging based on verbosity. `RUST_LOG` wins when set.
fn init_logging(
    verbose: u8,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

#[cfg(feature = "openai")]
fn build_completion(config: &FileConfig) -> Result<Arc<dyn AgentCompletion>> {
    let adapter = synclab_infrastructure::OpenAiCompatibleCompletion::from_config(&config.provider)
        .context("Failed to create HTTP client")?;
    info!(model = adapter.model(), base_url = %config.provider.base_url, "Provider ready");
    Ok(Arc::new(adapter))
}

#[cfg(not(feature = "openai"))]
fn build_completion(_config: &FileConfig) -> Result<Arc<dyn AgentCompletion>> {
    bail!("synclab was built without a completion provider; enable the `openai` feature")
}

fn build_error_sink(config: &FileConfig) -> Arc<dyn ErrorSink> {
    let Some(path) = config.storage.resolved_error_log_path() else {
        return Arc::new(NoErrorSink);
    };
    match JsonlErrorSink::open(&path, config.storage.error_log_capacity) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            warn!("Could not open error log {}: {}", path.display(), e);
            Arc::new(NoErrorSink)
        }
    }
}
