//! CLI entrypoint for Demeter
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use demeter_application::{
    HandleQueryUseCase, KeyValueStore, LanguageDetector, MemoryStore, NoProgress,
    ProgressNotifier, TranslationBackend, Translator,
};
use demeter_domain::{Context, IntentClassifier};
use demeter_infrastructure::{
    BackendLanguageDetector, ConfigLoader, DetectionMethod, FileConfig, JsonFileStore,
    JsonlConversationLogger, OfflineBackend, ScriptLanguageDetector, TranslationBackendKind,
    default_registry,
};
use demeter_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, parse_context,
    read_context_file,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        let listed: Vec<String> = issues.iter().map(|e| format!("  - {}", e)).collect();
        bail!("Invalid configuration:\n{}", listed.join("\n"));
    }

    let _log_guard = init_tracing(cli.verbose, config.logging.directory.as_deref());
    if !config.output.color_enabled() {
        colored::control::set_override(false);
    }

    info!("Starting Demeter");

    let use_case = Arc::new(build_use_case(&config));

    if cli.clear_cache {
        use_case.clear_cache();
        info!("Caches cleared");
        if cli.query.is_none() && !cli.chat {
            println!("Caches cleared.");
            return Ok(());
        }
    }

    let context = match (&cli.context, &cli.context_file) {
        (Some(raw), _) => parse_context(raw)?,
        (None, Some(path)) => read_context_file(path)?,
        (None, None) => Context::new(),
    };
    let format = config.output.resolve_format(cli.output);

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case)
            .with_context(context)
            .with_format(format)
            .with_progress(!cli.quiet);
        repl.run().await?;
        return Ok(());
    }

    // Single query mode - query is required
    let Some(query) = cli.query else {
        bail!("A query is required. Use --chat for interactive mode.");
    };

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };
    let response = use_case
        .handle_query_with_progress(&query, context, progress.as_ref())
        .await;

    println!("{}", ConsoleFormatter::render(&query, &response, format));

    Ok(())
}

/// Install the stderr subscriber, plus a daily rolling file when configured.
///
/// The returned guard must live until exit so buffered lines are flushed.
fn init_tracing(verbose: u8, directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "demeter.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

// === Dependency Injection ===

fn build_use_case(config: &FileConfig) -> HandleQueryUseCase {
    let pipeline = config.pipeline.to_pipeline_config();
    let backend = translation_backend(config);

    let translation_cache_path = config
        .translation
        .cache_path
        .clone()
        .unwrap_or_else(ConfigLoader::default_translation_cache_path);
    let translation_cache: Arc<dyn KeyValueStore> =
        match JsonFileStore::open(&translation_cache_path) {
            Ok(store) => Arc::new(store.with_max_entries(config.translation.cache_max_entries)),
            Err(e) => {
                warn!("Translation cache unavailable, keeping it in memory: {}", e);
                Arc::new(MemoryStore::new())
            }
        };
    let translator = Translator::new(backend.clone(), translation_cache)
        .with_working_language(pipeline.working_language.clone())
        .with_timeout(pipeline.translation_timeout);

    let detector: Arc<dyn LanguageDetector> = match config.detection.method {
        DetectionMethod::Script => Arc::new(ScriptLanguageDetector::new()),
        DetectionMethod::Backend => Arc::new(
            BackendLanguageDetector::new(backend).with_timeout(pipeline.translation_timeout),
        ),
    };

    let classifier = IntentClassifier::new();
    if let Some(e) = classifier.training_error() {
        warn!("Intent model unavailable, using keyword scoring: {}", e);
    }

    let mut use_case = HandleQueryUseCase::new(
        Arc::new(classifier),
        detector,
        Arc::new(translator),
        Arc::new(default_registry()),
    )
    .with_config(pipeline);

    let query_cache_path = config
        .cache
        .path
        .clone()
        .unwrap_or_else(ConfigLoader::default_query_cache_path);
    match JsonFileStore::open(&query_cache_path) {
        Ok(store) => use_case = use_case.with_query_cache(Arc::new(store)),
        Err(e) => warn!("Query cache unavailable: {}", e),
    }

    if let Some(path) = &config.logging.transcript
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    use_case
}

fn translation_backend(config: &FileConfig) -> Arc<dyn TranslationBackend> {
    match config.translation.backend {
        TranslationBackendKind::None => Arc::new(OfflineBackend),
        TranslationBackendKind::LibreTranslate => libretranslate(config),
    }
}

#[cfg(feature = "remote-translation")]
fn libretranslate(config: &FileConfig) -> Arc<dyn TranslationBackend> {
    let url = config.translation.url.clone().unwrap_or_default();
    match demeter_infrastructure::LibreTranslateBackend::new(url) {
        Ok(backend) => Arc::new(backend.with_api_key(config.translation.api_key.clone())),
        Err(e) => {
            warn!("LibreTranslate backend unavailable, translating nothing: {}", e);
            Arc::new(OfflineBackend)
        }
    }
}

#[cfg(not(feature = "remote-translation"))]
fn libretranslate(_config: &FileConfig) -> Arc<dyn TranslationBackend> {
    warn!("Built without the remote-translation feature, translating nothing");
    Arc::new(OfflineBackend)
}
