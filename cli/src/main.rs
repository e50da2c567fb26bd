//! CLI entrypoint for matchmaker
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use matchmaker_application::{
    BatchSummary, ConversationLogger, NoConversationLogger, NoProgress, ProgressNotifier,
    RunBatchUseCase, RunMatchInput, RunMatchUseCase,
};
use matchmaker_domain::MatchReport;
use matchmaker_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiClient, OpenAiEmbedder,
    OpenAiReviewer, OpenAiTurnGenerator, ReportWriter, load_pairs, load_persona,
};
use matchmaker_presentation::{
    BatchProgress, Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code when at least one pair was truncated or failed
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting matchmaker");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&cli, &mut config);
    config.validate().context("Invalid configuration")?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli
        .output_format()
        .or(config.output.format)
        .unwrap_or_default();

    // === Inputs ===
    let batch_mode = cli.pairs.is_some();
    let pairs = if let Some(path) = &cli.pairs {
        load_pairs(path)?
    } else if let Some((p1, p2)) = cli.persona_paths() {
        vec![RunMatchInput::new(load_persona(p1)?, load_persona(p2)?)]
    } else {
        bail!("Two persona files or --pairs <FILE> are required");
    };

    // === Dependency Injection ===
    let provider = &config.provider;
    if provider.api_key().is_none() {
        warn!(
            "{} is not set; sending unauthenticated requests to {}",
            provider.api_key_env, provider.base_url
        );
    }
    let client = Arc::new(OpenAiClient::from_config(provider)?);
    let generator = Arc::new(OpenAiTurnGenerator::new(client.clone(), provider));
    let reviewer = Arc::new(OpenAiReviewer::new(client.clone(), provider));
    let embedder = Arc::new(OpenAiEmbedder::new(client, provider));
    let logger = conversation_logger(cli.log_conversation.as_deref());

    let matcher = Arc::new(RunMatchUseCase::new(
        generator,
        embedder,
        reviewer,
        logger,
        config.to_match_config(),
    ));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; stopping after the current turn");
                cancel.cancel();
            }
        });
    }

    let writer = cli
        .save
        .clone()
        .or_else(|| config.output.results_dir.clone())
        .map(ReportWriter::new);
    let formatter = ConsoleFormatter;

    if !batch_mode {
        let input = pairs
            .into_iter()
            .next()
            .context("No persona pair to run")?;
        let progress = single_progress(cli.quiet);
        let report = matcher
            .execute_with_progress(input, progress.as_ref(), &cancel)
            .await?;

        save(writer.as_ref(), &report);
        println!("{}", formatter.format(&report, format));

        return Ok(if report.status.is_truncated() {
            ExitCode::from(EXIT_PARTIAL)
        } else {
            ExitCode::SUCCESS
        });
    }

    let total = pairs.len();
    let batch = RunBatchUseCase::new(matcher);
    let items = if cli.quiet {
        batch.execute_with_progress(pairs, &NoProgress, &cancel).await
    } else {
        let progress = BatchProgress::new(total);
        let items = batch.execute_with_progress(pairs, &progress, &cancel).await;
        progress.finish();
        items
    };

    for item in &items {
        if let Ok(report) = &item.result {
            save(writer.as_ref(), report);
        }
    }
    println!("{}", formatter.format_batch(&items, format));

    let summary = BatchSummary::from_items(&items);
    Ok(if summary.truncated + summary.failed > 0 {
        ExitCode::from(EXIT_PARTIAL)
    } else {
        ExitCode::SUCCESS
    })
}

/// Install the tracing subscriber.
///
/// Verbosity picks the level (warn, info, debug, trace). Logs go to stderr so
/// stdout stays clean for `-o json`; `--log-dir` adds a daily rolling file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "matchmaker.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// CLI flags win over every configuration source
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(max_turns) = cli.max_turns {
        config.conversation.max_turns = max_turns;
    }
    if let Some(grace) = cli.closing_grace {
        config.conversation.closing_grace = grace;
    }
    if let Some(opener) = cli.opener {
        config.conversation.opener = opener;
    }
    if let Some(concurrency) = cli.concurrency {
        config.batch.concurrency = concurrency;
    }
}

fn conversation_logger(path: Option<&Path>) -> Arc<dyn ConversationLogger> {
    match path.and_then(JsonlConversationLogger::new) {
        Some(logger) => {
            info!("Logging conversation events to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

fn single_progress(quiet: bool) -> Box<dyn ProgressNotifier> {
    if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}

/// Persist a report; failures are logged, never fatal
fn save(writer: Option<&ReportWriter>, report: &MatchReport) {
    if let Some(writer) = writer
        && let Err(e) = writer.save(report)
    {
        warn!("Could not save report for {}: {}", report.file_name(), e);
    }
}
