//! SegFinder - two-stage market segment research
//!
//! CLI entry point for serving the stage endpoints and running research.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use segfinder::cli::{Cli, Command, OutputFormat, config_path_hint, generate_after_help, get_log_path};
use segfinder::config::Config;
use segfinder::llm::create_client;
use segfinder::orchestrator::{Orchestrator, ProgressUpdate};
use segfinder::prompts::PromptLoader;
use segfinder::research::{HttpSegmentService, LocalSegmentService, SegmentService};
use segfinder::server::{self, AppState};
use segfinder::session::{ResearchSession, SessionState};

/// Where log lines go
enum LogTarget {
    Stderr,
    File,
}

fn parse_level(s: &str) -> tracing::Level {
    match s.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>, target: LogTarget) -> Result<()> {
    // Priority: CLI --log-level > config file > INFO
    let level = cli_log_level
        .or(config_log_level)
        .map(parse_level)
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogTarget::File => {
            let log_path = get_log_path();
            if let Some(log_dir) = log_path.parent() {
                fs::create_dir_all(log_dir).context("Failed to create log directory")?;
            }
            let log_file = fs::File::create(&log_path).context("Failed to create log file")?;
            tracing_subscriber::fmt()
                .with_writer(log_file)
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
    }

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credential status in --help follows the config the command would load
    let args: Vec<String> = std::env::args().collect();
    let help_config = Config::load(config_path_hint(&args).as_ref()).unwrap_or_default();
    let cmd = Cli::command().after_help(generate_after_help(&help_config.llm.api_key_env));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    let target = match cli.command {
        Command::Serve { .. } => LogTarget::Stderr,
        _ => LogTarget::File,
    };
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref(), target)
        .context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("SegFinder loaded config: model={}", config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve { host, port } => cmd_serve(&config, host, port).await,
        Command::Research {
            industry,
            endpoint,
            format,
        } => cmd_research(&config, &industry, endpoint.as_deref(), format).await,
        Command::Generate { industry } => cmd_generate(&config, &industry).await,
        Command::Enhance {
            industry,
            segments_file,
        } => cmd_enhance(&config, &industry, segments_file).await,
    }
}

/// Build the in-process stages; fails fast when the credential is missing
fn local_service(config: &Config) -> Result<LocalSegmentService> {
    let resolved = config.llm.resolve()?;
    let llm = create_client(&resolved)?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let prompts = Arc::new(PromptLoader::new(cwd));
    Ok(LocalSegmentService::new(llm, prompts, &config.research))
}

/// Serve the stage endpoints
async fn cmd_serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    debug!(?host, ?port, "cmd_serve: called");
    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let service: Arc<dyn SegmentService> = Arc::new(local_service(config)?);
    server::run(AppState::new(service), &server_config.addr()).await
}

/// Run both stages and print the best available result
async fn cmd_research(config: &Config, industry: &str, endpoint: Option<&str>, format: OutputFormat) -> Result<()> {
    debug!(%industry, ?endpoint, ?format, "cmd_research: called");
    let service: Arc<dyn SegmentService> = match endpoint {
        Some(url) => Arc::new(HttpSegmentService::new(url)?),
        None => Arc::new(local_service(config)?),
    };

    let (progress_tx, mut progress_rx) = mpsc::channel::<ProgressUpdate>(16);
    let printer = tokio::spawn(async move {
        while let Some(update) = progress_rx.recv().await {
            if !update.label.is_empty() {
                eprintln!("{}", update.label.dimmed());
            }
        }
    });

    let orchestrator = Orchestrator::new(service).with_progress(progress_tx);
    let mut session = ResearchSession::new();
    let state = orchestrator.run(&mut session, industry).await?;
    drop(orchestrator);
    let _ = printer.await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        OutputFormat::Text => {
            if let Some(message) = session.error() {
                let styled = if state == SessionState::Errored {
                    message.red()
                } else {
                    message.yellow()
                };
                eprintln!("{}", styled);
            }
            if let Some(text) = session.display_text() {
                println!("{}", "Market Research".bold());
                println!();
                println!("{}", text);
            }
        }
    }

    if state == SessionState::Errored {
        return Err(eyre::eyre!(
            "Research failed: {}",
            session.failure_detail().unwrap_or("unknown error")
        ));
    }
    Ok(())
}

/// Run stage 1 only
async fn cmd_generate(config: &Config, industry: &str) -> Result<()> {
    debug!(%industry, "cmd_generate: called");
    let service = local_service(config)?;
    let segments = service.generator().generate(industry).await?;
    println!("{}", segments);
    Ok(())
}

/// Run stage 2 only
async fn cmd_enhance(config: &Config, industry: &str, segments_file: Option<PathBuf>) -> Result<()> {
    debug!(%industry, ?segments_file, "cmd_enhance: called");
    let segments = match segments_file {
        Some(path) => {
            fs::read_to_string(&path).context(format!("Failed to read segments from {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read segments from stdin")?;
            buf
        }
    };

    let service = local_service(config)?;
    let enhanced = service.enhancer().enhance(industry, &segments).await?;
    println!("{}", enhanced);
    Ok(())
}
