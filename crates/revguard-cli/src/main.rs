//! Revguard CLI
//!
//! The `revguard` command previews recovery decisions for a failed AI review.
//!
//! ## Commands
//!
//! - `classify`: Map an upstream error to its failure kind
//! - `delay`: Show the backoff delay for an attempt
//! - `decide`: Run the full decision for an error, optionally over local files
//! - `bypass`: Produce an emergency-bypass review result

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

use revguard_core::{
    classify, delay_ms, FailureKind, FallbackConfig, FallbackDecision, FallbackOrchestrator,
    FallbackRequest, ReviewContext, ReviewFile, ReviewPrompt, TracingAuditSink, UpstreamError,
};

#[derive(Parser)]
#[command(name = "revguard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recovery decisions for AI code review failures", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Fallback config file (TOML with a [fallbacks] table)
    #[arg(short, long, global = true, env = "REVGUARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an upstream error
    Classify {
        #[command(flatten)]
        error: ErrorArgs,
    },

    /// Show the backoff delay before retrying after an attempt
    Delay {
        /// 1-based attempt number that failed
        #[arg(short, long, default_value = "1")]
        attempt: u32,
    },

    /// Decide how to recover from a failed review attempt
    Decide {
        #[command(flatten)]
        error: ErrorArgs,

        #[command(flatten)]
        context: ContextArgs,

        /// 1-based attempt number that failed
        #[arg(short, long, default_value = "1")]
        attempt: u32,

        /// File holding the user prompt that failed
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Force a strategy by name instead of selecting one
        #[arg(long)]
        strategy: Option<String>,

        /// Changed files to analyze in degraded mode
        files: Vec<PathBuf>,
    },

    /// Produce an emergency-bypass result
    Bypass {
        #[command(flatten)]
        context: ContextArgs,

        /// Reason recorded on the result
        #[arg(short, long)]
        reason: Option<String>,
    },
}

#[derive(clap::Args)]
struct ErrorArgs {
    /// Error name reported by the completion caller
    #[arg(long, default_value = "Error")]
    name: String,

    /// Error message reported by the completion caller
    #[arg(short, long)]
    message: String,
}

impl ErrorArgs {
    fn to_error(&self) -> UpstreamError {
        UpstreamError::new(&self.name, &self.message)
    }
}

#[derive(clap::Args)]
struct ContextArgs {
    /// Repository slug
    #[arg(long, default_value = "unknown")]
    repository: String,

    /// Target branch of the pull request
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Head commit SHA
    #[arg(long, default_value = "unknown")]
    commit: String,
}

impl ContextArgs {
    fn to_context(&self) -> ReviewContext {
        ReviewContext {
            repository: self.repository.clone(),
            target_branch: self.branch.clone(),
            commit_sha: self.commit.clone(),
            ..ReviewContext::default()
        }
    }
}

#[derive(Serialize)]
struct Classification {
    name: String,
    message: String,
    failure_kind: FailureKind,
}

#[derive(Serialize)]
struct DelayReport {
    attempt: u32,
    delay_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    revguard_core::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;
    let orchestrator =
        FallbackOrchestrator::new(Arc::new(config)).with_audit_sink(Arc::new(TracingAuditSink));

    match cli.command {
        Commands::Classify { error } => cmd_classify(&error),
        Commands::Delay { attempt } => print_json(&DelayReport {
            attempt,
            delay_ms: delay_ms(attempt),
        }),
        Commands::Decide {
            error,
            context,
            attempt,
            prompt_file,
            strategy,
            files,
        } => {
            let request = build_request(
                &error,
                &context,
                attempt,
                prompt_file.as_deref(),
                &files,
            )?;
            let decision = cmd_decide(&orchestrator, &request, strategy.as_deref());
            print_json(&decision.report())
        }
        Commands::Bypass { context, reason } => {
            let result = orchestrator.emergency_bypass(&context.to_context(), reason.as_deref());
            print_json(&result)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FallbackConfig> {
    match path {
        Some(path) => FallbackConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(FallbackConfig::default()),
    }
}

fn cmd_classify(args: &ErrorArgs) -> Result<()> {
    let failure_kind = classify(&args.to_error());
    print_json(&Classification {
        name: args.name.clone(),
        message: args.message.clone(),
        failure_kind,
    })
}

fn build_request(
    error: &ErrorArgs,
    context: &ContextArgs,
    attempt: u32,
    prompt_file: Option<&Path>,
    files: &[PathBuf],
) -> Result<FallbackRequest> {
    let mut review_files = Vec::with_capacity(files.len());
    for path in files {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        review_files.push(ReviewFile::new(path.display().to_string(), content));
    }

    let mut request = FallbackRequest::new(error.to_error(), context.to_context(), attempt)
        .with_files(review_files);
    if let Some(path) = prompt_file {
        let user = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt {}", path.display()))?;
        request = request.with_prompt(ReviewPrompt::new("", user));
    }
    Ok(request)
}

fn cmd_decide(
    orchestrator: &FallbackOrchestrator,
    request: &FallbackRequest,
    strategy: Option<&str>,
) -> FallbackDecision {
    let decision = match strategy {
        Some(name) => orchestrator.execute_named(name, request),
        None => orchestrator.handle(request),
    };
    info!(
        strategy = %decision.strategy(),
        should_retry = decision.should_retry(),
        "decision ready"
    );
    decision
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
