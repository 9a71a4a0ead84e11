//! contribution-rewriter - payroll report contribution rewriter
//!
//! Rewrites report files from the command line, or serves the rewrite
//! endpoint over HTTP.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contribution_rewriter::api::{AppState, create_router};
use contribution_rewriter::config::{
    ConfigLoader, ConfigOverrides, ContributionCeiling, Encoding, load_schedule_table,
};
use contribution_rewriter::runner::run_files;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// contribution-rewriter - payroll report contribution rewriter
#[derive(Parser, Debug)]
#[command(name = "contribution-rewriter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite report files into an output directory
    Rewrite(RewriteArgs),

    /// Serve the rewrite endpoint over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Path to a run configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Contribution ceiling for the month, e.g. 2460000 or 2.460.000
    #[arg(long)]
    ceiling: Option<ContributionCeiling>,

    /// Schedule reference table (identifier;code)
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Do not cap income and bases at the ceiling
    #[arg(long)]
    no_ceiling: bool,

    /// Do not prorate the unemployment base by subsidy days
    #[arg(long)]
    no_proration: bool,

    /// Recompute contributions for every main record regardless of regime
    #[arg(long)]
    no_regime_gate: bool,
}

#[derive(Args, Debug)]
struct RewriteArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Input and output encoding (utf-8, latin-1)
    #[arg(long)]
    encoding: Option<Encoding>,

    /// Directory the rewritten files are written to
    #[arg(long)]
    output_dir: PathBuf,

    /// Report files to rewrite
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

impl ConfigArgs {
    fn loader(&self) -> Result<ConfigLoader> {
        match &self.config {
            Some(path) => ConfigLoader::load(path)
                .with_context(|| format!("loading configuration from {}", path.display())),
            None => Ok(ConfigLoader::empty()),
        }
    }

    fn overrides(&self, encoding: Option<Encoding>) -> ConfigOverrides {
        ConfigOverrides {
            ceiling: self.ceiling,
            encoding,
            disable_ceiling: self.no_ceiling,
            disable_proration: self.no_proration,
            disable_regime_gate: self.no_regime_gate,
        }
    }

    fn schedule_path(&self, loader: &ConfigLoader) -> Result<PathBuf> {
        self.schedule
            .clone()
            .or_else(|| loader.schedule_table().map(PathBuf::from))
            .context("no schedule table given; pass --schedule or set schedule_table in the config")
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let outcome = match cli.command {
        Commands::Rewrite(args) => rewrite(&args),
        Commands::Serve(args) => serve(&args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

/// The single line printed on failure: the full context chain.
fn failure_message(err: &anyhow::Error) -> String {
    format!("Error: {err:#}")
}

fn rewrite(args: &RewriteArgs) -> Result<()> {
    let loader = args.config.loader()?;
    let config = loader
        .resolve(&args.config.overrides(args.encoding))
        .context("resolving run configuration")?;
    let schedule_path = args.config.schedule_path(&loader)?;
    let schedule = load_schedule_table(&schedule_path)?;

    info!(
        ceiling = %config.ceiling,
        encoding = %config.encoding,
        files = args.files.len(),
        "Starting rewrite"
    );

    let result = run_files(&args.files, &config, &schedule, Path::new(&args.output_dir))?;

    info!(
        run_id = %result.run_id,
        files = result.summary.files,
        workers = result.summary.workers,
        workers_with_subsidy = result.summary.workers_with_subsidy,
        main_records_rewritten = result.summary.main_records_rewritten,
        output_dir = %args.output_dir.display(),
        "Rewrite finished"
    );
    Ok(())
}

fn serve(args: &ServeArgs) -> Result<()> {
    let loader = args.config.loader()?;
    let overrides = args.config.overrides(None);
    let schedule = load_schedule_table(args.config.schedule_path(&loader)?)?;

    // The ceiling is optional here; requests may bring their own.
    let default_ceiling = loader.resolve_ceiling(&overrides)?;
    let options = loader.resolve_options(&overrides);

    let state = AppState::new(schedule)
        .with_default_ceiling(default_ceiling)
        .with_options(options);

    let runtime = tokio::runtime::Runtime::new().context("building tokio runtime")?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(args.bind)
            .await
            .with_context(|| format!("binding {}", args.bind))?;
        info!(address = %args.bind, "Serving POST /rewrite");
        axum::serve(listener, create_router(state))
            .await
            .context("server error")
    })
}
