// crates/server/src/cli.rs
//! `siteconf` command line.
//!
//! `serve` binds the global store and publishes it over HTTP; `render`,
//! `check` and `show` are offline and never touch the global store.

use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use siteconf_core::{
    check_artifact, global, load_record, render, ArtifactFormat, GlobalName, LoadOptions,
    DEFAULT_GLOBAL_NAME,
};
use siteconf_types::ConfigRecord;
use tracing::{info, warn};

use crate::{create_app, AppState};

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 8080;

/// Get the server port from environment or use default.
pub fn get_port() -> u16 {
    std::env::var("SITECONF_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[derive(Parser, Debug)]
#[command(name = "siteconf", author, version, about = "Public runtime config for a static site")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the record, bind it process-wide and serve config.js / config.json
    Serve(ServeArgs),
    /// Write the published artifact
    Render(RenderArgs),
    /// Validate and scan a published config.js or config.json
    Check {
        path: PathBuf,
    },
    /// Print the resolved record as JSON
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also report where each field came from
        #[arg(long)]
        sources: bool,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// TOML file with record fields (falls back to SITECONF_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Listen port (falls back to SITECONF_PORT, then PORT, then 8080)
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long, env = "SITECONF_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(long, env = "SITECONF_GLOBAL_NAME", default_value = DEFAULT_GLOBAL_NAME)]
    pub global_name: String,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output format; inferred from `--out` when omitted
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Write here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long, env = "SITECONF_GLOBAL_NAME", default_value = DEFAULT_GLOBAL_NAME)]
    pub global_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Js,
    Json,
}

impl From<FormatArg> for ArtifactFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Js => ArtifactFormat::Js,
            FormatArg::Json => ArtifactFormat::Json,
        }
    }
}

impl RenderArgs {
    pub fn artifact_format(&self) -> ArtifactFormat {
        match (self.format, &self.out) {
            (Some(format), _) => format.into(),
            (None, Some(out)) => ArtifactFormat::from_path(out),
            (None, None) => ArtifactFormat::Js,
        }
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Serve(args) => {
            serve(args).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Render(args) => {
            let opts = LoadOptions::from_process_env(args.config.clone());
            render_cmd(&args, &opts, &mut std::io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path } => {
            let clean = check_cmd(&path, &mut std::io::stdout().lock())?;
            Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Show { config, sources } => {
            let opts = LoadOptions::from_process_env(config);
            show_cmd(&opts, sources, &mut std::io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load, bind the global store, render once and serve until shutdown.
pub async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let global_name = GlobalName::parse(args.global_name)?;
    let opts = LoadOptions::from_process_env(args.config);
    let resolved = load_record(&opts)?;
    let record = global().load(resolved.record)?;
    let state = AppState::new(&record, &global_name)?;
    let app = create_app(state);

    let addr = SocketAddr::new(args.host, args.port.unwrap_or_else(get_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "siteconf listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("siteconf stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Render the artifact to `--out`, or to `stdout` when no path is given.
pub fn render_cmd(args: &RenderArgs, opts: &LoadOptions, stdout: &mut dyn Write) -> anyhow::Result<()> {
    let global_name = GlobalName::parse(args.global_name.clone())?;
    let resolved = load_record(opts)?;
    let format = args.artifact_format();
    let text = render(&resolved.record, format, &global_name)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), ?format, "artifact written");
        }
        None => stdout.write_all(text.as_bytes())?,
    }
    Ok(())
}

/// Check a published artifact. Returns whether it is clean.
pub fn check_cmd(path: &Path, stdout: &mut dyn Write) -> anyhow::Result<bool> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let report = check_artifact(&text, ArtifactFormat::from_path(path));

    if let Some(error) = &report.error {
        writeln!(stdout, "{}: invalid: {error}", path.display())?;
    }
    for finding in &report.findings {
        writeln!(stdout, "{}: {finding}", path.display())?;
    }
    if report.is_clean() {
        let name = report
            .global_name
            .as_ref()
            .map(|g| format!(" (window.{g})"))
            .unwrap_or_default();
        writeln!(stdout, "{}: ok{name}", path.display())?;
    } else {
        warn!(
            path = %path.display(),
            findings = report.findings.len(),
            invalid = report.error.is_some(),
            "artifact check failed"
        );
    }
    Ok(report.is_clean())
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    record: &'a ConfigRecord,
    sources: Vec<(&'static str, String)>,
}

/// Print the resolved record, optionally with each field's source.
pub fn show_cmd(opts: &LoadOptions, with_sources: bool, stdout: &mut dyn Write) -> anyhow::Result<()> {
    let resolved = load_record(opts)?;
    let json = if with_sources {
        serde_json::to_string_pretty(&ShowOutput {
            record: &resolved.record,
            sources: resolved
                .sources
                .iter()
                .map(|(key, source)| (*key, source.to_string()))
                .collect(),
        })?
    } else {
        serde_json::to_string_pretty(&resolved.record)?
    };
    writeln!(stdout, "{json}")?;
    Ok(())
}
