// crates/server/src/main.rs
//! `siteconf` binary.

use std::process::ExitCode;

use clap::Parser;
use siteconf_observability::{init_tracing, LogFormat};
use siteconf_server::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(LogFormat::from_env())?;
    run(cli).await
}
