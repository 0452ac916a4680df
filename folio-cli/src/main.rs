//! # Folio
//!
//! Command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use folio_cli::CliArgs;
use folio_core::RegistryBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    folio_cli::init_tracing();

    let args = CliArgs::parse();
    tracing::debug!(config = %args.config.display(), "Starting folio");

    let registry = RegistryBuilder::with_builtins().install()?;
    let mut stdout = std::io::stdout().lock();
    let ok = folio_cli::run(&args, registry, &mut stdout).await?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
