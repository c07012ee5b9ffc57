//! Carebook command line.
//!
//! Patient search and record inspection over records API snapshots.

use carebook_cli::{Cli, init_logging, run};
use carebook_store::SnapshotStore;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        data_dir = %cli.config.data_dir.display(),
        format = %cli.config.format,
        "Opening snapshot"
    );
    let store = SnapshotStore::open(&cli.config.data_dir).await?;

    let output = run(&cli.config, &cli.command, &store).await?;
    print!("{}", output.text);
    if !output.success {
        std::process::exit(1);
    }

    Ok(())
}
