// Entrypoint for the uploader.
// - Keeps `main` small: load settings, build the store client and hand both
//   to the interactive loop.
// - Returns `anyhow::Result` so startup failures print a readable chain.

use anyhow::Context;
use clap::Parser;
use novel_uploader::api::{Spinner, SupabaseStore};
use novel_uploader::config::{self, Args, StoreConfig};
use novel_uploader::error::PromptError;
use novel_uploader::logging;
use novel_uploader::ui::{self, RecordBuilder, TerminalConsole};

fn main() -> anyhow::Result<()> {
    // Env files must be loaded before clap reads the environment.
    let env_files = config::load_env_files().context("loading .env files")?;
    logging::init();
    for path in &env_files {
        tracing::debug!(path = %path.display(), "using env file");
    }

    let args = Args::parse();
    let config = StoreConfig::from_args(&args).context("invalid store configuration")?;
    tracing::debug!(?config, "store configured");
    let store = SupabaseStore::new(&config).context("failed to build HTTP client")?;

    ui::install_interrupt_handler().context("installing Ctrl-C handler")?;

    println!("Novel uploader");
    println!("{}", "=".repeat(50));

    let mut builder = RecordBuilder::new(TerminalConsole::new(), Spinner::new(store));
    match builder.run() {
        Ok(summary) => {
            tracing::info!(
                submitted = summary.submitted,
                failed = summary.failed,
                cancelled = summary.cancelled,
                "session finished"
            );
            println!();
            println!("Goodbye!");
        }
        Err(PromptError::Interrupted) => {
            tracing::info!("session interrupted");
            ui::print_interrupted_farewell();
        }
        Err(err) => return Err(anyhow::Error::new(err).context("terminal input failed")),
    }
    Ok(())
}
