//! Librarian decisions - decide which releases to grab for a batch of media items
//!
//! Reads a request file, runs every release through the decision chain and
//! prints the prioritized decisions as JSON on stdout.

use librarian_decisions::app::{App, DecisionRequest};
use librarian_decisions::cli::{CliOptions, Command, USAGE};
use librarian_decisions::config::Config;
use librarian_decisions::services::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let options = CliOptions::from_args();
    let request_path = match options.command()? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Decide { request_path } => request_path,
    };

    let config = Config::from_env()?.with_cli_overrides(&options);
    init_tracing(&config);

    tracing::info!("Starting Librarian decisions");
    tracing::info!(
        profiles = %config.profiles_path.display(),
        custom_formats = %config.custom_formats_path.display(),
        max_concurrent = config.max_concurrent_decisions,
        "Configuration loaded"
    );

    let request = DecisionRequest::load(&request_path)?;
    let app = App::load(config)?;
    let batch = app.run(request).await?;

    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
