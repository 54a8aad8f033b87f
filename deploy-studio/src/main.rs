//! Deploy Studio CLI.
//!
//! ```bash
//! # Generate a project and write it to ./todo
//! deploy-studio generate --mode fast --out todo "Flask to-do list with SQLite"
//!
//! # Research, with a key from the environment or a .env file
//! GEMINI_API_KEY=... deploy-studio research "Gunicorn vs uWSGI for Flask"
//! ```

use std::process::ExitCode;

use clap::Parser;
use deploy_studio::StudioError;
use deploy_studio::cli::{Cli, run};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) =
        studio_telemetry::init_with_format("deploy-studio", cli.log_format.into(), "info")
    {
        eprintln!("failed to initialize logging: {e}");
    }

    match run(cli, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "command failed");
            match e.downcast_ref::<StudioError>() {
                Some(studio) => eprintln!("{}", studio.user_message()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
