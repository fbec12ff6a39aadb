//! CSAPI query CLI
//!
//! Prints OGC API - Connected Systems query URLs for a collection description.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use csapi_query::cli::Cli;

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the URL
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("Running {:?}", cli.command);

    match cli.command.run(cli.collection.as_deref()) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}
