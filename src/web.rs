#![cfg(not(tarpaulin_include))]

use clap::Parser;
use usergrid::app;
use usergrid::config::Config;

/// Main entry point for the web application
///
/// Parses the configuration (flags or `USERGRID_*` variables), loads or
/// generates the records, and serves the grid until interrupted.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    app::run(config).await
}
