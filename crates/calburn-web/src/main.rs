//! calburn
//!
//! Serves the calories-burnt prediction form and history.

use calburn_core::logging_facility::{init, Profile};
use calburn_web::{Cli, ServerConfig};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ServerConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init(Profile::for_debug(config.debug));

    if let Err(e) = calburn_web::server::serve(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
