//! geo-explorer CLI entry point
//!
//! Map location explorer - CLI + web app

use geo_explorer::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
