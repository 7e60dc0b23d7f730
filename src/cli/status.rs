//! Status command handler
//!
//! Shows credential checks, the configured model and, optionally, what a
//! running server is displaying.

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::server::routes::StatusResponse;
use crate::server::state::PageView;
use crate::view::text::render_panel;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?.with_env_overrides();

    println!("geo-explorer v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("{}", render_credentials(&config.credentials()));
    println!("Model: {}", config.gemini.model);
    println!();

    if args.server {
        check_server_status(&config).await;
    }

    Ok(())
}

fn render_credentials(credentials: &Credentials) -> String {
    let mark = |configured: bool| if configured { "OK" } else { "ACTION REQUIRED" };
    format!(
        "Credentials:\n  Google Maps API key: {} [{}]\n  Gemini API key:      {} [{}]\n",
        credentials.map,
        mark(credentials.map.is_configured()),
        credentials.gemini,
        mark(credentials.gemini.is_configured()),
    )
}

/// Check if the server is running and show its current page
async fn check_server_status(config: &Config) {
    let base = format!("http://{}", config.server_addr());

    match reqwest::get(format!("{}/api/status", base)).await {
        Ok(response) if response.status().is_success() => {
            println!("Server: RUNNING on {}", config.server_addr());
            if let Ok(status) = response.json::<StatusResponse>().await {
                println!("  Version: {}", status.version);
                println!("  Model: {}", status.model);
                println!("  Map: {:?}", status.map_status);
            }
        }
        Ok(response) => {
            println!("Server: ERROR (status {})", response.status());
            return;
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
            return;
        }
    }
    println!();

    match reqwest::get(format!("{}/api/view", base)).await {
        Ok(response) => match response.json::<PageView>().await {
            Ok(view) => print!("{}", render_panel(&view.panel, &view.map)),
            Err(e) => println!("  Could not read page view: {}", e),
        },
        Err(e) => println!("  Could not read page view: {}", e),
    }
}
