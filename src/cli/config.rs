//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::{Config, CredentialStatus};
use crate::constants::placeholders;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "gemini.model")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    // File values only; env overrides are never written back
    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => {
            print!("{}", render_config(&config));
        }

        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Available keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Render all configuration values, API keys masked
fn render_config(config: &Config) -> String {
    let mut out = String::new();

    out.push_str("[server]\n");
    out.push_str(&format!("host = \"{}\"\n", config.server.host));
    out.push_str(&format!("port = {}\n\n", config.server.port));

    out.push_str("[map]\n");
    out.push_str(&masked_key(&config.map.api_key, placeholders::MAP_API_KEY));
    out.push_str(&format!("map_id = \"{}\"\n", config.map.map_id));
    out.push_str(&format!("initial_lat = {}\n", config.map.initial_lat));
    out.push_str(&format!("initial_lng = {}\n", config.map.initial_lng));
    out.push_str(&format!("initial_zoom = {}\n\n", config.map.initial_zoom));

    out.push_str("[gemini]\n");
    out.push_str(&masked_key(&config.gemini.api_key, placeholders::GEMINI_API_KEY));
    out.push_str(&format!("model = \"{}\"\n", config.gemini.model));
    out.push_str(&format!("base_url = \"{}\"\n", config.gemini.base_url));
    out.push_str(&format!("timeout_secs = {}\n", config.gemini.timeout_secs));

    out
}

fn masked_key(value: &str, placeholder: &str) -> String {
    match CredentialStatus::check(value, placeholder) {
        CredentialStatus::Configured => "api_key = \"***\" # configured\n".to_string(),
        CredentialStatus::Placeholder => format!("api_key = \"{}\" # placeholder\n", placeholder),
        CredentialStatus::Missing => "api_key = \"\" # not configured\n".to_string(),
    }
}
