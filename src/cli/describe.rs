//! Describe command handler
//!
//! One-shot call of the location detail service, without the map session.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::describe::gemini::GeminiBackend;
use crate::describe::{DetailError, DetailErrorKind, LocationDetailService};
use crate::error::Result;
use crate::view::text::render_description;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::debug;

/// Output format for the describe command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Describe command arguments
#[derive(Args)]
pub struct DescribeArgs {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Override the configured Gemini model
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct DescribeOutput<'a> {
    location: Coordinates,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<DetailErrorKind>,
}

impl<'a> DescribeOutput<'a> {
    fn new(coords: Coordinates, outcome: &'a std::result::Result<String, DetailError>) -> Self {
        let (description, error) = match outcome {
            Ok(text) => (Some(text.as_str()), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            location: coords,
            label: coords.label(),
            description,
            error: error.map(|e| e.to_string()),
            error_kind: error.map(|e| e.kind()),
        }
    }
}

/// Run the describe command
pub async fn run(args: DescribeArgs) -> Result<()> {
    let coords = Coordinates::new(args.lat, args.lng);
    coords.validate()?;

    let mut config = Config::load()?.with_env_overrides();
    if let Some(model) = args.model {
        config.gemini.model = model;
    }

    let backend = GeminiBackend::from_config(&config.gemini)?;
    debug!(model = backend.model(), %coords, "describing location");

    let outcome = backend.fetch_description(coords).await;
    print_outcome(coords, &outcome, args.format)?;

    outcome.map(|_| ()).map_err(Into::into)
}

fn print_outcome(
    coords: Coordinates,
    outcome: &std::result::Result<String, DetailError>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&DescribeOutput::new(coords, outcome))?);
        }
        OutputFormat::Text => {
            if let Ok(text) = outcome {
                print!("{}", render_description(coords, text));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_success() {
        let outcome = Ok("Paris is the capital of France.".to_string());
        let output = DescribeOutput::new(Coordinates::new(48.8566, 2.3522), &outcome);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["label"], "Lat: 48.8566, Lng: 2.3522");
        assert_eq!(json["description"], "Paris is the capital of France.");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_json_output_failure() {
        let outcome = Err(DetailError::QuotaExceeded);
        let output = DescribeOutput::new(Coordinates::new(0.0, 0.0), &outcome);
        let json = serde_json::to_value(&output).unwrap();

        assert!(json.get("description").is_none());
        assert_eq!(json["error_kind"], "QUOTA_EXCEEDED");
        assert!(json["error"].as_str().unwrap().contains("quota"));
    }
}
