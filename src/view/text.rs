//! Human-readable text rendering for the terminal

use crate::coord::Coordinates;
use crate::view::{MapPane, PanelView};

/// Render a one-shot description, paragraph per line
pub fn render_description(coords: Coordinates, text: &str) -> String {
    let mut output = format!("Location: {}\n\n", coords.label());
    for paragraph in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        output.push_str(paragraph);
        output.push('\n');
    }
    output
}

/// Render the panel the way the page lays it out, top to bottom
pub fn render_panel(panel: &PanelView, map: &MapPane) -> String {
    let mut output = String::new();

    for banner in &panel.banners {
        output.push_str(&format!("! {}\n", banner));
    }
    if let Some(message) = &map.message {
        output.push_str(&format!("[map] {}\n", message));
    }
    if !output.is_empty() {
        output.push('\n');
    }

    if let Some(label) = &panel.location_label {
        output.push_str(&format!("Location: {}\n", label));
    }
    if let Some(hint) = &panel.hint {
        output.push_str(&format!("{}\n", hint));
    }
    for paragraph in &panel.info_paragraphs {
        output.push_str(&format!("\n{}\n", paragraph));
    }
    if let Some(loading) = &panel.loading {
        output.push_str(&format!("\n{}\n", loading));
    }
    if let Some(error) = &panel.error {
        output.push_str(&format!("\nError: {}\n", error));
    }

    let marker = if panel.action.enabled { "*" } else { "-" };
    output.push_str(&format!("\n[{}] {}\n", marker, panel.action.label));
    output
}
