use anyhow::Result;
use owo_colors::OwoColorize;
use worldboard_core::command::{self, Command};

use crate::commands::open_dashboard;
use crate::render::Render;

pub fn suggest(input: &str) -> Result<()> {
    let suggestions = command::suggest(input);
    if suggestions.is_empty() {
        println!("{}", "No matching commands".dimmed());
    }
    for token in suggestions {
        println!("  {token}");
    }
    Ok(())
}

/// Run a palette command and report what it changed on the map.
pub async fn run(input: &str) -> Result<()> {
    let mut dashboard = open_dashboard()?;

    let Some(command) = dashboard.run_command(input).await? else {
        println!("{}", format!("Unknown command: {}", input.trim()).dimmed());
        return suggest(input);
    };

    let map = dashboard.map();
    match command {
        Command::Overlay(_) => {
            if let Some(active) = dashboard.overlays().active() {
                println!("{}", active.render());
            }
        }
        Command::Satellite | Command::SatelliteOff => println!("  Style: {}", map.style),
        Command::Flat | Command::Globe => {
            println!("  Projection: {:?}", map.projection);
            if let Some(zoom) = map.min_zoom {
                println!("  Min zoom: {zoom}");
            }
        }
        Command::Projects => {
            let projects = dashboard.projects().projects();
            if projects.is_empty() {
                println!("{}", "No projects yet.".dimmed());
            }
            for project in projects {
                println!("  {}", project.render());
            }
        }
    }
    Ok(())
}
