use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use worldboard_core::country::CountryFeature;
use worldboard_core::leadership::LeadershipView;

use crate::commands::open_dashboard;
use crate::render::Render;

/// Show the country panel for an ISO3 code, optionally with its leadership chart.
pub async fn run(iso3: &str, leadership: bool, svg: Option<PathBuf>) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    dashboard.init().await;

    let feature = CountryFeature {
        iso3: iso3.trim().to_uppercase(),
        name: iso3.trim().to_uppercase(),
    };
    dashboard.select_country(&feature);
    dashboard.open_country_panel();

    if let Some(panel) = dashboard.selection().panel() {
        println!("{}", panel.render());
    }

    if !leadership && svg.is_none() {
        return Ok(());
    }

    let view = dashboard.open_leadership().await;
    println!();
    println!("{}", view.render());

    if let Some(path) = svg {
        match view {
            LeadershipView::Chart { svg: markup, .. } => {
                std::fs::write(&path, markup)?;
                println!("{}", format!("  Wrote {}", path.display()).green());
            }
            LeadershipView::Message { .. } => {
                eprintln!("{}", "  No chart to write".yellow());
            }
        }
    }

    Ok(())
}
