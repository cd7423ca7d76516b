use anyhow::Result;
use owo_colors::OwoColorize;
use worldboard_core::command::Command;
use worldboard_core::overlay::{Dataset, FeatureCollection, PointInfo};

use crate::commands::open_dashboard;
use crate::render::Render;

/// Load one dataset the way the map would and summarise it.
pub async fn run(dataset: &str, verbose: bool) -> Result<()> {
    let dataset: Dataset = dataset.parse().map_err(|_| {
        let available: Vec<_> = Dataset::ALL.iter().map(|d| d.stem()).collect();
        anyhow::anyhow!("Unknown dataset '{}'. Available: {}", dataset, available.join(", "))
    })?;

    let mut dashboard = open_dashboard()?;
    dashboard.execute(Command::Overlay(dataset)).await?;

    let Some(active) = dashboard.overlays().active() else {
        return Ok(());
    };
    println!("{}", active.render());

    if verbose
        && let Some(data) = dashboard.map().source(&active.layer_id)
    {
        let features: FeatureCollection = serde_json::from_value(data.clone())?;
        for feature in &features.features {
            let properties = serde_json::to_value(&feature.properties)?;
            if let Some(properties) = properties.as_object() {
                println!();
                println!("{}", PointInfo::from_properties(properties).render());
            }
        }
    } else if active.feature_count == 0 {
        println!("{}", "  Dataset has no points with coordinates".dimmed());
    }

    Ok(())
}
