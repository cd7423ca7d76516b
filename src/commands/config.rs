use anyhow::Result;
use owo_colors::OwoColorize;
use worldboard_core::WorldboardConfig;

use crate::ConfigChanges;

pub fn run(changes: ConfigChanges) -> Result<()> {
    let config_path = WorldboardConfig::config_path()?;
    let mut config = WorldboardConfig::load()?;

    if apply(&mut config, changes) {
        config.save()?;
        println!("{}", format!("Updated {}", config_path.display()).green());
        println!();
    }

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    match &config.data_url {
        Some(url) => println!("  Data:    {url}"),
        None => println!("  Data:    {}", config.data_path().display()),
    }
    println!("  Store:   {}", config.store_path().display());

    println!("{}", "Map".bold());
    println!("  Dark style:       {}", config.dark_style);
    println!("  Satellite style:  {}", config.satellite_style);
    println!("  Loading timeout:  {}s", config.loading_timeout_secs);
    println!("  Fetch timeout:    {}s", config.fetch_timeout_secs);
    println!("  Server port:      {}", config.port);

    Ok(())
}

/// Returns true when anything changed.
fn apply(config: &mut WorldboardConfig, changes: ConfigChanges) -> bool {
    let mut changed = false;

    if let Some(dir) = changes.data_dir {
        config.data_dir = dir;
        changed = true;
    }
    if let Some(url) = changes.data_url {
        let url = url.trim();
        config.data_url = (!url.is_empty()).then(|| url.to_string());
        changed = true;
    }
    if let Some(dir) = changes.store_dir {
        config.store_dir = dir;
        changed = true;
    }
    if let Some(port) = changes.port {
        config.port = port;
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn no_changes() -> ConfigChanges {
        ConfigChanges {
            data_dir: None,
            data_url: None,
            store_dir: None,
            port: None,
        }
    }

    #[test]
    fn nothing_given_leaves_config_alone() {
        let mut config = WorldboardConfig::default();
        assert!(!apply(&mut config, no_changes()));
        assert_eq!(config.port, WorldboardConfig::default().port);
    }

    #[test]
    fn given_values_are_applied() {
        let mut config = WorldboardConfig {
            data_url: Some("http://old".into()),
            ..WorldboardConfig::default()
        };
        let changes = ConfigChanges {
            data_dir: Some(PathBuf::from("/srv/data")),
            data_url: Some("  ".into()),
            port: Some(5000),
            ..no_changes()
        };

        assert!(apply(&mut config, changes));
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.data_url, None);
        assert_eq!(config.port, 5000);
    }
}
