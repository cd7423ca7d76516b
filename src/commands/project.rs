use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::commands::open_dashboard;
use crate::render::Render;

pub fn list() -> Result<()> {
    let dashboard = open_dashboard()?;
    let projects = dashboard.projects().projects();

    if projects.is_empty() {
        println!("{}", "No projects yet.".dimmed());
        return Ok(());
    }
    for project in projects {
        println!("  {}", project.render());
    }
    Ok(())
}

pub fn create(name: Option<String>) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("  Project name").interact_text()?,
    };

    let mut dashboard = open_dashboard()?;
    dashboard.open_project_modal();
    let project = dashboard.create_project(&name)?;
    println!("{}", format!("  Created: {}", project.name).green());
    Ok(())
}

pub fn rename(id: &str, name: &str) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let project = dashboard.rename_project(id, name)?;
    println!("{}", format!("  Renamed: {}", project.name).yellow());
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let project = dashboard.delete_project(id)?;
    println!("{}", format!("  Deleted: {}", project.name).red());
    Ok(())
}
