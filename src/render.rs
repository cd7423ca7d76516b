//! Terminal rendering for worldboard types.
//!
//! Extension traits that add colored output to worldboard-core types using
//! owo_colors.

use owo_colors::OwoColorize;
use worldboard_core::calendar::{CalendarEvent, CalendarList, Chip, MonthGrid, WEEKDAY_LABELS, WeekGrid};
use worldboard_core::country::CountryPanel;
use worldboard_core::leadership::{LeadershipView, OrgChart};
use worldboard_core::overlay::{ActiveOverlay, PointInfo};
use worldboard_core::project::Project;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// `#rrggbb` to an RGB triple. Anything else is white.
fn rgb(color: &str) -> (u8, u8, u8) {
    let hex = color.trim_start_matches('#');
    let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
    match (hex.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => (r, g, b),
        _ => (255, 255, 255),
    }
}

impl Render for Chip {
    fn render(&self) -> String {
        let (r, g, b) = rgb(&self.color);
        format!("{} {}", "●".truecolor(r, g, b), self.title)
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let mut line = format!("{:<16} {}", self.when(), self.display_title().bold());
        if let Some(link) = &self.link {
            line.push_str(&format!(" {}", link.underline()));
        }
        line.push_str(&format!(" {}", format!("[{}]", self.id).dimmed()));
        line
    }
}

impl Render for WeekGrid {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for (column, day) in self.days.iter().enumerate() {
            let heading = format!("{} {}", day.label, day.date.format("%m/%d"));
            let heading = if day.is_today {
                heading.cyan().bold().to_string()
            } else {
                heading.bold().to_string()
            };
            lines.push(heading);

            for chip in &day.all_day {
                lines.push(format!("  {:>5}  {}", "all", chip.render()));
            }
            for row in &self.rows {
                for chip in &row.cells[column] {
                    lines.push(format!("  {}  {}", row.hour.label().dimmed(), chip.render()));
                }
            }
        }

        lines.join("\n")
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let mut lines = vec![WEEKDAY_LABELS.map(|l| format!("{l:>4}")).join(" ").dimmed().to_string()];

        for week in self.cells.chunks(7) {
            if week.iter().all(Option::is_none) {
                continue;
            }
            let days: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    None => "    ".to_string(),
                    Some(cell) => {
                        let marker = if cell.chips.is_empty() { ' ' } else { '*' };
                        let text = format!("{:>3}{marker}", cell.date.format("%-d"));
                        if cell.is_today { text.cyan().bold().to_string() } else { text }
                    }
                })
                .collect();
            lines.push(days.join(" "));
        }

        for cell in self.cells.iter().flatten().filter(|c| !c.chips.is_empty()) {
            for chip in &cell.chips {
                lines.push(format!("{}  {}", cell.date.format("%m/%d").dimmed(), chip.render()));
            }
        }

        lines.join("\n")
    }
}

impl Render for CalendarList {
    fn render(&self) -> String {
        self.iter()
            .map(|cal| {
                let (r, g, b) = rgb(&cal.color);
                let check = if cal.checked { "[x]" } else { "[ ]" };
                format!("{check} {} {}", "■".truecolor(r, g, b), cal.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for CountryPanel {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", self.title.bold(), format!("({})", self.iso3).dimmed()),
            format!("  Leader: {}", self.leader_name),
            format!("  {}", self.party_line),
        ];
        if let Some(flag) = &self.flag_url {
            lines.push(format!("  Flag: {}", flag.underline()));
        }
        match &self.military {
            Some(rows) => {
                lines.push("  Military".bold().to_string());
                for (label, value) in rows {
                    lines.push(format!("    {label:<18} {value}"));
                }
            }
            None => lines.push("  No military data".dimmed().to_string()),
        }
        lines.join("\n")
    }
}

fn render_chart(heading: &str, chart: &OrgChart) -> String {
    let mut lines = vec![heading.bold().to_string()];
    for node in &chart.nodes {
        let indent = "  ".repeat(node.depth + 1);
        lines.push(format!("{indent}{} {}", node.name, node.title.dimmed()));
    }
    lines.join("\n")
}

impl Render for LeadershipView {
    fn render(&self) -> String {
        match self {
            LeadershipView::Chart { heading, chart, .. } => render_chart(heading, chart),
            LeadershipView::Message { text } => text.dimmed().to_string(),
        }
    }
}

impl Render for ActiveOverlay {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            "+".green(),
            self.dataset.bold(),
            format!("({} points, layer {})", self.feature_count, self.layer_id).dimmed()
        )
    }
}

impl Render for PointInfo {
    fn render(&self) -> String {
        let mut lines = vec![self.title.bold().to_string()];
        for (label, value) in &self.rows {
            lines.push(format!("  {}: {value}", label.dimmed()));
        }
        lines.join("\n")
    }
}

impl Render for Project {
    fn render(&self) -> String {
        let created = self
            .created_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "{} {} {}",
            self.name.bold(),
            format!("Created: {created}").dimmed(),
            format!("[{}]", self.id).dimmed()
        )
    }
}
