//! Leadership org charts: a pyramid layout of a country's party members
//! rendered as SVG.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use indoc::formatdoc;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::render::escape_html;
use crate::data::DataSource;
use crate::error::WorldboardResult;

pub const LEADERSHIP_PATH: &str = "leadership.json";

pub const CHART_WIDTH: f64 = 420.0;
pub const CHART_MIN_HEIGHT: f64 = 340.0;
pub const TOP_Y: f64 = 60.0;
pub const LEVEL_GAP: f64 = 110.0;
const NODE_RADIUS: f64 = 32.0;

pub const NO_DATA_MESSAGE: &str = "No leadership data for this country.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load leadership data.";

/// Ids appear as both strings and numbers in the data.
fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Id::deserialize(d)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn optional_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_string")] String);

    let id = Option::<Wrapped>::deserialize(d)?.map(|w| w.0);
    Ok(id.filter(|s| !s.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leadership {
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub id: String,
    pub name: String,
    pub title: String,
    pub avatar: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgChart {
    pub width: f64,
    pub height: f64,
    /// In input order.
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<Edge>,
}

impl OrgChart {
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Place every member reachable from a root.
///
/// Members without a parent, or whose parent is not in the list, are roots.
/// Levels fill depth-first in input order; each level spreads its nodes
/// evenly across the chart width.
pub fn layout(members: &[Member]) -> OrgChart {
    let ids: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, member) in members.iter().enumerate() {
        match member.parent.as_deref() {
            None => roots.push(index),
            Some(parent) if !ids.contains(parent) => {
                tracing::warn!(id = %member.id, parent, "unknown parent, treating as root");
                roots.push(index);
            }
            Some(parent) => children.entry(parent).or_default().push(index),
        }
    }

    let mut levels: Vec<Vec<usize>> = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(usize, usize)> = roots.iter().rev().map(|&r| (r, 0)).collect();
    while let Some((index, depth)) = stack.pop() {
        if !visited.insert(index) {
            continue;
        }
        if levels.len() <= depth {
            levels.resize_with(depth + 1, Vec::new);
        }
        levels[depth].push(index);

        if let Some(kids) = children.get(members[index].id.as_str()) {
            stack.extend(kids.iter().rev().map(|&k| (k, depth + 1)));
        }
    }

    let skipped = members.len() - visited.len();
    if skipped > 0 {
        tracing::warn!(skipped, "members unreachable from any root were left out");
    }

    let mut positions: HashMap<usize, (usize, f64, f64)> = HashMap::new();
    for (depth, level) in levels.iter().enumerate() {
        let gap = CHART_WIDTH / (level.len() + 1) as f64;
        for (j, &index) in level.iter().enumerate() {
            let x = gap * (j + 1) as f64;
            let y = TOP_Y + depth as f64 * LEVEL_GAP;
            positions.insert(index, (depth, x, y));
        }
    }

    let nodes: Vec<PlacedNode> = members
        .iter()
        .enumerate()
        .filter_map(|(index, m)| {
            let &(depth, x, y) = positions.get(&index)?;
            Some(PlacedNode {
                id: m.id.clone(),
                name: m.name.clone(),
                title: m.title.clone(),
                avatar: m.avatar.clone(),
                depth,
                x,
                y,
            })
        })
        .collect();

    let placed: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = members
        .iter()
        .filter(|m| placed.contains(m.id.as_str()))
        .filter_map(|m| {
            let parent = m.parent.as_deref().filter(|p| placed.contains(p))?;
            Some(Edge {
                parent: parent.to_string(),
                child: m.id.clone(),
            })
        })
        .collect();

    let depth_count = levels.len() as f64;
    let height = CHART_MIN_HEIGHT.max(TOP_Y + depth_count * LEVEL_GAP);

    OrgChart {
        width: CHART_WIDTH,
        height,
        nodes,
        edges,
    }
}

/// Quadratic curve from the bottom of the parent bubble to the top of the child's.
pub fn edge_path(parent: &PlacedNode, child: &PlacedNode) -> String {
    format!(
        "M{},{} Q{},{} {},{}",
        parent.x,
        parent.y + NODE_RADIUS,
        (parent.x + child.x) / 2.0,
        (parent.y + child.y) / 2.0 + 30.0,
        child.x,
        child.y - NODE_RADIUS
    )
}

pub fn render_svg(chart: &OrgChart) -> String {
    let mut edges = String::new();
    for edge in &chart.edges {
        if let (Some(parent), Some(child)) = (chart.node(&edge.parent), chart.node(&edge.child)) {
            let _ = write!(
                edges,
                r##"<path d="{}" stroke="#4a5a7a" stroke-width="2.2" fill="none"/>"##,
                edge_path(parent, child)
            );
        }
    }

    let mut nodes = String::new();
    for (i, n) in chart.nodes.iter().enumerate() {
        let _ = write!(
            nodes,
            r##"<g class="bubble-node" data-id="{id}"><circle cx="{x}" cy="{y}" r="32" fill="url(#bubble)" stroke="#6a7a9a" stroke-width="2.5"/><clipPath id="clip{i}"><circle cx="{x}" cy="{avatar_cy}" r="18"/></clipPath><image href="{avatar}" x="{ax}" y="{ay}" width="36" height="36" clip-path="url(#clip{i})"/><text x="{x}" y="{name_y}" text-anchor="middle" font-size="13" fill="#fff" font-weight="600">{name}</text><text x="{x}" y="{title_y}" text-anchor="middle" font-size="11" fill="#b0b8c1">{title}</text></g>"##,
            id = escape_html(&n.id),
            x = n.x,
            y = n.y,
            avatar_cy = n.y - 8.0,
            avatar = escape_html(&n.avatar),
            ax = n.x - 18.0,
            ay = n.y - 26.0,
            name_y = n.y + 16.0,
            title_y = n.y + 32.0,
            name = escape_html(&n.name),
            title = escape_html(&n.title),
        );
    }

    formatdoc! {r##"
        <svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
        <defs><radialGradient id="bubble" cx="50%" cy="50%" r="60%"><stop offset="0%" stop-color="#3a3f5a"/><stop offset="100%" stop-color="#23283a"/></radialGradient></defs>
        {edges}
        {nodes}
        </svg>"##,
        width = chart.width,
        height = chart.height,
        edges = edges,
        nodes = nodes,
    }
}

/// What the leadership overlay shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeadershipView {
    Chart {
        /// Party name, or "Leadership" when the data has none.
        heading: String,
        logo: Option<String>,
        chart: OrgChart,
        svg: String,
    },
    Message {
        text: String,
    },
}

impl LeadershipView {
    pub fn message(text: &str) -> Self {
        LeadershipView::Message { text: text.to_string() }
    }

    pub fn for_country(data: &Leadership) -> Self {
        let chart = layout(&data.members);
        let svg = render_svg(&chart);
        LeadershipView::Chart {
            heading: data
                .party
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Leadership".to_string()),
            logo: data.logo.clone().filter(|l| !l.is_empty()),
            chart,
            svg,
        }
    }
}

/// Leadership data keyed by ISO3, fetched on first use.
#[derive(Debug, Default)]
pub struct LeadershipCatalog {
    countries: Option<HashMap<String, Leadership>>,
}

impl LeadershipCatalog {
    pub fn is_loaded(&self) -> bool {
        self.countries.is_some()
    }

    pub fn set(&mut self, countries: HashMap<String, Leadership>) {
        self.countries = Some(countries);
    }

    pub async fn fetch(source: &DataSource) -> WorldboardResult<HashMap<String, Leadership>> {
        let value = source.fetch_json(LEADERSHIP_PATH).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Keep the outcome of [`LeadershipCatalog::fetch`]. A failed fetch is
    /// not cached, so the next open tries again.
    pub fn accept(&mut self, fetched: WorldboardResult<HashMap<String, Leadership>>) -> WorldboardResult<()> {
        let countries = fetched.inspect_err(|e| {
            tracing::warn!(error = %e, "could not load leadership data");
        })?;
        self.set(countries);
        Ok(())
    }

    /// View for the selected country. Needs the data loaded first.
    pub fn view(&self, iso3: Option<&str>) -> LeadershipView {
        let Some(countries) = &self.countries else {
            return LeadershipView::message(LOAD_FAILED_MESSAGE);
        };
        match iso3.and_then(|code| countries.get(code)) {
            Some(data) => LeadershipView::for_country(data),
            None => LeadershipView::message(NO_DATA_MESSAGE),
        }
    }
}
