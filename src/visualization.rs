/// Visualization module: inspection flow diagram.
///
/// Produces a self-contained HTML string that renders the route graph with
/// Cytoscape.js:
/// - One station node per route-graph node, laid out left to right
/// - A W/H badge node under every station with its witness and hold counts
/// - Edges between consecutive stations
/// - Toolbar for fit, zoom, pan, badge toggling and spool-type filtering
///
/// This module turns a `RouteGraph` into Cytoscape elements, serializes them
/// to JSON, and emits the HTML shell.
use serde::Serialize;
use serde_json::Value;

use crate::error::SpoolError;
use crate::flow::FlowGraph;
use crate::route_graph::RouteGraph;
use crate::topology::Topology;

const CYTOSCAPE_SRC: &str = "https://unpkg.com/cytoscape@3.26.0/dist/cytoscape.min.js";

// ── Config ──────────────────────────────────────────────────────────────────

pub struct VisualizationConfig {
    /// Horizontal distance between stations
    pub x_step: f64,
    /// Left offset of the first station
    pub x_offset: f64,
    /// Vertical position of station nodes
    pub station_y: f64,
    /// Vertical position of badge nodes
    pub badge_y: f64,
    /// Height of the diagram area
    pub height_px: u32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            x_step: 220.0,
            x_offset: 140.0,
            station_y: 200.0,
            badge_y: 280.0,
            height_px: 520,
        }
    }
}

// ── Elements ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementData {
    Station {
        id: String,
        label: String,
        icon: String,
        /// Spool types whose route visits the station
        spool_types: Vec<String>,
    },
    Badge {
        id: String,
        label: String,
        station_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Node { data: ElementData, position: Position },
    Edge { data: EdgeData },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
}

/// Station and badge nodes first (station, badge, station, badge, ...), then edges.
pub fn cytoscape_elements(
    topology: &Topology,
    graph: &RouteGraph,
    config: &VisualizationConfig,
) -> Vec<Element> {
    let flow = FlowGraph::from_topology(topology);
    let mut elements = Vec::with_capacity(graph.nodes.len() * 2 + graph.edges.len());

    for (idx, node) in graph.nodes.iter().enumerate() {
        let x = idx as f64 * config.x_step + config.x_offset;

        elements.push(Element::Node {
            data: ElementData::Station {
                id: node.id.clone(),
                label: node.label.clone(),
                icon: icon_path(&node.id),
                spool_types: flow
                    .spool_types_at(&node.id)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            },
            position: Position {
                x,
                y: config.station_y,
            },
        });

        elements.push(Element::Node {
            data: ElementData::Badge {
                id: format!("{}_badge", node.id),
                label: format!("W:{}  H:{}", node.witness, node.hold),
                station_id: node.id.clone(),
            },
            position: Position {
                x,
                y: config.badge_y,
            },
        });
    }

    for edge in &graph.edges {
        elements.push(Element::Edge {
            data: EdgeData {
                source: edge.source.clone(),
                target: edge.target.clone(),
            },
        });
    }

    elements
}

fn icon_path(station: &str) -> String {
    format!("/assets/{}.png", station.to_lowercase().replace(' ', "_"))
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: generates a self-contained HTML string.
pub fn generate_inspection_html(
    topology: &Topology,
    graph: &RouteGraph,
    config: &VisualizationConfig,
) -> Result<String, SpoolError> {
    if graph.is_empty() {
        return Ok("<div>No stations to visualize.</div>".to_string());
    }

    let elements = cytoscape_elements(topology, graph, config);
    // Station names are free text; keep them from closing the script block.
    let elements_json = serde_json::to_string(&elements)?.replace("</", "<\\/");

    let filter_buttons: String = std::iter::once("All")
        .chain(topology.spool_types())
        .map(|t| {
            let arg = Value::String(t.to_string());
            format!(
                r##"<button onclick='filterType({arg})'>{label}</button>"##,
                arg = escape_html(&arg.to_string()),
                label = escape_html(t)
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    let html = format!(
        r##"<div style="background:#e8f2ff; border-radius:8px;">
  <div id="toolbar" style="padding:6px; border-bottom:1px solid #94a3b8; display:flex; flex-wrap:wrap; gap:6px; font-family:sans-serif; font-size:12px;">
    <b>View:</b>
    <button onclick="fitView()">Fit</button>
    <button onclick="zoomIn()">Zoom +</button>
    <button onclick="zoomOut()">Zoom -</button>
    <button onclick="togglePan()">Pan</button>
    <button onclick="toggleBadges()">Toggle W/H</button>
    <span style="margin-left:12px"><b>Spool type:</b></span>
    {filter_buttons}
  </div>
  <div id="cy" style="width:100%; height:{height}px;"></div>
</div>
<script src="{cytoscape_src}"></script>
<script>
var panEnabled = false;
var cy = cytoscape({{
  container: document.getElementById('cy'),
  elements: {elements_json},
  layout: {{ name: 'preset' }},
  userZoomingEnabled: false,
  userPanningEnabled: false,
  style: [
    {{ selector: 'node[type = "station"]',
       style: {{ shape: 'round-rectangle', width: 160, height: 100,
                 'background-image': 'data(icon)', 'background-fit': 'cover',
                 'border-width': 2, 'border-color': '#1e3a8a', label: 'data(label)',
                 'text-halign': 'center', 'text-valign': 'center',
                 'font-size': '13px', color: '#ffffff' }} }},
    {{ selector: 'node[type = "badge"]',
       style: {{ shape: 'round-rectangle', width: 100, height: 28,
                 'background-color': '#f1f5f9', 'border-width': 1, 'border-color': '#64748b',
                 label: 'data(label)', 'font-size': '11px', color: '#0f172a' }} }},
    {{ selector: 'edge',
       style: {{ width: 2, 'line-color': '#64748b', 'target-arrow-shape': 'triangle' }} }}
  ]
}});
function fitView() {{ cy.fit(); }}
function zoomIn() {{ cy.zoom(cy.zoom() * 1.2); }}
function zoomOut() {{ cy.zoom(cy.zoom() / 1.2); }}
function togglePan() {{ panEnabled = !panEnabled; cy.userPanningEnabled(panEnabled); }}
function toggleBadges() {{
  var badges = cy.nodes('node[type = "badge"]');
  badges.visible() ? badges.hide() : badges.show();
}}
function filterType(type) {{
  if (type === 'All') {{ cy.elements().show(); cy.fit(); return; }}
  cy.nodes('node[type = "station"]').forEach(function(n) {{
    n.data('spool_types').includes(type) ? n.show() : n.hide();
  }});
  cy.nodes('node[type = "badge"]').forEach(function(b) {{
    cy.getElementById(b.data('station_id')).visible() ? b.show() : b.hide();
  }});
  cy.edges().forEach(function(e) {{
    (e.source().visible() && e.target().visible()) ? e.show() : e.hide();
  }});
  cy.fit();
}}
cy.fit();
</script>"##,
        filter_buttons = filter_buttons,
        height = config.height_px,
        cytoscape_src = CYTOSCAPE_SRC,
        elements_json = elements_json,
    );

    Ok(html)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{compute_load, SpoolRecord};
    use crate::route_graph::canonical_route_graph;
    use crate::topology::shopfloor;

    fn shopfloor_graph() -> (Topology, RouteGraph) {
        let topology = Topology::default();
        let load = compute_load(&topology, &[SpoolRecord::new("KRB m.", "Q3", "II")]);
        let graph = canonical_route_graph(&topology, &load);
        (topology, graph)
    }

    #[test]
    fn station_and_badge_per_node_then_edges() {
        let (topology, graph) = shopfloor_graph();
        let elements = cytoscape_elements(&topology, &graph, &VisualizationConfig::default());

        assert_eq!(elements.len(), 14 * 2 + 13);
        assert!(matches!(elements[0], Element::Node { ref position, .. } if position.x == 140.0));
        assert!(matches!(elements[2], Element::Node { ref position, .. } if position.x == 360.0));
        assert!(matches!(elements[28], Element::Edge { .. }));
    }

    #[test]
    fn badges_show_counts() {
        let (topology, graph) = shopfloor_graph();
        let elements = cytoscape_elements(&topology, &graph, &VisualizationConfig::default());

        let tc = graph
            .nodes
            .iter()
            .position(|n| n.id == shopfloor::TECHNICAL_CONTROL)
            .unwrap();
        let json = serde_json::to_value(&elements[tc * 2 + 1]).unwrap();
        assert_eq!(json["data"]["type"], "badge");
        assert_eq!(json["data"]["label"], "W:0  H:1");
        assert_eq!(json["data"]["id"], "Technical Control_badge");
        assert_eq!(json["position"]["y"], 280.0);

        let station = serde_json::to_value(&elements[tc * 2]).unwrap();
        assert_eq!(
            station["data"]["spool_types"],
            serde_json::json!(["KRB m.", "KRB o.", "SW", "TK"])
        );
        assert_eq!(station["data"]["icon"], "/assets/technical_control.png");
    }

    #[test]
    fn html_embeds_elements_and_filters() {
        let (topology, graph) = shopfloor_graph();
        let html =
            generate_inspection_html(&topology, &graph, &VisualizationConfig::default()).unwrap();

        assert!(html.contains(CYTOSCAPE_SRC));
        assert!(html.contains(r#""label":"W:1  H:0""#));
        assert!(html.contains("filterType(&quot;KRB o.&quot;)"));
        assert!(html.contains(r#""spool_types":["KRB m.","KRB o.","SW","TK"]"#));
        assert!(html.contains("height:520px"));
    }

    #[test]
    fn empty_graph_renders_placeholder() {
        let html = generate_inspection_html(
            &Topology::default(),
            &RouteGraph::default(),
            &VisualizationConfig::default(),
        )
        .unwrap();
        assert_eq!(html, "<div>No stations to visualize.</div>");
    }

    fn single_route(station: &str, spool_type: &str) -> (Topology, RouteGraph) {
        let toml = format!(
            "stations = [{station:?}]\nwitness_stations = [{station:?}]\n\n[routes]\n{spool_type:?} = [{station:?}]\n"
        );
        let topology = Topology::from_toml_str(&toml).unwrap();
        let load = compute_load(&topology, &[SpoolRecord::new(spool_type, "Q1", "I")]);
        let graph = canonical_route_graph(&topology, &load);
        (topology, graph)
    }

    #[test]
    fn quotes_in_spool_types_stay_inside_the_onclick_attribute() {
        let (topology, graph) = single_route("A", "O'K");
        let html =
            generate_inspection_html(&topology, &graph, &VisualizationConfig::default()).unwrap();

        assert!(html.contains("filterType(&quot;O&#39;K&quot;)"));
        assert!(!html.contains("filterType(\"O'K\")"));
    }

    #[test]
    fn station_names_cannot_close_the_script_block() {
        let (topology, graph) = single_route("A</script><b>x", "X");
        let html =
            generate_inspection_html(&topology, &graph, &VisualizationConfig::default()).unwrap();

        // one for the cytoscape loader, one for the inline script
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains(r#""id":"A<\/script><b>x""#));
    }
}
