use crate::color::GroupColors;
use crate::config::Config;
use crate::error::StructuralError;
use crate::ir::{EmployeeNode, LayoutMode, LayoutModes};
use crate::layout::{Edge, GroupColumn, compute_layout, order_siblings};
use log::debug;
use std::collections::HashMap;
use std::fmt::Write as _;

/// A positioned employee with the metadata a rendering surface needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
    pub affiliation_id: Option<String>,
    pub status: String,
    pub performance_rating: Option<f32>,
    pub potential_rating: Option<f32>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub mode: LayoutMode,
    pub has_children: bool,
    pub group_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    pub groups: Vec<GroupColumn>,
    pub width: f32,
    pub height: f32,
    pub cache_key: String,
}

impl OrgGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Runs the layout and flattens it into node and edge lists ready for rendering.
pub fn assemble(
    roots: &[EmployeeNode],
    modes: &LayoutModes,
    config: &Config,
) -> Result<OrgGraph, StructuralError> {
    let layout = compute_layout(roots, modes, &config.layout)?;

    let records = collect_records(roots);
    let colors = GroupColors::new(&config.colors);

    let nodes: Vec<GraphNode> = layout
        .nodes
        .iter()
        .filter_map(|placed| {
            let employee = records.get(placed.id.as_str())?;
            Some(GraphNode {
                id: placed.id.clone(),
                name: employee.name.clone(),
                role: employee.role.clone(),
                department: employee.department_name().map(str::to_string),
                affiliation_id: employee.affiliation().map(str::to_string),
                status: employee.status.clone(),
                performance_rating: employee.performance_rating,
                potential_rating: employee.potential_rating,
                x: placed.x,
                y: placed.y,
                width: placed.width,
                height: placed.height,
                depth: placed.depth,
                mode: employee.effective_mode(modes),
                has_children: !employee.is_leaf(),
                group_color: colors.color_for_node(employee),
            })
        })
        .collect();

    let cache_key = cache_key(roots);
    debug!(nodes = nodes.len(), edges = layout.edges.len(), key_len = cache_key.len(); "Assembled org graph");

    Ok(OrgGraph {
        nodes,
        edges: layout.edges,
        groups: layout.groups,
        width: layout.width,
        height: layout.height,
        cache_key,
    })
}

/// Content key over `(id, performance, potential, status)` in layout order.
/// Callers compare it between renders to skip re-layouts; the mode map is not
/// part of it and has to be compared separately.
///
/// Backslashes, `|` and `;` inside ids and statuses are backslash-escaped, so two
/// different forests never share a key.
pub fn cache_key(roots: &[EmployeeNode]) -> String {
    let mut key = String::new();
    let mut stack: Vec<&EmployeeNode> = order_siblings(roots).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        push_field(&mut key, &node.id);
        let _ = write!(
            key,
            "|{}|{}|",
            rating_token(node.performance_rating),
            rating_token(node.potential_rating)
        );
        push_field(&mut key, &node.status);
        key.push(';');
        stack.extend(order_siblings(&node.children).into_iter().rev());
    }
    key
}

fn push_field(key: &mut String, value: &str) {
    for ch in value.chars() {
        if matches!(ch, '\\' | '|' | ';') {
            key.push('\\');
        }
        key.push(ch);
    }
}

fn rating_token(rating: Option<f32>) -> String {
    rating.map_or_else(|| "-".to_string(), |value| value.to_string())
}

fn collect_records<'a>(roots: &'a [EmployeeNode]) -> HashMap<&'a str, &'a EmployeeNode> {
    let mut records = HashMap::new();
    let mut stack: Vec<&EmployeeNode> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        records.entry(node.id.as_str()).or_insert(node);
        stack.extend(&node.children);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color_for;
    use std::collections::BTreeMap;

    fn employee(id: &str, status: &str, ratings: (Option<f32>, Option<f32>)) -> EmployeeNode {
        let mut node = EmployeeNode::new(id, id);
        node.status = status.to_string();
        node.performance_rating = ratings.0;
        node.potential_rating = ratings.1;
        node
    }

    fn sample() -> Vec<EmployeeNode> {
        vec![
            employee("m", "active", (Some(3.0), Some(2.5))).with_children(vec![
                employee("b", "leave", (None, Some(1.0))).with_department("Ops"),
                employee("a", "active", (Some(2.0), None)).with_affiliation("ACME"),
            ]),
        ]
    }

    #[test]
    fn key_follows_layout_order() {
        assert_eq!(cache_key(&sample()), "m|3|2.5|active;a|2|-|active;b|-|1|leave;");
        assert_eq!(cache_key(&[]), "");
    }

    #[test]
    fn key_ignores_input_order_and_visual_fields() {
        let mut reordered = sample();
        reordered[0].children.reverse();
        reordered[0].children[0].role = "Lead".to_string();
        reordered[0].layout_direction = LayoutMode::Vertical;
        assert_eq!(cache_key(&reordered), cache_key(&sample()));
    }

    #[test]
    fn delimiters_inside_fields_cannot_forge_a_key() {
        let merged = vec![employee("x|1|1|s;y", "t", (None, None))];
        let split = vec![
            employee("x", "s", (Some(1.0), Some(1.0))),
            employee("y", "t", (None, None)),
        ];
        assert_eq!(cache_key(&split), "x|1|1|s;y|-|-|t;");
        assert_ne!(cache_key(&merged), cache_key(&split));
        assert_eq!(cache_key(&merged), r"x\|1\|1\|s\;y|-|-|t;");

        let status = vec![employee("a", "on;leave", (None, None))];
        let escaped = vec![employee("a", r"on\;leave", (None, None))];
        assert_ne!(cache_key(&status), cache_key(&escaped));
    }

    #[test]
    fn key_changes_with_ratings_and_status() {
        let base = cache_key(&sample());
        let mut changed = sample();
        changed[0].children[1].performance_rating = Some(4.0);
        assert_ne!(cache_key(&changed), base);

        let mut changed = sample();
        changed[0].status = "terminated".to_string();
        assert_ne!(cache_key(&changed), base);
    }

    #[test]
    fn assembled_nodes_carry_metadata_and_geometry() {
        let graph = assemble(&sample(), &LayoutModes::new(), &Config::default()).expect("assemble");
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["m", "a", "b"]);
        assert_eq!(graph.edges, vec![Edge::new("m", "a"), Edge::new("m", "b")]);
        assert_eq!(graph.cache_key, cache_key(&sample()));

        let a = graph.node("a").expect("a");
        assert_eq!(a.group_color.as_deref(), Some(color_for("ACME", &BTreeMap::new()).as_str()));
        assert_eq!(a.y, 120.0);
        assert!(!a.has_children);

        let m = graph.node("m").expect("m");
        assert!(m.has_children);
        assert_eq!(m.group_color, None);
        assert_eq!(m.mode, LayoutMode::Horizontal);
        assert_eq!((graph.width, graph.height), (480.0, 240.0));
    }

    #[test]
    fn color_overrides_reach_nodes() {
        let mut config = Config::default();
        config.colors.overrides.insert("Ops".to_string(), "#fff".to_string());
        let graph = assemble(&sample(), &LayoutModes::new(), &config).expect("assemble");
        assert_eq!(graph.node("b").and_then(|n| n.group_color.as_deref()), Some("#fff"));
    }

    #[test]
    fn mode_map_is_reported_per_node() {
        let mut modes = LayoutModes::new();
        modes.insert("m".to_string(), LayoutMode::Grouped);
        let graph = assemble(&sample(), &modes, &Config::default()).expect("assemble");
        assert_eq!(graph.node("m").map(|n| n.mode), Some(LayoutMode::Grouped));
        assert_eq!(graph.groups.len(), 2);
    }

    #[test]
    fn empty_tree_is_an_empty_graph() {
        let graph = assemble(&[], &LayoutModes::new(), &Config::default()).expect("assemble");
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.cache_key, "");
    }
}
