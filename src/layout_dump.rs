use crate::assemble::OrgGraph;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub cache_key: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub groups: Vec<GroupDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
    pub affiliation_id: Option<String>,
    pub status: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub mode: String,
    pub has_children: bool,
    pub group_color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub parent: String,
    pub label: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub members: Vec<String>,
}

impl LayoutDump {
    pub fn from_graph(graph: &OrgGraph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                name: node.name.clone(),
                role: node.role.clone(),
                department: node.department.clone(),
                affiliation_id: node.affiliation_id.clone(),
                status: node.status.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                depth: node.depth,
                mode: node.mode.as_str().to_string(),
                has_children: node.has_children,
                group_color: node.group_color.clone(),
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
            })
            .collect();

        let groups = graph
            .groups
            .iter()
            .map(|group| GroupDump {
                parent: group.parent.clone(),
                label: group.label.clone(),
                kind: group.kind.as_str().to_string(),
                x: group.x,
                y: group.y,
                width: group.width,
                height: group.height,
                members: group.members.clone(),
            })
            .collect();

        LayoutDump {
            width: graph.width,
            height: graph.height,
            cache_key: graph.cache_key.clone(),
            nodes,
            edges,
            groups,
        }
    }
}

pub fn to_json_string(graph: &OrgGraph) -> anyhow::Result<String> {
    let dump = LayoutDump::from_graph(graph);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(path: &Path, graph: &OrgGraph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_graph(graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
