/// A placed employee. `x`/`y` anchor the node's row slot; `width`/`height`
/// cover the node together with every descendant.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
}

impl PositionedNode {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the two boxes share a region of positive area.
    pub fn overlaps(&self, other: &PositionedNode) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &PositionedNode) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKind {
    Affiliation,
    Department,
    Other,
}

impl GroupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Affiliation => "affiliation",
            Self::Department => "department",
            Self::Other => "other",
        }
    }
}

/// One column under a grouped node.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupColumn {
    pub parent: String,
    pub label: String,
    pub kind: GroupKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgLayout {
    /// Pre-order: every node precedes its descendants.
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
    pub groups: Vec<GroupColumn>,
    pub width: f32,
    pub height: f32,
}

impl OrgLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.from == id)
            .map(|edge| edge.to.as_str())
    }

    pub fn groups_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GroupColumn> + 'a {
        self.groups.iter().filter(move |group| group.parent == id)
    }
}
