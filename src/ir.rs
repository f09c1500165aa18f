use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How a node arranges its direct children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
    Grouped,
}

impl LayoutMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "grouped" | "group" => Some(Self::Grouped),
            _ => None,
        }
    }

    /// Unknown tokens degrade to [`LayoutMode::Horizontal`] instead of failing.
    pub fn parse_or_default(token: &str) -> Self {
        Self::from_token(token).unwrap_or_else(|| {
            debug!(token:?; "Unrecognized layout mode, using horizontal");
            Self::default()
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Grouped => "grouped",
        }
    }
}

/// Any value is accepted: strings go through [`LayoutMode::parse_or_default`],
/// everything else (null, numbers, objects) lands on horizontal.
impl<'de> Deserialize<'de> for LayoutMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(token) => Self::parse_or_default(&token),
            Value::Null => Self::default(),
            other => {
                debug!(value:% = other; "Non-string layout mode, using horizontal");
                Self::default()
            }
        })
    }
}

/// Per-node layout mode lookup, keyed by employee id.
pub type LayoutModes = BTreeMap<String, LayoutMode>;

/// Converts a raw string map (as persisted by a settings store) into [`LayoutModes`].
pub fn modes_from_tokens<'a, I>(entries: I) -> LayoutModes
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(id, token)| (id.to_string(), LayoutMode::parse_or_default(token)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub affiliation_id: Option<String>,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub performance_rating: Option<f32>,
    #[serde(default)]
    pub potential_rating: Option<f32>,
    #[serde(default)]
    pub layout_direction: LayoutMode,
    #[serde(default)]
    pub children: Vec<EmployeeNode>,
}

impl EmployeeNode {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }

    pub fn with_affiliation(mut self, affiliation: &str) -> Self {
        self.affiliation_id = Some(affiliation.to_string());
        self
    }

    pub fn with_manager(mut self, manager: &str) -> Self {
        self.manager_id = Some(manager.to_string());
        self
    }

    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_direction = mode;
        self
    }

    pub fn with_children(mut self, children: Vec<EmployeeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        non_blank(Some(self.name.as_str()))
    }

    /// Affiliation id, treating blank values as missing.
    pub fn affiliation(&self) -> Option<&str> {
        non_blank(self.affiliation_id.as_deref())
    }

    /// Department name, treating blank values as missing.
    pub fn department_name(&self) -> Option<&str> {
        non_blank(self.department.as_deref())
    }

    pub fn manager(&self) -> Option<&str> {
        non_blank(self.manager_id.as_deref())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The mode map wins over the node's own declared direction.
    pub fn effective_mode(&self, modes: &LayoutModes) -> LayoutMode {
        modes
            .get(&self.id)
            .copied()
            .unwrap_or(self.layout_direction)
    }

    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
