use crate::config::GroupColorConfig;
use crate::ir::EmployeeNode;
use std::collections::BTreeMap;

pub const DEFAULT_GROUP_PALETTE: [&str; 8] = [
    "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
];

/// Folds the label's UTF-16 code units with 32-bit wrapping arithmetic:
/// `hash = unit + ((hash << 5) - hash)`.
pub fn label_hash(label: &str) -> i32 {
    label.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

fn palette_index(label: &str, len: usize) -> usize {
    label_hash(label).unsigned_abs() as usize % len
}

/// Color for an affiliation or department label. Overrides are returned verbatim.
pub fn color_for(label: &str, overrides: &BTreeMap<String, String>) -> String {
    if let Some(color) = overrides.get(label) {
        return color.clone();
    }
    DEFAULT_GROUP_PALETTE[palette_index(label, DEFAULT_GROUP_PALETTE.len())].to_string()
}

/// Config-backed assigner that can carry a custom palette.
#[derive(Debug, Clone)]
pub struct GroupColors<'a> {
    palette: &'a [String],
    overrides: &'a BTreeMap<String, String>,
}

impl<'a> GroupColors<'a> {
    pub fn new(config: &'a GroupColorConfig) -> Self {
        Self {
            palette: &config.palette,
            overrides: &config.overrides,
        }
    }

    pub fn color_for(&self, label: &str) -> String {
        if self.palette.is_empty() {
            return color_for(label, self.overrides);
        }
        if let Some(color) = self.overrides.get(label) {
            return color.clone();
        }
        self.palette[palette_index(label, self.palette.len())].clone()
    }

    /// Affiliation first, then department; `None` when the node has neither.
    pub fn color_for_node(&self, node: &EmployeeNode) -> Option<String> {
        node.affiliation()
            .or_else(|| node.department_name())
            .map(|label| self.color_for(label))
    }
}
