mod group;
mod order;
pub(crate) mod types;
pub use group::{ChildGroup, partition_groups};
pub use order::{compare_siblings, order_siblings};
pub use types::*;

use crate::config::LayoutConfig;
use crate::error::StructuralError;
use crate::ir::{EmployeeNode, LayoutMode, LayoutModes};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Lays out a whole forest from the root row. Any mode change anywhere in the
/// tree needs a fresh call here, since sibling widths elsewhere can shift.
pub fn compute_layout(
    roots: &[EmployeeNode],
    modes: &LayoutModes,
    config: &LayoutConfig,
) -> Result<OrgLayout, StructuralError> {
    let layout = layout_siblings(roots, 0, None, 0.0, modes, config)?;
    debug!(
        roots = roots.len(),
        nodes = layout.nodes.len(),
        width = layout.width,
        height = layout.height;
        "Computed org chart layout"
    );
    Ok(layout)
}

/// Lays out one sibling list whose row sits at `depth * row_height`, starting
/// at `x_start`. Edges to `parent_id` are emitted when it is set.
pub fn layout_siblings(
    siblings: &[EmployeeNode],
    depth: usize,
    parent_id: Option<&str>,
    x_start: f32,
    modes: &LayoutModes,
    config: &LayoutConfig,
) -> Result<OrgLayout, StructuralError> {
    let mut placer = Placer::new(modes, config);
    let mut out = OrgLayout::default();
    let origin = (x_start, depth as f32 * config.row_height);
    let (width, height) = placer.place_siblings(siblings, depth, parent_id, origin, &mut out)?;
    out.width = width;
    out.height = height;
    Ok(out)
}

struct Placer<'a> {
    modes: &'a LayoutModes,
    config: &'a LayoutConfig,
    seen: HashSet<&'a str>,
}

impl<'a> Placer<'a> {
    fn new(modes: &'a LayoutModes, config: &'a LayoutConfig) -> Self {
        Self {
            modes,
            config,
            seen: HashSet::new(),
        }
    }

    fn place_siblings(
        &mut self,
        siblings: &'a [EmployeeNode],
        depth: usize,
        parent: Option<&str>,
        origin: (f32, f32),
        out: &mut OrgLayout,
    ) -> Result<(f32, f32), StructuralError> {
        let mut cursor_x = origin.0;
        let mut width = 0.0_f32;
        let mut height = 0.0_f32;
        for node in order_siblings(siblings) {
            let (w, h) = self.place_node(node, depth, parent, (cursor_x, origin.1), out)?;
            cursor_x += w;
            width += w;
            height = height.max(h);
        }
        Ok((width, height))
    }

    /// Places `node` at `at` and everything below it; returns the subtree size.
    fn place_node(
        &mut self,
        node: &'a EmployeeNode,
        depth: usize,
        parent: Option<&str>,
        at: (f32, f32),
        out: &mut OrgLayout,
    ) -> Result<(f32, f32), StructuralError> {
        self.enter(node, depth)?;

        let index = out.nodes.len();
        out.nodes.push(PositionedNode {
            id: node.id.clone(),
            x: at.0,
            y: at.1,
            width: 0.0,
            height: 0.0,
            depth,
        });
        if let Some(parent) = parent {
            out.edges.push(Edge::new(parent, &node.id));
        }

        let row = self.config.row_height;
        let child_origin = (at.0, at.1 + row);
        let (width, height) = if node.is_leaf() {
            (self.config.column_width, row)
        } else {
            let mode = node.effective_mode(self.modes);
            trace!(id = node.id.as_str(), mode = mode.as_str(), depth; "Placing children");
            match mode {
                LayoutMode::Horizontal => {
                    let (w, h) = self.place_siblings(
                        &node.children,
                        depth + 1,
                        Some(node.id.as_str()),
                        child_origin,
                        out,
                    )?;
                    (w, row + h)
                }
                LayoutMode::Vertical => {
                    let members = order_siblings(&node.children);
                    let (w, h) = self.place_column(&members, &node.id, depth + 1, child_origin, out)?;
                    (w, row + h)
                }
                LayoutMode::Grouped => {
                    let (w, h) = self.place_groups(node, depth + 1, child_origin, out)?;
                    (w, row + h)
                }
            }
        };

        let placed = &mut out.nodes[index];
        placed.width = width;
        placed.height = height;
        Ok((width, height))
    }

    /// Stacks each member as its own single-node column, advancing by the
    /// member's true subtree height so deep chains never collide.
    fn place_column(
        &mut self,
        members: &[&'a EmployeeNode],
        parent: &str,
        depth: usize,
        origin: (f32, f32),
        out: &mut OrgLayout,
    ) -> Result<(f32, f32), StructuralError> {
        let mut cursor_y = origin.1;
        let mut width = self.config.column_width;
        let mut height = 0.0_f32;
        for &member in members {
            let (w, h) = self.place_node(member, depth, Some(parent), (origin.0, cursor_y), out)?;
            cursor_y += h;
            height += h;
            width = width.max(w);
        }
        Ok((width, height))
    }

    fn place_groups(
        &mut self,
        node: &'a EmployeeNode,
        depth: usize,
        origin: (f32, f32),
        out: &mut OrgLayout,
    ) -> Result<(f32, f32), StructuralError> {
        let groups = partition_groups(&node.children, &self.config.other_group_label);
        let mut column_x = origin.0;
        let mut width = 0.0_f32;
        let mut height = 0.0_f32;
        for group in groups {
            let index = out.groups.len();
            out.groups.push(GroupColumn {
                parent: node.id.clone(),
                label: group.label,
                kind: group.kind,
                x: column_x,
                y: origin.1,
                width: 0.0,
                height: 0.0,
                members: group.members.iter().map(|m| m.id.clone()).collect(),
            });
            let (w, h) = self.place_column(&group.members, &node.id, depth, (column_x, origin.1), out)?;
            let column = &mut out.groups[index];
            column.width = w;
            column.height = h;
            column_x += w;
            width += w;
            height = height.max(h);
        }
        Ok((width, height))
    }

    fn enter(&mut self, node: &'a EmployeeNode, depth: usize) -> Result<(), StructuralError> {
        if !self.config.structural_guard {
            return Ok(());
        }
        if depth > self.config.max_depth {
            return Err(StructuralError::DepthExceeded {
                id: node.id.clone(),
                max_depth: self.config.max_depth,
            });
        }
        if !self.seen.insert(node.id.as_str()) {
            return Err(StructuralError::DuplicateNode(node.id.clone()));
        }
        Ok(())
    }
}
