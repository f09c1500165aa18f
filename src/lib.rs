pub mod assemble;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod tree;

pub use assemble::{GraphNode, OrgGraph, assemble, cache_key};
#[cfg(feature = "cli")]
pub use cli::run;
pub use color::{GroupColors, color_for};
pub use config::{Config, LayoutConfig, load_config};
pub use error::StructuralError;
pub use ir::{EmployeeNode, LayoutMode, LayoutModes};
pub use layout::{Edge, GroupColumn, OrgLayout, PositionedNode, compute_layout, layout_siblings, order_siblings};
pub use tree::{build_forest, build_forest_with_max_depth};

/// Resolves flat employee records into a forest and assembles the positioned graph.
///
/// The forest builder always honors `config.layout.max_depth`, even with the
/// structural guard off, so over-deep chains fail before any recursive pass.
pub fn layout_org_chart(
    records: Vec<EmployeeNode>,
    modes: &LayoutModes,
    config: &Config,
) -> Result<OrgGraph, StructuralError> {
    let roots = build_forest_with_max_depth(records, config.layout.max_depth)?;
    assemble(&roots, modes, config)
}
