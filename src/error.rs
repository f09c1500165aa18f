use thiserror::Error;

/// Corruption in the reporting structure that makes a layout impossible.
///
/// Malformed-but-acyclic data never produces one of these: unknown layout
/// modes and missing labels degrade to defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("manager cycle detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("employee `{0}` appears more than once in the org tree")]
    DuplicateNode(String),

    #[error("org tree is deeper than {max_depth} levels at employee `{id}`")]
    DepthExceeded { id: String, max_depth: usize },

    #[error("employees not reachable from any root: {}", .0.join(", "))]
    Unreachable(Vec<String>),
}
