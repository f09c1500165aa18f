use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::StructuralError;
use crate::ir::EmployeeNode;
use log::{debug, warn};
use std::cmp::Reverse;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// [`build_forest_with_max_depth`] with the default depth limit.
pub fn build_forest(records: Vec<EmployeeNode>) -> Result<Vec<EmployeeNode>, StructuralError> {
    build_forest_with_max_depth(records, DEFAULT_MAX_DEPTH)
}

/// Resolves `manager_id` back-references in a flat record list into an owned
/// forest. Children keep their input order; the layout re-orders them anyway.
///
/// Records without a manager, or whose manager is not in the list, become
/// roots. Duplicate ids, manager cycles and reporting chains deeper than
/// `max_depth` are structural errors. Nothing here recurses, so arbitrarily
/// long chains are rejected instead of exhausting the stack.
pub fn build_forest_with_max_depth(
    records: Vec<EmployeeNode>,
    max_depth: usize,
) -> Result<Vec<EmployeeNode>, StructuralError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if index.insert(record.id.as_str(), idx).is_some() {
            return Err(StructuralError::DuplicateNode(record.id.clone()));
        }
    }

    let parents: Vec<Option<usize>> = records
        .iter()
        .map(|record| {
            let manager = record.manager()?;
            let parent = index.get(manager).copied();
            if parent.is_none() {
                warn!(id = record.id.as_str(), manager; "Manager not found, treating employee as a root");
            }
            parent
        })
        .collect();

    let depths = resolve_depths(&records, &parents)?;
    if let Some(idx) = depths.iter().position(|&depth| depth > max_depth) {
        return Err(StructuralError::DepthExceeded {
            id: records[idx].id.clone(),
            max_depth,
        });
    }

    // Deepest first, so every subtree is complete before it moves into its
    // manager. The stable sort keeps input order among peers.
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&idx| Reverse(depths[idx]));

    let mut slots: Vec<Option<EmployeeNode>> = records.into_iter().map(Some).collect();
    let mut unreachable: Vec<String> = Vec::new();
    for idx in order {
        let Some(parent) = parents[idx] else {
            continue;
        };
        let Some(node) = slots[idx].take() else {
            continue;
        };
        match slots[parent].as_mut() {
            Some(manager) => manager.children.push(node),
            // Safety net: a manager only moves after all of its reports, so
            // this fires only if the depth ordering above is broken.
            None => unreachable.push(node.id),
        }
    }
    if !unreachable.is_empty() {
        return Err(StructuralError::Unreachable(unreachable));
    }

    let forest: Vec<EmployeeNode> = slots.into_iter().flatten().collect();
    debug!(roots = forest.len(), max_depth; "Built org forest");
    Ok(forest)
}

/// Walks each manager chain once, iteratively. Returns every record's depth
/// below its root, or the first loop found.
fn resolve_depths(
    records: &[EmployeeNode],
    parents: &[Option<usize>],
) -> Result<Vec<usize>, StructuralError> {
    let mut state = vec![Visit::New; records.len()];
    let mut depths = vec![0usize; records.len()];
    for start in 0..records.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut above: Option<usize> = None;
        let mut current = Some(start);
        while let Some(idx) = current {
            match state[idx] {
                Visit::Done => {
                    above = Some(depths[idx]);
                    break;
                }
                Visit::Active => {
                    let from = path.iter().position(|&p| p == idx).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[from..].iter().map(|&p| records[p].id.clone()).collect();
                    cycle.push(records[idx].id.clone());
                    return Err(StructuralError::Cycle(cycle));
                }
                Visit::New => {
                    state[idx] = Visit::Active;
                    path.push(idx);
                    current = parents[idx];
                }
            }
        }

        let mut depth = above.map_or(0, |d| d + 1);
        for &idx in path.iter().rev() {
            depths[idx] = depth;
            state[idx] = Visit::Done;
            depth += 1;
        }
    }
    Ok(depths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, manager: Option<&str>) -> EmployeeNode {
        let node = EmployeeNode::new(id, id);
        match manager {
            Some(manager) => node.with_manager(manager),
            None => node,
        }
    }

    fn child_ids(node: &EmployeeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn nests_records_under_their_managers() {
        let forest = build_forest(vec![
            record("c", Some("b")),
            record("a", None),
            record("b", Some("a")),
            record("d", Some("a")),
        ])
        .expect("forest");
        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.id, "a");
        assert_eq!(child_ids(root), ["b", "d"]);
        assert_eq!(child_ids(&root.children[0]), ["c"]);
        assert_eq!(root.subtree_len(), 4);
    }

    #[test]
    fn unknown_or_blank_manager_becomes_root() {
        let forest = build_forest(vec![
            record("a", Some("ghost")),
            record("b", Some(" ")),
            record("c", Some("a")),
        ])
        .expect("forest");
        let roots: Vec<&str> = forest.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, ["a", "b"]);
        assert_eq!(child_ids(&forest[0]), ["c"]);
    }

    #[test]
    fn empty_input_is_empty_forest() {
        assert!(build_forest(Vec::new()).expect("forest").is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = build_forest(vec![record("a", None), record("a", None)]).expect_err("dup");
        assert_eq!(err, StructuralError::DuplicateNode("a".to_string()));
    }

    #[test]
    fn rejects_self_management() {
        let err = build_forest(vec![record("a", Some("a"))]).expect_err("cycle");
        assert_eq!(err, StructuralError::Cycle(vec!["a".into(), "a".into()]));
    }

    #[test]
    fn reports_cycle_path() {
        let err = build_forest(vec![
            record("root", None),
            record("x", Some("root")),
            record("a", Some("b")),
            record("b", Some("c")),
            record("c", Some("a")),
        ])
        .expect_err("cycle");
        assert_eq!(
            err,
            StructuralError::Cycle(vec!["a".into(), "b".into(), "c".into(), "a".into()])
        );
    }

    #[test]
    fn cycle_reached_through_a_tail_reports_only_the_loop() {
        let err = build_forest(vec![
            record("t", Some("a")),
            record("a", Some("b")),
            record("b", Some("a")),
        ])
        .expect_err("cycle");
        assert_eq!(err, StructuralError::Cycle(vec!["a".into(), "b".into(), "a".into()]));
    }

    fn chain(len: usize) -> Vec<EmployeeNode> {
        (0..len)
            .map(|i| {
                let id = format!("c{i}");
                if i == 0 {
                    record(&id, None)
                } else {
                    record(&id, Some(format!("c{}", i - 1).as_str()))
                }
            })
            .collect()
    }

    #[test]
    fn depths_follow_manager_chains_in_any_order() {
        let mut records = chain(6);
        records.reverse();
        let forest = build_forest_with_max_depth(records, 5).expect("forest");
        assert_eq!(forest.len(), 1);
        let mut node = &forest[0];
        let mut depth = 0;
        while let Some(child) = node.children.first() {
            node = child;
            depth += 1;
        }
        assert_eq!((node.id.as_str(), depth), ("c5", 5));
    }

    #[test]
    fn chain_past_the_limit_is_rejected() {
        let err = build_forest_with_max_depth(chain(6), 3).expect_err("too deep");
        assert_eq!(
            err,
            StructuralError::DepthExceeded {
                id: "c4".to_string(),
                max_depth: 3
            }
        );
    }

    #[test]
    fn very_long_chain_fails_without_exhausting_the_stack() {
        let err = build_forest(chain(5000)).expect_err("too deep");
        assert_eq!(
            err,
            StructuralError::DepthExceeded {
                id: format!("c{}", DEFAULT_MAX_DEPTH + 1),
                max_depth: DEFAULT_MAX_DEPTH
            }
        );
    }

    #[test]
    fn keeps_pre_nested_children() {
        let nested = record("a", None).with_children(vec![record("a1", None)]);
        let forest = build_forest(vec![nested, record("b", Some("a"))]).expect("forest");
        assert_eq!(child_ids(&forest[0]), ["a1", "b"]);
    }
}
