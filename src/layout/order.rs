use super::*;

/// Stable visual order for siblings. Incoming order is never trusted, so
/// re-fetched records in a different order lay out identically.
pub fn order_siblings(nodes: &[EmployeeNode]) -> Vec<&EmployeeNode> {
    let mut ordered: Vec<&EmployeeNode> = nodes.iter().collect();
    ordered.sort_by(|a, b| compare_siblings(a, b));
    ordered
}

/// Affiliation, then department, then display name (missing values last at
/// each level), with the id as the final tie-break.
pub fn compare_siblings(a: &EmployeeNode, b: &EmployeeNode) -> Ordering {
    missing_last(a.affiliation(), b.affiliation())
        .then_with(|| missing_last(a.department_name(), b.department_name()))
        .then_with(|| missing_last(a.display_name(), b.display_name()))
        .then_with(|| a.id.cmp(&b.id))
}

fn missing_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nodes: &[&EmployeeNode]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn clusters_by_affiliation_then_department_then_name() {
        let nodes = vec![
            EmployeeNode::new("1", "Zoe"),
            EmployeeNode::new("2", "Adam").with_department("Ops"),
            EmployeeNode::new("3", "Mia").with_affiliation("Y"),
            EmployeeNode::new("4", "Bea").with_affiliation("X").with_department("Sales"),
            EmployeeNode::new("5", "Al").with_affiliation("X").with_department("Ops"),
            EmployeeNode::new("6", "Cy").with_affiliation("X"),
            EmployeeNode::new("7", "Ann").with_department("Ops"),
        ];
        let ordered = order_siblings(&nodes);
        assert_eq!(ids(&ordered), ["5", "4", "6", "3", "2", "7", "1"]);
    }

    #[test]
    fn blank_names_sort_last() {
        let nodes = vec![EmployeeNode::new("a", ""), EmployeeNode::new("b", "Bo")];
        assert_eq!(ids(&order_siblings(&nodes)), ["b", "a"]);
    }

    #[test]
    fn duplicate_names_break_ties_by_id() {
        let nodes = vec![
            EmployeeNode::new("e2", "Sam"),
            EmployeeNode::new("e1", "Sam"),
        ];
        assert_eq!(ids(&order_siblings(&nodes)), ["e1", "e2"]);
    }

    #[test]
    fn order_ignores_input_permutation() {
        let mut nodes = vec![
            EmployeeNode::new("a", "Kim").with_affiliation("ACME"),
            EmployeeNode::new("b", "Lee").with_department("Finance"),
            EmployeeNode::new("c", "Max"),
            EmployeeNode::new("d", "Kim").with_affiliation("ACME"),
        ];
        let expected = ids(&order_siblings(&nodes));
        nodes.reverse();
        assert_eq!(ids(&order_siblings(&nodes)), expected);
        nodes.rotate_left(1);
        assert_eq!(ids(&order_siblings(&nodes)), expected);
    }
}
