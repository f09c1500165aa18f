use super::*;

#[derive(Debug, Clone)]
pub struct ChildGroup<'a> {
    pub kind: GroupKind,
    pub label: String,
    pub members: Vec<&'a EmployeeNode>,
}

/// Splits a grouped node's children into columns: one per affiliation, then one
/// per department among the unaffiliated, then a trailing catch-all.
pub fn partition_groups<'a>(children: &'a [EmployeeNode], other_label: &str) -> Vec<ChildGroup<'a>> {
    let mut by_affiliation: BTreeMap<&str, Vec<&EmployeeNode>> = BTreeMap::new();
    let mut by_department: BTreeMap<&str, Vec<&EmployeeNode>> = BTreeMap::new();
    let mut other = Vec::new();

    for child in order_siblings(children) {
        if let Some(affiliation) = child.affiliation() {
            by_affiliation.entry(affiliation).or_default().push(child);
        } else if let Some(department) = child.department_name() {
            by_department.entry(department).or_default().push(child);
        } else {
            other.push(child);
        }
    }

    let mut groups: Vec<ChildGroup<'a>> = by_affiliation
        .into_iter()
        .map(|(label, members)| ChildGroup {
            kind: GroupKind::Affiliation,
            label: label.to_string(),
            members,
        })
        .collect();
    groups.extend(by_department.into_iter().map(|(label, members)| ChildGroup {
        kind: GroupKind::Department,
        label: label.to_string(),
        members,
    }));
    if !other.is_empty() {
        groups.push(ChildGroup {
            kind: GroupKind::Other,
            label: other_label.to_string(),
            members: other,
        });
    }
    groups
}
