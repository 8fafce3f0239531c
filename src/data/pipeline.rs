use super::model::{Group, PipelineResult, Record};

/// Turn raw records into groups ready for display.
///
/// 1. Drop records whose label is absent or blank.
/// 2. Stable-sort by `(group_key, label)`; labels compare case-sensitively,
///    so equal pairs keep their input order.
/// 3. Cut the sorted run into one [`Group`] per key.
///
/// Total over any input: empty or fully filtered input gives zero groups.
pub fn transform(records: Vec<Record>) -> PipelineResult {
    let total = records.len();
    let mut kept: Vec<Record> = records
        .into_iter()
        .filter(|r| r.visible_label().is_some())
        .collect();
    log::debug!("kept {} of {total} records with a visible label", kept.len());

    // `sort_by` is stable.
    kept.sort_by(|a, b| {
        a.group_key
            .cmp(&b.group_key)
            .then_with(|| a.label.cmp(&b.label))
    });

    PipelineResult::from_groups(group_runs(kept))
}

/// Split key-sorted records into consecutive runs.
fn group_runs(sorted: Vec<Record>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for record in sorted {
        match groups.last_mut() {
            Some(group) if group.group_key() == record.group_key => group.push(record),
            _ => groups.push(Group::starting_with(record)),
        }
    }
    groups
}
