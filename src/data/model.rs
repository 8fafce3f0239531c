use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record – one element of the source list
// ---------------------------------------------------------------------------

/// A single decoded record.
///
/// The wire names follow the original asset (`listId`, `name`); `groupKey`
/// and `label` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Unique within the source.
    pub id: i64,
    /// Records sharing a key end up in the same [`Group`].
    #[serde(rename = "listId", alias = "groupKey")]
    pub group_key: i64,
    /// May be absent, null or blank in the source.
    #[serde(rename = "name", alias = "label", default)]
    pub label: Option<String>,
}

impl Record {
    pub fn new(id: i64, group_key: i64, label: Option<&str>) -> Self {
        Record {
            id,
            group_key,
            label: label.map(str::to_string),
        }
    }

    /// The label, if present and not made only of whitespace.
    pub fn visible_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Group – a run of records sharing a key
// ---------------------------------------------------------------------------

/// Records sharing one `group_key`, in label order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    #[serde(rename = "listId")]
    group_key: i64,
    #[serde(rename = "items")]
    records: Vec<Record>,
}

impl Group {
    /// Start a group from its first member.
    pub(crate) fn starting_with(first: Record) -> Self {
        Group {
            group_key: first.group_key,
            records: vec![first],
        }
    }

    /// Append a record; the caller guarantees the key matches.
    pub(crate) fn push(&mut self, record: Record) {
        debug_assert_eq!(record.group_key, self.group_key);
        self.records.push(record);
    }

    pub fn group_key(&self) -> i64 {
        self.group_key
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Never true for a group built by the pipeline.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PipelineResult – the complete grouped output
// ---------------------------------------------------------------------------

/// Groups in strictly ascending `group_key` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PipelineResult {
    groups: Vec<Group>,
}

impl PipelineResult {
    pub(crate) fn from_groups(groups: Vec<Group>) -> Self {
        PipelineResult { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Look up a group by key.
    pub fn group(&self, group_key: i64) -> Option<&Group> {
        self.groups
            .binary_search_by_key(&group_key, Group::group_key)
            .ok()
            .map(|i| &self.groups[i])
    }

    /// All records in output order, flattened across groups.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }

    pub fn into_records(self) -> Vec<Record> {
        self.groups.into_iter().flat_map(|g| g.records).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_label_rejects_blank_and_absent() {
        assert_eq!(Record::new(1, 1, None).visible_label(), None);
        assert_eq!(Record::new(1, 1, Some("")).visible_label(), None);
        assert_eq!(Record::new(1, 1, Some(" \t\n")).visible_label(), None);
        assert_eq!(Record::new(1, 1, Some(" a ")).visible_label(), Some(" a "));
    }

    #[test]
    fn group_lookup_uses_key() {
        let mut one = Group::starting_with(Record::new(1, 1, Some("a")));
        one.push(Record::new(2, 1, Some("b")));
        let three = Group::starting_with(Record::new(3, 3, Some("c")));
        let result = PipelineResult::from_groups(vec![one, three]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.record_count(), 3);
        assert_eq!(result.group(1).map(Group::len), Some(2));
        assert_eq!(result.group(3).map(Group::len), Some(1));
        assert!(result.group(2).is_none());
        let ids: Vec<i64> = result.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn serializes_with_original_field_names() {
        let result = PipelineResult::from_groups(vec![Group::starting_with(Record::new(
            7,
            2,
            Some("Item 7"),
        ))]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "listId": 2, "items": [{ "id": 7, "listId": 2, "name": "Item 7" }] }])
        );
    }
}
