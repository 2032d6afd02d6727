//! Partitioning of normalized records by key.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::analyzers::types::{Field, NormalizedRecord, is_blank};
use crate::config::SENTINEL;

/// Records partitioned by key. Keys iterate in first-seen order and each
/// group keeps the original record order. Records are shared, not copied,
/// so one record can sit in several groupings at once.
#[derive(Debug, Clone, Default)]
pub struct Group {
    keys: Vec<String>,
    members: HashMap<String, Vec<Arc<NormalizedRecord>>>,
}

impl Group {
    fn push(&mut self, key: String, record: Arc<NormalizedRecord>) {
        match self.members.get_mut(&key) {
            Some(records) => records.push(record),
            None => {
                self.keys.push(key.clone());
                self.members.insert(key, vec![record]);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Arc<NormalizedRecord>]> {
        self.members.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Arc<NormalizedRecord>])> {
        self.keys
            .iter()
            .map(|k| (k.as_str(), self.members[k].as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of records across all keys.
    pub fn total_records(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }

    /// Record count per key, in key order.
    pub fn sizes(&self) -> Vec<GroupSize> {
        self.iter()
            .map(|(key, records)| GroupSize {
                key: key.to_string(),
                records: records.len(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSize {
    pub key: String,
    pub records: usize,
}

/// Maps an absent or blank key to the sentinel.
pub fn group_key(value: Option<&str>) -> String {
    match value {
        Some(v) if !is_blank(v) => v.to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Groups records by a canonical field.
pub fn group_by(records: &[Arc<NormalizedRecord>], field: Field) -> Group {
    group_with(records, |r| group_key(r.field(field)))
}

/// Groups records by an arbitrary key function.
pub fn group_with<F>(records: &[Arc<NormalizedRecord>], mut key: F) -> Group
where
    F: FnMut(&NormalizedRecord) -> String,
{
    let mut group = Group::default();
    for record in records {
        group.push(key(record), Arc::clone(record));
    }
    group
}

/// Groups records by who ran their practice sessions, falling back to the
/// lecturer grouping key when no practitioner was named.
pub fn group_by_resolved_practitioner(records: &[Arc<NormalizedRecord>]) -> Group {
    group_with(records, |r| {
        let lecturer = group_key(r.field(Field::Lecturer));
        r.resolved_practitioner(&lecturer).to_string()
    })
}
