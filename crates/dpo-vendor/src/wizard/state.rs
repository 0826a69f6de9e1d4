use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::section::{SectionData, SectionId};

/// Aggregate of every visited section's sub-state, keyed by section id.
///
/// Entries are replaced wholesale and never pruned; sections that were never written have no key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    sections: BTreeMap<SectionId, SectionData>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SectionId) -> Option<&SectionData> {
        self.sections.get(id)
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.sections.contains_key(id)
    }

    /// Replace the sub-state for `id`, returning what was there before.
    pub fn replace(&mut self, id: SectionId, data: SectionData) -> Option<SectionData> {
        self.sections.insert(id, data)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.keys()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First non-empty string stored under any of `keys`, scanning sections in `order` first and
    /// then any remaining sections in key order.
    pub fn find_text(&self, keys: &[&str], order: &[SectionId]) -> Option<&str> {
        let ordered = order.iter().filter_map(|id| self.sections.get(id));
        let remaining = self
            .sections
            .iter()
            .filter(|(id, _)| !order.contains(*id))
            .map(|(_, data)| data);

        ordered.chain(remaining).find_map(|data| {
            keys.iter().find_map(|key| match data.get(*key) {
                Some(Value::String(text)) if !text.trim().is_empty() => Some(text.as_str()),
                _ => None,
            })
        })
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
