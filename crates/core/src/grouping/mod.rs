//! Grouping of the filtered, sorted list by category and authority.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::{CategoryId, CountryMetadata, EntryField, FilterableItem};
use crate::config::EngineConfig;
use crate::ordering::SortKey;

/// Items of one category, optionally split by issuing authority.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupItem {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub items: Vec<FilterableItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sultan_groups: Option<Vec<SultanGroup>>,
}

/// Items of one category issued under one authority.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SultanGroup {
    pub sultan: String,
    pub items: Vec<FilterableItem>,
}

/// Partition items into category groups.
///
/// Items sharing a category id land in one group labelled with the
/// metadata name; without an id, names match case-insensitively. Known
/// categories come first in display order, then unknown ones; ties and
/// unknowns are alphabetical. Each group keeps the input order. When
/// the sort includes an authority field, each group is further split by
/// authority, alphabetically.
pub fn group_items(
    items: &[FilterableItem],
    metadata: &CountryMetadata,
    sort: &[SortKey],
    config: &EngineConfig,
) -> Vec<GroupItem> {
    let mut groups: Vec<GroupItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let entry = item.entry();
        let raw_name = entry.and_then(|e| e.category_name().or_else(|| e.series()));
        let category_id = entry
            .and_then(|e| e.text_lossy(EntryField::CategoryId))
            .or_else(|| {
                raw_name
                    .and_then(|n| metadata.category_by_name(n))
                    .map(|c| c.id.clone())
            });
        let name = category_id
            .as_deref()
            .and_then(|id| metadata.category(id))
            .map(|c| c.name.as_str())
            .or(raw_name)
            .unwrap_or(config.uncategorized_label.as_str())
            .to_string();

        // One bucket per category id; names only decide when no id resolves.
        let key = match &category_id {
            Some(id) => format!("id:{}", id),
            None => format!("name:{}", name.trim().to_lowercase()),
        };

        match index.get(&key) {
            Some(&i) => groups[i].items.push(item.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(GroupItem {
                    category: name,
                    category_id,
                    items: vec![item.clone()],
                    sultan_groups: None,
                });
            }
        }
    }

    groups.sort_by(|a, b| {
        match (display_order(a, metadata), display_order(b, metadata)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| alphabetical(&a.category, &b.category))
    });

    if sort.iter().any(SortKey::is_authority) {
        for group in &mut groups {
            group.sultan_groups = Some(group_by_authority(&group.items, config));
        }
    }

    groups
}

fn display_order(group: &GroupItem, metadata: &CountryMetadata) -> Option<i64> {
    group
        .category_id
        .as_deref()
        .and_then(|id| metadata.category(id))
        .or_else(|| metadata.category_by_name(&group.category))
        .map(|c| c.display_order)
}

fn group_by_authority(items: &[FilterableItem], config: &EngineConfig) -> Vec<SultanGroup> {
    let mut groups: Vec<SultanGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let sultan = item
            .entry()
            .and_then(|e| e.authority())
            .unwrap_or(config.unknown_authority_label.as_str())
            .to_string();

        match index.get(&sultan) {
            Some(&i) => groups[i].items.push(item.clone()),
            None => {
                index.insert(sultan.clone(), groups.len());
                groups.push(SultanGroup {
                    sultan,
                    items: vec![item.clone()],
                });
            }
        }
    }

    groups.sort_by(|a, b| alphabetical(&a.sultan, &b.sultan));
    groups
}

fn alphabetical(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
