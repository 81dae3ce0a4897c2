//! Menu tree reconstruction and deduplication

use crate::identity::canonical_menu_keys;
use crate::item::MenuItem;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Rebuild a forest from a flat list using `parent_id` references.
///
/// Input that already carries children is returned unchanged. Otherwise
/// every item is stamped with its input index as `order`, items whose parent
/// is empty or unknown become roots, and siblings keep their input order.
pub fn build_menu_tree(items: Vec<MenuItem>) -> Vec<MenuItem> {
    if items.iter().any(|item| !item.children.is_empty()) {
        return items;
    }

    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, item) in items.iter().enumerate() {
        if !item.id.is_empty() {
            index.entry(item.id.as_str()).or_insert(i);
        }
    }

    let mut children_of: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut roots = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let parent = item.parent_id.as_str();
        if parent.is_empty() {
            roots.push(i);
            continue;
        }
        if item.id.is_empty() {
            debug!("Menu item without id references parent {}; treating as root", parent);
            roots.push(i);
            continue;
        }
        match index.get(parent) {
            Some(&p) if p != i => children_of.entry(p).or_default().push(i),
            _ => {
                debug!("Menu item {} has unknown parent {}; treating as root", item.id, parent);
                roots.push(i);
            }
        }
    }

    let mut slots: Vec<Option<MenuItem>> = items
        .into_iter()
        .enumerate()
        .map(|(i, mut item)| {
            item.order = i;
            Some(item)
        })
        .collect();

    let mut forest = Vec::with_capacity(roots.len());
    for root in roots {
        if let Some(node) = assemble(root, &mut slots, &children_of) {
            forest.push(node);
        }
    }

    // Items caught in a parent cycle are never reached from a root
    for i in 0..slots.len() {
        if slots[i].is_some() {
            debug!("Menu item at position {} is part of a parent cycle; treating as root", i);
            if let Some(node) = assemble(i, &mut slots, &children_of) {
                forest.push(node);
            }
        }
    }

    forest
}

fn assemble(
    i: usize,
    slots: &mut [Option<MenuItem>],
    children_of: &FxHashMap<usize, Vec<usize>>,
) -> Option<MenuItem> {
    let mut node = slots[i].take()?;
    if let Some(children) = children_of.get(&i) {
        for &child in children {
            if let Some(child) = assemble(child, slots, children_of) {
                node.children.push(child);
            }
        }
    }
    Some(node)
}

/// Drop every item sharing a canonical key with an earlier item (first wins)
pub fn dedupe_menu_items(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut kept = Vec::with_capacity(items.len());

    for item in items {
        let keys = canonical_menu_keys(&item);
        if keys.iter().any(|key| seen.contains(key)) {
            debug!("Dropping duplicate menu item {}", item.id);
            continue;
        }
        seen.extend(keys);
        kept.push(item);
    }

    kept
}
