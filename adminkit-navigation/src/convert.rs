//! Conversion of menu items into localized, ordered navigation items

use crate::i18n::{localize, Translator};
use crate::item::{MenuItem, NavigationItem};
use crate::tree::build_menu_tree;
use std::cmp::Ordering;

/// Convert menu items into navigation items.
///
/// Builds the tree, localizes labels and group titles, derives the group
/// title key from the label key and the group title from the label when they
/// are empty, and lifts `collapsible`/`collapsed` from the target.
pub fn convert_menu_items(
    items: &[MenuItem],
    translator: Option<&dyn Translator>,
    locale: &str,
) -> Vec<NavigationItem> {
    build_menu_tree(items.to_vec())
        .into_iter()
        .enumerate()
        .map(|(index, item)| convert_item(item, index, translator, locale))
        .collect()
}

fn convert_item(
    item: MenuItem,
    index: usize,
    translator: Option<&dyn Translator>,
    locale: &str,
) -> NavigationItem {
    let label = localize(translator, &item.label, &item.label_key, locale);
    let (group_title_key, group_title) = localize_group_title(
        translator,
        &item.group_title,
        &item.group_title_key,
        &item.label_key,
        &label,
        locale,
    );

    let collapsible = item.target.collapsible().unwrap_or(false);
    let collapsed = item.target.collapsed().unwrap_or(false);

    let children = item
        .children
        .into_iter()
        .enumerate()
        .map(|(i, child)| convert_item(child, i, translator, locale))
        .collect();

    NavigationItem {
        id: item.id.trim().to_string(),
        kind: item.kind,
        label,
        label_key: item.label_key.trim().to_string(),
        group_title,
        group_title_key,
        icon: item.icon.trim().to_string(),
        position: item.position,
        target: item.target,
        permissions: item.permissions,
        locale: item.locale,
        classes: item.classes,
        styles: item.styles,
        badge: item.badge,
        collapsible,
        collapsed,
        children,
        order: index,
    }
}

fn localize_group_title(
    translator: Option<&dyn Translator>,
    raw_title: &str,
    raw_title_key: &str,
    label_key: &str,
    label: &str,
    locale: &str,
) -> (String, String) {
    let explicit_key = raw_title_key.trim();
    let key = if explicit_key.is_empty() {
        label_key.trim()
    } else {
        explicit_key
    };

    let title = if raw_title.trim().is_empty() && explicit_key.is_empty() {
        label.to_string()
    } else {
        localize(translator, raw_title, key, locale)
    };

    (key.to_string(), title)
}

/// Localize in-memory navigation items for `locale`.
///
/// Items restricted to another locale are dropped. The input is never
/// mutated; the result is a deep copy.
pub fn localize_navigation(
    items: &[NavigationItem],
    translator: Option<&dyn Translator>,
    locale: &str,
) -> Vec<NavigationItem> {
    let locale = locale.trim();
    items
        .iter()
        .filter(|item| locale_matches(item.locale.as_deref(), locale))
        .map(|item| {
            let label = localize(translator, &item.label, &item.label_key, locale);
            let (group_title_key, group_title) = localize_group_title(
                translator,
                &item.group_title,
                &item.group_title_key,
                &item.label_key,
                &label,
                locale,
            );

            NavigationItem {
                label,
                group_title,
                group_title_key,
                collapsible: item.collapsible || item.target.collapsible().unwrap_or(false),
                collapsed: item.collapsed || item.target.collapsed().unwrap_or(false),
                children: localize_navigation(&item.children, translator, locale),
                ..item.clone()
            }
        })
        .collect()
}

fn locale_matches(item_locale: Option<&str>, locale: &str) -> bool {
    match item_locale.map(str::trim) {
        Some(item_locale) if !item_locale.is_empty() && !locale.is_empty() => {
            item_locale == locale
        }
        _ => true,
    }
}

fn compare_siblings(a: &NavigationItem, b: &NavigationItem) -> Ordering {
    let position = match (a.position, b.position) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    position
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.label.cmp(&b.label))
}

/// Sort siblings recursively by position (absent last), order, id, label
pub fn sort_navigation(items: &mut [NavigationItem]) {
    items.sort_by(compare_siblings);
    for item in items.iter_mut() {
        sort_navigation(&mut item.children);
    }
}
