//! Menu and navigation item types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Kind of a menu node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    /// A navigable entry
    #[default]
    Item,
    /// A titled container that is dropped when it has no visible children
    Group,
    /// A visual divider
    Separator,
}

impl MenuItemKind {
    /// Stable string form
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemKind::Item => "item",
            MenuItemKind::Group => "group",
            MenuItemKind::Separator => "separator",
        }
    }
}

/// Navigation target of a menu item.
///
/// The keys `key`, `path`, `name`, `collapsible` and `collapsed` are
/// understood by the core; everything else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTarget(BTreeMap<String, Value>);

impl MenuTarget {
    /// Create an empty target
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Raw lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the target carries no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    fn string(&self, key: &str) -> &str {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Stable logical id (`key`), trimmed
    pub fn key(&self) -> &str {
        self.string("key")
    }

    /// URL (`path`), trimmed
    pub fn path(&self) -> &str {
        self.string("path")
    }

    /// Route name (`name`), trimmed
    pub fn name(&self) -> &str {
        self.string("name")
    }

    /// `collapsible` flag; accepts booleans and `"true"`/`"false"` strings
    pub fn collapsible(&self) -> Option<bool> {
        self.flag("collapsible")
    }

    /// `collapsed` flag; accepts booleans and `"true"`/`"false"` strings
    pub fn collapsed(&self) -> Option<bool> {
        self.flag("collapsed")
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Trim every string value in place
    pub(crate) fn trim_strings(&mut self) {
        for value in self.0.values_mut() {
            if let Value::String(s) = value {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
        }
    }
}

impl FromIterator<(String, Value)> for MenuTarget {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Returns the trimmed `key` of a target, else its trimmed `path`, else empty
pub fn extract_target_key(target: &MenuTarget) -> &str {
    let key = target.key();
    if key.is_empty() {
        target.path()
    } else {
        key
    }
}

/// A node in a flat or hierarchical menu definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    /// Canonical item path
    pub id: String,
    /// Item code; defaults to the id
    pub code: String,
    /// Canonical menu code the item belongs to
    pub menu: String,

    /// Parent item path (empty for roots)
    pub parent_id: String,
    /// Parent item code (empty for roots)
    pub parent_code: String,

    /// Node kind
    #[serde(rename = "type")]
    pub kind: MenuItemKind,

    /// Display label
    pub label: String,
    /// i18n key for the label
    pub label_key: String,
    /// Group title
    pub group_title: String,
    /// i18n key for the group title
    pub group_title_key: String,
    /// Icon name
    pub icon: String,
    /// Explicit sort position; `None` sorts last
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Navigation target
    pub target: MenuTarget,

    /// Any-of permissions required to see the item
    pub permissions: Vec<String>,
    /// Locale the item is restricted to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// CSS classes, in order
    pub classes: Vec<String>,
    /// Inline styles
    pub styles: BTreeMap<String, String>,
    /// Opaque badge payload
    pub badge: BTreeMap<String, Value>,

    /// Child items
    pub children: Vec<MenuItem>,

    /// Insertion index used to break sort ties
    #[serde(skip)]
    pub order: usize,
}

impl MenuItem {
    /// Create an item with the given raw id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create a separator
    pub fn separator() -> Self {
        Self {
            kind: MenuItemKind::Separator,
            ..Default::default()
        }
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: MenuItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the label i18n key
    pub fn with_label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = key.into();
        self
    }

    /// Set the parent id
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    /// Set the sort position
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    /// Replace the target
    pub fn with_target(mut self, target: MenuTarget) -> Self {
        self.target = target;
        self
    }

    /// Add a required permission
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Restrict to a locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: MenuItem) -> Self {
        self.children.push(child);
        self
    }
}

/// A resolved, localized and filtered menu node ready for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationItem {
    /// Canonical item path
    pub id: String,
    /// Node kind
    #[serde(rename = "type")]
    pub kind: MenuItemKind,
    /// Localized label
    pub label: String,
    /// i18n key for the label
    pub label_key: String,
    /// Localized group title
    pub group_title: String,
    /// i18n key for the group title
    pub group_title_key: String,
    /// Icon name
    pub icon: String,
    /// Explicit sort position; `None` sorts last
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    /// Navigation target
    pub target: MenuTarget,
    /// Any-of permissions required to see the item
    pub permissions: Vec<String>,
    /// Locale the item is restricted to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// CSS classes, in order
    pub classes: Vec<String>,
    /// Inline styles
    pub styles: BTreeMap<String, String>,
    /// Opaque badge payload
    pub badge: BTreeMap<String, Value>,
    /// Whether the node renders as a collapsible section
    pub collapsible: bool,
    /// Whether a collapsible section starts collapsed
    pub collapsed: bool,
    /// Visible children
    pub children: Vec<NavigationItem>,
    /// Insertion index used to break sort ties
    #[serde(skip)]
    pub order: usize,
}

impl NavigationItem {
    /// Create an item with the given id and label
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Create a separator
    pub fn separator() -> Self {
        Self {
            kind: MenuItemKind::Separator,
            ..Default::default()
        }
    }

    /// Create a group
    pub fn group(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MenuItemKind::Group,
            group_title: title.into(),
            ..Default::default()
        }
    }

    /// Set the label i18n key
    pub fn with_label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = key.into();
        self
    }

    /// Set the sort position
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    /// Add a required permission
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Restrict to a locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Mark as collapsible
    pub fn collapsible(mut self) -> Self {
        self.collapsible = true;
        self
    }

    /// Replace the target
    pub fn with_target(mut self, target: MenuTarget) -> Self {
        self.target = target;
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: NavigationItem) -> Self {
        self.children.push(child);
        self
    }

    /// Whether the node is collapsible, directly or through its target
    pub fn is_collapsible(&self) -> bool {
        self.collapsible || self.target.collapsible().unwrap_or(false)
    }

    pub(crate) fn stamp_order(&mut self, order: usize) {
        self.order = order;
        for (index, child) in self.children.iter_mut().enumerate() {
            child.stamp_order(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_accessors() {
        let target = MenuTarget::new()
            .with("key", " settings ")
            .with("path", "/admin/settings")
            .with("collapsible", "true")
            .with("collapsed", false)
            .with("extra", json!({"a": 1}));

        assert_eq!(target.key(), "settings");
        assert_eq!(target.path(), "/admin/settings");
        assert_eq!(target.collapsible(), Some(true));
        assert_eq!(target.collapsed(), Some(false));
        assert_eq!(target.name(), "");
        assert_eq!(target.get("extra"), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_extract_target_key() {
        assert_eq!(extract_target_key(&MenuTarget::new().with("key", " k ")), "k");
        assert_eq!(
            extract_target_key(&MenuTarget::new().with("path", " /p ")),
            "/p"
        );
        assert_eq!(
            extract_target_key(&MenuTarget::new().with("key", "  ").with("path", "/p")),
            "/p"
        );
        assert_eq!(extract_target_key(&MenuTarget::new()), "");
    }

    #[test]
    fn test_menu_item_deserializes_with_defaults() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "admin.main.users",
            "label": "Users",
            "target": {"path": "/admin/users", "badge_color": "red"}
        }))
        .unwrap();

        assert_eq!(item.kind, MenuItemKind::Item);
        assert_eq!(item.position, None);
        assert_eq!(item.target.path(), "/admin/users");
        assert!(item.children.is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_value(MenuItem::separator()).unwrap();
        assert_eq!(json["type"], "separator");
    }
}
