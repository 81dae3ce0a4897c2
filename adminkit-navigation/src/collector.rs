//! Collects module-contributed menu items into a normalized, deduplicated menu

use crate::error::Result;
use crate::identity::{canonical_menu_code, normalize_menu_item};
use crate::item::MenuItem;
use crate::service::MenuTree;
use crate::tree::dedupe_menu_items;
use tracing::debug;

/// Normalize every item of `items` under `menu_code`
pub fn normalize_menu_items(items: Vec<MenuItem>, menu_code: &str) -> Result<Vec<MenuItem>> {
    let code = canonical_menu_code(menu_code)?;
    items
        .into_iter()
        .map(|item| normalize_menu_item(item, &code))
        .collect()
}

/// Accumulates menu contributions for a single menu.
///
/// Intended as the receiver of a module loader's menu callback: every batch
/// is normalized and merged, and earlier contributions win on duplicates.
#[derive(Debug, Clone)]
pub struct MenuCollector {
    code: String,
    items: Vec<MenuItem>,
}

impl MenuCollector {
    /// Create a collector for `menu_code`
    pub fn new(menu_code: &str) -> Result<Self> {
        Ok(Self {
            code: canonical_menu_code(menu_code)?,
            items: Vec::new(),
        })
    }

    /// Canonical code of the collected menu
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Normalize and merge a batch of items
    pub fn collect(&mut self, items: Vec<MenuItem>) -> Result<()> {
        let incoming = normalize_menu_items(items, &self.code)?;
        let before = self.items.len();

        let mut merged = std::mem::take(&mut self.items);
        merged.extend(incoming);
        self.items = dedupe_menu_items(merged);

        debug!(
            "Collected {} items into menu {}",
            self.items.len().saturating_sub(before),
            self.code
        );
        Ok(())
    }

    /// Collected items, flat and in contribution order
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Convert into a menu tree for a menu service
    pub fn into_menu_tree(self) -> MenuTree {
        MenuTree {
            code: self.code,
            items: self.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MenuTarget;

    #[test]
    fn test_collector_merges_and_dedupes() {
        let mut collector = MenuCollector::new("Admin.Main").unwrap();
        collector
            .collect(vec![MenuItem::new("settings").with_label("Settings")])
            .unwrap();
        collector
            .collect(vec![
                MenuItem::default().with_target(MenuTarget::new().with("key", "settings")),
                MenuItem::new("users").with_label("Users"),
            ])
            .unwrap();

        let ids: Vec<_> = collector.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["admin.main.settings", "admin.main.users"]);

        let tree = collector.into_menu_tree();
        assert_eq!(tree.code, "admin.main");
        assert_eq!(tree.items.len(), 2);
    }

    #[test]
    fn test_collector_rejects_empty_code() {
        assert!(MenuCollector::new("").is_err());
    }
}
