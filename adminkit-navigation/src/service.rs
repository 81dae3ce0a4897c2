//! Menu service contract and an in-memory implementation

use crate::collector::normalize_menu_items;
use crate::context::RequestContext;
use crate::error::Result;
use crate::identity::canonical_menu_code;
use crate::item::MenuItem;
use crate::tree::dedupe_menu_items;
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A menu as returned by a content source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuTree {
    /// Canonical menu code
    pub code: String,
    /// Items, either flat with parent references or already nested
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// CMS-style source of menus.
///
/// Failures are absorbed by the resolver, which falls back to its in-memory
/// navigation; implementations should report them through their own telemetry.
#[async_trait]
pub trait MenuService: Send + Sync {
    /// Fetch the menu `menu_code` for `locale`
    async fn menu(
        &self,
        ctx: &RequestContext,
        menu_code: &str,
        locale: &str,
    ) -> anyhow::Result<MenuTree>;
}

/// Shared menu service handle
pub type SharedMenuService = Arc<dyn MenuService>;

/// Menu service backed by a process-local map of normalized menus
#[derive(Debug, Default)]
pub struct InMemoryMenuService {
    menus: RwLock<FxHashMap<String, Vec<MenuItem>>>,
}

impl InMemoryMenuService {
    /// Create an empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize, dedupe and store `items` as the menu `menu_code`, replacing
    /// any previous content
    pub fn insert_menu(&self, menu_code: &str, items: Vec<MenuItem>) -> Result<()> {
        let code = canonical_menu_code(menu_code)?;
        let items = dedupe_menu_items(normalize_menu_items(items, &code)?);
        debug!("Stored menu {} with {} items", code, items.len());
        self.menus.write().insert(code, items);
        Ok(())
    }

    /// Remove a menu
    pub fn remove_menu(&self, menu_code: &str) -> bool {
        match canonical_menu_code(menu_code) {
            Ok(code) => self.menus.write().remove(&code).is_some(),
            Err(_) => false,
        }
    }

    /// Canonical codes of every stored menu
    pub fn menu_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.menus.read().keys().cloned().collect();
        codes.sort();
        codes
    }
}

fn retain_locale(items: &mut Vec<MenuItem>, locale: &str) {
    items.retain(|item| match item.locale.as_deref() {
        Some(item_locale) if !locale.is_empty() => item_locale == locale,
        _ => true,
    });
    for item in items.iter_mut() {
        retain_locale(&mut item.children, locale);
    }
}

#[async_trait]
impl MenuService for InMemoryMenuService {
    async fn menu(
        &self,
        _ctx: &RequestContext,
        menu_code: &str,
        locale: &str,
    ) -> anyhow::Result<MenuTree> {
        let code = canonical_menu_code(menu_code)?;
        let mut items = self
            .menus
            .read()
            .get(&code)
            .cloned()
            .ok_or_else(|| anyhow!("menu {code} not found"))?;

        retain_locale(&mut items, locale.trim());
        Ok(MenuTree { code, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_service_round_trip() {
        let service = InMemoryMenuService::new();
        service
            .insert_menu(
                "Admin.Main",
                vec![
                    MenuItem::new("Dashboard"),
                    MenuItem::new("dashboard"),
                    MenuItem::new("Reports").with_locale("es"),
                ],
            )
            .unwrap();

        let ctx = RequestContext::new();
        let tree = service.menu(&ctx, "admin.main", "en").await.unwrap();
        assert_eq!(tree.code, "admin.main");
        assert_eq!(tree.items.len(), 1);
        assert_eq!(tree.items[0].id, "admin.main.dashboard");

        let tree = service.menu(&ctx, "admin.main", "es").await.unwrap();
        assert_eq!(tree.items.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_menu_is_an_error() {
        let service = InMemoryMenuService::new();
        let ctx = RequestContext::new();
        assert!(service.menu(&ctx, "admin.footer", "en").await.is_err());
        assert!(service.menu(&ctx, "  ", "en").await.is_err());
    }

    #[test]
    fn test_remove_menu() {
        let service = InMemoryMenuService::new();
        service.insert_menu("admin.main", vec![]).unwrap();
        assert_eq!(service.menu_codes(), vec!["admin.main".to_string()]);
        assert!(service.remove_menu("ADMIN.MAIN"));
        assert!(!service.remove_menu("admin.main"));
    }
}
