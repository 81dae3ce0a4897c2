//! AdminKit navigation core
//!
//! This crate turns menu definitions into permission-filtered navigation
//! trees for the admin console:
//! - Canonical menu codes, item paths and dedupe keys
//! - Tree reconstruction from flat, parent-referencing item lists
//! - Resolution that prefers a CMS menu and falls back to in-memory navigation
//! - Localization, sibling ordering and structural/permission filtering

pub mod authz;
pub mod cache;
pub mod collector;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod filter;
pub mod i18n;
pub mod identity;
pub mod item;
pub mod resolver;
pub mod service;
pub mod tree;

pub use authz::{AllowAll, Authorizer, SharedAuthorizer, NAVIGATION_RESOURCE};
pub use cache::{CachedNavigationResolver, NavigationCache, NavigationCacheKey};
pub use collector::{normalize_menu_items, MenuCollector};
pub use config::NavigationConfig;
pub use context::{RequestContext, Subject};
pub use convert::{convert_menu_items, localize_navigation, sort_navigation};
pub use error::{NavigationError, Result};
pub use filter::filter_navigation;
pub use i18n::{localize, IdentityTranslator, SharedTranslator, Translator};
pub use identity::{
    canonical_menu_code, canonical_menu_item_path, canonical_menu_keys, normalize_menu_item,
    slugify,
};
pub use item::{extract_target_key, MenuItem, MenuItemKind, MenuTarget, NavigationItem};
pub use resolver::NavigationResolver;
pub use service::{InMemoryMenuService, MenuService, MenuTree, SharedMenuService};
pub use tree::{build_menu_tree, dedupe_menu_items};
