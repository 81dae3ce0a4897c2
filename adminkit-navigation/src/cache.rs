//! Memoization of resolved navigation trees

use crate::config::NavigationConfig;
use crate::context::RequestContext;
use crate::error::Result;
use crate::item::NavigationItem;
use crate::resolver::{NavigationResolver, TreeSource};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Cache key: menu code, locale and subject fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationCacheKey {
    /// Canonical menu code
    pub menu_code: String,
    /// Requested locale
    pub locale: String,
    /// Subject fingerprint (empty for anonymous requests)
    pub subject: String,
}

struct Slot {
    tree: Arc<Vec<NavigationItem>>,
    last_used: u64,
}

#[derive(Default)]
struct Slots {
    by_key: FxHashMap<NavigationCacheKey, Slot>,
    clock: u64,
}

impl Slots {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let stale = self
            .by_key
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = stale {
            self.by_key.remove(&key);
            debug!("Evicted navigation tree {} ({})", key.menu_code, key.locale);
        }
    }
}

/// Bounded, thread-safe store of resolved trees.
///
/// Each slot is stamped from a logical clock on every hit or insert; a full
/// cache drops the slot with the oldest stamp.
#[derive(Clone)]
pub struct NavigationCache {
    slots: Arc<Mutex<Slots>>,
    capacity: usize,
}

impl NavigationCache {
    /// Create a cache holding at most `capacity` trees
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots::default())),
            capacity,
        }
    }

    /// Maximum number of trees kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a tree, marking it as recently used
    pub fn get(&self, key: &NavigationCacheKey) -> Option<Arc<Vec<NavigationItem>>> {
        let mut slots = self.slots.lock();
        let now = slots.tick();

        let hit = slots.by_key.get_mut(key).map(|slot| {
            slot.last_used = now;
            Arc::clone(&slot.tree)
        });
        trace!(
            "Navigation cache {} for {}",
            if hit.is_some() { "hit" } else { "miss" },
            key.menu_code
        );
        hit
    }

    /// Store a tree; a no-op when the capacity is zero
    pub fn insert(&self, key: NavigationCacheKey, tree: Arc<Vec<NavigationItem>>) {
        if self.capacity == 0 {
            return;
        }

        let mut slots = self.slots.lock();
        if !slots.by_key.contains_key(&key) && slots.by_key.len() >= self.capacity {
            slots.evict_least_recent();
        }
        let last_used = slots.tick();
        slots.by_key.insert(key, Slot { tree, last_used });
    }

    /// Drop every cached tree
    pub fn clear(&self) {
        self.slots.lock().by_key.clear();
        debug!("Cleared navigation cache");
    }

    /// Number of cached trees
    pub fn len(&self) -> usize {
        self.slots.lock().by_key.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a tree is cached for `key`
    pub fn contains(&self, key: &NavigationCacheKey) -> bool {
        self.slots.lock().by_key.contains_key(key)
    }
}

/// A [`NavigationResolver`] whose results are memoized per
/// `(menu code, locale, subject)`.
///
/// Only authoritative trees are stored: errors, results of a cancelled
/// request and in-memory trees served because the menu service failed are
/// returned but never cached.
#[derive(Clone)]
pub struct CachedNavigationResolver {
    resolver: Arc<NavigationResolver>,
    cache: NavigationCache,
}

impl CachedNavigationResolver {
    /// Wrap a resolver with a cache of `capacity` trees
    pub fn new(resolver: Arc<NavigationResolver>, capacity: usize) -> Self {
        Self {
            resolver,
            cache: NavigationCache::new(capacity),
        }
    }

    /// Wrap a resolver with a cache sized by `config.cache_capacity`
    pub fn from_config(resolver: Arc<NavigationResolver>, config: &NavigationConfig) -> Self {
        Self::new(resolver, config.cache_capacity)
    }

    /// The wrapped resolver
    pub fn resolver(&self) -> &Arc<NavigationResolver> {
        &self.resolver
    }

    /// The underlying cache
    pub fn cache(&self) -> &NavigationCache {
        &self.cache
    }

    /// Resolve the default menu
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        locale: &str,
    ) -> Result<Arc<Vec<NavigationItem>>> {
        self.resolve_menu(ctx, "", locale).await
    }

    /// Resolve a menu, serving repeated requests from the cache
    pub async fn resolve_menu(
        &self,
        ctx: &RequestContext,
        menu_code: &str,
        locale: &str,
    ) -> Result<Arc<Vec<NavigationItem>>> {
        let key = NavigationCacheKey {
            menu_code: self.resolver.menu_code_for(menu_code)?,
            locale: locale.trim().to_string(),
            subject: ctx.subject_fingerprint(),
        };

        if let Some(tree) = self.cache.get(&key) {
            return Ok(tree);
        }

        let (items, source) = self
            .resolver
            .resolve_with_source(ctx, &key.menu_code, locale)
            .await?;
        let tree = Arc::new(items);

        let degraded = source == TreeSource::Fallback && self.resolver.cms_enabled();
        if degraded || ctx.is_cancelled() {
            debug!("Not caching menu {}: menu service result unavailable", key.menu_code);
        } else {
            self.cache.insert(key, Arc::clone(&tree));
        }
        Ok(tree)
    }

    /// Forget every memoized tree
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }
}
