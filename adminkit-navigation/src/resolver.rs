//! Navigation resolution

use crate::authz::SharedAuthorizer;
use crate::config::NavigationConfig;
use crate::context::RequestContext;
use crate::convert::{convert_menu_items, localize_navigation, sort_navigation};
use crate::error::Result;
use crate::filter::filter_navigation;
use crate::i18n::SharedTranslator;
use crate::identity::canonical_menu_code;
use crate::item::NavigationItem;
use crate::service::{MenuTree, SharedMenuService};
use tracing::{debug, warn};

/// Source of a resolved navigation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreeSource {
    MenuService,
    Fallback,
}

/// Resolves the navigation tree for a menu, locale and subject.
///
/// The setters are meant for startup configuration. Once the resolver is
/// shared with request handlers it is only read.
pub struct NavigationResolver {
    menu_service: Option<SharedMenuService>,
    authorizer: Option<SharedAuthorizer>,
    translator: Option<SharedTranslator>,
    fallback: Vec<NavigationItem>,
    default_menu_code: String,
    use_cms: bool,
    next_order: usize,
}

impl NavigationResolver {
    /// Create a resolver with the default configuration
    pub fn new() -> Self {
        let config = NavigationConfig::default();
        Self {
            menu_service: None,
            authorizer: None,
            translator: None,
            fallback: Vec::new(),
            default_menu_code: config.default_menu_code,
            use_cms: config.use_cms,
            next_order: 0,
        }
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &NavigationConfig) -> Result<Self> {
        let mut resolver = Self::new();
        resolver.set_default_menu_code(&config.default_menu_code)?;
        resolver.use_cms(config.use_cms);
        Ok(resolver)
    }

    /// Set the translator used for labels and group titles
    pub fn set_translator(&mut self, translator: SharedTranslator) {
        self.translator = Some(translator);
    }

    /// Set the authorizer used to check item permissions
    pub fn set_authorizer(&mut self, authorizer: SharedAuthorizer) {
        self.authorizer = Some(authorizer);
    }

    /// Set the CMS menu source
    pub fn set_menu_service(&mut self, service: SharedMenuService) {
        self.menu_service = Some(service);
    }

    /// Enable or disable the menu service; inert while no service is set
    pub fn use_cms(&mut self, enabled: bool) {
        self.use_cms = enabled;
    }

    /// Whether resolution will consult the menu service
    pub fn cms_enabled(&self) -> bool {
        self.use_cms && self.menu_service.is_some()
    }

    /// Set the menu code used when none is requested
    pub fn set_default_menu_code(&mut self, code: &str) -> Result<()> {
        self.default_menu_code = canonical_menu_code(code)?;
        Ok(())
    }

    /// Canonical default menu code
    pub fn default_menu_code(&self) -> &str {
        &self.default_menu_code
    }

    /// Append an item to the in-memory navigation
    pub fn add_item(&mut self, mut item: NavigationItem) {
        item.stamp_order(self.next_order);
        self.next_order += 1;
        self.fallback.push(item);
    }

    /// Append several items to the in-memory navigation
    pub fn add_fallback(&mut self, items: impl IntoIterator<Item = NavigationItem>) {
        for item in items {
            self.add_item(item);
        }
    }

    /// The in-memory navigation, as added
    pub fn fallback(&self) -> &[NavigationItem] {
        &self.fallback
    }

    /// Canonical code for a requested menu; empty requests use the default
    pub fn menu_code_for(&self, requested: &str) -> Result<String> {
        if requested.trim().is_empty() {
            Ok(self.default_menu_code.clone())
        } else {
            canonical_menu_code(requested)
        }
    }

    /// Resolve the default menu
    pub async fn resolve(&self, ctx: &RequestContext, locale: &str) -> Result<Vec<NavigationItem>> {
        self.resolve_menu(ctx, "", locale).await
    }

    /// Resolve `menu_code` for `locale` and the subject in `ctx`
    pub async fn resolve_menu(
        &self,
        ctx: &RequestContext,
        menu_code: &str,
        locale: &str,
    ) -> Result<Vec<NavigationItem>> {
        let (items, _) = self.resolve_with_source(ctx, menu_code, locale).await?;
        Ok(items)
    }

    /// Like [`resolve_menu`](Self::resolve_menu), also reporting which source
    /// produced the tree
    pub(crate) async fn resolve_with_source(
        &self,
        ctx: &RequestContext,
        menu_code: &str,
        locale: &str,
    ) -> Result<(Vec<NavigationItem>, TreeSource)> {
        let code = self.menu_code_for(menu_code)?;
        let translator = self.translator.as_deref();

        let (mut items, source) = match self.fetch_cms_menu(ctx, &code, locale).await {
            Some(tree) => {
                debug!("Resolved menu {} from menu service ({} items)", code, tree.items.len());
                (
                    convert_menu_items(&tree.items, translator, locale),
                    TreeSource::MenuService,
                )
            }
            None => (
                localize_navigation(&self.fallback, translator, locale),
                TreeSource::Fallback,
            ),
        };

        sort_navigation(&mut items);
        let items = filter_navigation(items, ctx, self.authorizer.as_deref())?;
        Ok((items, source))
    }

    async fn fetch_cms_menu(
        &self,
        ctx: &RequestContext,
        code: &str,
        locale: &str,
    ) -> Option<MenuTree> {
        if !self.use_cms {
            return None;
        }
        let service = self.menu_service.as_ref()?;

        tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                warn!("Menu lookup for {} cancelled; using in-memory navigation", code);
                None
            }
            result = service.menu(ctx, code, locale) => match result {
                Ok(tree) => Some(tree),
                Err(e) => {
                    warn!("Menu service failed for {}: {}; using in-memory navigation", code, e);
                    None
                }
            },
        }
    }
}

impl Default for NavigationResolver {
    fn default() -> Self {
        Self::new()
    }
}
