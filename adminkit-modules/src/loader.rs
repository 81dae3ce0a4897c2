//! Module loading with dependency ordering and feature gating

use crate::error::{ModuleError, Result};
use crate::gate::{FeatureGate, ScopeChain, SharedFeatureGate};
use crate::manifest::{IconDefinition, IconLibrary, Module};
use crate::order::order_modules;
use adminkit_navigation::{MenuItem, NavigationConfig, RequestContext, SharedTranslator};
use std::sync::Arc;
use tracing::{debug, info};

type RegisterFn = Box<dyn FnMut(&dyn Module) -> anyhow::Result<()> + Send>;
type MenuItemsFn = Box<dyn FnMut(Vec<MenuItem>) -> anyhow::Result<()> + Send>;
type IconLibraryFn = Box<dyn FnMut(IconLibrary) -> anyhow::Result<()> + Send>;
type IconDefinitionFn = Box<dyn FnMut(IconDefinition) -> anyhow::Result<()> + Send>;
type RegisterDefaultsFn = Box<dyn FnMut() -> anyhow::Result<()> + Send>;
type DisabledErrorFn = Box<dyn Fn(&str, &str) -> anyhow::Error + Send + Sync>;

/// Inputs and host callbacks for [`load_modules`]
pub struct LoadOptions {
    modules: Vec<Option<Box<dyn Module>>>,
    gates: Option<SharedFeatureGate>,
    translator: Option<SharedTranslator>,
    default_locale: String,
    register: Option<RegisterFn>,
    add_menu_items: Option<MenuItemsFn>,
    add_icon_library: Option<IconLibraryFn>,
    add_icon_definition: Option<IconDefinitionFn>,
    register_defaults: Option<RegisterDefaultsFn>,
    disabled_error: Option<DisabledErrorFn>,
}

impl LoadOptions {
    /// Options for a module list; `None` entries are skipped
    pub fn new(modules: Vec<Option<Box<dyn Module>>>) -> Self {
        Self {
            modules,
            gates: None,
            translator: None,
            default_locale: String::new(),
            register: None,
            add_menu_items: None,
            add_icon_library: None,
            add_icon_definition: None,
            register_defaults: None,
            disabled_error: None,
        }
    }

    /// Options for a list of modules
    pub fn from_modules(modules: impl IntoIterator<Item = Box<dyn Module>>) -> Self {
        Self::new(modules.into_iter().map(Some).collect())
    }

    /// Feature gate consulted for every declared flag
    pub fn with_gate(mut self, gate: SharedFeatureGate) -> Self {
        self.gates = Some(gate);
        self
    }

    /// Translator injected into translator-aware modules
    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Locale passed to menu contributors
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Take the menu contribution locale from navigation configuration
    pub fn with_config(self, config: &NavigationConfig) -> Self {
        self.with_default_locale(config.default_locale.clone())
    }

    /// Called once per loaded module, in dependency order
    pub fn on_register<F>(mut self, f: F) -> Self
    where
        F: FnMut(&dyn Module) -> anyhow::Result<()> + Send + 'static,
    {
        self.register = Some(Box::new(f));
        self
    }

    /// Receives each module's menu items, which should be normalized before use
    pub fn on_menu_items<F>(mut self, f: F) -> Self
    where
        F: FnMut(Vec<MenuItem>) -> anyhow::Result<()> + Send + 'static,
    {
        self.add_menu_items = Some(Box::new(f));
        self
    }

    /// Receives icon libraries
    pub fn on_icon_library<F>(mut self, f: F) -> Self
    where
        F: FnMut(IconLibrary) -> anyhow::Result<()> + Send + 'static,
    {
        self.add_icon_library = Some(Box::new(f));
        self
    }

    /// Receives icon definitions
    pub fn on_icon_definition<F>(mut self, f: F) -> Self
    where
        F: FnMut(IconDefinition) -> anyhow::Result<()> + Send + 'static,
    {
        self.add_icon_definition = Some(Box::new(f));
        self
    }

    /// Hook run before any module is loaded
    pub fn on_register_defaults<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.register_defaults = Some(Box::new(f));
        self
    }

    /// Build the error returned for a disabled flag from `(feature, module)`
    pub fn with_disabled_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> anyhow::Error + Send + Sync + 'static,
    {
        self.disabled_error = Some(Box::new(f));
        self
    }
}

/// Load modules in dependency order, returning them as loaded.
///
/// Fails fast: the first ordering, gate or callback error aborts loading,
/// and anything already registered is left to the caller to undo. Flags are
/// evaluated at system scope; without a gate every flag counts as disabled.
pub async fn load_modules(
    ctx: &RequestContext,
    options: LoadOptions,
) -> Result<Vec<Box<dyn Module>>> {
    let LoadOptions {
        modules,
        gates,
        translator,
        default_locale,
        mut register,
        mut add_menu_items,
        mut add_icon_library,
        mut add_icon_definition,
        mut register_defaults,
        disabled_error,
    } = options;

    if let Some(defaults) = register_defaults.as_mut() {
        defaults().map_err(ModuleError::Registration)?;
    }

    let total = modules.len();
    let modules: Vec<Box<dyn Module>> = modules.into_iter().flatten().collect();
    if modules.len() < total {
        debug!("Skipped {} empty module entries", total - modules.len());
    }

    let ordered = order_modules(modules)?;
    info!("Loading {} modules", ordered.len());

    let scope = ScopeChain::system();
    let mut loaded = Vec::with_capacity(ordered.len());

    for mut module in ordered {
        let manifest = module.manifest();

        for flag in &manifest.feature_flags {
            let enabled = match &gates {
                Some(gate) => evaluate_flag(ctx, gate.as_ref(), flag, &scope).await?,
                None => false,
            };

            if !enabled {
                debug!("Feature {} disabled for module {}", flag, manifest.id);
                return Err(match &disabled_error {
                    Some(factory) => {
                        ModuleError::Disabled(factory(flag.as_str(), manifest.id.as_str()))
                    }
                    None => ModuleError::FeatureDisabled {
                        feature: flag.clone(),
                        module: manifest.id.clone(),
                    },
                });
            }
        }

        if let Some(translator) = &translator {
            if let Some(aware) = module.as_translator_aware() {
                aware.set_translator(Arc::clone(translator));
            }
        }

        if let Some(register) = register.as_mut() {
            register(module.as_ref()).map_err(ModuleError::Registration)?;
        }

        if let (Some(add), Some(contributor)) =
            (add_menu_items.as_mut(), module.as_menu_contributor())
        {
            let items = contributor.menu_items(&default_locale);
            debug!("Module {} contributed {} menu items", manifest.id, items.len());
            add(items).map_err(ModuleError::Registration)?;
        }

        if let Some(icons) = module.as_icon_contributor() {
            if let Some(add) = add_icon_library.as_mut() {
                for library in icons.icon_libraries() {
                    add(library).map_err(ModuleError::Registration)?;
                }
            }
            if let Some(add) = add_icon_definition.as_mut() {
                for definition in icons.icon_definitions() {
                    add(definition).map_err(ModuleError::Registration)?;
                }
            }
        }

        info!("Registered module {}", manifest.id);
        loaded.push(module);
    }

    Ok(loaded)
}

async fn evaluate_flag(
    ctx: &RequestContext,
    gate: &dyn FeatureGate,
    flag: &str,
    scope: &ScopeChain,
) -> Result<bool> {
    tokio::select! {
        biased;
        _ = ctx.cancelled() => Err(ModuleError::Cancelled {
            feature: flag.to_string(),
        }),
        result = gate.enabled(ctx, flag, scope) => result.map_err(ModuleError::FeatureGate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StaticFeatureGate;
    use crate::manifest::{Manifest, MenuContributor};
    use parking_lot::Mutex;

    struct Plain(Manifest);

    impl Module for Plain {
        fn manifest(&self) -> Manifest {
            self.0.clone()
        }
    }

    fn plain(manifest: Manifest) -> Box<dyn Module> {
        Box::new(Plain(manifest))
    }

    #[tokio::test]
    async fn test_registers_in_dependency_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let options = LoadOptions::from_modules(vec![
            plain(Manifest::new("pages").depends_on("media")),
            plain(Manifest::new("media")),
        ])
        .on_register(move |module| {
            sink.lock().push(module.manifest().id);
            Ok(())
        });

        let loaded = load_modules(&RequestContext::new(), options).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(*seen.lock(), vec!["media".to_string(), "pages".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_gate_disables_flagged_modules() {
        let options =
            LoadOptions::from_modules(vec![plain(Manifest::new("M").requires_feature("f"))]);
        let err = load_modules(&RequestContext::new(), options).await.err().expect("expected load_modules to fail");
        assert!(matches!(err, ModuleError::FeatureDisabled { .. }));
    }

    #[tokio::test]
    async fn test_enabled_flag_loads() {
        let gate = StaticFeatureGate::new().with_flag("f", true);
        let options =
            LoadOptions::from_modules(vec![plain(Manifest::new("M").requires_feature("f"))])
                .with_gate(Arc::new(gate));
        let loaded = load_modules(&RequestContext::new(), options).await.unwrap();
        assert_eq!(loaded[0].manifest().id, "M");
    }

    struct Contributor;

    impl Module for Contributor {
        fn manifest(&self) -> Manifest {
            Manifest::new("content")
        }

        fn as_menu_contributor(&self) -> Option<&dyn MenuContributor> {
            Some(self)
        }
    }

    impl MenuContributor for Contributor {
        fn menu_items(&self, locale: &str) -> Vec<MenuItem> {
            vec![MenuItem::new("pages").with_locale(locale)]
        }
    }

    #[tokio::test]
    async fn test_config_locale_reaches_menu_contributors() {
        let locales = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&locales);
        let config = NavigationConfig {
            default_locale: "es".to_string(),
            ..Default::default()
        };

        let options = LoadOptions::from_modules(vec![Box::new(Contributor) as Box<dyn Module>])
            .with_config(&config)
            .on_menu_items(move |items| {
                sink.lock()
                    .extend(items.into_iter().filter_map(|item| item.locale));
                Ok(())
            });

        load_modules(&RequestContext::new(), options).await.unwrap();
        assert_eq!(*locales.lock(), vec!["es".to_string()]);
    }

    #[tokio::test]
    async fn test_register_defaults_failure_aborts() {
        let options = LoadOptions::from_modules(vec![plain(Manifest::new("M"))])
            .on_register_defaults(|| anyhow::bail!("defaults failed"))
            .on_register(|_| panic!("register must not run"));
        let err = load_modules(&RequestContext::new(), options).await.err().expect("expected load_modules to fail");
        assert!(matches!(err, ModuleError::Registration(_)));
        assert_eq!(err.to_string(), "defaults failed");
    }
}
