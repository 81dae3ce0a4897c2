//! Module manifests and capability traits

use adminkit_navigation::{MenuItem, SharedTranslator};
use serde::{Deserialize, Serialize};

/// Static description of a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Unique module id
    pub id: String,
    /// i18n key for the display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_key: Option<String>,
    /// i18n key for the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    /// Ids of modules that must be registered first
    pub dependencies: Vec<String>,
    /// Feature flags that must all be enabled for the module to load
    pub feature_flags: Vec<String>,
}

impl Manifest {
    /// Create a manifest with no dependencies or flags
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add a dependency
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Require a feature flag
    pub fn requires_feature(mut self, flag: impl Into<String>) -> Self {
        self.feature_flags.push(flag.into());
        self
    }

    /// Set the display name key
    pub fn with_name_key(mut self, key: impl Into<String>) -> Self {
        self.name_key = Some(key.into());
        self
    }

    /// Set the description key
    pub fn with_description_key(mut self, key: impl Into<String>) -> Self {
        self.description_key = Some(key.into());
        self
    }
}

/// An icon set a module ships
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconLibrary {
    /// Library id
    pub id: String,
    /// Display name
    pub name: String,
    /// Class or name prefix applied to icons of this library
    pub prefix: String,
    /// Optional stylesheet URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
}

/// A single icon a module ships
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconDefinition {
    /// Library the icon belongs to
    pub library: String,
    /// Icon name
    pub name: String,
    /// Inline SVG markup
    pub svg: String,
}

/// A unit of admin functionality.
///
/// The base contract is the manifest; optional capabilities are exposed
/// through the accessor methods and dispatched by the loader at runtime.
pub trait Module: Send + Sync {
    /// Describe the module
    fn manifest(&self) -> Manifest;

    /// The module's translator capability, if any
    fn as_translator_aware(&mut self) -> Option<&mut dyn TranslatorAware> {
        None
    }

    /// The module's menu capability, if any
    fn as_menu_contributor(&self) -> Option<&dyn MenuContributor> {
        None
    }

    /// The module's icon capability, if any
    fn as_icon_contributor(&self) -> Option<&dyn IconContributor> {
        None
    }
}

/// Modules that need a translator
pub trait TranslatorAware {
    /// Receive the host translator
    fn set_translator(&mut self, translator: SharedTranslator);
}

/// Modules that contribute menu items
pub trait MenuContributor {
    /// Menu items for `locale`
    fn menu_items(&self, locale: &str) -> Vec<MenuItem>;
}

/// Modules that contribute icons
pub trait IconContributor {
    /// Icon libraries, registered before definitions
    fn icon_libraries(&self) -> Vec<IconLibrary> {
        Vec::new()
    }

    /// Icon definitions
    fn icon_definitions(&self) -> Vec<IconDefinition> {
        Vec::new()
    }
}
