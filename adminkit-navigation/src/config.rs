//! Navigation configuration

use crate::error::{NavigationError, Result};
use serde::{Deserialize, Serialize};

/// Navigation resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Menu code used when a caller does not name one
    #[serde(default = "default_menu_code")]
    pub default_menu_code: String,

    /// Whether to consult the menu service before the in-memory navigation
    #[serde(default = "default_use_cms")]
    pub use_cms: bool,

    /// Locale forwarded to module menu contributions (see the module
    /// loader's `LoadOptions::with_config`)
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Maximum number of memoized trees for
    /// [`CachedNavigationResolver::from_config`](crate::CachedNavigationResolver::from_config);
    /// 0 disables caching
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_menu_code() -> String {
    "admin.main".to_string()
}

fn default_use_cms() -> bool {
    true
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_menu_code: default_menu_code(),
            use_cms: default_use_cms(),
            default_locale: default_locale(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl NavigationConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| NavigationError::Config {
            message: format!("Failed to parse TOML: {}", e),
        })
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| NavigationError::Config {
            message: format!("Failed to parse JSON: {}", e),
        })
    }
}
