//! AdminKit module system
//!
//! This crate registers admin modules at startup:
//! - Manifests and optional module capabilities
//! - Deterministic dependency ordering with cycle detection
//! - Feature-flag gating at system scope
//! - Translator injection and menu/icon contribution callbacks

pub mod error;
pub mod gate;
pub mod loader;
pub mod manifest;
pub mod order;

pub use error::{ModuleError, Result};
pub use gate::{FeatureGate, Scope, ScopeChain, SharedFeatureGate, StaticFeatureGate};
pub use loader::{load_modules, LoadOptions};
pub use manifest::{
    IconContributor, IconDefinition, IconLibrary, Manifest, MenuContributor, Module,
    TranslatorAware,
};
pub use order::{order_manifests, order_modules};
