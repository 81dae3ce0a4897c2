//! Module loader error types

use thiserror::Error;

/// Type alias for module loader results
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Errors that can occur while ordering or loading modules
#[derive(Error, Debug)]
pub enum ModuleError {
    /// A module declares a dependency that is not part of the load set
    #[error("Module {module} depends on missing module {dependency}")]
    MissingDependency {
        /// Module declaring the dependency
        module: String,
        /// Dependency that could not be found
        dependency: String,
    },

    /// Circular dependency was detected between modules
    #[error("Circular module dependency detected at {id}")]
    DependencyCycle {
        /// Module revisited while still on the dependency stack
        id: String,
    },

    /// A feature flag required by a module is disabled
    #[error("Feature {feature} is disabled (required by module {module})")]
    FeatureDisabled {
        /// Feature flag name
        feature: String,
        /// Module requiring the feature
        module: String,
    },

    /// Host-provided error for a disabled feature flag
    #[error(transparent)]
    Disabled(anyhow::Error),

    /// The feature gate failed to evaluate a flag
    #[error(transparent)]
    FeatureGate(anyhow::Error),

    /// The request context was cancelled while a flag was being evaluated
    #[error("Module loading cancelled while evaluating feature {feature}")]
    Cancelled {
        /// Feature flag being evaluated
        feature: String,
    },

    /// A host callback failed
    #[error(transparent)]
    Registration(anyhow::Error),
}

impl ModuleError {
    /// Whether the host should treat this error as an authorization failure
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            ModuleError::FeatureDisabled { .. } | ModuleError::Disabled(_)
        )
    }

    /// Structured metadata describing the error
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        match self {
            ModuleError::MissingDependency { module, dependency } => vec![
                ("module", module.clone()),
                ("dependency", dependency.clone()),
            ],
            ModuleError::DependencyCycle { id } => vec![("module", id.clone())],
            ModuleError::FeatureDisabled { feature, module } => {
                vec![("feature", feature.clone()), ("module", module.clone())]
            }
            ModuleError::Cancelled { feature } => vec![("feature", feature.clone())],
            ModuleError::Disabled(_)
            | ModuleError::FeatureGate(_)
            | ModuleError::Registration(_) => Vec::new(),
        }
    }
}
