//! Feature gates and scope chains

use adminkit_navigation::RequestContext;
use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A level at which a feature flag can be set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Scope {
    /// Process-wide scope
    System,
    /// A tenant or organization
    Tenant(String),
    /// A single user
    User(String),
}

/// Scopes to consult for a flag, most specific first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeChain(Vec<Scope>);

impl ScopeChain {
    /// The chain used while loading modules
    pub fn system() -> Self {
        Self(vec![Scope::System])
    }

    /// Tenant scope falling back to system
    pub fn for_tenant(tenant: impl Into<String>) -> Self {
        Self(vec![Scope::Tenant(tenant.into()), Scope::System])
    }

    /// User scope falling back to tenant, then system
    pub fn for_user(tenant: impl Into<String>, user: impl Into<String>) -> Self {
        Self(vec![
            Scope::User(user.into()),
            Scope::Tenant(tenant.into()),
            Scope::System,
        ])
    }

    /// Scopes in evaluation order
    pub fn scopes(&self) -> &[Scope] {
        &self.0
    }
}

/// Evaluates feature flags against a scope chain
#[async_trait]
pub trait FeatureGate: Send + Sync {
    /// Whether `flag` is enabled for `scope`
    async fn enabled(
        &self,
        ctx: &RequestContext,
        flag: &str,
        scope: &ScopeChain,
    ) -> anyhow::Result<bool>;
}

/// Shared feature gate handle
pub type SharedFeatureGate = Arc<dyn FeatureGate>;

/// Feature gate backed by an in-process table of flag values
#[derive(Debug, Default)]
pub struct StaticFeatureGate {
    flags: RwLock<FxHashMap<(Scope, String), bool>>,
    default: Option<bool>,
}

impl StaticFeatureGate {
    /// Create a gate where unknown flags are disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Value reported for flags set at no scope in the chain
    pub fn with_default(mut self, enabled: bool) -> Self {
        self.default = Some(enabled);
        self
    }

    /// Builder-style system-scope flag
    pub fn with_flag(self, flag: impl Into<String>, enabled: bool) -> Self {
        self.set(Scope::System, flag, enabled);
        self
    }

    /// Set a flag at a scope
    pub fn set(&self, scope: Scope, flag: impl Into<String>, enabled: bool) {
        self.flags
            .write()
            .insert((scope, flag.into().trim().to_string()), enabled);
    }

    /// Value of `flag` for the first scope in `chain` that sets it
    pub fn lookup(&self, flag: &str, chain: &ScopeChain) -> Option<bool> {
        let flags = self.flags.read();
        let flag = flag.trim().to_string();
        chain
            .scopes()
            .iter()
            .find_map(|scope| flags.get(&(scope.clone(), flag.clone())).copied())
            .or(self.default)
    }
}

#[async_trait]
impl FeatureGate for StaticFeatureGate {
    async fn enabled(
        &self,
        _ctx: &RequestContext,
        flag: &str,
        scope: &ScopeChain,
    ) -> anyhow::Result<bool> {
        Ok(self.lookup(flag, scope).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_specific_scope_wins() {
        let gate = StaticFeatureGate::new().with_flag("activity", false);
        gate.set(Scope::Tenant("acme".to_string()), "activity", true);

        assert_eq!(gate.lookup("activity", &ScopeChain::system()), Some(false));
        assert_eq!(
            gate.lookup("activity", &ScopeChain::for_tenant("acme")),
            Some(true)
        );
        assert_eq!(
            gate.lookup("activity", &ScopeChain::for_user("globex", "u1")),
            Some(false)
        );
    }

    #[tokio::test]
    async fn test_unknown_flags_use_default() {
        let ctx = RequestContext::new();
        let closed = StaticFeatureGate::new();
        assert!(!closed
            .enabled(&ctx, "cms", &ScopeChain::system())
            .await
            .unwrap());

        let open = StaticFeatureGate::new().with_default(true);
        assert!(open.enabled(&ctx, "cms", &ScopeChain::system()).await.unwrap());
    }
}
