//! Request context shared by navigation resolution and module loading

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// The principal a navigation tree is resolved for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Stable subject identifier (user id, service account, ...)
    pub id: String,

    /// Roles granted to the subject
    #[serde(default)]
    pub roles: Vec<String>,

    /// Tenant or organization the subject is acting in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl Subject {
    /// Create a subject with no roles and no tenant
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Scope the subject to a tenant
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Stable fingerprint used to key memoized navigation trees.
    ///
    /// Role order does not affect the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut roles: Vec<&str> = self.roles.iter().map(|r| r.trim()).collect();
        roles.sort_unstable();
        roles.dedup();
        format!(
            "{}|{}|{}",
            self.id.trim(),
            roles.join(","),
            self.tenant.as_deref().unwrap_or_default().trim()
        )
    }
}

/// Ambient context passed to menu services, authorizers and feature gates
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    subject: Option<Subject>,
    cancel: CancellationToken,
}

impl RequestContext {
    /// Create an anonymous context that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the subject the request acts for
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The subject, if the request is authenticated
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    /// Fingerprint of the subject; anonymous requests share the empty fingerprint
    pub fn subject_fingerprint(&self) -> String {
        self.subject
            .as_ref()
            .map(Subject::fingerprint)
            .unwrap_or_default()
    }

    /// The cancellation token backing this context
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the request has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes once the request is cancelled
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}
