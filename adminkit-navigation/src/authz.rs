//! Authorization contract used by the navigation filter

use crate::context::RequestContext;
use std::sync::Arc;

/// Resource name passed to [`Authorizer::can`] for navigation checks
pub const NAVIGATION_RESOURCE: &str = "navigation";

/// Decides whether the subject in `ctx` may perform `action` on `resource`.
///
/// Invoked synchronously during filtering; implementations must be safe for
/// concurrent use.
pub trait Authorizer: Send + Sync {
    /// Check a single permission
    fn can(&self, ctx: &RequestContext, action: &str, resource: &str) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(&RequestContext, &str, &str) -> bool + Send + Sync,
{
    fn can(&self, ctx: &RequestContext, action: &str, resource: &str) -> bool {
        self(ctx, action, resource)
    }
}

/// Authorizer that grants every permission
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can(&self, _ctx: &RequestContext, _action: &str, _resource: &str) -> bool {
        true
    }
}

/// Shared authorizer handle
pub type SharedAuthorizer = Arc<dyn Authorizer>;
