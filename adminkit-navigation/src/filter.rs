//! Structural and permission filtering of navigation trees

use crate::authz::{Authorizer, NAVIGATION_RESOURCE};
use crate::context::RequestContext;
use crate::error::{NavigationError, Result};
use crate::item::{MenuItemKind, NavigationItem};

/// Filter a navigation tree for the subject in `ctx`.
///
/// Single top-down pass that keeps order:
/// - items whose permissions are all denied are dropped (any-of semantics);
/// - groups and collapsible items without surviving children are dropped;
/// - separators never lead, trail or follow another separator.
///
/// Without an authorizer, permissions are not enforced. A cancelled context
/// aborts the pass at the next authorization check.
pub fn filter_navigation(
    items: Vec<NavigationItem>,
    ctx: &RequestContext,
    authorizer: Option<&dyn Authorizer>,
) -> Result<Vec<NavigationItem>> {
    let mut out: Vec<NavigationItem> = Vec::with_capacity(items.len());

    for mut item in items {
        if !permitted(&item, ctx, authorizer)? {
            continue;
        }

        if item.kind == MenuItemKind::Separator {
            let follows_content = out
                .last()
                .is_some_and(|last| last.kind != MenuItemKind::Separator);
            if follows_content {
                item.children.clear();
                out.push(item);
            }
            continue;
        }

        item.children = filter_navigation(std::mem::take(&mut item.children), ctx, authorizer)?;

        if item.children.is_empty()
            && (item.kind == MenuItemKind::Group || item.is_collapsible())
        {
            continue;
        }

        out.push(item);
    }

    while out
        .last()
        .is_some_and(|last| last.kind == MenuItemKind::Separator)
    {
        out.pop();
    }

    Ok(out)
}

fn permitted(
    item: &NavigationItem,
    ctx: &RequestContext,
    authorizer: Option<&dyn Authorizer>,
) -> Result<bool> {
    let Some(authorizer) = authorizer else {
        return Ok(true);
    };

    let mut permissions = item
        .permissions
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .peekable();

    if permissions.peek().is_none() {
        return Ok(true);
    }

    for permission in permissions {
        if ctx.is_cancelled() {
            return Err(NavigationError::Cancelled);
        }
        if authorizer.can(ctx, permission, NAVIGATION_RESOURCE) {
            return Ok(true);
        }
    }

    Ok(false)
}
