//! Canonical menu identity
//!
//! Menu codes and item paths are dotted identifiers. Every segment is a
//! lowercase slug of letters, digits, `-` and `_`; whitespace and other
//! punctuation collapse into a single `-`. All functions here are pure and
//! idempotent.

use crate::error::{NavigationError, Result};
use crate::item::{extract_target_key, MenuItem};

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// Sanitize a raw string into a single path segment
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for ch in raw.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            // '-', whitespace and punctuation all fold into one dash
            pending_dash = true;
        }
    }

    slug
}

fn canonical_segments(raw: &str) -> String {
    raw.split(PATH_SEPARATOR)
        .map(slugify)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Canonicalize a menu code (`" Admin..Main "` becomes `admin.main`)
pub fn canonical_menu_code(raw: &str) -> Result<String> {
    let code = canonical_segments(raw);
    if code.is_empty() {
        return Err(NavigationError::invalid(raw, "menu code is empty"));
    }
    Ok(code)
}

/// Canonicalize an item path under `menu_code`.
///
/// Returns an empty string for empty input. A raw value without a separator
/// becomes a single segment under the menu; a dotted value is re-normalized
/// and rooted under the menu when it is not already.
///
/// Rooting requires the `menu.` prefix, so a value equal to the menu code
/// itself is treated as a relative path (`admin.main` under `admin.main`
/// becomes `admin.main.admin.main`). An item never shares the menu's own code.
pub fn canonical_menu_item_path(menu_code: &str, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let menu = canonical_segments(menu_code);
    let path = if raw.contains(PATH_SEPARATOR) {
        canonical_segments(raw)
    } else {
        slugify(raw)
    };

    if path.is_empty() {
        return String::new();
    }
    if menu.is_empty() || path.starts_with(&format!("{menu}.")) {
        return path;
    }
    format!("{menu}.{path}")
}

/// Derive a path for `raw`, nesting under `parent` when `raw` is a bare segment
fn derive_path(menu: &str, parent: &str, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if parent.is_empty() || raw.contains(PATH_SEPARATOR) {
        return canonical_menu_item_path(menu, raw);
    }

    let segment = slugify(raw);
    if segment.is_empty() {
        return String::new();
    }
    format!("{parent}.{segment}")
}

/// First candidate that canonicalized to a non-empty path
fn first_path<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .find(|path| !path.is_empty())
        .unwrap_or_default()
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn trim_list(values: &mut Vec<String>) {
    for value in values.iter_mut() {
        trim_in_place(value);
    }
    values.retain(|value| !value.is_empty());
}

/// Normalize an item (and its children) under `menu_code`.
///
/// Assigns the canonical menu, derives the parent from `parent_id` or
/// `parent_code`, derives the id from the first available of `id`,
/// `target.key`, `target.path`, `label`, `group_title`, `label_key`,
/// `group_title_key`, and defaults `code` to the id. Children without a
/// parent are attached to this item's id.
pub fn normalize_menu_item(item: MenuItem, menu_code: &str) -> Result<MenuItem> {
    let menu = canonical_menu_code(menu_code)?;
    Ok(normalize_with_menu(item, &menu, ""))
}

fn normalize_with_menu(mut item: MenuItem, menu: &str, inherited_parent: &str) -> MenuItem {
    for field in [
        &mut item.id,
        &mut item.code,
        &mut item.parent_id,
        &mut item.parent_code,
        &mut item.label,
        &mut item.label_key,
        &mut item.group_title,
        &mut item.group_title_key,
        &mut item.icon,
    ] {
        trim_in_place(field);
    }
    trim_list(&mut item.permissions);
    trim_list(&mut item.classes);
    for value in item.styles.values_mut() {
        trim_in_place(value);
    }
    item.target.trim_strings();
    item.locale = item
        .locale
        .take()
        .map(|locale| locale.trim().to_string())
        .filter(|locale| !locale.is_empty());

    item.menu = menu.to_string();

    let parent = first_path([
        item.parent_id.as_str(),
        item.parent_code.as_str(),
        inherited_parent,
    ]
    .map(|raw| canonical_menu_item_path(menu, raw)));
    item.parent_id = parent.clone();
    item.parent_code = parent;

    let id = first_path(
        [
            item.id.as_str(),
            extract_target_key(&item.target),
            item.label.as_str(),
            item.group_title.as_str(),
            item.label_key.as_str(),
            item.group_title_key.as_str(),
        ]
        .map(|raw| derive_path(menu, &item.parent_id, raw)),
    );
    item.id = id;

    let code = derive_path(menu, &item.parent_id, &item.code);
    item.code = if code.is_empty() { item.id.clone() } else { code };

    let children = std::mem::take(&mut item.children);
    item.children = children
        .into_iter()
        .map(|child| normalize_with_menu(child, menu, &item.id))
        .collect();

    item
}

/// Dedupe keys for an item, in precedence order: `path:`, `code:`, `target:`
pub fn canonical_menu_keys(item: &MenuItem) -> Vec<String> {
    let mut keys = Vec::with_capacity(3);

    let id = item.id.trim();
    if !id.is_empty() {
        keys.push(format!("path:{id}"));
    }

    let code = item.code.trim();
    if !code.is_empty() {
        keys.push(format!("code:{}", code.to_lowercase()));
    }

    let target = extract_target_key(&item.target);
    if !target.is_empty() {
        keys.push(format!("target:{target}"));
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MenuItemKind, MenuTarget};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Site Settings "), "site-settings");
        assert_eq!(slugify("/admin/users/"), "admin-users");
        assert_eq!(slugify("Snake_Case--Name"), "snake_case-name");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_canonical_menu_code() {
        assert_eq!(canonical_menu_code(" Admin.Main ").unwrap(), "admin.main");
        assert_eq!(canonical_menu_code("admin..main").unwrap(), "admin.main");
        assert_eq!(canonical_menu_code("Admin   Main").unwrap(), "admin-main");
        assert!(matches!(
            canonical_menu_code("  "),
            Err(NavigationError::InvalidIdentifier { .. })
        ));
        assert!(canonical_menu_code("...").is_err());
    }

    #[test]
    fn test_canonical_menu_item_path() {
        assert_eq!(canonical_menu_item_path("admin.main", ""), "");
        assert_eq!(
            canonical_menu_item_path("admin.main", "Settings"),
            "admin.main.settings"
        );
        assert_eq!(
            canonical_menu_item_path("admin.main", "Admin.Main.Settings"),
            "admin.main.settings"
        );
        assert_eq!(
            canonical_menu_item_path("admin.main", "content..pages"),
            "admin.main.content.pages"
        );
        assert_eq!(canonical_menu_item_path("admin.main", "???"), "");
    }

    #[test]
    fn test_menu_code_as_item_path_is_nested() {
        let path = canonical_menu_item_path("admin.main", "Admin.Main");
        assert_eq!(path, "admin.main.admin.main");
        assert_eq!(canonical_menu_item_path("admin.main", &path), path);
    }

    #[test]
    fn test_canonical_path_is_idempotent() {
        for raw in ["Settings", "content.Pages", "admin.main.x", " a b . c "] {
            let once = canonical_menu_item_path("admin.main", raw);
            assert_eq!(canonical_menu_item_path("admin.main", &once), once);
        }
    }

    #[test]
    fn test_normalize_derives_id_from_target_and_parent() {
        let item = MenuItem::default()
            .with_parent("content")
            .with_target(MenuTarget::new().with("key", "pages"));

        let normalized = normalize_menu_item(item, "Admin.Main").unwrap();
        assert_eq!(normalized.menu, "admin.main");
        assert_eq!(normalized.parent_id, "admin.main.content");
        assert_eq!(normalized.parent_code, "admin.main.content");
        assert_eq!(normalized.id, "admin.main.content.pages");
        assert_eq!(normalized.code, normalized.id);
        assert_eq!(normalized.kind, MenuItemKind::Item);
    }

    #[test]
    fn test_normalize_uses_parent_code_and_label() {
        let mut item = MenuItem::default().with_label("  Media Library ");
        item.parent_code = "assets".to_string();

        let normalized = normalize_menu_item(item, "admin.main").unwrap();
        assert_eq!(normalized.label, "Media Library");
        assert_eq!(normalized.parent_id, "admin.main.assets");
        assert_eq!(normalized.id, "admin.main.assets.media-library");
    }

    #[test]
    fn test_normalize_children_inherit_parent() {
        let item = MenuItem::new("content").with_child(MenuItem::new("posts"));
        let normalized = normalize_menu_item(item, "admin.main").unwrap();

        assert_eq!(normalized.children[0].parent_id, "admin.main.content");
        assert_eq!(normalized.children[0].id, "admin.main.content.posts");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut item = MenuItem::default()
            .with_label_key("nav.settings")
            .with_permission("  settings.read ")
            .with_locale(" ");
        item.parent_code = "System".to_string();
        item.code = "Settings".to_string();

        let once = normalize_menu_item(item, "admin.main").unwrap();
        let twice = normalize_menu_item(once.clone(), "admin.main").unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.locale, None);
        assert_eq!(once.permissions, vec!["settings.read".to_string()]);
    }

    #[test]
    fn test_normalize_rejects_empty_menu() {
        assert!(normalize_menu_item(MenuItem::new("x"), " ").is_err());
    }

    #[test]
    fn test_canonical_menu_keys() {
        let item = MenuItem {
            id: "admin.main.settings".to_string(),
            code: "Admin.Main.Settings".to_string(),
            target: MenuTarget::new().with("path", "/admin/settings"),
            ..Default::default()
        };
        assert_eq!(
            canonical_menu_keys(&item),
            vec![
                "path:admin.main.settings".to_string(),
                "code:admin.main.settings".to_string(),
                "target:/admin/settings".to_string(),
            ]
        );
        assert!(canonical_menu_keys(&MenuItem::separator()).is_empty());
    }
}
