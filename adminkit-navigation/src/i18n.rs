//! Translation contract and label localization

use std::sync::Arc;

/// Looks up a localized string for a key.
///
/// An empty return value, or one equal to the key, means no translation is
/// available. Implementations must be safe to call concurrently.
pub trait Translator: Send + Sync {
    /// Translate `key` into `locale`
    fn translate(&self, key: &str, locale: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn translate(&self, key: &str, locale: &str) -> String {
        self(key, locale)
    }
}

/// Translator that never translates
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, key: &str, _locale: &str) -> String {
        key.to_string()
    }
}

/// Shared translator handle
pub type SharedTranslator = Arc<dyn Translator>;

/// Resolve a localizable `(raw, key)` pair.
///
/// A translation only wins when it is non-empty and differs from the key;
/// otherwise the trimmed raw value is used, and the key as a last resort.
pub fn localize(
    translator: Option<&dyn Translator>,
    raw: &str,
    key: &str,
    locale: &str,
) -> String {
    let raw = raw.trim();
    let key = key.trim();

    if let Some(translator) = translator {
        if !key.is_empty() {
            let translated = translator.translate(key, locale);
            let translated = translated.trim();
            if !translated.is_empty() && translated != key {
                return translated.to_string();
            }
        }
    }

    if raw.is_empty() {
        key.to_string()
    } else {
        raw.to_string()
    }
}
