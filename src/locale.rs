//! Locale detection from the runtime environment.

use unic_langid::LanguageIdentifier;

/// The system locale as a BCP 47 identifier such as `fr-FR`, if one is configured.
pub fn system_locale() -> Option<String> {
    sys_locale::get_locale().and_then(|raw| normalize_locale(&raw))
}

/// Turns a raw locale string into a BCP 47 identifier.
///
/// POSIX decorations (`.UTF-8`, `@euro`) are dropped and underscores become dashes.
/// The `C`/`POSIX` locales and the undetermined language mean "no locale". A string
/// that is not a valid identifier is returned trimmed but otherwise verbatim.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(&['.', '@'][..]).next().unwrap_or_default().trim();
    if base.is_empty() || base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    match base.parse::<LanguageIdentifier>() {
        Ok(id) if id.language.is_empty() => None,
        Ok(id) => Some(id.to_string()),
        Err(_) => Some(base.to_string()),
    }
}
