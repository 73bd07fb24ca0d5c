//! Url paths — human-readable slugs derived from automation names.

/// Derive the base url path for `name`.
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters collapses into a single `-`. Leading and trailing separators
/// are dropped, so a name without any alphanumeric character yields an
/// empty string.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Build the `n`-th disambiguated candidate for `base` (`base-n`).
#[must_use]
pub fn with_suffix(base: &str, n: u32) -> String {
    format!("{base}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_lowercase_and_join_words_with_dash() {
        assert_eq!(slugify("Daily Backup"), "daily-backup");
    }

    #[test]
    fn should_collapse_separator_runs() {
        assert_eq!(slugify("Lights  --  Off__Now"), "lights-off-now");
    }

    #[test]
    fn should_trim_leading_and_trailing_separators() {
        assert_eq!(slugify("  !Wake up! "), "wake-up");
    }

    #[test]
    fn should_drop_non_ascii_characters() {
        assert_eq!(slugify("Café Lumière 2"), "caf-lumi-re-2");
    }

    #[test]
    fn should_return_empty_when_name_has_no_alphanumerics() {
        assert_eq!(slugify("?!  --"), "");
    }

    #[test]
    fn should_append_numeric_suffix() {
        assert_eq!(with_suffix("daily-backup", 1), "daily-backup-1");
    }
}
