//! Derivation of URL-safe identifiers from free text.

/// Normalizes arbitrary text into a lowercase `[a-z0-9-]` slug.
///
/// Runs of whitespace, underscores and hyphens collapse into single
/// hyphens; every other character outside the slug alphabet is dropped.
/// Total and deterministic. Empty input, or input with no usable
/// characters, yields an empty string, which callers must reject before
/// persisting.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_hyphen = false;
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Classic Tee"), "classic-tee");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("  Classic   _  Tee  "), "classic-tee");
        assert_eq!(slugify("a--_--b"), "a-b");
    }

    #[test]
    fn drops_characters_outside_the_alphabet() {
        assert_eq!(slugify("Café! Nº9"), "caf-n9");
        assert_eq!(slugify("a!b"), "ab");
    }

    #[test]
    fn never_produces_edge_or_double_hyphens() {
        for raw in ["--lead", "trail--", "-", "a - b", "_x_", "  "] {
            let slug = slugify(raw);
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{}", slug);
            assert!(!slug.contains("--"), "{}", slug);
        }
    }

    #[test]
    fn unusable_input_yields_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!¡?¿"), "");
    }

    #[test]
    fn idempotent() {
        for raw in ["Classic Tee", "  A_B--C  ", "Ünïcode Míx 42", "already-a-slug"] {
            let once = slugify(raw);
            assert_eq!(slugify(&once), once);
        }
    }
}
