//! Slug generation - URL- and path-safe identifiers derived from titles.

/// Placeholder used when a title has no sluggable characters.
pub const PLACEHOLDER: &str = "untitled";

/// Derive a slug from a title.
///
/// Diacritics are transliterated, everything is lower-cased, and runs of
/// non-alphanumeric characters collapse into a single hyphen. Never returns
/// an empty string.
pub fn generate(title: &str) -> String {
    let slug = ::slug::slugify(title);
    if slug.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        slug
    }
}

/// Check that a string is already a well-formed slug (`[a-z0-9]+(-[a-z0-9]+)*`).
pub fn is_valid(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_basic() {
        assert_eq!(generate("Hello, World!"), "hello-world");
        assert_eq!(generate("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(generate("---dashes---"), "dashes");
    }

    #[test]
    fn test_generate_strips_diacritics() {
        assert_eq!(generate("Café Crème"), "cafe-creme");
    }

    #[test]
    fn test_generate_never_empty() {
        assert_eq!(generate(""), PLACEHOLDER);
        assert_eq!(generate("!!! ???"), PLACEHOLDER);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let title = "Building a Blog in Rust (Part 2)";
        assert_eq!(generate(title), generate(title));
    }

    #[test]
    fn test_generated_slugs_are_valid() {
        for title in ["Hello, World!", "", "Ünïcödé títle", "2024: a year"] {
            assert!(is_valid(&generate(title)), "{title:?}");
        }
    }

    #[test]
    fn test_is_valid_rejects_unsafe_paths() {
        assert!(is_valid("hello-world"));
        assert!(!is_valid(""));
        assert!(!is_valid("../secrets"));
        assert!(!is_valid("Hello"));
        assert!(!is_valid("trailing-"));
        assert!(!is_valid("double--hyphen"));
    }
}
