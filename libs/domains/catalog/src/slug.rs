//! Slug derivation.

/// Derive a URL-safe slug from arbitrary text.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen, and strips leading and trailing
/// hyphens. Derivation happens once at creation time; renaming a product
/// never regenerates its slug.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello, World! 2024"), "hello-world-2024");
    }

    #[test]
    fn test_collapses_symbol_runs() {
        assert_eq!(slugify("a -- b && c"), "a-b-c");
        assert_eq!(slugify("Walnut   Desk"), "walnut-desk");
    }

    #[test]
    fn test_trims_edge_hyphens() {
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("!!!loud!!!"), "loud");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(slugify("USB-C Hub 7-in-1"), "usb-c-hub-7-in-1");
    }

    #[test]
    fn test_non_ascii_maps_to_hyphen() {
        assert_eq!(slugify("café crème"), "caf-cr-me");
    }

    #[test]
    fn test_degenerate_input_yields_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
