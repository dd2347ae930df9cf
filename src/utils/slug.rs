//! Slug derivation for catalog entities.

/// Derives the URL-safe label for a display name: punctuation and
/// underscores are stripped, runs of spaces collapse to single hyphens, and
/// the result is lowercased. The transform is deterministic, so recomputing
/// the label for the same name always yields the same value.
pub fn get_label(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_name() {
        assert_eq!(get_label("Garden Tools"), "garden-tools");
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(get_label("Home & Garden"), "home-garden");
        assert_eq!(get_label("Kids' Toys!"), "kids-toys");
        assert_eq!(get_label("snake_case_name"), "snakecasename");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(get_label("  Wide   Spacing  "), "wide-spacing");
    }

    #[test]
    fn test_idempotent_per_name() {
        let name = "Office & Stationery";
        assert_eq!(get_label(name), get_label(name));
    }

    #[test]
    fn test_already_clean_name_unchanged() {
        assert_eq!(get_label("plain"), "plain");
    }

    #[test]
    fn test_numbers_kept() {
        assert_eq!(get_label("USB 3.0 Cables"), "usb-30-cables");
    }
}
