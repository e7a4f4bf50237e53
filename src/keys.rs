//! Field key generation
//!
//! Field rules are configured with a human-readable name ("Opens At") and record
//! their messages under a normalized key ("opens_at"). [`KeyGenerator`] derives that
//! key, consulting an explicit override table first.
//!
//! # Example
//!
//! ```rust
//! use fieldcheck::keys::{to_underscore, KeyGenerator};
//!
//! assert_eq!(to_underscore("Opens At"), "opens_at");
//! assert_eq!(to_underscore("createdAt"), "created_at");
//!
//! let keys = KeyGenerator::new().with_key("E-Mail Address", "email");
//! assert_eq!(keys.generate("E-Mail Address"), "email");
//! assert_eq!(keys.generate("Opens At"), "opens_at");
//! ```

use std::collections::HashMap;

/// Normalize a field name into a lowercase, underscore-separated key.
///
/// - a lowercase letter followed by an uppercase one starts a new word
/// - every run of characters that are neither letters nor ASCII digits becomes one `_`;
///   numeric symbols such as `½` or `Ⅻ` count as separators
/// - the result is lowercased, with leading and trailing `_` removed
///
/// # Example
///
/// ```rust
/// use fieldcheck::keys::to_underscore;
///
/// assert_eq!(to_underscore("Opens At"), "opens_at");
/// assert_eq!(to_underscore("  user--name!! "), "user_name");
/// assert_eq!(to_underscore("OpensAt"), "opens_at");
/// ```
pub fn to_underscore(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if !is_word_char(c) {
            if prev.is_some_and(|p| p != '_') {
                key.push('_');
            }
            prev = Some('_');
            continue;
        }

        if c.is_uppercase() && prev.is_some_and(char::is_lowercase) {
            key.push('_');
        }

        key.extend(c.to_lowercase());
        prev = Some(c);
    }

    key.trim_matches('_').to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_digit() || (c.is_alphabetic() && !c.is_numeric())
}

/// Derives record keys from field names, with caller-supplied overrides.
///
/// Overrides are matched against the exact field name and returned verbatim. An
/// override mapped to an empty string counts as absent.
///
/// # Example
///
/// ```rust
/// use fieldcheck::keys::KeyGenerator;
///
/// let keys = KeyGenerator::new()
///     .with_key("Opens At", "opening_time")
///     .with_key("ZIP", "postal_code");
///
/// assert_eq!(keys.generate("Opens At"), "opening_time");
/// assert_eq!(keys.generate("ZIP"), "postal_code");
/// assert_eq!(keys.generate("Closes At"), "closes_at");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyGenerator {
    custom: HashMap<String, String>,
}

impl KeyGenerator {
    /// A generator with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a generator from an existing override table.
    pub fn from_overrides(custom: HashMap<String, String>) -> Self {
        Self { custom }
    }

    /// Map `name` to the fixed `key`.
    pub fn with_key(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.custom.insert(name.into(), key.into());
        self
    }

    /// The key for `name`: its override if one is set, otherwise [`to_underscore`].
    pub fn generate(&self, name: &str) -> String {
        match self.custom.get(name) {
            Some(key) if !key.is_empty() => key.clone(),
            _ => to_underscore(name),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyGenerator {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            custom: iter
                .into_iter()
                .map(|(name, key)| (name.into(), key.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces() {
        assert_eq!(to_underscore("Opens At"), "opens_at");
        assert_eq!(to_underscore("First Name"), "first_name");
    }

    #[test]
    fn test_single_word() {
        assert_eq!(to_underscore("Name"), "name");
        assert_eq!(to_underscore("number"), "number");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_underscore("OpensAt"), "opens_at");
        assert_eq!(to_underscore("userID"), "user_id");
        assert_eq!(to_underscore("createdAtUtc"), "created_at_utc");
    }

    #[test]
    fn test_all_caps_stays_one_word() {
        assert_eq!(to_underscore("URL"), "url");
    }

    #[test]
    fn test_symbol_runs_collapse() {
        assert_eq!(to_underscore("user--name"), "user_name");
        assert_eq!(to_underscore("a . b"), "a_b");
        assert_eq!(to_underscore("Opens At_Time"), "opens_at_time");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(to_underscore("  name  "), "name");
        assert_eq!(to_underscore("__name__"), "name");
        assert_eq!(to_underscore("!!!"), "");
        assert_eq!(to_underscore(""), "");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(to_underscore("Address Line 2"), "address_line_2");
        assert_eq!(to_underscore("v1"), "v1");
    }

    #[test]
    fn test_numeric_symbols_are_separators() {
        assert_eq!(to_underscore("Size ½"), "size");
        assert_eq!(to_underscore("Chapter Ⅻ"), "chapter");
        assert_eq!(to_underscore("Area m²"), "area_m");
        assert_eq!(to_underscore("Floor ٣ East"), "floor_east");
        assert_eq!(to_underscore("Step ½ 2"), "step_2");
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(to_underscore("Straße Nr"), "straße_nr");
    }

    #[test]
    fn test_generate_without_override() {
        assert_eq!(KeyGenerator::new().generate("Opens At"), "opens_at");
    }

    #[test]
    fn test_generate_override_verbatim() {
        let keys = KeyGenerator::new().with_key("Opens At", "Some Custom-Key");
        assert_eq!(keys.generate("Opens At"), "Some Custom-Key");
    }

    #[test]
    fn test_override_matches_exact_name() {
        let keys = KeyGenerator::new().with_key("Opens At", "open");
        assert_eq!(keys.generate("opens at"), "opens_at");
    }

    #[test]
    fn test_empty_override_ignored() {
        let keys = KeyGenerator::new().with_key("Name", "");
        assert_eq!(keys.generate("Name"), "name");
    }

    #[test]
    fn test_from_iterator_and_map() {
        let keys: KeyGenerator = vec![("A", "x"), ("B", "y")].into_iter().collect();
        assert_eq!(keys.generate("A"), "x");
        assert_eq!(keys.generate("B"), "y");

        let mut table = HashMap::new();
        table.insert("C".to_string(), "z".to_string());
        assert_eq!(KeyGenerator::from_overrides(table).generate("C"), "z");
    }
}
