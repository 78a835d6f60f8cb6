//! Deterministic script variable names for blocks and events.

use crate::script::{is_reserved_word, is_valid_identifier};
use ahash::AHashMap;

fn is_identifier_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_'
}

/// Derives the script variable name for a block from its label and node id.
///
/// The label is lowercased, spaces become underscores, everything that cannot
/// appear in an identifier (punctuation, non-ASCII letters) is stripped, and
/// the node id is appended so that identically-labeled nodes stay distinct.
/// A `var_` prefix rescues names that start with a digit.
pub fn derive_var_name(label: &str, id: &str) -> String {
    let mut base: String = label
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(is_identifier_char)
        .collect();
    base.push('_');
    base.extend(id.chars().filter(is_identifier_char));
    if is_valid_identifier(&base) {
        base
    } else {
        format!("var_{base}")
    }
}

/// Derives the script variable name for a standalone event from its declared
/// name. Events share the script namespace with blocks, so the same
/// identifier rules apply; an `event_` prefix rescues names left empty or
/// digit-led after stripping.
pub fn derive_event_var_name(name: &str) -> String {
    let base: String = name
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(is_identifier_char)
        .collect();
    if is_valid_identifier(&base) && !is_reserved_word(&base) {
        base
    } else {
        format!("event_{base}")
    }
}

/// Hands out unique names by appending `_2`, `_3`, ... to repeated bases.
#[derive(Debug, Default)]
pub struct NameAllocator {
    seen: AHashMap<String, usize>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str) -> String {
        let count = self.seen.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{base}_{count}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_lose_punctuation_and_non_ascii() {
        assert_eq!(derive_var_name("Gain (dB)", "3"), "gain_db_3");
        assert_eq!(derive_var_name("Débit π", "1"), "dbit__1");
    }

    #[test]
    fn digit_led_names_get_a_prefix() {
        assert_eq!(derive_var_name("2nd Stage", "7"), "var_2nd_stage_7");
        assert_eq!(derive_event_var_name("2nd tick"), "event_2nd_tick");
    }

    #[test]
    fn event_names_become_identifiers() {
        assert_eq!(derive_event_var_name("my sampler"), "my_sampler");
        assert_eq!(derive_event_var_name("tick"), "tick");
        assert_eq!(derive_event_var_name("!!!"), "event_");
        assert_eq!(derive_event_var_name("fn"), "event_fn");
    }
}
