//! Short random identifiers addressing stored wishes.
//!
//! Identifiers are drawn from the URL-safe alphabet used by nanoid so they
//! can be pasted into a query string without encoding. No uniqueness check
//! is performed; with 64^10 possible values collisions are not a concern
//! for the retention window.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of a generated wish identifier.
pub const WISH_ID_LENGTH: usize = 10;

/// Longest identifier accepted on lookup.
///
/// Anything longer cannot have been produced by [`WishId::generate`], so the
/// read path answers "not found" without touching the store.
pub const MAX_WISH_ID_LENGTH: usize = 64;

/// URL-safe identifier alphabet (`A-Z a-z 0-9 _ -`).
const ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

// ---------------------------------------------------------------------------
// WishId
// ---------------------------------------------------------------------------

/// Opaque identifier of a stored wish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishId(String);

impl WishId {
    /// Generate a fresh random identifier of [`WISH_ID_LENGTH`] characters.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id: String = (0..WISH_ID_LENGTH)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect();
        Self(id)
    }

    /// Parse a caller-supplied identifier.
    ///
    /// Returns `None` for empty or overlong values and for values containing
    /// characters outside the identifier alphabet.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.len() > MAX_WISH_ID_LENGTH {
            return None;
        }
        if !raw.bytes().all(|b| ALPHABET.contains(&b)) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_has_expected_length() {
        let id = WishId::generate();
        assert_eq!(id.as_str().len(), WISH_ID_LENGTH);
    }

    #[test]
    fn generated_id_is_url_safe() {
        for _ in 0..200 {
            let id = WishId::generate();
            assert!(
                id.as_str()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                "unexpected character in {id}"
            );
        }
    }

    #[test]
    fn generated_ids_differ() {
        let a = WishId::generate();
        let b = WishId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_id_parses_back() {
        let id = WishId::generate();
        assert_eq!(WishId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn alphabet_has_no_duplicates() {
        let mut seen = ALPHABET.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(WishId::parse(""), None);
    }

    #[test]
    fn parse_rejects_foreign_characters() {
        assert_eq!(WishId::parse("abc/def"), None);
        assert_eq!(WishId::parse("wish:abc"), None);
        assert_eq!(WishId::parse("abc def"), None);
    }

    #[test]
    fn parse_rejects_overlong() {
        let long = "a".repeat(MAX_WISH_ID_LENGTH + 1);
        assert_eq!(WishId::parse(&long), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = WishId::parse("V1StGXR8_Z").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"V1StGXR8_Z\"");
    }
}
