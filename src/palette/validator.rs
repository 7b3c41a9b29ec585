//! Palette membership checks.

use std::collections::HashSet;
use thiserror::Error;

/// Colours accepted when the configuration does not provide its own list.
pub const DEFAULT_COLORS: [&str; 8] = [
    "#F7F6F5", "#5399ba", "#F9D656", "#E2653F", "#6FC47B", "#9A865D", "#545454", "#0B1821",
];

/// Errors raised while building a palette from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    /// The palette has no colours at all.
    #[error("palette is empty")]
    Empty,

    /// A configured colour is not a 6-digit hex triplet.
    #[error("invalid palette colour {0:?}: expected 6 hex digits with optional '#'")]
    InvalidColor(String),
}

/// Strip an optional leading `#` and lower-case the rest.
pub fn normalize_token(token: &str) -> String {
    token.strip_prefix('#').unwrap_or(token).to_ascii_lowercase()
}

fn is_hex_triplet(token: &str) -> bool {
    token.len() == 6 && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A fixed set of accepted colours, stored as lowercase hex without marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: HashSet<String>,
}

impl Palette {
    /// Build a palette from configured tokens.
    ///
    /// Every token must be a hex triplet (case-insensitive, optional `#`).
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut colors = HashSet::new();
        for token in tokens {
            let normalized = normalize_token(token.as_ref());
            if !is_hex_triplet(&normalized) {
                return Err(PaletteError::InvalidColor(token.as_ref().to_string()));
            }
            colors.insert(normalized);
        }

        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }

        Ok(Self { colors })
    }

    /// Return true if `token` names a palette colour.
    pub fn is_valid(&self, token: &str) -> bool {
        self.canonical(token).is_some()
    }

    /// Return the normalized form of `token` if it is in the palette.
    pub fn canonical(&self, token: &str) -> Option<String> {
        let normalized = normalize_token(token);
        self.colors.contains(&normalized).then_some(normalized)
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| normalize_token(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_and_case_insensitive() {
        let palette = Palette::default();
        assert!(palette.is_valid("#F7F6F5"));
        assert!(palette.is_valid("f7f6f5"));
        assert!(palette.is_valid("F7f6F5"));
        assert!(palette.is_valid("#5399BA"));
        assert_eq!(palette.canonical("#0B1821").as_deref(), Some("0b1821"));
    }

    #[test]
    fn test_one_digit_off_is_rejected() {
        let palette = Palette::default();
        assert!(!palette.is_valid("f7f6f4"));
        assert!(!palette.is_valid("#5399bb"));
        assert!(!palette.is_valid("0b1820"));
    }

    #[test]
    fn test_malformed_tokens() {
        let palette = Palette::default();
        assert!(!palette.is_valid(""));
        assert!(!palette.is_valid("#"));
        assert!(!palette.is_valid("not-a-color"));
        assert!(!palette.is_valid("##f7f6f5"));
        assert!(!palette.is_valid("f7f6f5 "));
        assert!(!palette.is_valid("f7#f6f5"));
    }

    #[test]
    fn test_from_tokens() {
        let palette = Palette::from_tokens(["#AABBCC", "aabbcc", "112233"]).unwrap();
        assert_eq!(palette.len(), 2);
        assert!(palette.is_valid("#aAbBcC"));
        assert!(!palette.is_valid("f7f6f5"));

        assert_eq!(
            Palette::from_tokens(["#12345"]),
            Err(PaletteError::InvalidColor("#12345".to_string()))
        );
        assert_eq!(
            Palette::from_tokens(["zzzzzz"]),
            Err(PaletteError::InvalidColor("zzzzzz".to_string()))
        );
        assert_eq!(Palette::from_tokens(Vec::<String>::new()), Err(PaletteError::Empty));
    }

    #[test]
    fn test_default_palette_size() {
        assert_eq!(Palette::default().len(), DEFAULT_COLORS.len());
    }
}
