//! Parameter normalization.

use crate::palette::Palette;
use crate::params::key::CacheKey;

/// Validated colour overrides keyed by lowercase slot name.
///
/// Iteration order is the sorted order of the original request keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalParams {
    entries: Vec<(String, String)>,
}

impl CanonicalParams {
    /// Look up the colour for a slot. `slot` must already be lowercase.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, color)| color.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize into the cache key for this parameter set.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_entries(self.iter())
    }

    /// Insert or replace. A replaced slot keeps its original position.
    fn upsert(&mut self, slot: String, color: String) {
        match self.entries.iter_mut().find(|(name, _)| *name == slot) {
            Some(entry) => entry.1 = color,
            None => self.entries.push((slot, color)),
        }
    }
}

/// Map a raw parameter bag to its canonical form.
///
/// Pairs are visited in sorted raw-key order. Keys are lower-cased, values
/// that are not palette colours are dropped.
pub fn normalize<I, K, V>(palette: &Palette, raw: I) -> CanonicalParams
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = raw.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let mut params = CanonicalParams::default();
    for (key, value) in pairs {
        if let Some(color) = palette.canonical(value.as_ref()) {
            params.upsert(key.as_ref().to_lowercase(), color);
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::from_tokens(["#AABBCC", "#F7F6F5", "#545454"]).unwrap()
    }

    #[test]
    fn test_case_insensitive_keys_and_values() {
        let a = normalize(&palette(), [("Body", "#AABBCC")]);
        let b = normalize(&palette(), [("body", "aabbcc")]);
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.get("body"), Some("aabbcc"));
    }

    #[test]
    fn test_invalid_values_dropped() {
        let params = normalize(&palette(), [("foo", "not-a-color"), ("body", "#f7f6f5")]);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("body"), Some("f7f6f5"));
        assert_eq!(params.get("foo"), None);
    }

    #[test]
    fn test_unknown_slot_with_valid_color_kept() {
        let params = normalize(&palette(), [("hat", "545454")]);
        assert_eq!(params.get("hat"), Some("545454"));
    }

    #[test]
    fn test_order_independent_of_input() {
        let a = normalize(&palette(), [("hair", "545454"), ("body", "f7f6f5")]);
        let b = normalize(&palette(), [("body", "f7f6f5"), ("hair", "545454")]);
        assert_eq!(a.cache_key(), b.cache_key());
        let slots: Vec<&str> = a.iter().map(|(k, _)| k).collect();
        assert_eq!(slots, vec!["body", "hair"]);
    }

    #[test]
    fn test_order_follows_raw_keys() {
        // "Zeta" sorts before "alpha" in byte order.
        let params = normalize(&palette(), [("alpha", "545454"), ("Zeta", "f7f6f5")]);
        let slots: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(slots, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_colliding_keys_later_value_wins() {
        let params = normalize(&palette(), [("body", "545454"), ("Body", "f7f6f5")]);
        assert_eq!(params.len(), 1);
        // "Body" < "body", so "body" is applied last.
        assert_eq!(params.get("body"), Some("545454"));
    }

    #[test]
    fn test_empty_input() {
        let params = normalize(&palette(), Vec::<(String, String)>::new());
        assert!(params.is_empty());
        assert_eq!(params.cache_key().as_str(), "{}");
    }
}
