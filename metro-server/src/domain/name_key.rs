//! Station name normalization.
//!
//! Station labels arrive from several spreadsheets that disagree on case,
//! spacing, apostrophe glyphs and whether a line qualifier such as
//! `"(KJL)"` is attached. Two keys are derived from every raw label:
//!
//! - the [`StrictKey`] identifies a station exactly (qualifiers kept);
//! - the [`GroupKey`] identifies the physical location (qualifiers
//!   stripped), so `"Masjid Jamek (KJL)"` and `"Masjid Jamek (SBK)"`
//!   share a group and form an interchange.
//!
//! Every name comparison in the crate goes through these two types.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A parenthesised segment together with the whitespace around it.
static PARENTHESISED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*").expect("static regex is valid"));

/// Glyphs that render as an apostrophe in the source data.
const APOSTROPHE_VARIANTS: [&str; 4] = ["â€™", "\u{2019}", "\u{2018}", "\u{02BC}"];

/// Exact station identity key.
///
/// Lowercased, whitespace-collapsed, apostrophe-unified. Parentheses and
/// their contents are preserved.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StrictKey;
///
/// let a = StrictKey::new("  Masjid   Jamek (KJL) ");
/// let b = StrictKey::new("masjid jamek (kjl)");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "masjid jamek (kjl)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StrictKey(String);

impl StrictKey {
    /// Normalize a raw label into its strict key.
    pub fn new(raw: &str) -> Self {
        StrictKey(normalize(raw))
    }

    /// Normalize an optional label; `None` becomes the empty key.
    pub fn from_optional(raw: Option<&str>) -> Self {
        Self::new(raw.unwrap_or_default())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the key of an empty or whitespace-only label.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StrictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Physical location key: the strict key with parenthesised qualifiers removed.
///
/// # Examples
///
/// ```
/// use metro_server::domain::GroupKey;
///
/// assert_eq!(
///     GroupKey::new("Pasar Seni (SBK)"),
///     GroupKey::new("Pasar Seni (KJL)"),
/// );
/// assert_eq!(GroupKey::new("Pasar Seni (SBK)").as_str(), "pasar seni");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupKey(String);

impl GroupKey {
    /// Normalize a raw label into its group key.
    pub fn new(raw: &str) -> Self {
        let stripped = PARENTHESISED.replace_all(raw, " ");
        GroupKey(normalize(&stripped))
    }

    /// Normalize an optional label; `None` becomes the empty key.
    pub fn from_optional(raw: Option<&str>) -> Self {
        Self::new(raw.unwrap_or_default())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strict key of a raw label, as a plain string.
pub fn strict_key(raw: &str) -> String {
    StrictKey::new(raw).0
}

/// Group key of a raw label, as a plain string.
pub fn group_key(raw: &str) -> String {
    GroupKey::new(raw).0
}

/// True when two labels name the same physical stop under different
/// line-qualified names.
pub fn is_interchange_pair(a: &str, b: &str) -> bool {
    StrictKey::new(a) != StrictKey::new(b) && GroupKey::new(a) == GroupKey::new(b)
}

fn normalize(raw: &str) -> String {
    let mut unified = raw.to_lowercase();
    for variant in APOSTROPHE_VARIANTS {
        if unified.contains(variant) {
            unified = unified.replace(variant, "'");
        }
    }
    unified.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_key_collapses_whitespace_and_case() {
        assert_eq!(strict_key("  Bukit   Bintang\t"), "bukit bintang");
        assert_eq!(strict_key("KLCC"), "klcc");
    }

    #[test]
    fn strict_key_keeps_parentheses() {
        assert_eq!(strict_key("Masjid Jamek (KJL)"), "masjid jamek (kjl)");
        assert_ne!(strict_key("Masjid Jamek (KJL)"), strict_key("Masjid Jamek"));
    }

    #[test]
    fn apostrophes_unified() {
        assert_eq!(strict_key("King\u{2019}s Cross"), "king's cross");
        assert_eq!(strict_key("Kingâ€™s Cross"), "king's cross");
        assert_eq!(strict_key("King's Cross"), "king's cross");
    }

    #[test]
    fn group_key_strips_qualifier() {
        assert_eq!(group_key("Tun Razak Exchange (TRX)"), "tun razak exchange");
        assert_eq!(group_key("Tun Razak Exchange"), "tun razak exchange");
    }

    #[test]
    fn group_key_strips_inner_qualifier_without_gluing_words() {
        assert_eq!(group_key("Pasar (SBK) Seni"), "pasar seni");
    }

    #[test]
    fn empty_inputs_normalize_to_empty() {
        assert_eq!(strict_key(""), "");
        assert_eq!(group_key("   "), "");
        assert!(StrictKey::from_optional(None).is_empty());
        assert_eq!(GroupKey::from_optional(None).as_str(), "");
    }

    #[test]
    fn interchange_pair_detection() {
        assert!(is_interchange_pair("X (Line1)", "X (Line2)"));
        assert!(is_interchange_pair("X (Line1)", "X"));
        assert!(!is_interchange_pair("X (Line1)", "x  (line1)"));
        assert!(!is_interchange_pair("X", "Y"));
    }

    #[test]
    fn display_matches_as_str() {
        let key = StrictKey::new("Dang Wangi");
        assert_eq!(key.to_string(), key.as_str());
        let group = GroupKey::new("Dang Wangi (KJL)");
        assert_eq!(group.to_string(), "dang wangi");
    }
}
