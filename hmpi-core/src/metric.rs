use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Short code naming a regulated substance, e.g. `Pb`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(String);

impl MetricId {
    pub fn new(id: impl Into<String>) -> Self {
        MetricId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MetricId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MetricId {
    fn from(v: &str) -> Self {
        MetricId(v.to_string())
    }
}

impl From<String> for MetricId {
    fn from(v: String) -> Self {
        MetricId(v)
    }
}

// Column keywords per element symbol, already lowercased and stripped of
// separators. `Pb_conc`, `LEAD` and `pb` all resolve to `Pb`.
const METAL_KEYWORDS: [(&str, &str, &[&str]); 10] = [
    ("Hg", "Mercury", &["hg", "mercury", "hgconc", "mercuryconc", "merc"]),
    ("Pb", "Lead", &["pb", "lead", "pbconc", "leadconc"]),
    ("Cd", "Cadmium", &["cd", "cadmium", "cdconc"]),
    ("As", "Arsenic", &["as", "arsenic", "asconc"]),
    ("Cr", "Chromium", &["cr", "chromium", "crconc"]),
    ("Ni", "Nickel", &["ni", "nickel", "niconc"]),
    ("Cu", "Copper", &["cu", "copper", "cuconc"]),
    ("Zn", "Zinc", &["zn", "zinc", "znconc"]),
    ("Fe", "Iron", &["fe", "iron", "feconc"]),
    ("Mn", "Manganese", &["mn", "manganese", "mnconc"]),
];

/// Resolve a raw column name to its element symbol, if it names a known metal.
pub fn canonical_metric(raw: &str) -> Option<&'static str> {
    let key: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    METAL_KEYWORDS
        .iter()
        .find(|(_, _, keywords)| keywords.contains(&key.as_str()))
        .map(|(symbol, _, _)| *symbol)
}

/// English element name for a symbol, e.g. `Lead` for `Pb`.
pub fn element_name(symbol: &str) -> Option<&'static str> {
    METAL_KEYWORDS
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve_regardless_of_case_and_separators() {
        assert_eq!(canonical_metric("Lead"), Some("Pb"));
        assert_eq!(canonical_metric("pb_conc"), Some("Pb"));
        assert_eq!(canonical_metric("HG"), Some("Hg"));
        assert_eq!(canonical_metric("Mercury-Conc"), Some("Hg"));
        assert_eq!(canonical_metric("Zn"), Some("Zn"));
    }

    #[test]
    fn unknown_columns_do_not_resolve() {
        assert_eq!(canonical_metric("Uranium"), None);
        assert_eq!(canonical_metric("Latitude"), None);
        assert_eq!(canonical_metric(""), None);
    }

    #[test]
    fn element_names_follow_symbols() {
        assert_eq!(element_name("Cd"), Some("Cadmium"));
        assert_eq!(element_name("Xx"), None);
    }
}
