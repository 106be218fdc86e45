//! Canonical entity keys
//!
//! Every grouping and every dimension join goes through [`EntityKey`] so that
//! whitespace drift in the source never splits one entity into two.

use serde::Serialize;
use std::fmt;

/// Normalized entity name: trimmed, internal whitespace collapsed to single
/// spaces. Case is preserved, since differently-cased names may be different
/// people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    /// Normalize a name; `None` when nothing but whitespace remains
    pub fn new(name: &str) -> Option<Self> {
        let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            None
        } else {
            Some(Self(collapsed))
        }
    }

    /// Normalize an optional source cell
    pub fn from_cell(cell: Option<&str>) -> Option<Self> {
        cell.and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased, underscore-joined natural identifier (`"Ali Veli"` -> `"ALI_VELI"`)
    pub fn identifier(&self) -> String {
        self.0.replace(' ', "_").to_uppercase()
    }
}

/// Upper-case for keyword matching, folding the dotted capital I so that
/// `Türkiye` and `TÜRKİYE` compare equal
pub fn fold_upper(text: &str) -> String {
    text.to_uppercase().replace('İ', "I")
}

/// Lower-case counterpart of [`fold_upper`]; `İ` becomes a plain `i`
/// instead of `i` plus a combining dot
pub fn fold_lower(text: &str) -> String {
    text.replace('İ', "i").to_lowercase()
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses_whitespace() {
        let key = EntityKey::new("  Ali \t  Veli ").unwrap();
        assert_eq!(key.as_str(), "Ali Veli");
        assert_eq!(key, EntityKey::new("Ali Veli").unwrap());
    }

    #[test]
    fn test_case_is_preserved() {
        assert_ne!(EntityKey::new("ali veli"), EntityKey::new("Ali Veli"));
    }

    #[test]
    fn test_blank_is_none() {
        assert_eq!(EntityKey::new(""), None);
        assert_eq!(EntityKey::new(" \n "), None);
        assert_eq!(EntityKey::from_cell(None), None);
    }

    #[test]
    fn test_identifier() {
        let key = EntityKey::new("Galatasaray  Spor Kulübü").unwrap();
        assert_eq!(key.identifier(), "GALATASARAY_SPOR_KULÜBÜ");
        assert_eq!(key.to_string(), "Galatasaray Spor Kulübü");
    }
}
