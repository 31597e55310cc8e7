//! Item identifiers and the identifier assignment policy.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Literal prefix of system-assigned item identifiers.
pub const ITEM_ID_PREFIX: &str = "SKU-";

/// Identifier of an inventory item.
///
/// An opaque, non-blank string that addresses a single path segment: no `/`
/// and no control characters. Identifiers supplied by callers are kept as-is;
/// identifiers assigned by the system have the form `SKU-<uuid v7>`. Consumers
/// must not parse either form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Assign a fresh identifier: `SKU-` followed by a hyphenated UUIDv7.
    ///
    /// UUIDv7 is time-ordered, so generated ids also sort roughly by creation.
    /// Prefer passing IDs explicitly in tests for determinism.
    pub fn generate() -> Self {
        Self(format!("{ITEM_ID_PREFIX}{}", Uuid::now_v7()))
    }

    /// Parse a caller-supplied identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::invalid_id("ItemId: must not be blank"));
        }
        if raw.contains('/') {
            return Err(DomainError::invalid_id("ItemId: must not contain '/'"));
        }
        if raw.chars().any(char::is_control) {
            return Err(DomainError::invalid_id(
                "ItemId: must not contain control characters",
            ));
        }
        Ok(Self(raw))
    }

    /// Use the caller-supplied id when present and non-blank, otherwise generate one.
    ///
    /// A caller id that is present but malformed is an error, never replaced.
    pub fn assign(requested: Option<&str>) -> Result<Self, DomainError> {
        match requested {
            Some(raw) if !raw.trim().is_empty() => Self::parse(raw),
            _ => Ok(Self::generate()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_are_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();

        assert!(a.as_str().starts_with(ITEM_ID_PREFIX));
        assert!(a.as_str().len() > ITEM_ID_PREFIX.len());
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(matches!(ItemId::parse(""), Err(DomainError::InvalidId(_))));
        assert!(matches!(ItemId::parse("   "), Err(DomainError::InvalidId(_))));
        assert_eq!(ItemId::parse("X").unwrap().as_str(), "X");
    }

    #[test]
    fn parse_rejects_slash_and_control_characters() {
        for raw in ["a/b", "/", "a\nb", "tab\there", "nul\0"] {
            assert!(
                matches!(ItemId::parse(raw), Err(DomainError::InvalidId(_))),
                "{raw:?}"
            );
        }
        assert_eq!(ItemId::parse("café").unwrap().as_str(), "café");
        assert_eq!(ItemId::parse("A B-1").unwrap().as_str(), "A B-1");
    }

    #[test]
    fn assign_keeps_caller_id_and_fills_blank() {
        assert_eq!(ItemId::assign(Some("ITEM-7")).unwrap().as_str(), "ITEM-7");
        assert!(ItemId::assign(Some("  ")).unwrap().as_str().starts_with(ITEM_ID_PREFIX));
        assert!(ItemId::assign(None).unwrap().as_str().starts_with(ITEM_ID_PREFIX));
    }

    #[test]
    fn assign_rejects_malformed_caller_id() {
        assert!(matches!(ItemId::assign(Some("a/b")), Err(DomainError::InvalidId(_))));
        assert!(matches!(ItemId::assign(Some("a\nb")), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serde_is_a_plain_string_and_rejects_blank() {
        let id = ItemId::parse("ITEM-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ITEM-1\"");

        let back: ItemId = serde_json::from_str("\"ITEM-1\"").unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
        assert!(serde_json::from_str::<ItemId>("\"a/b\"").is_err());
    }
}
