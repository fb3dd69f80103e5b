//! Strongly-typed ID wrappers for all entity types
//!
//! Cards, purchases and installments reference each other by ID, so each
//! gets its own newtype to keep them from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short form used in listings
            pub fn short(&self) -> String {
                self.to_string()
            }

            /// Check whether a user-typed reference matches this ID.
            ///
            /// Accepts the full UUID, the displayed short form, or the bare
            /// 8-character prefix.
            pub fn matches(&self, reference: &str) -> bool {
                let reference = reference.trim();
                let bare = reference.strip_prefix($display_prefix).unwrap_or(reference);
                bare.len() >= 8 && self.0.to_string().starts_with(&bare.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(CardId, "card-");
define_id!(PurchaseId, "pur-");
define_id!(InstallmentId, "inst-");
define_id!(PaidInvoiceId, "paid-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = CardId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("card-"));
        assert_eq!(display.len(), 13);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: PurchaseId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_matches_short_reference() {
        let id = InstallmentId::from(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap());
        assert!(id.matches("inst-550e8400"));
        assert!(id.matches("550e8400"));
        assert!(id.matches("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id.matches("550e"));
        assert!(!id.matches("deadbeef"));
    }

    #[test]
    fn test_id_serialization() {
        let id = CardId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
