//! Deterministic ID generation using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A deterministic entity ID derived from content hash.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId from a hash string.
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Generate an EntityId from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let result = hasher.finalize();
        let hash = hex::encode(result);
        Self(hash[..16].to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for tournament IDs
pub type TournamentId = EntityId;

/// Type alias for team IDs
pub type TeamId = EntityId;

/// Type alias for adjudicator IDs
pub type AdjudicatorId = EntityId;

/// Type alias for pairing IDs
pub type PairingId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation_deterministic() {
        let id1 = EntityId::generate(&["national-champs-2026", "Team Alpha"]);
        let id2 = EntityId::generate(&["national-champs-2026", "Team Alpha"]);
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_entity_id_different_inputs() {
        let id1 = EntityId::generate(&["national-champs-2026", "Team Alpha"]);
        let id2 = EntityId::generate(&["national-champs-2026", "Team Beta"]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_entity_id_length() {
        let id = EntityId::generate(&["test", "input"]);
        assert_eq!(id.as_str().len(), 16);
    }

    #[test]
    fn test_entity_id_hex_format() {
        let id = EntityId::generate(&["test"]);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_entity_id_serialization() {
        let id = EntityId::generate(&["test"]);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_entity_id_display() {
        let id = EntityId::new("abc123def456".to_string());
        assert_eq!(format!("{}", id), "abc123def456");
    }

    #[test]
    fn test_entity_id_ordering_is_stable() {
        let mut ids = vec![
            EntityId::from("bbb"),
            EntityId::from("aaa"),
            EntityId::from("ccc"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "aaa");
        assert_eq!(ids[2].as_str(), "ccc");
    }

    #[test]
    fn test_entity_id_from_str() {
        let id = EntityId::from("another-id");
        assert_eq!(id.as_str(), "another-id");
    }
}
