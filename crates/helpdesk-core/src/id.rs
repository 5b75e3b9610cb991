//! ID generation for tickets and comments
//!
//! Hash-based IDs so records created on different machines never collide.
//! Format: hd-xxxxxx (6 lowercase alphanumeric chars).

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a unique record ID
///
/// Uses UUID + timestamp hash, encoded as base32 lowercase.
pub fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    let encoded = base32::encode(base32::Alphabet::Crockford, &hash[..4])
        .to_lowercase()
        .chars()
        .take(6)
        .collect::<String>();

    format!("{}-{}", prefix, encoded)
}

/// Split an ID into prefix and hash parts
pub fn parse_id(id: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = id.splitn(2, '-').collect();
    if parts.len() == 2 {
        Some((parts[0], parts[1]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id("hd");
        assert!(id.starts_with("hd-"));
        assert_eq!(id.len(), 9); // hd- + 6 chars
    }

    #[test]
    fn test_ids_unique() {
        let a = generate_id("hd");
        let b = generate_id("hd");
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("hd-ab12cd"), Some(("hd", "ab12cd")));
        assert_eq!(parse_id("nodash"), None);
    }
}
