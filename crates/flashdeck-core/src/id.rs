//! ID generation for themes and cards
//!
//! Hash-based IDs so two records created in the same instant never collide.
//! Format: <prefix>-xxxxxxxxxxxx (12 lowercase Crockford base32 chars)

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix for theme IDs
pub const THEME_PREFIX: &str = "thm";

/// Prefix for card IDs
pub const CARD_PREFIX: &str = "crd";

const HASH_CHARS: usize = 12;

/// Generate a unique theme or card ID
///
/// Card ids are also the keys of the shared stats map, which is never pruned,
/// so ids must stay unique across every theme for the life of the storage
/// file. 12 base32 chars (60 bits of the hash) keep collisions out of reach
/// for any realistic collection size.
pub fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    // 8 bytes encode to 13 chars; keep the first 12
    let encoded = base32::encode(base32::Alphabet::Crockford, &hash[..8])
        .to_lowercase()
        .chars()
        .take(HASH_CHARS)
        .collect::<String>();

    format!("{}-{}", prefix, encoded)
}
