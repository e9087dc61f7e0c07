//! ID generation for prereq tasks.

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Generate a unique task ID from content + entropy.
/// Format: "pq-" + 12 hex chars of SHA256(owner + name + timestamp + random)
///
/// IDs are unique across owners, so the owner goes into the hash along
/// with the name. 8 random bytes keep two identical tasks created in the
/// same nanosecond apart.
pub fn generate_id(owner_id: &str, name: &str, created_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner_id.as_bytes());
    hasher.update(name.as_bytes());
    hasher.update(created_at.timestamp_nanos_opt().unwrap_or(0).to_le_bytes());
    hasher.update(rand::rng().random::<[u8; 8]>());
    let hash = hasher.finalize();

    // 12 hex chars = 48 bits, comfortably collision-free at task-list scale
    let mut id = String::with_capacity(15);
    id.push_str("pq-");
    for byte in &hash[..6] {
        let _ = write!(id, "{:02x}", byte);
    }
    id
}
