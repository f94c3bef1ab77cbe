use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, returning lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Content-derived commit identifier.
///
/// Hashes the JSON object `{"description", "time", "type"}`. `serde_json`
/// maps keep keys sorted, so the byte layout is stable.
pub fn commit_hash(commit_type: &str, description: &str, time: &str) -> String {
    let value = serde_json::json!({
        "type": commit_type,
        "description": description,
        "time": time,
    });
    let bytes = serde_json::to_vec(&value).unwrap_or_default();
    sha256_hex(&bytes)
}
