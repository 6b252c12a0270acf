//! SHA-256 hashing leaf used by the mining loop

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of `data`.
///
/// Deterministic and stateless; the mining loop calls this once per nonce
/// candidate.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
