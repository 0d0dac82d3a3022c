use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of a file body, the fingerprint used for duplicate lookups.
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}
