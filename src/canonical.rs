//! Canonical serialization for graph fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: vectors serialize in index order
//! - Maps hashed here must be `BTreeMap`, never `HashMap`

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute the xxh64 hash of a value's canonical bytes.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> Result<u64, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, 0))
}

/// Compute the canonical hash as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        value: i32,
    }

    #[test]
    fn test_determinism() {
        let s = Sample {
            name: "test".to_string(),
            value: 42,
        };

        assert_eq!(canonical_hash(&s).unwrap(), canonical_hash(&s).unwrap());
    }

    #[test]
    fn test_hex_is_fixed_width() {
        let hex = canonical_hash_hex(&0u8).unwrap();
        assert_eq!(hex.len(), 16);
    }
}
