//! Canonical serialization and hashing for reproducible output.
//!
//! Trees, policies and reports are hashed through their JSON form so that
//! two runs over the same grid can be compared by a single string.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Children and records serialize in traversal order
//! - Only ordered collections (`Vec`, `BTreeSet`) appear in hashed data

use std::any::type_name;

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Seed for every digest this crate stores: tree fingerprints, policy and
/// report hashes, overlay color seeds.
pub const HASH_SEED: u64 = 0;

/// Canonical JSON bytes of a tree shape, policy or report section.
///
/// # Panics
///
/// If `T` has a `Serialize` impl that can fail (e.g. a map with non-string
/// keys). Hashed types in this crate are plain structs, vectors, tuples and
/// enums, so this never happens for them.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(e) => panic!("{} has no canonical JSON form: {e}", type_name::<T>()),
    }
}

/// xxh64 of the canonical bytes; seeds overlay colors.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), HASH_SEED)
}

/// [`canonical_hash`] as 16 lowercase hex digits, the form stored in
/// `EmitReport::policy_hash`, `EmitReport::report_hash` and
/// `EnclosureTree::fingerprint`.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, ColorClass};

    #[test]
    fn test_hash_is_stable_across_calls() {
        let value = (ColorClass::High, BoundingBox::new(1, 2, 3, 4));
        assert_eq!(canonical_hash(&value), canonical_hash(&value));
        assert_eq!(canonical_hash_hex(&value).len(), 16);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = BoundingBox::new(1, 2, 3, 4);
        let b = BoundingBox::new(1, 2, 3, 5);
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn test_bbox_bytes_follow_field_order() {
        let bbox = BoundingBox::new(1, 2, 3, 4);
        let bytes = to_canonical_bytes(&bbox);
        assert_eq!(bytes, br#"{"min_x":1,"min_y":2,"max_x":3,"max_y":4}"#.to_vec());
        assert_eq!(canonical_hash(&bbox), xxh64(&bytes, HASH_SEED));
    }

    #[test]
    #[should_panic(expected = "has no canonical JSON form")]
    fn test_unserializable_value_panics_with_type() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), 0u8);
        to_canonical_bytes(&map);
    }
}
