//! Content hashing for grid identity.
//!
//! Uses FNV-1a for fast, deterministic hashing. The hash is not
//! cryptographically secure; it exists so that collaborators can cache
//! per-grid artefacts keyed on the point distribution.

use std::fmt;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Identity hash of a structured grid, derived only from its `pl` array.
///
/// Two grids with the same per-latitude point counts hash identically,
/// whatever their latitude values or longitude bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridHash(pub u64);

impl GridHash {
    /// Hash a `pl` sequence.
    ///
    /// The band count is folded in first so that a prefix of `pl` never
    /// collides with the full sequence.
    pub fn from_pl(pl: &[i64]) -> Self {
        let mut hash = fnv1a_u64(FNV_OFFSET, pl.len() as u64);
        for &n in pl {
            hash = fnv1a_u64(hash, n as u64);
        }
        Self(hash)
    }

    /// Raw 64-bit value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GridHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_pl_hashes_band_count_only() {
        assert_eq!(GridHash::from_pl(&[]), GridHash(fnv1a_u64(FNV_OFFSET, 0)));
    }

    #[test]
    fn order_matters() {
        assert_ne!(GridHash::from_pl(&[2, 4]), GridHash::from_pl(&[4, 2]));
    }

    #[test]
    fn prefix_does_not_collide() {
        assert_ne!(GridHash::from_pl(&[4, 4]), GridHash::from_pl(&[4, 4, 4]));
    }

    #[test]
    fn display_is_fixed_width_hex() {
        assert_eq!(GridHash(0xab).to_string(), "00000000000000ab");
    }

    proptest! {
        #[test]
        fn equal_pl_equal_hash(pl in prop::collection::vec(1i64..2000, 0..64)) {
            let copy = pl.clone();
            prop_assert_eq!(GridHash::from_pl(&pl), GridHash::from_pl(&copy));
        }
    }
}
