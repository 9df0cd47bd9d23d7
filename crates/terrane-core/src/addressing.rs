//! Bit-packed addressing of blocks inside a chunk.
//!
//! Index layout: `x | y << BITS_X | z << (BITS_X + BITS_Y)`, so X varies
//! fastest and each horizontal layer is a contiguous run of indices.

use crate::constants::*;
use glam::UVec3;

/// Pack a local coordinate into a block index.
///
/// Coordinates are masked to their bit widths; callers are expected to pass
/// in-bounds values (see [`in_bounds`]).
#[inline]
pub fn pack(x: u32, y: u32, z: u32) -> usize {
    ((x & X_MASK) | ((y & Y_MASK) << BITS_X) | ((z & Z_MASK) << (BITS_X + BITS_Y))) as usize
}

/// Unpack a block index into its local coordinate.
#[inline]
pub fn unpack(index: usize) -> (u32, u32, u32) {
    let i = index as u32;
    (
        i & X_MASK,
        (i >> BITS_X) & Y_MASK,
        (i >> (BITS_X + BITS_Y)) & Z_MASK,
    )
}

/// Pack a local coordinate given as a vector.
#[inline]
pub fn pack_vec(local: UVec3) -> usize {
    pack(local.x, local.y, local.z)
}

/// Unpack a block index into a vector.
#[inline]
pub fn unpack_vec(index: usize) -> UVec3 {
    let (x, y, z) = unpack(index);
    UVec3::new(x, y, z)
}

/// Whether a signed local coordinate lies inside the chunk.
#[inline]
pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    x >= 0
        && y >= 0
        && z >= 0
        && (x as u32) < CHUNK_WIDTH
        && (y as u32) < CHUNK_DEPTH
        && (z as u32) < CHUNK_HEIGHT
}

/// Diagnostic check for local coordinates that are clearly out of range.
///
/// Compares with `>` rather than `>=`, so a coordinate equal to the chunk
/// dimension is not reported. Only used for logging; indexing goes through
/// [`in_bounds`].
pub fn is_unreasonable_local(x: u32, y: u32, z: u32) -> bool {
    x > CHUNK_WIDTH || y > CHUNK_DEPTH || z > CHUNK_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_all_in_bounds() {
        for z in 0..CHUNK_HEIGHT {
            for y in 0..CHUNK_DEPTH {
                for x in 0..CHUNK_WIDTH {
                    let index = pack(x, y, z);
                    assert!(index < BLOCKS_PER_CHUNK);
                    assert_eq!(unpack(index), (x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_pack_is_index_order() {
        assert_eq!(pack(0, 0, 0), 0);
        assert_eq!(pack(1, 0, 0), 1);
        assert_eq!(pack(0, 1, 0), STRIDE_Y);
        assert_eq!(pack(0, 0, 1), STRIDE_Z);
        assert_eq!(
            pack(X_MASK, Y_MASK, Z_MASK),
            BLOCKS_PER_CHUNK - 1,
            "last block must map to last index"
        );
    }

    #[test]
    fn test_vec_helpers_match() {
        let local = UVec3::new(5, 9, 77);
        assert_eq!(pack_vec(local), pack(5, 9, 77));
        assert_eq!(unpack_vec(pack_vec(local)), local);
    }

    #[test]
    fn test_in_bounds_edges() {
        assert!(in_bounds(0, 0, 0));
        assert!(in_bounds(15, 15, 127));
        assert!(!in_bounds(-1, 0, 0));
        assert!(!in_bounds(16, 0, 0));
        assert!(!in_bounds(0, 16, 0));
        assert!(!in_bounds(0, 0, 128));
    }

    #[test]
    fn test_unreasonable_local_uses_strict_comparison() {
        assert!(!is_unreasonable_local(CHUNK_WIDTH, 0, 0));
        assert!(is_unreasonable_local(CHUNK_WIDTH + 1, 0, 0));
        assert!(!is_unreasonable_local(0, 0, CHUNK_HEIGHT));
        assert!(is_unreasonable_local(0, 0, CHUNK_HEIGHT + 1));
    }
}
