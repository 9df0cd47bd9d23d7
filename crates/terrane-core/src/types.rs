use glam::{IVec2, IVec3};

use crate::constants::MAX_LIGHT;

/// Chunk coordinate in the horizontal chunk grid (each unit = one chunk width).
/// `x` grows east, `y` grows north.
pub type ChunkCoords = IVec2;

/// World coordinate in block space. `z` is up.
pub type WorldCoord = IVec3;

/// Packed light and flag byte of a block.
///
/// Bit layout:
///   [7]   sky-exposed
///   [6]   dirty for lighting
///   [5]   opaque
///   [4]   solid
///   [0:3] light level (0-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct LightFlags(u8);

impl LightFlags {
    const SKY: u8 = 0b1000_0000;
    const DIRTY: u8 = 0b0100_0000;
    const OPAQUE: u8 = 0b0010_0000;
    const SOLID: u8 = 0b0001_0000;
    const LIGHT: u8 = 0b0000_1111;

    /// Wrap a raw byte.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Flags for a freshly created block of a given type.
    pub const fn new(opaque: bool, solid: bool, light: u8) -> Self {
        let mut bits = if light > MAX_LIGHT { MAX_LIGHT } else { light };
        if opaque {
            bits |= Self::OPAQUE;
        }
        if solid {
            bits |= Self::SOLID;
        }
        Self(bits)
    }

    /// Raw byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn light(self) -> u8 {
        self.0 & Self::LIGHT
    }

    /// Set the light level, clamping to [`MAX_LIGHT`].
    pub fn set_light(&mut self, level: u8) {
        self.0 = (self.0 & !Self::LIGHT) | level.min(MAX_LIGHT);
    }

    pub fn is_sky(self) -> bool {
        self.0 & Self::SKY != 0
    }

    pub fn set_sky(&mut self, value: bool) {
        self.set_bit(Self::SKY, value);
    }

    pub fn is_dirty(self) -> bool {
        self.0 & Self::DIRTY != 0
    }

    pub fn set_dirty(&mut self, value: bool) {
        self.set_bit(Self::DIRTY, value);
    }

    pub fn is_opaque(self) -> bool {
        self.0 & Self::OPAQUE != 0
    }

    pub fn set_opaque(&mut self, value: bool) {
        self.set_bit(Self::OPAQUE, value);
    }

    pub fn is_solid(self) -> bool {
        self.0 & Self::SOLID != 0
    }

    pub fn set_solid(&mut self, value: bool) {
        self.set_bit(Self::SOLID, value);
    }

    fn set_bit(&mut self, mask: u8, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

/// One block of the voxel grid: a type id plus its light/flag byte.
///
/// Two bytes, the atomic storage unit of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Block {
    pub type_id: u8,
    pub flags: LightFlags,
}

impl Block {
    pub const AIR: Block = Block {
        type_id: crate::constants::AIR_ID,
        flags: LightFlags::from_bits(0),
    };

    pub const fn new(type_id: u8, flags: LightFlags) -> Self {
        Self { type_id, flags }
    }

    pub fn is_air(&self) -> bool {
        self.type_id == crate::constants::AIR_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size() {
        assert_eq!(std::mem::size_of::<Block>(), 2);
    }

    #[test]
    fn test_light_clamps_to_nibble() {
        let mut flags = LightFlags::default();
        flags.set_light(200);
        assert_eq!(flags.light(), MAX_LIGHT);
        assert_eq!(LightFlags::new(false, false, 99).light(), MAX_LIGHT);
    }

    #[test]
    fn test_flags_independent_of_light() {
        let mut flags = LightFlags::new(true, true, 7);
        flags.set_sky(true);
        flags.set_dirty(true);
        assert_eq!(flags.light(), 7);

        flags.set_light(3);
        assert!(flags.is_sky());
        assert!(flags.is_dirty());
        assert!(flags.is_opaque());
        assert!(flags.is_solid());

        flags.set_opaque(false);
        flags.set_dirty(false);
        assert!(!flags.is_opaque());
        assert!(!flags.is_dirty());
        assert!(flags.is_solid());
        assert_eq!(flags.light(), 3);
    }

    #[test]
    fn test_bit_layout() {
        let mut flags = LightFlags::default();
        flags.set_sky(true);
        assert_eq!(flags.bits(), 0x80);
        flags.set_dirty(true);
        assert_eq!(flags.bits(), 0xC0);
        let flags = LightFlags::new(true, true, 15);
        assert_eq!(flags.bits(), 0x3F);
    }

    #[test]
    fn test_air_block() {
        assert!(Block::AIR.is_air());
        assert!(!Block::AIR.flags.is_solid());
        assert!(!Block::new(3, LightFlags::default()).is_air());
    }
}
