use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Block, LightFlags};

/// Stable ids of the built-in block types. Saves store these bytes directly.
pub mod ids {
    pub const AIR: u8 = 0;
    pub const GRASS: u8 = 1;
    pub const DIRT: u8 = 2;
    pub const STONE: u8 = 3;
    pub const SAND: u8 = 4;
    pub const WATER: u8 = 5;
    pub const WOOD: u8 = 6;
    pub const LEAVES: u8 = 7;
    pub const GLOWSTONE: u8 = 8;
    pub const GLASS: u8 = 9;
}

/// Static definition of one block type, loadable from RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Stable type id. 0 = air.
    pub id: u8,
    /// Human-readable name for debug display.
    pub name: String,
    /// Blocks light and hides adjacent faces.
    pub opaque: bool,
    /// Collides with bodies.
    pub solid: bool,
    /// Light emitted by the block itself (0-15).
    #[serde(default)]
    pub emission: u8,
    /// RGB color (0.0-1.0 per channel) used for vertex colors.
    pub color: (f32, f32, f32),
    /// Tile index into the texture atlas.
    #[serde(default)]
    pub tile: u16,
}

impl BlockDef {
    /// Flag byte a block of this type starts with.
    pub fn default_flags(&self) -> LightFlags {
        LightFlags::new(self.opaque, self.solid, self.emission)
    }
}

/// Block definitions indexed by type id.
#[derive(Debug, Clone)]
pub struct BlockTable {
    by_id: Vec<Option<BlockDef>>,
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockTable {
    /// Build a table from a list of definitions, validating it.
    pub fn from_defs(defs: Vec<BlockDef>) -> Result<Self, ConfigError> {
        let mut by_id: Vec<Option<BlockDef>> = vec![None; 256];
        for def in defs {
            let slot = &mut by_id[def.id as usize];
            if slot.is_some() {
                return Err(ConfigError::DuplicateBlockId(def.id));
            }
            *slot = Some(def);
        }

        match &by_id[ids::AIR as usize] {
            Some(air) if !air.opaque && !air.solid && air.emission == 0 => {}
            _ => return Err(ConfigError::InvalidAir),
        }

        Ok(Self { by_id })
    }

    /// Parse a RON list of block definitions.
    pub fn from_ron(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let defs: Vec<BlockDef> = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_defs(defs)
    }

    /// The built-in block set.
    pub fn builtin() -> Self {
        let def = |id, name: &str, opaque, solid, emission, color, tile| BlockDef {
            id,
            name: name.to_string(),
            opaque,
            solid,
            emission,
            color,
            tile,
        };
        let defs = vec![
            def(ids::AIR, "Air", false, false, 0, (0.0, 0.0, 0.0), 0),
            def(ids::GRASS, "Grass", true, true, 0, (0.36, 0.62, 0.24), 1),
            def(ids::DIRT, "Dirt", true, true, 0, (0.47, 0.33, 0.21), 2),
            def(ids::STONE, "Stone", true, true, 0, (0.5, 0.5, 0.5), 3),
            def(ids::SAND, "Sand", true, true, 0, (0.86, 0.8, 0.55), 4),
            def(ids::WATER, "Water", false, false, 0, (0.2, 0.35, 0.8), 5),
            def(ids::WOOD, "Wood", true, true, 0, (0.4, 0.28, 0.15), 6),
            def(ids::LEAVES, "Leaves", false, true, 0, (0.2, 0.5, 0.15), 7),
            def(ids::GLOWSTONE, "Glowstone", true, true, 15, (1.0, 0.9, 0.5), 8),
            def(ids::GLASS, "Glass", false, true, 0, (0.85, 0.9, 0.95), 9),
        ];
        let mut by_id: Vec<Option<BlockDef>> = vec![None; 256];
        for d in defs {
            let id = d.id as usize;
            by_id[id] = Some(d);
        }
        Self { by_id }
    }

    /// Look up a definition by id.
    pub fn get(&self, id: u8) -> Option<&BlockDef> {
        self.by_id[id as usize].as_ref()
    }

    /// Default flag byte for a type. Unknown ids behave like air.
    pub fn default_flags(&self, id: u8) -> LightFlags {
        self.get(id)
            .map(BlockDef::default_flags)
            .unwrap_or_default()
    }

    /// A fresh block of the given type with its default flags.
    pub fn block(&self, id: u8) -> Block {
        Block::new(id, self.default_flags(id))
    }

    /// Light emitted by a type (0 for unknown ids).
    pub fn emission(&self, id: u8) -> u8 {
        self.get(id).map_or(0, |d| d.emission)
    }

    pub fn is_opaque(&self, id: u8) -> bool {
        self.get(id).is_some_and(|d| d.opaque)
    }

    pub fn is_solid(&self, id: u8) -> bool {
        self.get(id).is_some_and(|d| d.solid)
    }

    /// Number of defined types.
    pub fn len(&self) -> usize {
        self.by_id.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate defined types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockDef> {
        self.by_id.iter().flatten()
    }
}
