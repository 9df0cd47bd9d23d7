//! Streaming voxel world: active chunks around an observer, persisted on
//! eviction, lit by a breadth-first light queue and meshed lazily.

pub mod block_info;
pub mod chunk;
pub mod chunk_map;
pub mod config;
pub mod error;
pub mod lighting;
pub mod mesh;
pub mod query;
pub mod streaming;
pub mod terrain;

use glam::{IVec3, Vec3};
use terrane_core::block::ids;
use terrane_core::math::{world_to_chunk, world_to_local};
use terrane_core::types::{Block, ChunkCoords};
use terrane_core::BlockTable;
use terrane_persist::{ChunkStore, PersistError};

pub use block_info::BlockInfo;
pub use chunk::Chunk;
pub use chunk_map::ChunkMap;
pub use config::{StreamingConfig, WorldConfig};
pub use error::WorldError;
pub use lighting::LightEngine;
pub use mesh::{MeshHandle, MeshSink, Vertex};
pub use query::RayHit;
pub use streaming::{StreamAction, StreamingPolicy};
pub use terrain::{FbmNoise, NoiseParams, TerrainGenerator, TerrainNoise};

/// Where an activated chunk's blocks came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSource {
    Loaded,
    Generated,
}

/// Summary of one `World::tick`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub action: StreamAction,
    pub light_updates: usize,
    pub meshes_rebuilt: usize,
}

/// Primary public struct for the terrane-world crate.
/// Owns the active chunks and drives streaming, lighting and meshing.
pub struct World {
    chunk_map: ChunkMap,
    terrain: TerrainGenerator,
    streaming: StreamingPolicy,
    store: ChunkStore,
    blocks: BlockTable,
    lighting: LightEngine,
    /// Meshes of evicted chunks, destroyed on the next rebuild.
    retired_meshes: Vec<MeshHandle>,
}

impl World {
    /// Create an empty world with Perlin terrain seeded from the config.
    pub fn new(config: &WorldConfig, blocks: BlockTable) -> Result<Self, WorldError> {
        let terrain = TerrainGenerator::new(config.seed, config.sea_level);
        Self::with_terrain(config, blocks, terrain)
    }

    /// Create an empty world generating terrain from a custom noise source.
    pub fn with_noise(
        config: &WorldConfig,
        blocks: BlockTable,
        noise: Box<dyn TerrainNoise>,
    ) -> Result<Self, WorldError> {
        let terrain = TerrainGenerator::with_noise(noise, config.sea_level);
        Self::with_terrain(config, blocks, terrain)
    }

    fn with_terrain(
        config: &WorldConfig,
        blocks: BlockTable,
        terrain: TerrainGenerator,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        log::info!(
            "world: seed {}, {} block types, saves in {}",
            config.seed,
            blocks.len(),
            config.save_dir.display()
        );
        Ok(Self {
            chunk_map: ChunkMap::new(),
            terrain,
            streaming: StreamingPolicy::new(&config.streaming),
            store: ChunkStore::new(&config.save_dir),
            blocks,
            lighting: LightEngine::new(),
            retired_meshes: Vec::new(),
        })
    }

    /// Advance one tick: one streaming change, drain all pending light work,
    /// then rebuild every dirty mesh.
    pub fn tick(&mut self, observer: Vec3, sink: &mut dyn MeshSink) -> TickReport {
        let action = self.update_streaming(observer);
        let light_updates = self.drain_lighting();
        let meshes_rebuilt = self.rebuild_meshes(sink);
        TickReport {
            action,
            light_updates,
            meshes_rebuilt,
        }
    }

    /// Apply this tick's streaming decision.
    pub fn update_streaming(&mut self, observer: Vec3) -> StreamAction {
        let action = self.streaming.decide(&self.chunk_map, observer);
        match action {
            StreamAction::Activate(coords) => {
                self.activate_chunk(coords);
            }
            StreamAction::Evict(coords) => {
                if let Err(e) = self.evict_chunk(coords) {
                    log::error!("failed to save chunk ({}, {}): {e}", coords.x, coords.y);
                }
            }
            StreamAction::Idle => {}
        }
        action
    }

    /// Load a chunk from its save file, or generate it, then link and light it.
    /// Returns `None` if the chunk was already active.
    pub fn activate_chunk(&mut self, coords: ChunkCoords) -> Option<ChunkSource> {
        if self.chunk_map.contains(&coords) {
            return None;
        }

        let (blocks, source) = match self.store.load(coords, &self.blocks) {
            Ok(Some(blocks)) => (blocks, ChunkSource::Loaded),
            Ok(None) => (self.terrain.generate(coords, &self.blocks), ChunkSource::Generated),
            Err(e) => {
                log::warn!(
                    "unreadable save for chunk ({}, {}), regenerating: {e}",
                    coords.x,
                    coords.y
                );
                (self.terrain.generate(coords, &self.blocks), ChunkSource::Generated)
            }
        };

        self.chunk_map.insert(Chunk::from_blocks(coords, blocks));
        self.lighting
            .seed_chunk(&mut self.chunk_map, &self.blocks, coords);
        log::debug!(
            "activated chunk ({}, {}) [{source:?}], {} active",
            coords.x,
            coords.y,
            self.chunk_map.len()
        );
        Some(source)
    }

    /// Persist, unlink and drop a chunk. A failed write keeps the chunk active
    /// so its edits survive. Returns `Ok(false)` if it was not active.
    pub fn evict_chunk(&mut self, coords: ChunkCoords) -> Result<bool, PersistError> {
        let Some(chunk) = self.chunk_map.get(&coords) else {
            return Ok(false);
        };
        self.store.save(coords, chunk.blocks())?;
        if let Some(mut chunk) = self.chunk_map.remove(&coords) {
            self.retired_meshes.extend(chunk.take_mesh());
        }
        log::debug!(
            "evicted chunk ({}, {}), {} active",
            coords.x,
            coords.y,
            self.chunk_map.len()
        );
        Ok(true)
    }

    /// Evict and persist every active chunk. Every chunk is attempted; chunks
    /// that fail to write stay active and the first failure is returned.
    pub fn save_all(&mut self) -> Result<usize, PersistError> {
        let mut saved = 0;
        let mut first_error = None;
        for coords in self.chunk_map.coords() {
            match self.evict_chunk(coords) {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(e) => {
                    log::error!("failed to save chunk ({}, {}): {e}", coords.x, coords.y);
                    first_error.get_or_insert(e);
                }
            }
        }
        log::info!("saved {saved} chunks to {}", self.store.dir().display());
        match first_error {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }

    /// Run queued light work to completion. Returns the number of blocks recomputed.
    pub fn drain_lighting(&mut self) -> usize {
        self.lighting.drain(&mut self.chunk_map, &self.blocks)
    }

    /// Rebuild all mesh-dirty chunks into `sink`.
    pub fn rebuild_meshes(&mut self, sink: &mut dyn MeshSink) -> usize {
        mesh::rebuild_dirty(
            &mut self.chunk_map,
            &self.blocks,
            sink,
            &mut self.retired_meshes,
        )
    }

    /// Replace the block at `pos` with a fresh block of `type_id`, returning the
    /// previous block. Marks the owning chunk and its neighbors mesh-dirty and
    /// queues the light work; lighting settles on the next drain.
    pub fn set_block(&mut self, pos: IVec3, type_id: u8) -> Result<Block, WorldError> {
        if world_to_local(pos).is_none() {
            return Err(WorldError::OutOfBounds(pos));
        }
        let coords = world_to_chunk(pos);
        let info = BlockInfo::at(&self.chunk_map, pos);
        let replacement = self.blocks.block(type_id);
        let slot = info
            .block_mut(&mut self.chunk_map)
            .ok_or(WorldError::ChunkNotLoaded(coords))?;
        let previous = *slot;
        *slot = replacement;

        self.chunk_map.mark_dirty_around(&coords);
        self.lighting.mark_edit(&mut self.chunk_map, info);
        Ok(previous)
    }

    /// Remove the block at `pos`, leaving air.
    pub fn dig(&mut self, pos: IVec3) -> Result<Block, WorldError> {
        self.set_block(pos, ids::AIR)
    }

    /// Put a block at `pos`. Fails if a solid block is already there.
    pub fn place(&mut self, pos: IVec3, type_id: u8) -> Result<Block, WorldError> {
        if self.is_solid_at(pos) {
            return Err(WorldError::Occupied(pos));
        }
        self.set_block(pos, type_id)
    }

    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    pub fn block_table(&self) -> &BlockTable {
        &self.blocks
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn streaming(&self) -> &StreamingPolicy {
        &self.streaming
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Blocks waiting in the light queue.
    pub fn pending_light(&self) -> usize {
        self.lighting.pending()
    }

    /// Number of active chunks.
    pub fn active_chunks(&self) -> usize {
        self.chunk_map.len()
    }

    /// Total vertices across all uploaded chunk meshes.
    pub fn vertex_count(&self) -> usize {
        self.chunk_map.iter().map(|(_, c)| c.vertex_count()).sum()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        if self.chunk_map.is_empty() {
            return;
        }
        if let Err(e) = self.save_all() {
            log::error!("world teardown left unsaved chunks: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mesh::tests::RecordingSink;
    use glam::IVec2;
    use std::path::PathBuf;
    use terrane_core::constants::*;
    use terrane_core::direction::ALL_FACES;

    struct FlatNoise;

    impl TerrainNoise for FlatNoise {
        fn sample(&self, _x: f32, _y: f32, _params: &NoiseParams) -> f32 {
            0.0
        }
    }

    /// Top solid layer of worlds built with `FlatNoise`.
    pub(crate) const FLAT_SURFACE: u32 = DEFAULT_SEA_LEVEL + 4;

    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "terrane_world_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn flat_config(name: &str) -> WorldConfig {
        WorldConfig {
            save_dir: scratch_dir(name),
            streaming: StreamingConfig {
                max_range: 20.0,
                hard_cap: 12,
                soft_target: 8,
            },
            ..WorldConfig::default()
        }
    }

    /// A flat world with the 3x3 chunks around the origin active and lit.
    pub(crate) fn flat_world(name: &str) -> (World, PathBuf) {
        let config = flat_config(name);
        let mut world = World::with_noise(&config, BlockTable::builtin(), Box::new(FlatNoise))
            .expect("valid config");
        for y in -1..=1 {
            for x in -1..=1 {
                world.activate_chunk(IVec2::new(x, y));
            }
        }
        world.drain_lighting();
        (world, config.save_dir)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = flat_config("invalid_config");
        config.streaming.soft_target = config.streaming.hard_cap;
        let result = World::new(&config, BlockTable::builtin());
        assert!(matches!(result, Err(WorldError::Config(_))));
    }

    #[test]
    fn test_activation_links_and_lights() {
        let (world, _dir) = flat_world("activation");
        assert_eq!(world.active_chunks(), 9);
        assert!(world.chunk_map().links_are_symmetric());
        assert_eq!(world.pending_light(), 0);

        let above = IVec3::new(-5, 7, FLAT_SURFACE as i32 + 1);
        assert_eq!(world.light_at(above), SKY_LIGHT);
        assert!(world.block_at(above).is_sky(world.chunk_map()));
        assert_eq!(world.light_at(above - IVec3::Z), 0);
    }

    #[test]
    fn test_dig_scenario() {
        let (mut world, _dir) = flat_world("dig_scenario");
        // Clear a column so (5, 5, 50) has open sky straight above it.
        for z in (51..=FLAT_SURFACE as i32).rev() {
            world.dig(IVec3::new(5, 5, z)).expect("dig shaft");
        }
        world.drain_lighting();
        assert_eq!(world.light_at(IVec3::new(5, 5, 51)), SKY_LIGHT);

        let target = IVec3::new(5, 5, 50);
        let previous = world.dig(target).expect("dig target");
        assert_eq!(previous.type_id, ids::DIRT);

        let map = world.chunk_map();
        let info = world.block_at(target);
        assert!(info.is_dirty(map));
        for neighbor in info.neighbors(map) {
            assert!(neighbor.is_dirty(map));
        }

        world.drain_lighting();
        assert_eq!(world.light_at(target), SKY_LIGHT);
        // The shaft walls stay dark.
        assert_eq!(world.light_at(IVec3::new(6, 5, 50)), 0);
    }

    #[test]
    fn test_edit_marks_neighbor_chunks_dirty() {
        let (mut world, _dir) = flat_world("edit_dirty");
        let mut sink = RecordingSink::default();
        world.rebuild_meshes(&mut sink);
        assert!(world.chunk_map().iter().all(|(_, c)| !c.is_mesh_dirty()));

        world.dig(IVec3::new(3, 3, FLAT_SURFACE as i32)).expect("dig");
        let map = world.chunk_map();
        assert!(map.get(&IVec2::ZERO).is_some_and(Chunk::is_mesh_dirty));
        for n in ChunkMap::face_neighbors(&IVec2::ZERO) {
            assert!(map.get(&n).is_some_and(Chunk::is_mesh_dirty));
        }
        assert!(!map.get(&IVec2::new(1, 1)).is_some_and(Chunk::is_mesh_dirty));
    }

    #[test]
    fn test_edit_errors() {
        let (mut world, _dir) = flat_world("edit_errors");
        assert!(matches!(
            world.dig(IVec3::new(0, 0, 128)),
            Err(WorldError::OutOfBounds(_))
        ));
        assert!(matches!(
            world.dig(IVec3::new(0, 0, -1)),
            Err(WorldError::OutOfBounds(_))
        ));
        assert!(matches!(
            world.dig(IVec3::new(1000, 0, 10)),
            Err(WorldError::ChunkNotLoaded(c)) if c == IVec2::new(62, 0)
        ));
        assert!(matches!(
            world.place(IVec3::new(0, 0, 10), ids::STONE),
            Err(WorldError::Occupied(_))
        ));
    }

    #[test]
    fn test_placed_glowstone_lights_cave() {
        let (mut world, _dir) = flat_world("glowstone");
        // Hollow a sealed pocket underground and put a lamp at one end.
        for x in 0..6 {
            world.dig(IVec3::new(x, 0, 20)).expect("dig pocket");
        }
        world.place(IVec3::new(0, 0, 20), ids::GLOWSTONE).expect("place lamp");
        world.drain_lighting();
        for x in 1..6 {
            assert_eq!(world.light_at(IVec3::new(x, 0, 20)), 15 - x as u8);
        }
        // Stone around the lamp stays dark, including across the chunk border.
        assert_eq!(world.light_at(IVec3::new(-1, 0, 20)), 0);
    }

    #[test]
    fn test_evict_and_reactivate_keeps_edits() {
        let (mut world, dir) = flat_world("persist_edits");
        let pos = IVec3::new(2, 2, FLAT_SURFACE as i32 + 1);
        world.place(pos, ids::WOOD).expect("place");
        world.drain_lighting();

        assert!(world.evict_chunk(IVec2::ZERO).expect("save"));
        assert!(world.store().exists(IVec2::ZERO));
        assert!(world.block(pos).is_none());
        assert!(world.chunk_map().links_are_symmetric());
        assert!(!world.evict_chunk(IVec2::ZERO).expect("no-op"));

        assert_eq!(world.activate_chunk(IVec2::ZERO), Some(ChunkSource::Loaded));
        assert_eq!(world.activate_chunk(IVec2::ZERO), None);
        world.drain_lighting();
        let block = world.block(pos).expect("loaded again");
        assert_eq!(block.type_id, ids::WOOD);
        assert!(block.flags.is_solid());
        assert!(dir.join("Chunk_at_(0,0).chunk").exists());
    }

    #[test]
    fn test_corrupt_save_falls_back_to_generation() {
        let (mut world, dir) = flat_world("corrupt_save");
        world.evict_chunk(IVec2::new(1, 1)).expect("save");
        std::fs::write(dir.join("Chunk_at_(1,1).chunk"), [16u8, 16, 64, 3, 7])
            .expect("clobber save");
        assert_eq!(
            world.activate_chunk(IVec2::new(1, 1)),
            Some(ChunkSource::Generated)
        );
        assert_eq!(
            world.block(IVec3::new(20, 20, FLAT_SURFACE as i32)).map(|b| b.type_id),
            Some(ids::GRASS)
        );
    }

    #[test]
    fn test_tick_streams_and_meshes() {
        let config = flat_config("tick");
        let mut world = World::with_noise(&config, BlockTable::builtin(), Box::new(FlatNoise))
            .expect("valid config");
        let mut sink = RecordingSink::default();
        let observer = Vec3::new(8.0, 8.0, 60.0);

        let first = world.tick(observer, &mut sink);
        assert_eq!(first.action, StreamAction::Activate(IVec2::ZERO));
        assert!(first.light_updates > 0);
        assert_eq!(first.meshes_rebuilt, 1);

        for _ in 0..10 {
            world.tick(observer, &mut sink);
        }
        assert_eq!(world.active_chunks(), 5);
        assert_eq!(world.pending_light(), 0);
        assert_eq!(sink.live.len(), 5);
        assert!(world.vertex_count() > 0);
        let idle = world.tick(observer, &mut sink);
        assert_eq!(idle, TickReport::default());
    }

    #[test]
    fn test_streaming_eviction_retires_meshes() {
        let config = flat_config("retire");
        let mut world = World::with_noise(&config, BlockTable::builtin(), Box::new(FlatNoise))
            .expect("valid config");
        let mut sink = RecordingSink::default();
        for _ in 0..10 {
            world.tick(Vec3::new(8.0, 8.0, 60.0), &mut sink);
        }
        let far = Vec3::new(1_608.0, 8.0, 60.0);
        for _ in 0..30 {
            world.tick(far, &mut sink);
        }
        assert!(world.active_chunks() <= 8);
        assert!(world.chunk_map().get(&IVec2::new(100, 0)).is_some());
        assert_eq!(sink.live.len(), world.active_chunks());
        assert!(sink.destroyed > 0);
        assert!(world.store().exists(IVec2::new(-1, 0)));
    }

    #[test]
    fn test_save_all_persists_everything() {
        let (mut world, dir) = flat_world("save_all");
        assert_eq!(world.save_all().expect("saved"), 9);
        assert_eq!(world.active_chunks(), 0);
        let files = std::fs::read_dir(&dir).expect("dir exists").count();
        assert_eq!(files, 9);
    }

    #[test]
    fn test_drop_saves_active_chunks() {
        let dir;
        {
            let (world, d) = flat_world("drop_saves");
            dir = d;
            assert_eq!(world.active_chunks(), 9);
        }
        assert!(dir.join("Chunk_at_(-1,-1).chunk").exists());
        assert!(dir.join("Chunk_at_(1,1).chunk").exists());
    }

    #[test]
    fn test_light_monotonic_from_open_pit() {
        let (mut world, _dir) = flat_world("monotonic");
        // A pit open to the sky with a horizontal tunnel leading east across
        // the chunk border.
        let tunnel_z = 40;
        for z in tunnel_z..=FLAT_SURFACE as i32 {
            world.dig(IVec3::new(10, 4, z)).expect("dig pit");
        }
        for x in 11..30 {
            world.dig(IVec3::new(x, 4, tunnel_z)).expect("dig tunnel");
        }
        world.drain_lighting();

        let mut last = world.light_at(IVec3::new(10, 4, tunnel_z));
        assert_eq!(last, SKY_LIGHT);
        for x in 11..30 {
            let light = world.light_at(IVec3::new(x, 4, tunnel_z));
            assert!(light <= last, "x = {x}");
            assert_eq!(light, SKY_LIGHT.saturating_sub((x - 10) as u8));
            last = light;
        }
        // Every block's neighbors differ by at most one level along the tunnel.
        let info = world.block_at(IVec3::new(16, 4, tunnel_z));
        for face in ALL_FACES {
            let n = info.neighbor(world.chunk_map(), face);
            if !n.is_opaque(world.chunk_map()) {
                let diff = n.light(world.chunk_map()).abs_diff(info.light(world.chunk_map()));
                assert!(diff <= 1);
            }
        }
    }

    #[test]
    fn test_failed_save_keeps_chunk_active() {
        let (mut world, dir) = flat_world("failed_save");
        let pos = IVec3::new(2, 2, FLAT_SURFACE as i32 + 1);
        world.place(pos, ids::WOOD).expect("place");
        // A plain file where the save directory should be makes every write fail.
        std::fs::write(&dir, b"not a directory").expect("block save dir");

        assert!(world.evict_chunk(IVec2::ZERO).is_err());
        assert!(world.chunk_map().contains(&IVec2::ZERO));
        assert_eq!(world.block(pos).map(|b| b.type_id), Some(ids::WOOD));
        assert!(world.save_all().is_err());
        assert_eq!(world.active_chunks(), 9);

        std::fs::remove_file(&dir).expect("unblock save dir");
        assert!(world.evict_chunk(IVec2::ZERO).expect("save"));
        assert_eq!(world.activate_chunk(IVec2::ZERO), Some(ChunkSource::Loaded));
        assert_eq!(world.block(pos).map(|b| b.type_id), Some(ids::WOOD));
    }

    #[test]
    fn test_stationary_observer_settles_idle() {
        let config = flat_config("settle");
        assert!(config.validate().is_ok());
        let mut world = World::with_noise(&config, BlockTable::builtin(), Box::new(FlatNoise))
            .expect("valid config");
        let mut sink = RecordingSink::default();
        let observer = Vec3::new(3.0, 13.5, 60.0);
        for _ in 0..40 {
            world.tick(observer, &mut sink);
        }
        assert!(world.active_chunks() <= config.streaming.soft_target);
        for _ in 0..20 {
            assert_eq!(world.tick(observer, &mut sink).action, StreamAction::Idle);
        }
    }
}
