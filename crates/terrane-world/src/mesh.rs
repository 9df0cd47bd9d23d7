use glam::Vec3;
use terrane_core::addressing::unpack;
use terrane_core::constants::{ATLAS_TILES_PER_ROW, MAX_LIGHT};
use terrane_core::direction::{Face, ALL_FACES};
use terrane_core::math::chunk_origin;
use terrane_core::types::ChunkCoords;
use terrane_core::BlockTable;

use crate::block_info::BlockInfo;
use crate::chunk_map::ChunkMap;

/// Mesh vertex (36 bytes), laid out for direct upload to a vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

/// Opaque id of a mesh owned by a `MeshSink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Receiver of chunk geometry. The world never draws; it only hands vertex
/// data to whatever implements this.
pub trait MeshSink {
    fn create(&mut self, vertices: &[Vertex]) -> MeshHandle;
    fn update(&mut self, handle: MeshHandle, vertices: &[Vertex]);
    fn destroy(&mut self, handle: MeshHandle);
}

/// Darkest shade a face can receive, so unlit caves stay faintly visible.
const MIN_SHADE: f32 = 0.2;

/// Corner offsets of each face in counter-clockwise order seen from outside.
fn face_corners(face: Face) -> [[f32; 3]; 4] {
    match face {
        Face::East => [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]],
        Face::West => [[0., 1., 0.], [0., 0., 0.], [0., 0., 1.], [0., 1., 1.]],
        Face::North => [[1., 1., 0.], [0., 1., 0.], [0., 1., 1.], [1., 1., 1.]],
        Face::South => [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
        Face::Top => [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
        Face::Bottom => [[0., 1., 0.], [1., 1., 0.], [1., 0., 0.], [0., 0., 0.]],
    }
}

fn face_brightness(face: Face) -> f32 {
    match face {
        Face::Top => 1.0,
        Face::Bottom => 0.55,
        Face::North | Face::South => 0.8,
        Face::East | Face::West => 0.7,
    }
}

/// Atlas UV rectangle (min, max) of a tile.
fn tile_uv(tile: u16) -> ([f32; 2], [f32; 2]) {
    let size = 1.0 / ATLAS_TILES_PER_ROW as f32;
    let col = (tile % ATLAS_TILES_PER_ROW) as f32;
    let row = (tile / ATLAS_TILES_PER_ROW) as f32;
    ([col * size, row * size], [(col + 1.0) * size, (row + 1.0) * size])
}

/// Build the vertex list of one chunk: a quad for every face of a non-air
/// block whose neighbor resolves to a non-opaque block. Faces against the
/// world's top or bottom, or against a chunk that is not active, are skipped.
pub fn build_chunk_mesh(map: &ChunkMap, table: &BlockTable, coords: ChunkCoords) -> Vec<Vertex> {
    let Some(chunk) = map.get(&coords) else {
        return Vec::new();
    };
    let origin = chunk_origin(coords);
    let mut vertices = Vec::new();

    for (index, block) in chunk.blocks().iter().enumerate() {
        if block.is_air() {
            continue;
        }
        let Some(def) = table.get(block.type_id) else {
            continue;
        };
        let info = BlockInfo::new(coords, index);
        let (x, y, z) = unpack(index);
        let base = origin + Vec3::new(x as f32, y as f32, z as f32);
        let alpha = if def.opaque { 1.0 } else { 0.75 };
        let (uv_min, uv_max) = tile_uv(def.tile);
        let uvs = [
            [uv_min[0], uv_max[1]],
            [uv_max[0], uv_max[1]],
            [uv_max[0], uv_min[1]],
            [uv_min[0], uv_min[1]],
        ];

        for face in ALL_FACES {
            let Some(neighbor) = info.neighbor(map, face).block(map) else {
                continue;
            };
            if neighbor.flags.is_opaque() {
                continue;
            }
            let light = neighbor.flags.light() as f32 / MAX_LIGHT as f32;
            let shade = (MIN_SHADE + (1.0 - MIN_SHADE) * light) * face_brightness(face);
            let color = [
                def.color.0 * shade,
                def.color.1 * shade,
                def.color.2 * shade,
                alpha,
            ];
            for (corner, uv) in face_corners(face).iter().zip(uvs) {
                vertices.push(Vertex {
                    position: (base + Vec3::from_array(*corner)).to_array(),
                    color,
                    uv,
                });
            }
        }
    }
    vertices
}

/// Rebuild every mesh-dirty chunk and hand the results to `sink`. Handles
/// retired by evictions are destroyed first. Returns the number of chunks rebuilt.
pub fn rebuild_dirty(
    map: &mut ChunkMap,
    table: &BlockTable,
    sink: &mut dyn MeshSink,
    retired: &mut Vec<MeshHandle>,
) -> usize {
    for handle in retired.drain(..) {
        sink.destroy(handle);
    }

    let dirty: Vec<ChunkCoords> = map
        .iter()
        .filter(|(_, chunk)| chunk.is_mesh_dirty())
        .map(|(coords, _)| *coords)
        .collect();

    for coords in &dirty {
        let vertices = build_chunk_mesh(map, table, *coords);
        let Some(chunk) = map.get_mut(coords) else {
            continue;
        };
        let handle = match (chunk.take_mesh(), vertices.is_empty()) {
            (Some(handle), true) => {
                sink.destroy(handle);
                None
            }
            (Some(handle), false) => {
                sink.update(handle, &vertices);
                Some(handle)
            }
            (None, true) => None,
            (None, false) => Some(sink.create(&vertices)),
        };
        chunk.set_mesh(handle, vertices.len());
        chunk.clear_mesh_dirty();
    }

    if !dirty.is_empty() {
        log::debug!("rebuilt {} chunk meshes", dirty.len());
    }
    dirty.len()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use glam::IVec2;
    use std::collections::HashMap;
    use terrane_core::addressing::pack;
    use terrane_core::block::ids;

    /// Sink that records live meshes and counts calls.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub next: u32,
        pub live: HashMap<MeshHandle, usize>,
        pub created: usize,
        pub updated: usize,
        pub destroyed: usize,
    }

    impl MeshSink for RecordingSink {
        fn create(&mut self, vertices: &[Vertex]) -> MeshHandle {
            let handle = MeshHandle(self.next);
            self.next += 1;
            self.live.insert(handle, vertices.len());
            self.created += 1;
            handle
        }

        fn update(&mut self, handle: MeshHandle, vertices: &[Vertex]) {
            self.live.insert(handle, vertices.len());
            self.updated += 1;
        }

        fn destroy(&mut self, handle: MeshHandle) {
            self.live.remove(&handle);
            self.destroyed += 1;
        }
    }

    fn air_chunk(table: &BlockTable, coords: ChunkCoords) -> Chunk {
        Chunk::filled(coords, table.block(ids::AIR))
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let v = Vertex {
            position: [1.0, 2.0, 3.0],
            color: [0.5; 4],
            uv: [0.0, 1.0],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 36);
    }

    #[test]
    fn test_lone_block_has_six_faces() {
        let table = BlockTable::builtin();
        let mut map = ChunkMap::new();
        let mut chunk = air_chunk(&table, IVec2::ZERO);
        *chunk.block_mut(pack(5, 5, 50)) = table.block(ids::STONE);
        map.insert(chunk);

        let vertices = build_chunk_mesh(&map, &table, IVec2::ZERO);
        assert_eq!(vertices.len(), 6 * 4);
        for v in &vertices {
            assert!((5.0..=6.0).contains(&v.position[0]));
            assert!((50.0..=51.0).contains(&v.position[2]));
        }
    }

    #[test]
    fn test_shared_faces_are_hidden() {
        let table = BlockTable::builtin();
        let mut map = ChunkMap::new();
        let mut chunk = air_chunk(&table, IVec2::ZERO);
        *chunk.block_mut(pack(5, 5, 50)) = table.block(ids::STONE);
        *chunk.block_mut(pack(6, 5, 50)) = table.block(ids::STONE);
        map.insert(chunk);
        assert_eq!(build_chunk_mesh(&map, &table, IVec2::ZERO).len(), 10 * 4);
    }

    #[test]
    fn test_non_opaque_neighbor_keeps_face() {
        let table = BlockTable::builtin();
        let mut map = ChunkMap::new();
        let mut chunk = air_chunk(&table, IVec2::ZERO);
        *chunk.block_mut(pack(5, 5, 50)) = table.block(ids::STONE);
        *chunk.block_mut(pack(6, 5, 50)) = table.block(ids::GLASS);
        map.insert(chunk);
        // Stone keeps all 6; glass hides its west face behind the stone.
        assert_eq!(build_chunk_mesh(&map, &table, IVec2::ZERO).len(), 11 * 4);
    }

    #[test]
    fn test_faces_against_missing_neighbor_are_suppressed() {
        let table = BlockTable::builtin();
        let mut map = ChunkMap::new();
        let mut chunk = air_chunk(&table, IVec2::ZERO);
        *chunk.block_mut(pack(15, 5, 50)) = table.block(ids::STONE);
        *chunk.block_mut(pack(4, 4, 0)) = table.block(ids::STONE);
        map.insert(chunk);

        // East face at the unlinked border and bottom face at z = 0 are skipped.
        assert_eq!(build_chunk_mesh(&map, &table, IVec2::ZERO).len(), (5 + 5) * 4);

        map.insert(air_chunk(&table, IVec2::new(1, 0)));
        assert_eq!(build_chunk_mesh(&map, &table, IVec2::ZERO).len(), (6 + 5) * 4);
    }

    #[test]
    fn test_face_color_follows_neighbor_light() {
        let table = BlockTable::builtin();
        let mut map = ChunkMap::new();
        let mut chunk = air_chunk(&table, IVec2::ZERO);
        *chunk.block_mut(pack(5, 5, 50)) = table.block(ids::STONE);
        chunk.block_mut(pack(5, 5, 51)).flags.set_light(MAX_LIGHT);
        map.insert(chunk);

        let vertices = build_chunk_mesh(&map, &table, IVec2::ZERO);
        let flat_at = |z: f32| {
            vertices
                .chunks(4)
                .find(|quad| quad.iter().all(|v| v.position[2] == z))
                .map(|quad| quad[0])
        };
        let top = flat_at(51.0).expect("top face present");
        let bottom = flat_at(50.0).expect("bottom face present");
        assert!((top.color[0] - 0.5).abs() < 1e-6);
        assert!(top.color[0] > bottom.color[0]);
    }

    #[test]
    fn test_rebuild_lifecycle() {
        let table = BlockTable::builtin();
        let mut map = ChunkMap::new();
        let mut sink = RecordingSink::default();
        let mut retired = Vec::new();

        let mut chunk = air_chunk(&table, IVec2::ZERO);
        *chunk.block_mut(pack(5, 5, 50)) = table.block(ids::STONE);
        map.insert(chunk);
        map.insert(air_chunk(&table, IVec2::new(1, 0)));

        assert_eq!(rebuild_dirty(&mut map, &table, &mut sink, &mut retired), 2);
        assert_eq!(sink.created, 1, "empty chunks get no mesh");
        assert_eq!(rebuild_dirty(&mut map, &table, &mut sink, &mut retired), 0);

        let handle = map
            .get(&IVec2::ZERO)
            .and_then(|c| c.mesh_handle())
            .expect("mesh uploaded");
        assert_eq!(sink.live.get(&handle), Some(&24));

        if let Some(chunk) = map.get_mut(&IVec2::ZERO) {
            *chunk.block_mut(pack(5, 5, 51)) = table.block(ids::STONE);
            chunk.mark_mesh_dirty();
        }
        rebuild_dirty(&mut map, &table, &mut sink, &mut retired);
        assert_eq!(sink.updated, 1);
        assert_eq!(sink.live.get(&handle), Some(&40));

        if let Some(mut removed) = map.remove(&IVec2::ZERO) {
            retired.extend(removed.take_mesh());
        }
        rebuild_dirty(&mut map, &table, &mut sink, &mut retired);
        assert!(sink.live.is_empty());
        assert_eq!(sink.destroyed, 1);
    }
}
