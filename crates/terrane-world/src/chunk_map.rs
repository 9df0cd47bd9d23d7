use std::collections::HashMap;

use glam::Vec3;
use terrane_core::direction::{Cardinal, ALL_CARDINALS};
use terrane_core::math::chunk_distance_sq;
use terrane_core::types::ChunkCoords;

use crate::chunk::Chunk;

/// Spatial container for all active chunks, keyed by chunk coordinate.
///
/// Neighbor links are kept symmetric: whenever both `c` and `c + dir` are
/// present, `c` links to `c + dir` in `dir` and the reverse link exists too.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoords, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chunk, wiring both sides of every lateral link to already-active
    /// neighbors. The new chunk and each linked neighbor are marked mesh-dirty,
    /// since their shared faces may have changed visibility.
    ///
    /// A chunk already present at the same coordinate is unlinked and returned.
    pub fn insert(&mut self, mut chunk: Chunk) -> Option<Chunk> {
        let coords = chunk.coords();
        let previous = self.remove(&coords);

        for dir in ALL_CARDINALS {
            let neighbor_coords = coords + dir.offset();
            if let Some(neighbor) = self.chunks.get_mut(&neighbor_coords) {
                neighbor.set_neighbor(dir.opposite(), Some(coords));
                neighbor.mark_mesh_dirty();
                chunk.set_neighbor(dir, Some(neighbor_coords));
            } else {
                chunk.set_neighbor(dir, None);
            }
        }
        chunk.mark_mesh_dirty();
        self.chunks.insert(coords, chunk);
        previous
    }

    /// Remove a chunk, clearing the back-links its neighbors hold and marking
    /// those neighbors mesh-dirty.
    pub fn remove(&mut self, coords: &ChunkCoords) -> Option<Chunk> {
        let mut chunk = self.chunks.remove(coords)?;
        for dir in ALL_CARDINALS {
            if let Some(neighbor_coords) = chunk.neighbor(dir) {
                if let Some(neighbor) = self.chunks.get_mut(&neighbor_coords) {
                    neighbor.set_neighbor(dir.opposite(), None);
                    neighbor.mark_mesh_dirty();
                }
            }
            chunk.set_neighbor(dir, None);
        }
        Some(chunk)
    }

    pub fn get(&self, coords: &ChunkCoords) -> Option<&Chunk> {
        self.chunks.get(coords)
    }

    pub fn get_mut(&mut self, coords: &ChunkCoords) -> Option<&mut Chunk> {
        self.chunks.get_mut(coords)
    }

    pub fn contains(&self, coords: &ChunkCoords) -> bool {
        self.chunks.contains_key(coords)
    }

    /// Get the 4 lateral neighbor coordinates of a chunk, in `ALL_CARDINALS` order.
    pub fn face_neighbors(coords: &ChunkCoords) -> [ChunkCoords; 4] {
        ALL_CARDINALS.map(|dir| *coords + dir.offset())
    }

    /// Mark a chunk and all of its linked neighbors mesh-dirty.
    pub fn mark_dirty_around(&mut self, coords: &ChunkCoords) {
        let Some(chunk) = self.chunks.get_mut(coords) else {
            return;
        };
        chunk.mark_mesh_dirty();
        let linked = chunk.neighbors();
        for neighbor_coords in linked.into_iter().flatten() {
            if let Some(neighbor) = self.chunks.get_mut(&neighbor_coords) {
                neighbor.mark_mesh_dirty();
            }
        }
    }

    /// The active chunk whose center is horizontally farthest from `position`.
    /// Ties resolve to the lexicographically greatest coordinate so the choice is
    /// stable across runs.
    pub fn farthest_from(&self, position: Vec3) -> Option<ChunkCoords> {
        self.chunks
            .keys()
            .map(|c| (*c, chunk_distance_sq(*c, position)))
            .max_by(|(ca, da), (cb, db)| {
                da.total_cmp(db)
                    .then(ca.x.cmp(&cb.x))
                    .then(ca.y.cmp(&cb.y))
            })
            .map(|(c, _)| c)
    }

    /// Whether every link points at a present chunk whose reverse link points back.
    pub fn links_are_symmetric(&self) -> bool {
        self.chunks.iter().all(|(coords, chunk)| {
            ALL_CARDINALS.iter().all(|&dir| {
                let expected = *coords + dir.offset();
                match chunk.neighbor(dir) {
                    Some(n) => {
                        n == expected
                            && self
                                .chunks
                                .get(&n)
                                .is_some_and(|other| other.neighbor(dir.opposite()) == Some(*coords))
                    }
                    None => !self.chunks.contains_key(&expected),
                }
            })
        })
    }

    /// Linked neighbor of `coords` in `dir`, if both are active.
    pub fn linked(&self, coords: &ChunkCoords, dir: Cardinal) -> Option<ChunkCoords> {
        self.chunks.get(coords).and_then(|c| c.neighbor(dir))
    }

    /// Iterator over all active chunks.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoords, &Chunk)> {
        self.chunks.iter()
    }

    /// Mutable iterator over all active chunks.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoords, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    /// Coordinates of all active chunks, sorted for deterministic iteration.
    pub fn coords(&self) -> Vec<ChunkCoords> {
        let mut coords: Vec<ChunkCoords> = self.chunks.keys().copied().collect();
        coords.sort_by_key(|c| (c.x, c.y));
        coords
    }

    /// Number of active chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
