use glam::{IVec2, Vec3};
use terrane_core::constants::CHUNK_WIDTH;
use terrane_core::math::{chunk_distance_sq, position_to_chunk};
use terrane_core::types::ChunkCoords;

use crate::chunk_map::ChunkMap;
use crate::config::StreamingConfig;

/// What the streaming step wants done this tick. At most one chunk changes
/// state per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamAction {
    /// Save and drop this chunk.
    Evict(ChunkCoords),
    /// Load or generate this chunk.
    Activate(ChunkCoords),
    #[default]
    Idle,
}

/// Distance-based policy for activating and evicting chunks around an observer.
#[derive(Debug, Clone)]
pub struct StreamingPolicy {
    max_range: f32,
    hard_cap: usize,
    soft_target: usize,
}

impl StreamingPolicy {
    pub fn new(config: &StreamingConfig) -> Self {
        Self {
            max_range: config.max_range,
            hard_cap: config.hard_cap,
            soft_target: config.soft_target,
        }
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    pub fn hard_cap(&self) -> usize {
        self.hard_cap
    }

    pub fn soft_target(&self) -> usize {
        self.soft_target
    }

    /// Pick this tick's action.
    ///
    /// At or above the hard cap the farthest chunk is evicted. Otherwise the
    /// nearest missing chunk within range is activated; with nothing left to
    /// activate, chunks above the soft target are evicted farthest first.
    pub fn decide(&self, map: &ChunkMap, observer: Vec3) -> StreamAction {
        if map.len() >= self.hard_cap {
            return map
                .farthest_from(observer)
                .map_or(StreamAction::Idle, StreamAction::Evict);
        }
        if let Some(coords) = self.nearest_missing(map, observer) {
            return StreamAction::Activate(coords);
        }
        if map.len() > self.soft_target {
            if let Some(coords) = map.farthest_from(observer) {
                return StreamAction::Evict(coords);
            }
        }
        StreamAction::Idle
    }

    /// Closest inactive chunk whose center lies within `max_range`.
    /// Scan order breaks distance ties.
    fn nearest_missing(&self, map: &ChunkMap, observer: Vec3) -> Option<ChunkCoords> {
        let center = position_to_chunk(observer);
        let radius = (self.max_range / CHUNK_WIDTH as f32).ceil() as i32;
        let range_sq = self.max_range * self.max_range;

        let mut best: Option<(ChunkCoords, f32)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coords = center + IVec2::new(dx, dy);
                if map.contains(&coords) {
                    continue;
                }
                let dist = chunk_distance_sq(coords, observer);
                if dist > range_sq {
                    continue;
                }
                if best.map_or(true, |(_, d)| dist < d) {
                    best = Some((coords, dist));
                }
            }
        }
        best.map(|(coords, _)| coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use terrane_core::types::Block;

    fn policy(max_range: f32, hard_cap: usize, soft_target: usize) -> StreamingPolicy {
        StreamingPolicy::new(&StreamingConfig {
            max_range,
            hard_cap,
            soft_target,
        })
    }

    /// Apply decisions until the policy goes idle or `limit` ticks pass.
    fn settle(policy: &StreamingPolicy, map: &mut ChunkMap, observer: Vec3, limit: usize) -> usize {
        for tick in 0..limit {
            match policy.decide(map, observer) {
                StreamAction::Activate(c) => {
                    map.insert(Chunk::filled(c, Block::AIR));
                }
                StreamAction::Evict(c) => {
                    map.remove(&c);
                }
                StreamAction::Idle => return tick,
            }
            assert!(map.len() <= policy.hard_cap());
        }
        limit
    }

    #[test]
    fn test_nearest_chunk_first() {
        let p = policy(20.0, 64, 48);
        let map = ChunkMap::new();
        assert_eq!(
            p.decide(&map, Vec3::new(8.0, 8.0, 60.0)),
            StreamAction::Activate(IVec2::ZERO)
        );
    }

    #[test]
    fn test_loads_everything_in_range() {
        let p = policy(20.0, 64, 48);
        let mut map = ChunkMap::new();
        let observer = Vec3::new(8.0, 8.0, 60.0);
        settle(&p, &mut map, observer, 100);

        // Origin plus its four lateral neighbors have centers within 20 units.
        assert_eq!(map.len(), 5);
        for c in ChunkMap::face_neighbors(&IVec2::ZERO) {
            assert!(map.contains(&c));
        }
        assert!(!map.contains(&IVec2::new(1, 1)));
        assert!(map.links_are_symmetric());
    }

    #[test]
    fn test_hard_cap_forces_eviction() {
        let p = policy(200.0, 4, 2);
        let mut map = ChunkMap::new();
        for x in 0..4 {
            map.insert(Chunk::filled(IVec2::new(x, 0), Block::AIR));
        }
        assert_eq!(
            p.decide(&map, Vec3::new(8.0, 8.0, 0.0)),
            StreamAction::Evict(IVec2::new(3, 0))
        );
    }

    #[test]
    fn test_teleport_trims_to_soft_target() {
        let p = policy(20.0, 12, 5);
        let mut map = ChunkMap::new();
        settle(&p, &mut map, Vec3::new(8.0, 8.0, 60.0), 100);
        assert_eq!(map.len(), 5);

        let far = Vec3::new(10_008.0, 10_008.0, 60.0);
        let ticks = settle(&p, &mut map, far, 100);
        assert!(ticks < 100, "streaming should go idle");
        assert_eq!(map.len(), 5);
        // The chunks around the new position survive; the old ones were farthest.
        let far_chunk = position_to_chunk(far);
        assert!(map.contains(&far_chunk));
        assert!(!map.contains(&IVec2::ZERO));
    }

    #[test]
    fn test_idle_when_satisfied() {
        let p = policy(10.0, 8, 4);
        let mut map = ChunkMap::new();
        map.insert(Chunk::filled(IVec2::ZERO, Block::AIR));
        // Only the origin chunk's center (8, 8) is within 10 units of (8, 8).
        assert_eq!(p.decide(&map, Vec3::new(8.0, 8.0, 0.0)), StreamAction::Idle);
    }
}
