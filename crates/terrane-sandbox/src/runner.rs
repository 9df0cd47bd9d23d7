use std::collections::HashMap;
use std::time::Instant;

use glam::{Vec2, Vec3};
use terrane_core::block::ids;
use terrane_core::math::position_to_chunk;
use terrane_core::BlockTable;
use terrane_physics::body::PLAYER_HALF_EXTENTS;
use terrane_physics::Body;
use terrane_world::{MeshHandle, MeshSink, StreamAction, Vertex, World, WorldConfig, WorldError};

use crate::report::RunReport;
use crate::scenes::SceneConfig;

/// Fixed simulation step, in seconds.
pub const DT: f32 = 1.0 / 60.0;

/// How far down from just above the feet an edit may reach.
const EDIT_REACH: f32 = 4.0;

/// Mesh sink that keeps vertex counts instead of uploading anything.
#[derive(Debug, Default)]
pub struct CountingSink {
    next: u32,
    live: HashMap<MeshHandle, usize>,
    pub uploads: usize,
    pub destroyed: usize,
}

impl CountingSink {
    pub fn live_meshes(&self) -> usize {
        self.live.len()
    }

    pub fn live_vertices(&self) -> usize {
        self.live.values().sum()
    }
}

impl MeshSink for CountingSink {
    fn create(&mut self, vertices: &[Vertex]) -> MeshHandle {
        let handle = MeshHandle(self.next);
        self.next += 1;
        self.live.insert(handle, vertices.len());
        self.uploads += 1;
        handle
    }

    fn update(&mut self, handle: MeshHandle, vertices: &[Vertex]) {
        if self.live.insert(handle, vertices.len()).is_none() {
            log::warn!("update of unknown mesh {}", handle.0);
        }
        self.uploads += 1;
    }

    fn destroy(&mut self, handle: MeshHandle) {
        if self.live.remove(&handle).is_none() {
            log::warn!("destroy of unknown mesh {}", handle.0);
        }
        self.destroyed += 1;
    }
}

/// Runs scenes against fresh worlds built from one config.
pub struct SandboxRunner {
    config: WorldConfig,
    blocks: BlockTable,
    tick_count: u32,
}

impl SandboxRunner {
    pub fn new(config: WorldConfig, blocks: BlockTable, tick_count: u32) -> Self {
        Self {
            config,
            blocks,
            tick_count,
        }
    }

    /// Run one scene in its own save directory and report the outcome.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<RunReport, WorldError> {
        log::info!("Running scene '{}' for {} ticks...", scene.name, self.tick_count);

        let config = WorldConfig {
            save_dir: self.config.save_dir.join(scene.name),
            ..self.config.clone()
        };
        let mut world = World::new(&config, self.blocks.clone())?;
        let mut sink = CountingSink::default();
        let mut body = Body::player(spawn_position(&world, scene.start));

        let mut report = RunReport::new(scene.name, self.tick_count);
        let mut tick_times = Vec::with_capacity(self.tick_count as usize);
        let mut edited = false;
        let started = Instant::now();

        for tick in 0..self.tick_count {
            if let Some(target) = scene.teleport_at(tick) {
                log::info!("Teleporting to ({}, {})", target.x, target.y);
                body = Body::player(spawn_position(&world, target));
            }

            // The body waits in place until the ground under it is active.
            if world.chunk_map().contains(&position_to_chunk(body.position)) {
                body.velocity.x = scene.walk.x;
                body.velocity.y = scene.walk.y;
                terrane_physics::step(&mut body, &world, DT);
            }

            let tick_start = Instant::now();
            let result = world.tick(body.position, &mut sink);
            tick_times.push(tick_start.elapsed().as_secs_f64() * 1000.0);

            match result.action {
                StreamAction::Activate(_) => report.activations += 1,
                StreamAction::Evict(_) => report.evictions += 1,
                StreamAction::Idle => {}
            }
            report.light_updates += result.light_updates;
            report.meshes_rebuilt += result.meshes_rebuilt;

            if scene.edit && !edited && body.grounded {
                report.edits += dig_and_light(&mut world, &body)?;
                edited = report.edits > 0;
            }
        }

        report.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        report.set_tick_times(&tick_times);
        report.active_chunks = world.active_chunks();
        report.live_meshes = sink.live_meshes();
        report.vertices = world.vertex_count();
        report.final_position = body.position.to_array();
        report.grounded = body.grounded;

        let saved = world.save_all()?;
        log::info!("Scene '{}' done, saved {} chunks", scene.name, saved);
        Ok(report)
    }
}

/// Standing position just above the generated surface at a horizontal point.
pub fn spawn_position(world: &World, at: Vec2) -> Vec3 {
    let surface = world
        .terrain()
        .surface_height(at.x.floor() as i32, at.y.floor() as i32);
    Vec3::new(at.x, at.y, surface as f32 + 1.0 + PLAYER_HALF_EXTENTS.z + 0.01)
}

/// Swap the block under the body for a glowstone. Returns the number of edits made.
fn dig_and_light(world: &mut World, body: &Body) -> Result<usize, WorldError> {
    let origin = body.feet() + Vec3::Z * 0.5;
    let Some(hit) = world.raycast(origin, Vec3::NEG_Z, EDIT_REACH) else {
        return Ok(0);
    };
    let old = world.dig(hit.block)?;
    world.place(hit.block, ids::GLOWSTONE)?;
    log::debug!(
        "Replaced block type {} at {} with glowstone",
        old.type_id,
        hit.block
    );
    Ok(2)
}
