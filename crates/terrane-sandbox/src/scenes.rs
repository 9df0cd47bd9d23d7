use glam::Vec2;

/// A scripted walk for the sandbox body.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub name: &'static str,
    /// Horizontal spawn point.
    pub start: Vec2,
    /// Horizontal walking velocity, in world units per second.
    pub walk: Vec2,
    /// Tick at which the body jumps to a new horizontal position, if any.
    pub teleport: Option<(u32, Vec2)>,
    /// Dig the block under the body and put a glowstone in its place once the
    /// ground has loaded.
    pub edit: bool,
}

impl SceneConfig {
    /// Where the body should be at `tick` after a teleport, if one is due now.
    pub fn teleport_at(&self, tick: u32) -> Option<Vec2> {
        self.teleport
            .and_then(|(at, target)| (at == tick).then_some(target))
    }
}

/// The standard suite: standing still, a long walk east, and a far teleport.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "stationary",
            start: Vec2::new(8.0, 8.0),
            walk: Vec2::ZERO,
            teleport: None,
            edit: true,
        },
        SceneConfig {
            name: "walk",
            start: Vec2::new(8.0, 8.0),
            walk: Vec2::new(4.0, 1.0),
            teleport: None,
            edit: false,
        },
        SceneConfig {
            name: "teleport",
            start: Vec2::new(8.0, 8.0),
            walk: Vec2::ZERO,
            teleport: Some((60, Vec2::new(4_008.0, -2_008.0))),
            edit: false,
        },
    ]
}

/// Look up a standard scene by name.
pub fn find_scene(name: &str) -> Option<SceneConfig> {
    standard_scenes().into_iter().find(|s| s.name == name)
}
