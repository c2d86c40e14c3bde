//! Per-agent configuration shared with the scene layer.
//!
//! Speeds are in world units per second, thresholds in world units or seconds.
//! Every optional field falls back to one of the documented constants below.

use serde::{Deserialize, Serialize};

// =============================================================================
// Defaults
// =============================================================================

/// Player walking speed in units per second.
pub const PLAYER_SPEED: f32 = 6.0;

/// Player camera start position (outside the back entry of the first room).
pub const PLAYER_START: [f32; 3] = [0.0, 2.0, -25.0];

/// Initial view direction of the player camera (looking into the rooms).
pub const PLAYER_VIEW_DIRECTION: [f32; 3] = [0.0, 0.0, 1.0];

/// NPC walking speed in units per second.
pub const DEFAULT_NPC_SPEED: f32 = 0.6;

/// Half-size of the square wander area around an NPC's start position.
pub const DEFAULT_WANDER_RADIUS: f32 = 9.0;

/// NPC footprint half-size used for collision queries.
pub const DEFAULT_COLLISION_RADIUS: f32 = 0.2;

/// Distance below which a wander target counts as reached.
pub const DEFAULT_ARRIVAL_THRESHOLD: f32 = 0.2;

/// Seconds without measurable movement before an NPC is considered stuck.
pub const DEFAULT_STUCK_THRESHOLD: f32 = 2.0;

/// Displacement below which an NPC counts as not having moved.
pub const DEFAULT_MOVEMENT_EPSILON: f32 = 0.001;

/// Random samples drawn per wander target before accepting a blocked one.
pub const DEFAULT_TARGET_ATTEMPTS: u32 = 10;

/// Longest frame, in seconds, the simulation advances in one update.
/// Longer frames (window drags, debugger pauses) are clamped to this.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Longest straight segment, in world units, checked against obstacles at once.
/// Must stay below the thinnest wall so a fast or long step cannot skip over it.
pub const MAX_STEP_LENGTH: f32 = 0.25;

/// Largest coordinate magnitude, and largest wander radius, accepted for
/// wander areas. Keeps random target ranges finite.
pub const MAX_WANDER_EXTENT: f32 = 1.0e6;

fn default_player_start() -> [f32; 3] {
    PLAYER_START
}

fn default_player_speed() -> f32 {
    PLAYER_SPEED
}

fn default_view_direction() -> [f32; 3] {
    PLAYER_VIEW_DIRECTION
}

fn default_npc_speed() -> f32 {
    DEFAULT_NPC_SPEED
}

fn default_wander_radius() -> f32 {
    DEFAULT_WANDER_RADIUS
}

fn default_collision_radius() -> f32 {
    DEFAULT_COLLISION_RADIUS
}

fn default_arrival_threshold() -> f32 {
    DEFAULT_ARRIVAL_THRESHOLD
}

fn default_stuck_threshold() -> f32 {
    DEFAULT_STUCK_THRESHOLD
}

fn default_movement_epsilon() -> f32 {
    DEFAULT_MOVEMENT_EPSILON
}

fn default_target_attempts() -> u32 {
    DEFAULT_TARGET_ATTEMPTS
}

// =============================================================================
// Config Types
// =============================================================================

/// First-person player setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    #[serde(default = "default_player_start")]
    pub start_position: [f32; 3],
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    /// Camera look direction at spawn
    #[serde(default = "default_view_direction")]
    pub view_direction: [f32; 3],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_position: PLAYER_START,
            speed: PLAYER_SPEED,
            view_direction: PLAYER_VIEW_DIRECTION,
        }
    }
}

/// Wandering NPC setup.
///
/// `wander_bounds` is `[min_x, min_z, max_x, max_z]`; when present it takes
/// precedence over `wander_radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NpcConfig {
    pub name: String,
    #[serde(default)]
    pub start_position: [f32; 3],
    #[serde(default = "default_npc_speed")]
    pub speed: f32,
    #[serde(default)]
    pub wander_bounds: Option<[f32; 4]>,
    #[serde(default = "default_wander_radius")]
    pub wander_radius: f32,
    #[serde(default = "default_collision_radius")]
    pub collision_radius: f32,
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f32,
    /// Seconds
    #[serde(default = "default_stuck_threshold")]
    pub stuck_threshold: f32,
    #[serde(default = "default_movement_epsilon")]
    pub movement_epsilon: f32,
    #[serde(default = "default_target_attempts")]
    pub target_attempts: u32,
}

impl NpcConfig {
    /// Config with every tunable at its default
    pub fn new(name: impl Into<String>, start_position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            start_position,
            speed: DEFAULT_NPC_SPEED,
            wander_bounds: None,
            wander_radius: DEFAULT_WANDER_RADIUS,
            collision_radius: DEFAULT_COLLISION_RADIUS,
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
            stuck_threshold: DEFAULT_STUCK_THRESHOLD,
            movement_epsilon: DEFAULT_MOVEMENT_EPSILON,
            target_attempts: DEFAULT_TARGET_ATTEMPTS,
        }
    }

    pub fn with_wander_bounds(mut self, bounds: [f32; 4]) -> Self {
        self.wander_bounds = Some(bounds);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}
