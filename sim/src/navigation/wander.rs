//! Random wander behavior for NPCs.
//!
//! Each NPC keeps a target inside its wander area and walks toward it through
//! the movement resolver. Reaching the target, getting pinned in place, or
//! being fully blocked all end the same way: a fresh random target.

use glam::Vec3;
use log::{debug, trace};
use rand::Rng;

use museum_shared::{NpcConfig, MAX_WANDER_EXTENT};

use super::movement::{self, AgentBody, MoveOutcome};
use super::obstacle::CollisionQuery;

/// Inward margin applied to explicit wander bounds so targets never sit flush
/// against the boundary
pub const WANDER_BOUNDS_PADDING: f32 = 0.5;

// ============================================================================
// Wander Area
// ============================================================================

/// Where an NPC may pick targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WanderArea {
    /// Explicit rectangle on the XZ plane
    Bounds {
        min_x: f32,
        min_z: f32,
        max_x: f32,
        max_z: f32,
    },
    /// Square of half-size `radius` centered on `center`
    Radius { center: Vec3, radius: f32 },
}

impl WanderArea {
    /// Sampling ranges `(x_min, x_max, z_min, z_max)`, padding applied.
    /// Bounds too small for the padding collapse to their midline. Coordinates
    /// are kept within `MAX_WANDER_EXTENT` so every range has a finite width.
    fn sample_ranges(&self) -> (f32, f32, f32, f32) {
        match *self {
            WanderArea::Bounds {
                min_x,
                min_z,
                max_x,
                max_z,
            } => {
                let (x_lo, x_hi) = padded(limit(min_x), limit(max_x), WANDER_BOUNDS_PADDING);
                let (z_lo, z_hi) = padded(limit(min_z), limit(max_z), WANDER_BOUNDS_PADDING);
                (x_lo, x_hi, z_lo, z_hi)
            }
            WanderArea::Radius { center, radius } => {
                let r = limit(radius).max(0.0);
                let (x, z) = (limit(center.x), limit(center.z));
                (x - r, x + r, z - r, z + r)
            }
        }
    }

    /// Whether a point lies in the (padded) sampling region
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let (x_lo, x_hi, z_lo, z_hi) = self.sample_ranges();
        x >= x_lo && x <= x_hi && z >= z_lo && z <= z_hi
    }
}

/// Clamp into `[-MAX_WANDER_EXTENT, MAX_WANDER_EXTENT]`; NaN becomes 0
fn limit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-MAX_WANDER_EXTENT, MAX_WANDER_EXTENT)
    }
}

fn padded(min: f32, max: f32, padding: f32) -> (f32, f32) {
    let (min, max) = (min.min(max), min.max(max));
    let (lo, hi) = (min + padding, max - padding);
    if lo > hi {
        let mid = (min + max) * 0.5;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

/// Pick a random point in `area` that is not blocked for an agent of `radius`
/// at height `y`.
///
/// Up to `attempts` samples are drawn (at least one). If all of them are
/// blocked the last sample is returned anyway, so this always yields a point.
pub fn random_target<R: Rng + ?Sized>(
    area: &WanderArea,
    y: f32,
    radius: f32,
    attempts: u32,
    collision: &dyn CollisionQuery,
    rng: &mut R,
) -> Vec3 {
    let (x_lo, x_hi, z_lo, z_hi) = area.sample_ranges();
    let attempts = attempts.max(1);

    let mut candidate = Vec3::new(x_lo, y, z_lo);
    for attempt in 1..=attempts {
        candidate = Vec3::new(rng.gen_range(x_lo..=x_hi), y, rng.gen_range(z_lo..=z_hi));
        if !collision.is_blocked(candidate.x, candidate.z, y, radius) {
            trace!(
                "[WANDER] Target ({:.2}, {:.2}) accepted after {} attempt(s)",
                candidate.x, candidate.z, attempt
            );
            return candidate;
        }
    }

    debug!(
        "[WANDER] All {} target samples blocked, accepting ({:.2}, {:.2})",
        attempts, candidate.x, candidate.z
    );
    candidate
}

// ============================================================================
// Controller
// ============================================================================

/// Tunables for one wandering agent
#[derive(Debug, Clone, PartialEq)]
pub struct WanderSettings {
    pub area: WanderArea,
    /// Units per second
    pub speed: f32,
    pub arrival_threshold: f32,
    /// Seconds without movement before the agent counts as stuck
    pub stuck_threshold: f32,
    pub movement_epsilon: f32,
    /// Target samples per retarget before falling back to the last one
    pub target_attempts: u32,
}

impl WanderSettings {
    pub fn from_config(config: &NpcConfig) -> Self {
        let area = match config.wander_bounds {
            Some([min_x, min_z, max_x, max_z]) => WanderArea::Bounds {
                min_x,
                min_z,
                max_x,
                max_z,
            },
            None => WanderArea::Radius {
                center: Vec3::from_array(config.start_position),
                radius: config.wander_radius,
            },
        };

        Self {
            area,
            speed: config.speed,
            arrival_threshold: config.arrival_threshold,
            stuck_threshold: config.stuck_threshold,
            movement_epsilon: config.movement_epsilon,
            target_attempts: config.target_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderState {
    Seeking,
    Stuck,
}

/// Why a new target was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetReason {
    /// No target yet
    Initial,
    Arrived,
    Stuck,
    /// Movement resolver could not find any free step
    Blocked,
}

/// What one wander tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WanderStep {
    /// Picked a new target and skipped movement this tick
    Retargeted(RetargetReason),
    /// Walked (or tried to) toward the current target
    Moved(MoveOutcome),
}

/// Per-NPC wander state machine
#[derive(Debug, Clone)]
pub struct WanderController {
    settings: WanderSettings,
    state: WanderState,
    target: Option<Vec3>,
    stuck_timer: f32,
    last_position: Vec3,
}

impl WanderController {
    pub fn new(settings: WanderSettings, start: Vec3) -> Self {
        Self {
            settings,
            state: WanderState::Seeking,
            target: None,
            stuck_timer: 0.0,
            last_position: start,
        }
    }

    pub fn settings(&self) -> &WanderSettings {
        &self.settings
    }

    pub fn state(&self) -> WanderState {
        self.state
    }

    pub fn is_stuck(&self) -> bool {
        self.state == WanderState::Stuck
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Override the current target (scripted moves, tests)
    pub fn set_target(&mut self, target: Option<Vec3>) {
        self.target = target;
    }

    pub fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    pub fn last_position(&self) -> Vec3 {
        self.last_position
    }

    /// Draw a new target for `body` from this controller's wander area
    pub fn random_target<R: Rng + ?Sized>(
        &self,
        body: &AgentBody,
        collision: &dyn CollisionQuery,
        rng: &mut R,
    ) -> Vec3 {
        random_target(
            &self.settings.area,
            body.position.y,
            body.radius,
            self.settings.target_attempts,
            collision,
            rng,
        )
    }

    fn retarget<R: Rng + ?Sized>(
        &mut self,
        body: &AgentBody,
        collision: &dyn CollisionQuery,
        rng: &mut R,
        reason: RetargetReason,
    ) -> WanderStep {
        let target = self.random_target(body, collision, rng);
        debug!(
            "[WANDER] {:?} at ({:.2}, {:.2}) -> new target ({:.2}, {:.2})",
            reason, body.position.x, body.position.z, target.x, target.z
        );
        self.target = Some(target);
        WanderStep::Retargeted(reason)
    }

    /// Advance the agent by one frame of `delta` seconds.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        body: &mut AgentBody,
        collision: &dyn CollisionQuery,
        rng: &mut R,
        delta: f32,
    ) -> WanderStep {
        let Some(target) = self.target else {
            self.state = WanderState::Seeking;
            return self.retarget(body, collision, rng, RetargetReason::Initial);
        };

        // Stuck is reported for the tick it was detected on; seeking the
        // replacement target starts now.
        if self.state == WanderState::Stuck {
            self.state = WanderState::Seeking;
        }

        let position = body.position;
        let to_target = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
        if to_target.length() < self.settings.arrival_threshold {
            return self.retarget(body, collision, rng, RetargetReason::Arrived);
        }

        if position.distance(self.last_position) < self.settings.movement_epsilon {
            self.stuck_timer += delta;
            if self.stuck_timer > self.settings.stuck_threshold {
                debug!(
                    "[WANDER] No progress for {:.2}s at ({:.2}, {:.2})",
                    self.stuck_timer, position.x, position.z
                );
                self.state = WanderState::Stuck;
                self.stuck_timer = 0.0;
                return self.retarget(body, collision, rng, RetargetReason::Stuck);
            }
        } else {
            self.stuck_timer = 0.0;
            self.last_position = position;
        }

        let outcome = movement::resolve(body, collision, to_target, self.settings.speed, delta);
        if outcome.is_fully_blocked() {
            return self.retarget(body, collision, rng, RetargetReason::Blocked);
        }

        WanderStep::Moved(outcome)
    }
}
