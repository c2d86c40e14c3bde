//! Per-frame movement resolution shared by the player and NPCs.
//!
//! A desired direction becomes a displacement in three stages, repeated for
//! each sub-step of at most `MAX_STEP_LENGTH`:
//! 1. Try the straight step and test its footprint
//! 2. If blocked, try a fixed list of deflection directions at reduced length
//! 3. If every alternative is blocked, stop there and report it

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use log::{debug, trace};

use museum_shared::MAX_STEP_LENGTH;

use super::obstacle::CollisionQuery;

/// Fraction of the yaw gap closed per tick.
/// Applied per tick rather than per second, so turning is faster at higher frame rates.
pub const ROTATION_SMOOTHING: f32 = 0.05;

/// Deflection steps are this fraction of a normal step
pub const DEFLECTION_SCALE: f32 = 0.5;

/// Upper bound on sub-steps per resolve call
const MAX_SUB_STEPS: u32 = 1024;

/// Squared length below which a direction counts as zero
const DIRECTION_EPSILON_SQ: f32 = 1e-12;

/// Mutable transform of an agent, owned by whoever ticks it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentBody {
    pub position: Vec3,
    /// Yaw in radians, 0 facing +Z
    pub yaw: f32,
    /// Footprint half-size (0 treats the agent as a point)
    pub radius: f32,
}

impl AgentBody {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            radius,
        }
    }
}

/// How a resolve call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Zero desired direction, nothing attempted
    Idle,
    /// Straight step committed
    Direct,
    /// Straight step blocked, an alternative was committed
    Deflected,
    /// Straight step and every alternative blocked
    Blocked,
}

/// Result of a resolve call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Displacement actually applied to the body
    pub displacement: Vec3,
    pub kind: MoveKind,
}

impl MoveOutcome {
    fn stationary(kind: MoveKind) -> Self {
        Self {
            displacement: Vec3::ZERO,
            kind,
        }
    }

    pub fn is_fully_blocked(&self) -> bool {
        self.kind == MoveKind::Blocked
    }
}

// ============================================================================
// Footprint Sampling
// ============================================================================

/// Footprint test for an agent of half-size `radius` centered at `center`.
///
/// One padded-square query covers the whole footprint, including the center
/// and the eight cardinal and diagonal points at `radius`.
pub fn footprint_blocked(collision: &dyn CollisionQuery, center: Vec3, radius: f32) -> bool {
    collision.is_blocked(center.x, center.z, center.y, radius.max(0.0))
}

/// Ordered fallback directions for a blocked unit direction `dir`.
///
/// First the desired direction bent toward +X, -X, +Z and -Z, then the four
/// cardinals with the ones most perpendicular to `dir` first. Near-zero
/// candidates are dropped.
pub fn deflection_candidates(dir: Vec3) -> Vec<Vec3> {
    let mut cardinals = [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z];
    cardinals.sort_by(|a, b| {
        let (da, db) = (a.dot(dir), b.dot(dir));
        da.abs()
            .total_cmp(&db.abs())
            .then_with(|| db.total_cmp(&da))
    });

    let bent = [
        Vec3::new(dir.x * 0.5 + 0.5, 0.0, dir.z),
        Vec3::new(dir.x * 0.5 - 0.5, 0.0, dir.z),
        Vec3::new(dir.x, 0.0, dir.z * 0.5 + 0.5),
        Vec3::new(dir.x, 0.0, dir.z * 0.5 - 0.5),
    ];

    bent.into_iter()
        .chain(cardinals)
        .filter(|candidate| candidate.length_squared() > DIRECTION_EPSILON_SQ)
        .collect()
}

// ============================================================================
// Resolution
// ============================================================================

/// Move `body` along `desired` (only its XZ part is used) at `speed` units per
/// second for `delta` seconds, refusing or deflecting blocked steps.
///
/// Steps longer than `MAX_STEP_LENGTH` are split into equal sub-steps, each
/// checked on its own, so a long frame cannot carry the agent through a wall.
/// Resolution stops at the first sub-step with no free move.
pub fn resolve(
    body: &mut AgentBody,
    collision: &dyn CollisionQuery,
    desired: Vec3,
    speed: f32,
    delta: f32,
) -> MoveOutcome {
    let flat = Vec3::new(desired.x, 0.0, desired.z);
    if flat.length_squared() <= DIRECTION_EPSILON_SQ {
        return MoveOutcome::stationary(MoveKind::Idle);
    }
    let dir = flat.normalize();
    let step = speed * delta;

    let sub_steps = sub_step_count(step);
    let sub_step = step / sub_steps as f32;
    let start = body.position;
    let mut kind = MoveKind::Direct;
    let mut moved_straight = false;

    for i in 0..sub_steps {
        match step_once(body, collision, dir, sub_step) {
            MoveKind::Direct => moved_straight = true,
            MoveKind::Deflected => kind = MoveKind::Deflected,
            _ if i == 0 => {
                debug!(
                    "[NAV] Fully blocked at ({:.2}, {:.2}) heading ({:.2}, {:.2})",
                    body.position.x, body.position.z, dir.x, dir.z
                );
                return MoveOutcome::stationary(MoveKind::Blocked);
            }
            _ => {
                trace!("[NAV] Stopped after {} of {} sub-steps", i, sub_steps);
                break;
            }
        }
    }

    if moved_straight {
        body.yaw = lerp_angle(body.yaw, dir.x.atan2(dir.z), ROTATION_SMOOTHING);
    }
    MoveOutcome {
        displacement: body.position - start,
        kind,
    }
}

fn sub_step_count(step: f32) -> u32 {
    let count = (step.abs() / MAX_STEP_LENGTH).ceil();
    if count.is_finite() {
        (count as u32).clamp(1, MAX_SUB_STEPS)
    } else {
        MAX_SUB_STEPS
    }
}

/// One straight-or-deflected step of length `step`; returns what happened
fn step_once(body: &mut AgentBody, collision: &dyn CollisionQuery, dir: Vec3, step: f32) -> MoveKind {
    let next = body.position + dir * step;
    if !footprint_blocked(collision, next, body.radius) {
        body.position = next;
        return MoveKind::Direct;
    }

    trace!(
        "[NAV] Step to ({:.2}, {:.2}) blocked, trying deflections",
        next.x, next.z
    );

    for alternative in deflection_candidates(dir) {
        let candidate = body.position + alternative * step * DEFLECTION_SCALE;
        if !footprint_blocked(collision, candidate, body.radius) {
            debug!(
                "[NAV] Deflected ({:.2}, {:.2}) -> ({:.2}, {:.2}) via ({:.2}, {:.2})",
                body.position.x, body.position.z, candidate.x, candidate.z, alternative.x, alternative.z
            );
            body.position = candidate;
            return MoveKind::Deflected;
        }
    }

    MoveKind::Blocked
}

/// Interpolate between two angles along the shorter arc
pub fn lerp_angle(from: f32, to: f32, weight: f32) -> f32 {
    let mut diff = (to - from) % TAU;
    if diff > PI {
        diff -= TAU;
    } else if diff < -PI {
        diff += TAU;
    }
    from + diff * weight
}
