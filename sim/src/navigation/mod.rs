//! Navigation and collision for the player and wandering NPCs.
//!
//! This module provides:
//! - Static axis-aligned obstacles and the collision query over them
//! - Movement resolution with footprint sampling and deflection
//! - Per-NPC wander behavior with stuck detection

pub mod movement;
pub mod obstacle;
pub mod wander;

pub use movement::{resolve, AgentBody, MoveKind, MoveOutcome};
pub use obstacle::{CollisionQuery, Obstacle, ObstacleRegistry};
pub use wander::{
    random_target, RetargetReason, WanderArea, WanderController, WanderSettings, WanderState,
    WanderStep,
};
