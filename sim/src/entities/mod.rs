//! Agents that move through the scene.

pub mod npc;
pub mod player;

pub use npc::Npc;
pub use player::{Player, PLAYER_ID};
