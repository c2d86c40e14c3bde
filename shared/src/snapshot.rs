//! Per-frame agent state handed to the rendering layer.

use serde::{Deserialize, Serialize};

/// Which kind of agent a snapshot describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Player,
    Npc,
}

/// Resolved transform of one agent after a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: u64,
    pub name: String,
    pub kind: AgentKind,
    pub position: [f32; 3],
    /// Yaw in radians, 0 facing +Z
    pub rotation: f32,
    /// NPC name labels turn red while this is set
    pub is_stuck: bool,
    /// Current wander target, drawn as a debug marker
    pub target: Option<[f32; 3]>,
}
