//! The simulated world and its per-frame driver.

mod scene;

pub use scene::Scene;

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec3;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use museum_shared::{AgentSnapshot, NpcConfig, PlayerConfig, MAX_FRAME_DELTA};

use crate::entities::{Npc, Player, PLAYER_ID};
use crate::navigation::{movement, CollisionQuery, RetargetReason, WanderStep};

/// Something worth reporting that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// An NPC picked a new wander target
    Retargeted { id: u64, reason: RetargetReason },
    /// The player pushed into a spot with no free step at all
    PlayerBlocked,
}

/// All agents of one scene plus the shared collision query.
///
/// `update` is the frame driver: call it once per rendered frame with the
/// elapsed time and read `snapshots` afterwards.
pub struct GameWorld {
    collision: Arc<dyn CollisionQuery>,
    player: Option<Player>,
    /// Keyed by id; ordered so seeded runs tick NPCs in a fixed order
    npcs: BTreeMap<u64, Npc>,
    next_npc_id: u64,
    rng: StdRng,
    frame: u64,
    elapsed: f64,
}

impl std::fmt::Debug for GameWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameWorld")
            .field("player", &self.player)
            .field("npcs", &self.npcs.keys().collect::<Vec<_>>())
            .field("frame", &self.frame)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl GameWorld {
    /// Build a world from a scene. A seed makes NPC wandering reproducible.
    pub fn new(scene: Scene, seed: Option<u64>) -> Self {
        info!(
            "[SCENE] Building world: {} obstacles, player: {}, {} NPCs",
            scene.obstacles.len(),
            scene.player.is_some(),
            scene.npcs.len()
        );
        Self::with_collision(Arc::new(scene.obstacles), scene.player, &scene.npcs, seed)
    }

    /// Build a world around any collision query implementation
    pub fn with_collision(
        collision: Arc<dyn CollisionQuery>,
        player: Option<PlayerConfig>,
        npcs: &[NpcConfig],
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut world = Self {
            collision,
            player: None,
            npcs: BTreeMap::new(),
            next_npc_id: PLAYER_ID + 1,
            rng,
            frame: 0,
            elapsed: 0.0,
        };

        if let Some(config) = player {
            world.warn_if_blocked("Player", Vec3::from_array(config.start_position), 0.0);
            world.player = Some(Player::new(&config));
        }
        for config in npcs {
            world.spawn_npc(config);
        }

        world
    }

    fn warn_if_blocked(&self, name: &str, position: Vec3, radius: f32) {
        if movement::footprint_blocked(self.collision.as_ref(), position, radius) {
            warn!(
                "[SCENE] {} starts inside an obstacle at ({:.2}, {:.2}, {:.2}) and may not be able to move",
                name, position.x, position.y, position.z
            );
        }
    }

    /// Add an NPC and return its id
    pub fn spawn_npc(&mut self, config: &NpcConfig) -> u64 {
        let id = self.next_npc_id;
        self.next_npc_id += 1;

        self.warn_if_blocked(
            &config.name,
            Vec3::from_array(config.start_position),
            config.collision_radius,
        );
        debug!("[SCENE] Spawned NPC {} '{}'", id, config.name);
        self.npcs.insert(id, Npc::new(id, config));
        id
    }

    /// Remove an NPC together with its wander state
    pub fn despawn_npc(&mut self, id: u64) -> Option<Npc> {
        let npc = self.npcs.remove(&id);
        if npc.is_some() {
            debug!("[SCENE] Despawned NPC {}", id);
        }
        npc
    }

    pub fn collision(&self) -> &dyn CollisionQuery {
        self.collision.as_ref()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Mutable player access for the input layer
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn npc(&self, id: u64) -> Option<&Npc> {
        self.npcs.get(&id)
    }

    pub fn npcs(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.values()
    }

    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    /// Frames processed so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds processed so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance every agent by one frame of `delta` seconds.
    ///
    /// Negative or non-finite deltas are treated as zero and long frames are
    /// clamped to `MAX_FRAME_DELTA`. Agents are ticked independently; none
    /// observes another's move within the same frame.
    pub fn update(&mut self, delta: f32) -> Vec<WorldEvent> {
        let delta = if !(delta.is_finite() && delta >= 0.0) {
            debug!("[NAV] Ignoring invalid frame delta {}", delta);
            0.0
        } else if delta > MAX_FRAME_DELTA {
            debug!("[NAV] Clamping {:.3}s frame to {:.3}s", delta, MAX_FRAME_DELTA);
            MAX_FRAME_DELTA
        } else {
            delta
        };

        let mut events = Vec::new();
        let collision = self.collision.as_ref();

        if let Some(player) = &mut self.player {
            let outcome = player.tick(collision, delta);
            if outcome.is_fully_blocked() {
                events.push(WorldEvent::PlayerBlocked);
            }
        }

        for npc in self.npcs.values_mut() {
            if let WanderStep::Retargeted(reason) = npc.tick(collision, &mut self.rng, delta) {
                events.push(WorldEvent::Retargeted { id: npc.id, reason });
            }
        }

        self.frame += 1;
        self.elapsed += f64::from(delta);
        events
    }

    /// Current state of every agent, player first, NPCs by id
    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.player
            .iter()
            .map(Player::snapshot)
            .chain(self.npcs.values().map(Npc::snapshot))
            .collect()
    }
}
