//! Wandering NPC agent.

use glam::Vec3;
use rand::Rng;

use museum_shared::{AgentKind, AgentSnapshot, NpcConfig};

use crate::navigation::{AgentBody, CollisionQuery, WanderController, WanderSettings, WanderStep};

/// An autonomous visitor walking between random targets
#[derive(Debug, Clone)]
pub struct Npc {
    pub id: u64,
    pub name: String,
    pub body: AgentBody,
    pub wander: WanderController,
}

impl Npc {
    pub fn new(id: u64, config: &NpcConfig) -> Self {
        let start = Vec3::from_array(config.start_position);
        Self {
            id,
            name: config.name.clone(),
            body: AgentBody::new(start, config.collision_radius),
            wander: WanderController::new(WanderSettings::from_config(config), start),
        }
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        collision: &dyn CollisionQuery,
        rng: &mut R,
        delta: f32,
    ) -> WanderStep {
        self.wander.tick(&mut self.body, collision, rng, delta)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name.clone(),
            kind: AgentKind::Npc,
            position: self.body.position.to_array(),
            rotation: self.body.yaw,
            is_stuck: self.wander.is_stuck(),
            target: self.wander.target().map(|t| t.to_array()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{ObstacleRegistry, RetargetReason};
    use museum_shared::DEFAULT_WANDER_RADIUS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_npc_from_config() {
        let config = NpcConfig::new("Visitor A", [2.0, 0.0, -3.0]);
        let npc = Npc::new(1, &config);

        assert_eq!(npc.body.position, Vec3::new(2.0, 0.0, -3.0));
        assert_eq!(npc.body.radius, config.collision_radius);
        assert!(npc.wander.target().is_none());
    }

    #[test]
    fn test_npc_snapshot_tracks_target() {
        let registry = ObstacleRegistry::default();
        let mut rng = StdRng::seed_from_u64(10);
        let mut npc = Npc::new(3, &NpcConfig::new("Visitor B", [-3.0, 0.0, 2.0]));

        let step = npc.tick(&registry, &mut rng, 0.016);
        assert_eq!(step, WanderStep::Retargeted(RetargetReason::Initial));

        let snapshot = npc.snapshot();
        assert_eq!(snapshot.id, 3);
        assert_eq!(snapshot.name, "Visitor B");
        assert_eq!(snapshot.kind, AgentKind::Npc);
        assert!(!snapshot.is_stuck);
        let target = snapshot.target.unwrap();
        assert!((target[0] + 3.0).abs() <= DEFAULT_WANDER_RADIUS);
        assert!((target[2] - 2.0).abs() <= DEFAULT_WANDER_RADIUS);
    }
}
