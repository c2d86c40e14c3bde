//! The first-person player agent.

use glam::Vec3;

use museum_shared::{AgentKind, AgentSnapshot, PlayerConfig};

use crate::input::InputSampler;
use crate::navigation::{movement, AgentBody, CollisionQuery, MoveOutcome};

/// Snapshot id reserved for the player
pub const PLAYER_ID: u64 = 0;

/// Local player: a camera-driven point agent.
///
/// The player always collides with radius 0, while NPCs use their own radius
/// against the same obstacles.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: AgentBody,
    /// Units per second
    pub speed: f32,
    pub input: InputSampler,
    /// Camera look direction, updated by the rendering layer each frame
    view_direction: Vec3,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            body: AgentBody::new(Vec3::from_array(config.start_position), 0.0),
            speed: config.speed,
            input: InputSampler::new(),
            view_direction: Vec3::from_array(config.view_direction),
        }
    }

    pub fn view_direction(&self) -> Vec3 {
        self.view_direction
    }

    pub fn set_view_direction(&mut self, direction: Vec3) {
        self.view_direction = direction;
    }

    /// Sample input and walk for one frame
    pub fn tick(&mut self, collision: &dyn CollisionQuery, delta: f32) -> MoveOutcome {
        let desired = self.input.desired_direction(self.view_direction);
        movement::resolve(&mut self.body, collision, desired, self.speed, delta)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: PLAYER_ID,
            name: "Player".to_string(),
            kind: AgentKind::Player,
            position: self.body.position.to_array(),
            rotation: self.body.yaw,
            is_stuck: false,
            target: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{MoveKind, Obstacle, ObstacleRegistry};
    use museum_shared::MoveKey;

    #[test]
    fn test_player_walks_forward() {
        let registry = ObstacleRegistry::default();
        let mut player = Player::new(&PlayerConfig::default());
        let start = player.body.position;

        player.input.key_down(MoveKey::Forward);
        let outcome = player.tick(&registry, 0.5);

        assert_eq!(outcome.kind, MoveKind::Direct);
        assert!((player.body.position.z - (start.z + player.speed * 0.5)).abs() < 1e-4);
        // Camera height is untouched
        assert_eq!(player.body.position.y, start.y);
    }

    #[test]
    fn test_player_idle_without_input() {
        let registry = ObstacleRegistry::default();
        let mut player = Player::new(&PlayerConfig::default());
        let start = player.body.position;

        let outcome = player.tick(&registry, 1.0);

        assert_eq!(outcome.kind, MoveKind::Idle);
        assert_eq!(player.body.position, start);
    }

    #[test]
    fn test_player_stopped_by_wall() {
        let registry = ObstacleRegistry::new(vec![Obstacle::from_corners(-50.0, 0.0, 50.0, 1.0)]);
        let mut player = Player::new(&PlayerConfig {
            start_position: [0.0, 2.0, -1.0],
            speed: 1.0,
            view_direction: [0.0, 0.0, 1.0],
        });
        player.input.key_down(MoveKey::Forward);

        for _ in 0..20 {
            player.tick(&registry, 0.25);
            let p = player.body.position;
            assert!(!registry.is_blocked(p.x, p.z, p.y, 0.0));
        }
        assert!(player.body.position.z <= 0.0);
    }

    #[test]
    fn test_player_snapshot() {
        let player = Player::new(&PlayerConfig::default());
        let snapshot = player.snapshot();
        assert_eq!(snapshot.id, PLAYER_ID);
        assert_eq!(snapshot.kind, AgentKind::Player);
        assert_eq!(snapshot.position, museum_shared::PLAYER_START);
        assert!(snapshot.target.is_none());
    }
}
