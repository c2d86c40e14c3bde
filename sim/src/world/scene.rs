//! Scene descriptions: obstacles plus the agents that walk among them.
//!
//! A scene comes either from a JSON file or from the built-in museum layout.

use std::path::Path;

use log::{error, info};
use serde::Deserialize;

use museum_shared::{NpcConfig, PlayerConfig, MAX_WANDER_EXTENT};

use crate::error::{SceneError, SceneResult};
use crate::navigation::{Obstacle, ObstacleRegistry};

/// Raw on-disk scene format
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    /// `[min_x, min_z, max_x, max_z]` or `[.., min_y, max_y]`
    #[serde(default)]
    obstacles: Vec<Vec<f32>>,
    #[serde(default)]
    player: Option<PlayerConfig>,
    #[serde(default)]
    npcs: Vec<NpcConfig>,
}

/// A validated scene ready to populate a [`GameWorld`](super::GameWorld)
#[derive(Debug, Clone)]
pub struct Scene {
    pub obstacles: ObstacleRegistry,
    pub player: Option<PlayerConfig>,
    pub npcs: Vec<NpcConfig>,
}

// Two rooms joined by door gaps, plus exhibit footprints.
// Each entry is [min_x, min_z, max_x, max_z].
const MUSEUM_WALLS: [[f32; 4]; 9] = [
    // Room 1 side walls
    [-15.0, -15.0, -14.0, 15.0],
    [14.0, -15.0, 15.0, 15.0],
    // Room 1 back wall, split around the entrance
    [-15.0, -15.0, -4.0, -14.0],
    [4.0, -15.0, 15.0, -14.0],
    // Room 2 side walls and far wall
    [-15.0, 15.0, -14.0, 45.0],
    [14.0, 15.0, 15.0, 45.0],
    [-15.0, 44.0, 15.0, 45.0],
    // Divider between the rooms, split around the doorway
    [-15.0, 14.0, -4.0, 16.0],
    [4.0, 14.0, 15.0, 16.0],
];

const MUSEUM_EXHIBITS: [[f32; 4]; 8] = [
    // Center statue
    [-2.5, -2.5, 2.5, 2.5],
    // T-Rex
    [6.0, -4.0, 10.5, 1.0],
    // Ceremonial knife
    [-9.0, 7.0, -7.0, 9.0],
    // Arrow Man
    [9.0, 19.0, 11.0, 21.0],
    // Diplodocus base
    [-2.0, 20.5, 2.5, 35.5],
    // Spear Man
    [9.0, 39.0, 11.0, 41.0],
    // Hephaestus temple
    [-9.0, 32.0, -3.5, 40.0],
    // Assistant base
    [7.5, 9.5, 8.5, 10.5],
];

/// Wander area for the second room, inside its walls
const GALLERY_BOUNDS: [f32; 4] = [-13.0, 17.0, 13.0, 43.0];

impl Scene {
    /// The built-in two-room museum with its default visitors
    pub fn museum() -> Self {
        let obstacles = MUSEUM_WALLS
            .iter()
            .chain(MUSEUM_EXHIBITS.iter())
            .map(|&[min_x, min_z, max_x, max_z]| Obstacle::from_corners(min_x, min_z, max_x, max_z))
            .collect();

        Self {
            obstacles,
            player: Some(PlayerConfig::default()),
            npcs: vec![
                NpcConfig::new("Visitor A", [3.0, 0.0, -5.0]),
                NpcConfig::new("Visitor B", [-5.0, 0.0, 3.0]),
                NpcConfig::new("Docent", [6.0, 0.0, 26.0]).with_wander_bounds(GALLERY_BOUNDS),
            ],
        }
    }

    /// Read and validate a scene file
    pub fn load<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json_str(&content)?;
        info!(
            "[SCENE] Loaded {:?}: {} obstacles, {} NPCs",
            path,
            scene.obstacles.len(),
            scene.npcs.len()
        );
        Ok(scene)
    }

    /// Load `path` if given, falling back to the built-in museum on any error
    pub fn load_or_museum(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("[SCENE] No scene file given, using built-in museum");
            return Self::museum();
        };
        match Self::load(path) {
            Ok(scene) => scene,
            Err(e) => {
                error!("[SCENE] {}; using built-in museum", e);
                Self::museum()
            }
        }
    }

    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let file: SceneFile = serde_json::from_str(json)?;

        let obstacles = file
            .obstacles
            .iter()
            .enumerate()
            .map(|(index, values)| parse_obstacle(index, values))
            .collect::<SceneResult<ObstacleRegistry>>()?;

        if let Some(player) = &file.player {
            validate_player(player)?;
        }
        for npc in &file.npcs {
            validate_npc(npc)?;
        }

        Ok(Self {
            obstacles,
            player: file.player,
            npcs: file.npcs,
        })
    }
}

fn parse_obstacle(index: usize, values: &[f32]) -> SceneResult<Obstacle> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SceneError::InvalidObstacle {
            index,
            reason: "contains a non-finite value".to_string(),
        });
    }
    Obstacle::from_slice(values).ok_or_else(|| SceneError::InvalidObstacle {
        index,
        reason: format!("expected 4 or 6 numbers, got {}", values.len()),
    })
}

fn invalid_agent(name: &str, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidAgent {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn check_non_negative(name: &str, field: &str, value: f32) -> SceneResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid_agent(name, format!("{} must be a non-negative number, got {}", field, value)))
    }
}

fn check_finite(name: &str, field: &str, values: &[f32]) -> SceneResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(invalid_agent(name, format!("{} contains a non-finite value", field)))
    }
}

fn check_extent(name: &str, field: &str, values: &[f32]) -> SceneResult<()> {
    if values.iter().all(|v| v.abs() <= MAX_WANDER_EXTENT) {
        Ok(())
    } else {
        Err(invalid_agent(
            name,
            format!("{} must stay within +/-{}", field, MAX_WANDER_EXTENT),
        ))
    }
}

fn validate_player(config: &PlayerConfig) -> SceneResult<()> {
    check_finite("Player", "start_position", &config.start_position)?;
    check_finite("Player", "view_direction", &config.view_direction)?;
    check_non_negative("Player", "speed", config.speed)
}

fn validate_npc(config: &NpcConfig) -> SceneResult<()> {
    let name = config.name.as_str();
    if name.trim().is_empty() {
        return Err(invalid_agent(name, "name must not be empty"));
    }
    check_finite(name, "start_position", &config.start_position)?;
    check_extent(name, "start_position", &config.start_position)?;
    if let Some(bounds) = &config.wander_bounds {
        check_finite(name, "wander_bounds", bounds)?;
        check_extent(name, "wander_bounds", bounds)?;
    }
    check_non_negative(name, "speed", config.speed)?;
    check_non_negative(name, "wander_radius", config.wander_radius)?;
    check_extent(name, "wander_radius", &[config.wander_radius])?;
    check_non_negative(name, "collision_radius", config.collision_radius)?;
    check_non_negative(name, "arrival_threshold", config.arrival_threshold)?;
    check_non_negative(name, "stuck_threshold", config.stuck_threshold)?;
    check_non_negative(name, "movement_epsilon", config.movement_epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::CollisionQuery;

    #[test]
    fn test_museum_layout() {
        let scene = Scene::museum();
        assert_eq!(scene.obstacles.len(), MUSEUM_WALLS.len() + MUSEUM_EXHIBITS.len());
        assert_eq!(scene.npcs.len(), 3);

        // Entrance and doorway are open, the statue is not
        assert!(!scene.obstacles.is_blocked(0.0, -14.5, 2.0, 0.0));
        assert!(!scene.obstacles.is_blocked(0.0, 15.0, 2.0, 0.0));
        assert!(scene.obstacles.is_blocked(0.0, 0.0, 2.0, 0.0));
    }

    #[test]
    fn test_museum_agents_start_clear() {
        let scene = Scene::museum();
        let player = scene.player.as_ref().unwrap();
        let [x, y, z] = player.start_position;
        assert!(!scene.obstacles.is_blocked(x, z, y, 0.0));

        for npc in &scene.npcs {
            let [x, y, z] = npc.start_position;
            assert!(
                !scene.obstacles.is_blocked(x, z, y, npc.collision_radius),
                "{} starts inside an obstacle",
                npc.name
            );
        }
    }

    #[test]
    fn test_parse_scene_json() {
        let scene = Scene::from_json_str(
            r#"{
                "obstacles": [[0, 0, 10, 10], [20, 20, 22, 22, 0, 1.5]],
                "player": { "start_position": [0, 2, -5] },
                "npcs": [{ "name": "Guide", "wander_bounds": [-5, -5, 5, 5] }]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.obstacles.len(), 2);
        let boxed = scene.obstacles.iter().nth(1).unwrap();
        assert_eq!(boxed.vertical, Some((0.0, 1.5)));
        assert_eq!(scene.player.unwrap().start_position, [0.0, 2.0, -5.0]);
        assert_eq!(scene.npcs[0].wander_bounds, Some([-5.0, -5.0, 5.0, 5.0]));
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::from_json_str("{}").unwrap();
        assert!(scene.obstacles.is_empty());
        assert!(scene.player.is_none());
        assert!(scene.npcs.is_empty());
    }

    #[test]
    fn test_bad_obstacle_arity() {
        let err = Scene::from_json_str(r#"{ "obstacles": [[0, 0, 1, 1], [0, 0, 1]] }"#).unwrap_err();
        match err {
            SceneError::InvalidObstacle { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_negative_speed_rejected() {
        let err = Scene::from_json_str(r#"{ "npcs": [{ "name": "Runner", "speed": -1 }] }"#).unwrap_err();
        assert!(matches!(err, SceneError::InvalidAgent { ref name, .. } if name == "Runner"));
    }

    #[test]
    fn test_oversized_wander_area_rejected() {
        for json in [
            r#"{ "npcs": [{ "name": "Far", "wander_radius": 3e38 }] }"#,
            r#"{ "npcs": [{ "name": "Far", "wander_bounds": [-3e38, 0, 3e38, 1] }] }"#,
            r#"{ "npcs": [{ "name": "Far", "start_position": [3e38, 0, 0] }] }"#,
        ] {
            let err = Scene::from_json_str(json).unwrap_err();
            assert!(matches!(err, SceneError::InvalidAgent { ref name, .. } if name == "Far"));
        }

        let ok = Scene::from_json_str(r#"{ "npcs": [{ "name": "Near", "wander_radius": 1e6 }] }"#);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let err = Scene::from_json_str(r#"{ "walls": [] }"#).unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_museum() {
        let path = std::env::temp_dir().join("museum-sim-no-such-scene.json");
        assert!(matches!(Scene::load(&path), Err(SceneError::Io { .. })));

        let scene = Scene::load_or_museum(Some(path.as_path()));
        assert_eq!(scene.obstacles.len(), Scene::museum().obstacles.len());
    }
}
