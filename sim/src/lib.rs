//! Navigation and collision core for a walkable museum scene.
//!
//! A [`GameWorld`] owns the player, the wandering NPCs and the shared
//! obstacle query, and advances them once per frame.

pub mod entities;
pub mod error;
pub mod input;
pub mod navigation;
pub mod world;

pub use entities::{Npc, Player, PLAYER_ID};
pub use error::{SceneError, SceneResult};
pub use input::InputSampler;
pub use navigation::{CollisionQuery, Obstacle, ObstacleRegistry};
pub use world::{GameWorld, Scene, WorldEvent};
