//! Player input sampling.
//!
//! Turns held movement keys plus the camera's view direction into a desired
//! walking direction on the horizontal plane.

use std::collections::HashSet;

use glam::Vec3;
use log::trace;

use museum_shared::MoveKey;

/// Held movement keys and text-focus state for the local player
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: HashSet<MoveKey>,
    /// Chat or another text field has keyboard focus
    text_focused: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Ignored while a text field has focus so typing never walks.
    pub fn key_down(&mut self, key: MoveKey) {
        if self.text_focused {
            trace!("[INPUT] Ignoring {:?} press while text input is focused", key);
            return;
        }
        self.held.insert(key);
    }

    /// Key released. Always honored so keys cannot stick across focus changes.
    pub fn key_up(&mut self, key: MoveKey) {
        self.held.remove(&key);
    }

    /// Raw key event from the input layer; non-movement keys are ignored
    pub fn handle_key(&mut self, key_name: &str, pressed: bool) {
        let Some(key) = MoveKey::from_key_name(key_name) else {
            return;
        };
        if pressed {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    pub fn set_text_focus(&mut self, focused: bool) {
        self.text_focused = focused;
    }

    pub fn is_text_focused(&self) -> bool {
        self.text_focused
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    /// Release everything (window lost focus, pointer unlocked)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Desired direction for this frame, relative to `view_direction`.
    ///
    /// Forward is the view direction flattened onto the XZ plane; right is
    /// `forward × up`. The sum of the held axes is returned unnormalized
    /// (the movement resolver normalizes it). Zero while text input has focus.
    pub fn desired_direction(&self, view_direction: Vec3) -> Vec3 {
        if self.text_focused {
            return Vec3::ZERO;
        }

        let forward = Vec3::new(view_direction.x, 0.0, view_direction.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let mut direction = Vec3::ZERO;
        if self.is_held(MoveKey::Forward) {
            direction += forward;
        }
        if self.is_held(MoveKey::Back) {
            direction -= forward;
        }
        if self.is_held(MoveKey::StrafeLeft) {
            direction -= right;
        }
        if self.is_held(MoveKey::StrafeRight) {
            direction += right;
        }
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_wasd_relative_to_view() {
        let mut input = InputSampler::new();
        let view = Vec3::new(0.0, 0.0, -1.0);

        input.key_down(MoveKey::Forward);
        assert!(approx(input.desired_direction(view), Vec3::new(0.0, 0.0, -1.0)));

        input.clear();
        input.key_down(MoveKey::StrafeRight);
        assert!(approx(input.desired_direction(view), Vec3::new(1.0, 0.0, 0.0)));

        input.clear();
        input.key_down(MoveKey::StrafeLeft);
        input.key_down(MoveKey::Back);
        assert!(approx(input.desired_direction(view), Vec3::new(-1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_view_pitch_is_flattened() {
        let mut input = InputSampler::new();
        input.key_down(MoveKey::Forward);

        // Looking steeply down along +Z
        let direction = input.desired_direction(Vec3::new(0.0, -0.9, 0.3));
        assert!(approx(direction, Vec3::Z));

        // Straight down has no horizontal forward
        assert_eq!(input.desired_direction(Vec3::NEG_Y), Vec3::ZERO);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputSampler::new();
        input.key_down(MoveKey::Forward);
        input.key_down(MoveKey::Back);
        assert!(approx(input.desired_direction(Vec3::Z), Vec3::ZERO));
    }

    #[test]
    fn test_text_focus_blocks_presses() {
        let mut input = InputSampler::new();
        input.set_text_focus(true);
        input.handle_key("w", true);
        assert!(!input.is_held(MoveKey::Forward));

        input.set_text_focus(false);
        assert_eq!(input.desired_direction(Vec3::Z), Vec3::ZERO);
    }

    #[test]
    fn test_text_focus_freezes_held_keys_and_allows_release() {
        let mut input = InputSampler::new();
        input.handle_key("W", true);
        input.set_text_focus(true);

        assert_eq!(input.desired_direction(Vec3::Z), Vec3::ZERO);

        input.handle_key("w", false);
        input.set_text_focus(false);
        assert!(!input.is_held(MoveKey::Forward));
        assert_eq!(input.desired_direction(Vec3::Z), Vec3::ZERO);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputSampler::new();
        input.handle_key("Enter", true);
        input.handle_key("q", true);
        for key in MoveKey::ALL {
            assert!(!input.is_held(key));
        }
    }
}
