//! Movement keys understood by the player input sampler.

use serde::{Deserialize, Serialize};

/// A held movement key, independent of keyboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKey {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Forward,
        MoveKey::Back,
        MoveKey::StrafeLeft,
        MoveKey::StrafeRight,
    ];

    /// Map a raw key name (as reported by the input layer) to a movement key.
    /// Letters are matched case-insensitively; anything else is not a movement key.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Self::Forward),
            "s" | "arrowdown" => Some(Self::Back),
            "a" | "arrowleft" => Some(Self::StrafeLeft),
            "d" | "arrowright" => Some(Self::StrafeRight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(MoveKey::from_key_name("w"), Some(MoveKey::Forward));
        assert_eq!(MoveKey::from_key_name("W"), Some(MoveKey::Forward));
        assert_eq!(MoveKey::from_key_name("ArrowLeft"), Some(MoveKey::StrafeLeft));
        assert_eq!(MoveKey::from_key_name("d"), Some(MoveKey::StrafeRight));
        assert_eq!(MoveKey::from_key_name("Enter"), None);
        assert_eq!(MoveKey::from_key_name(""), None);
    }
}
