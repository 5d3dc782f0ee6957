use crate::snake::Direction::{self, *};

pub const ACCELERATE_KEY: &str = "shift";

/// What a key means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Accelerate,
}

/// Maps a key name (case-insensitive) to an action. Unknown keys map to
/// nothing.
pub fn map_key(key: &str) -> Option<KeyAction> {
    let action = match key.to_lowercase().as_str() {
        "arrowup" | "w" => KeyAction::Steer(Up),
        "arrowdown" | "s" => KeyAction::Steer(Down),
        "arrowleft" | "a" => KeyAction::Steer(Left),
        "arrowright" | "d" => KeyAction::Steer(Right),
        ACCELERATE_KEY => KeyAction::Accelerate,
        _ => return None,
    };

    Some(action)
}

/// A turn is allowed unless it reverses the direction the snake is actually
/// moving in, which would run it straight into its own neck.
pub fn can_change_direction(current: Direction, requested: Direction) -> bool {
    !requested.is_reverse_of(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd() {
        assert_eq!(map_key("ArrowUp"), Some(KeyAction::Steer(Up)));
        assert_eq!(map_key("w"), Some(KeyAction::Steer(Up)));
        assert_eq!(map_key("ArrowDown"), Some(KeyAction::Steer(Down)));
        assert_eq!(map_key("s"), Some(KeyAction::Steer(Down)));
        assert_eq!(map_key("ArrowLeft"), Some(KeyAction::Steer(Left)));
        assert_eq!(map_key("a"), Some(KeyAction::Steer(Left)));
        assert_eq!(map_key("ArrowRight"), Some(KeyAction::Steer(Right)));
        assert_eq!(map_key("d"), Some(KeyAction::Steer(Right)));
        assert_eq!(map_key("Shift"), Some(KeyAction::Accelerate));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(map_key("W"), Some(KeyAction::Steer(Up)));
        assert_eq!(map_key("ARROWLEFT"), Some(KeyAction::Steer(Left)));
    }

    #[test]
    fn unknown_keys_ignored() {
        assert_eq!(map_key("q"), None);
        assert_eq!(map_key("Enter"), None);
        assert_eq!(map_key(""), None);
    }

    #[test]
    fn only_reversal_rejected() {
        assert!(!can_change_direction(Right, Left));
        assert!(!can_change_direction(Up, Down));
        assert!(can_change_direction(Right, Up));
        assert!(can_change_direction(Right, Right));
        for requested in [Up, Down, Left, Right] {
            assert!(can_change_direction(Stop, requested));
        }
    }
}
