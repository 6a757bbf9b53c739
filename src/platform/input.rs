//! Keyboard and touch-button mapping to player intents

use crate::sim::TickInput;

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    ActivateAbility,
}

impl Intent {
    /// Map a DOM `KeyboardEvent.key` value (touch buttons synthesize the same keys)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Intent::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Intent::MoveRight),
            "ArrowUp" | "w" | "W" => Some(Intent::Jump),
            " " | "Spacebar" => Some(Intent::ActivateAbility),
            _ => None,
        }
    }

    /// Record this intent on the pending tick input
    pub fn apply(self, input: &mut TickInput) {
        match self {
            Intent::MoveLeft => input.move_left = true,
            Intent::MoveRight => input.move_right = true,
            Intent::Jump => input.jump = true,
            Intent::ActivateAbility => input.activate_ability = true,
        }
    }
}
