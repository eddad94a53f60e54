//! Vehicle state record and session bookkeeping.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gear selector positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gear {
    #[serde(rename = "D")]
    Drive,
    #[default]
    #[serde(rename = "N")]
    Neutral,
    #[serde(rename = "R")]
    Reverse,
}

impl Gear {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drive => "D",
            Self::Neutral => "N",
            Self::Reverse => "R",
        }
    }

    /// The direction the car would travel in this gear if physics applied.
    /// Neutral has no expected direction.
    #[must_use]
    pub const fn expected_direction(self) -> MovementDirection {
        match self {
            Self::Drive => MovementDirection::Forward,
            Self::Neutral => MovementDirection::Stopped,
            Self::Reverse => MovementDirection::Reverse,
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gear {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(Self::Drive),
            "N" => Ok(Self::Neutral),
            "R" => Ok(Self::Reverse),
            _ => Err(()),
        }
    }
}

/// Current travel direction. `Stopped` is required when the car is not
/// moving; the converse is deliberately left unenforced so background
/// processes may start movement while other fields lag a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    Forward,
    Reverse,
    #[default]
    Stopped,
}

impl MovementDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::Stopped => "stopped",
        }
    }

    /// Flip forward and reverse; `Stopped` stays put.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
            Self::Stopped => Self::Stopped,
        }
    }
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full mutable vehicle record. Owned exclusively by the engine;
/// handlers and background processes mutate it through the engine only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub engine_on: bool,
    pub gear: Gear,
    pub rpm: f32,
    pub speed: f32,
    pub is_moving: bool,
    pub movement_direction: MovementDirection,
    pub handbrake_on: bool,
    /// Scroll offset of the road backdrop, kept in `0..road_wrap`.
    pub road_position: i32,
    pub clutch_pressed: bool,
    pub brake_pressed: bool,
    pub is_floating: bool,
    pub is_shaking: bool,
    pub random_bounce: bool,
    pub wiper_on: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            engine_on: false,
            gear: Gear::Neutral,
            rpm: 0.0,
            speed: 0.0,
            is_moving: false,
            movement_direction: MovementDirection::Stopped,
            handbrake_on: true,
            road_position: 0,
            clutch_pressed: false,
            brake_pressed: false,
            is_floating: false,
            is_shaking: false,
            random_bounce: false,
            wiper_on: false,
        }
    }
}

impl VehicleState {
    /// Halt the car, restoring the `!is_moving => Stopped` invariant.
    pub fn stop_movement(&mut self) {
        self.is_moving = false;
        self.movement_direction = MovementDirection::Stopped;
    }
}

/// Process-wide bookkeeping independent of the vehicle's physical fields.
/// Reset as a whole by the self-destruct respawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineSession {
    /// Timestamp of the last user-driven action, in engine milliseconds.
    /// Background processes never touch this.
    pub last_action_at: u64,
    pub labels_swapped: bool,
    pub crow_visible: bool,
    pub destroyed: bool,
}
