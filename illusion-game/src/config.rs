//! Timing configuration for the simulation. Defaults match the shipped
//! dashboard; platforms may override via JSON.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config rejected: {0}")]
    Invalid(String),
}

/// All delays and cadences, in engine milliseconds. Probability thresholds
/// are part of the behavioral contract and live next to the code that
/// draws them, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a popup message stays up before expiring.
    pub message_duration_ms: u64,
    /// How long the high-RPM warning stays lit.
    pub warning_duration_ms: u64,
    pub clutch_release_ms: u64,
    pub float_settle_ms: u64,
    pub rev_settle_ms: u64,
    pub brake_release_ms: u64,
    pub gear_settle_ms: u64,
    pub gear_lurch_ms: u64,
    pub handbrake_roll_ms: u64,
    pub wiper_surge_ms: u64,
    pub wiper_settle_ms: u64,
    pub fake_fumes_ms: u64,
    pub chaos_period_ms: u64,
    pub inactivity_poll_ms: u64,
    pub label_swap_period_ms: u64,
    pub road_tick_ms: u64,
    /// Idle time before the crow flies across the screen.
    pub inactivity_limit_ms: u64,
    pub crow_flight_ms: u64,
    /// Delay between self-destruct and respawn.
    pub respawn_delay_ms: u64,
    /// Road scroll step per tick, in backdrop pixels.
    pub road_step: i32,
    /// Road scroll wraps modulo this value.
    pub road_wrap: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            message_duration_ms: 4000,
            warning_duration_ms: 3000,
            clutch_release_ms: 800,
            float_settle_ms: 1500,
            rev_settle_ms: 2000,
            brake_release_ms: 600,
            gear_settle_ms: 2000,
            gear_lurch_ms: 1000,
            handbrake_roll_ms: 500,
            wiper_surge_ms: 1000,
            wiper_settle_ms: 1500,
            fake_fumes_ms: 500,
            chaos_period_ms: 2000,
            inactivity_poll_ms: 1000,
            label_swap_period_ms: 3000,
            road_tick_ms: 100,
            inactivity_limit_ms: 60_000,
            crow_flight_ms: 4000,
            respawn_delay_ms: 3000,
            road_step: 5,
            road_wrap: 400,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or the values cannot
    /// drive the scheduler (zero periods, non-positive road wrap).
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("chaos_period_ms", self.chaos_period_ms),
            ("inactivity_poll_ms", self.inactivity_poll_ms),
            ("label_swap_period_ms", self.label_swap_period_ms),
            ("road_tick_ms", self.road_tick_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be non-zero")));
            }
        }
        if self.road_wrap <= 0 {
            return Err(ConfigError::Invalid(String::from(
                "road_wrap must be positive",
            )));
        }
        Ok(())
    }
}
