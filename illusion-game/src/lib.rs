//! Dashboard of Illusion Engine
//!
//! Platform-agnostic core for a deliberately malfunctioning car dashboard.
//! This crate owns the chaotic state-transition model; rendering lives in
//! platform crates that subscribe to snapshot pushes and never mutate
//! engine state.
//!
//! Nothing in here is physically plausible on purpose. The randomized
//! branches, their thresholds and their deliberately unfixed races are the
//! product contract, reproducible under a seeded [`RandomSource`].

pub mod config;
pub mod engine;
pub mod messages;
pub mod rng;
pub mod scheduler;
pub mod state;

mod chaos;
mod controls;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use engine::{DashboardObserver, Engine, Snapshot};
pub use messages::{Message, MessageBus, MessageKind, SARCASTIC_MESSAGES};
pub use rng::{ConstRandom, RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{DueTask, Scheduler, TaskId};
pub use state::{EngineSession, Gear, MovementDirection, VehicleState};

/// Trait for abstracting config loading operations
/// Platform-specific implementations should provide this
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the engine timing configuration from the platform source.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_engine_config(&self) -> Result<EngineConfig, Self::Error>;
}

/// Load a config through a platform loader, erasing its error type.
///
/// # Errors
///
/// Returns an error if the loader fails.
pub fn load_config<L>(loader: &L) -> Result<EngineConfig, anyhow::Error>
where
    L: ConfigLoader,
    L::Error: Into<anyhow::Error>,
{
    loader.load_engine_config().map_err(Into::into)
}
