//! Composition root: owns the vehicle record, session, message bus, random
//! source and scheduler, and pushes snapshots to subscribed renderers.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::messages::{Message, MessageBus};
use crate::rng::{RandomSource, SeededRandom};
use crate::scheduler::Scheduler;
use crate::state::{EngineSession, Gear, MovementDirection, VehicleState};

const DEBUG_ENV_VAR: &str = "ILLUSION_DEBUG_LOGS";
/// Chance gate for the fake exhaust popup after the engine dies.
const FAKE_FUMES_GATE: f64 = 0.6;

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Deferred mutations. Each variant is applied against the engine state at
/// fire time, never against a snapshot taken when it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    ClutchRelease,
    FloatSettle,
    RevSettle,
    BrakeRelease,
    GearSettle,
    GearLurch(Gear),
    HandbrakeRoll,
    WiperSurge,
    WiperSettle,
    FakeFumes,
    HideCrow,
    Respawn,
    MessageExpire,
    WarningExpire,
    ChaosTick,
    InactivityPoll,
    LabelTick,
    RoadTick,
}

/// Immutable view of the whole dashboard, pushed to subscribers after every
/// logical mutation. Renderers never see the live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub vehicle: VehicleState,
    pub message: Option<Message>,
    pub high_rpm_warning: bool,
    pub destroyed: bool,
    pub crow_visible: bool,
    pub labels_swapped: bool,
}

/// Push contract for renderers. Implemented for plain closures too.
pub trait DashboardObserver {
    fn on_update(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> DashboardObserver for F {
    fn on_update(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// The simulation engine. All mutation funnels through its action methods
/// and scheduler dispatch, one logical update at a time.
pub struct Engine {
    pub(crate) cfg: EngineConfig,
    clock: u64,
    pub(crate) vehicle: VehicleState,
    pub(crate) session: EngineSession,
    pub(crate) bus: MessageBus,
    rng: Box<dyn RandomSource>,
    scheduler: Scheduler<Task>,
    observers: SmallVec<[Box<dyn DashboardObserver>; 2]>,
}

impl Engine {
    #[must_use]
    pub fn new(cfg: EngineConfig, rng: Box<dyn RandomSource>) -> Self {
        let mut engine = Self {
            clock: 0,
            vehicle: VehicleState::default(),
            session: EngineSession::default(),
            bus: MessageBus::new(),
            rng,
            scheduler: Scheduler::new(),
            observers: SmallVec::new(),
            cfg,
        };
        engine
            .scheduler
            .schedule_every(0, engine.cfg.chaos_period_ms, Task::ChaosTick);
        engine
            .scheduler
            .schedule_every(0, engine.cfg.inactivity_poll_ms, Task::InactivityPoll);
        engine
            .scheduler
            .schedule_every(0, engine.cfg.label_swap_period_ms, Task::LabelTick);
        engine
            .scheduler
            .schedule_every(0, engine.cfg.road_tick_ms, Task::RoadTick);
        engine
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(
            EngineConfig::default(),
            Box::new(SeededRandom::from_seed(seed)),
        )
    }

    /// Current engine time in milliseconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.clock
    }

    #[must_use]
    pub const fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    #[must_use]
    pub const fn session(&self) -> &EngineSession {
        &self.session
    }

    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.bus.message()
    }

    #[must_use]
    pub const fn high_rpm_warning(&self) -> bool {
        self.bus.high_rpm_warning()
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Register a renderer for snapshot pushes.
    pub fn subscribe(&mut self, observer: Box<dyn DashboardObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            vehicle: self.vehicle.clone(),
            message: self.bus.message().cloned(),
            high_rpm_warning: self.bus.high_rpm_warning(),
            destroyed: self.session.destroyed,
            crow_visible: self.session.crow_visible,
            labels_swapped: self.session.labels_swapped,
        }
    }

    /// Advance virtual time by `ms`, draining every due task in deadline
    /// order. The clock sits at each task's nominal fire time while it
    /// runs, so nested schedules are relative to that instant.
    pub fn advance(&mut self, ms: u64) {
        let target = self.clock + ms;
        while let Some(due) = self.scheduler.pop_due(target) {
            self.clock = due.fire_at;
            if debug_log_enabled() {
                println!("t={} firing {:?}", self.clock, due.task);
            }
            self.dispatch(due.task);
            self.publish();
        }
        self.clock = target;
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::ClutchRelease => {
                self.vehicle.clutch_pressed = false;
                self.vehicle.is_shaking = false;
            }
            Task::FloatSettle => self.vehicle.is_floating = false,
            Task::RevSettle => {
                self.vehicle.rpm = if self.vehicle.engine_on { 1000.0 } else { 0.0 };
                self.vehicle.is_shaking = false;
            }
            Task::BrakeRelease => {
                self.vehicle.brake_pressed = false;
                self.vehicle.is_shaking = false;
            }
            Task::GearSettle => self.apply_gear_settle(),
            Task::GearLurch(gear) => self.apply_gear_lurch(gear),
            Task::HandbrakeRoll => self.apply_handbrake_roll(),
            Task::WiperSurge => self.apply_wiper_surge(),
            Task::WiperSettle => self.apply_wiper_settle(),
            Task::FakeFumes => self.emit("Oops. Fake fumes."),
            Task::HideCrow => self.session.crow_visible = false,
            Task::Respawn => self.respawn(),
            Task::MessageExpire => self.bus.expire_message(),
            Task::WarningExpire => self.bus.expire_warning(),
            Task::ChaosTick => self.chaos_tick(),
            Task::InactivityPoll => self.inactivity_poll(),
            Task::LabelTick => self.label_tick(),
            Task::RoadTick => self.road_tick(),
        }
    }

    /// Reset after self-destruct: fresh vehicle, empty bus, fresh session.
    /// Pending one-shot timers from before the blast are left armed.
    fn respawn(&mut self) {
        self.vehicle = VehicleState::default();
        let (message_timer, warning_timer) = self.bus.reset();
        if let Some(id) = message_timer {
            self.scheduler.cancel(id);
        }
        if let Some(id) = warning_timer {
            self.scheduler.cancel(id);
        }
        self.session = EngineSession {
            last_action_at: self.clock,
            ..EngineSession::default()
        };
    }

    pub(crate) fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer.on_update(&snapshot);
        }
    }

    /// Stamp a user-driven action. Background processes never call this.
    pub(crate) fn touch(&mut self) {
        self.session.last_action_at = self.clock;
    }

    pub(crate) fn draw(&mut self) -> f64 {
        self.rng.next_unit()
    }

    /// Uniform forward/reverse pick, gear be damned.
    pub(crate) fn random_direction(&mut self) -> MovementDirection {
        if self.draw() > 0.5 {
            MovementDirection::Forward
        } else {
            MovementDirection::Reverse
        }
    }

    pub(crate) fn defer(&mut self, delay: u64, task: Task) {
        self.scheduler.schedule_once(self.clock, delay, task);
    }

    pub(crate) fn emit(&mut self, text: &str) {
        self.emit_message(Message::sarcastic(text));
    }

    pub(crate) fn emit_message(&mut self, message: Message) {
        if let Some(stale) = self.bus.replace_message(message) {
            self.scheduler.cancel(stale);
        }
        let id =
            self.scheduler
                .schedule_once(self.clock, self.cfg.message_duration_ms, Task::MessageExpire);
        self.bus.set_message_expiry(id);
    }

    pub(crate) fn warn_high_rpm(&mut self) {
        if let Some(stale) = self.bus.raise_warning() {
            self.scheduler.cancel(stale);
        }
        let id =
            self.scheduler
                .schedule_once(self.clock, self.cfg.warning_duration_ms, Task::WarningExpire);
        self.bus.set_warning_expiry(id);
    }

    /// The engine just died; maybe follow up with a fake exhaust popup.
    pub(crate) fn roll_fake_fumes(&mut self) {
        if self.draw() > FAKE_FUMES_GATE {
            self.defer(self.cfg.fake_fumes_ms, Task::FakeFumes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ConstRandom;
    use std::cell::Cell;
    use std::rc::Rc;

    fn quiet_engine() -> Engine {
        Engine::new(EngineConfig::default(), Box::new(ConstRandom(0.0)))
    }

    #[test]
    fn clock_advances_even_with_no_due_work() {
        let mut engine = quiet_engine();
        engine.advance(37);
        assert_eq!(engine.now(), 37);
    }

    #[test]
    fn observers_see_every_dispatched_update() {
        let mut engine = quiet_engine();
        let seen = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&seen);
        engine.subscribe(Box::new(move |_snapshot: &Snapshot| {
            counter.set(counter.get() + 1);
        }));
        // Only road ticks are due this early, at t=100/200/300.
        engine.advance(300);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn message_expires_after_configured_duration() {
        let mut engine = quiet_engine();
        engine.emit("hello");
        assert!(engine.message().is_some());
        engine.advance(3999);
        assert!(engine.message().is_some());
        engine.advance(1);
        assert!(engine.message().is_none());
    }

    #[test]
    fn newer_message_restarts_the_expiry_clock() {
        let mut engine = quiet_engine();
        engine.emit("first");
        engine.advance(2000);
        engine.emit("second");
        engine.advance(2000);
        // The first message's timer was cancelled; the second survives.
        assert_eq!(engine.message().map(|m| m.text.as_str()), Some("second"));
        engine.advance(2000);
        assert!(engine.message().is_none());
    }

    #[test]
    fn high_rpm_warning_expires_independently() {
        let mut engine = quiet_engine();
        engine.warn_high_rpm();
        engine.emit("noise");
        engine.advance(3000);
        assert!(!engine.high_rpm_warning());
        assert!(engine.message().is_some());
    }
}
