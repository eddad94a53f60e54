//! Background processes: periodic chaos injection, inactivity watching,
//! label swapping and road scrolling. None of these count as user actions,
//! so they never refresh the inactivity timestamp.
use crate::engine::{Engine, Task};
use crate::state::MovementDirection;

/// One gate decides whether a chaos tick does anything at all.
const CHAOS_GATE: f64 = 0.85;
const CHAOS_ENGINE_NAP_GATE: f64 = 0.7;
const CHAOS_FLOAT_GATE: f64 = 0.8;
const CHAOS_BOUNCE_GATE: f64 = 0.7;
const CHAOS_ROLLAWAY_GATE: f64 = 0.9;
const LABEL_SWAP_GATE: f64 = 0.85;

const MSG_ENGINE_NAP: &str = "Nap time for engine 💤";
const MSG_PHYSICS_VACATION: &str = "Physics is on vacation! 🏖️";
const MSG_KEY_GOES_WHERE: &str = "Still figuring out where the key goes?";
const MSG_LABELS_CONFUSED: &str = "Oops! Labels got confused! 🔄";
const MSG_LABELS_NORMAL: &str = "Labels back to normal... or are they? 🤔";

impl Engine {
    /// Every two seconds, maybe ruin someone's day. The four sub-effects
    /// draw independently and can all land in the same tick.
    pub(crate) fn chaos_tick(&mut self) {
        if self.draw() <= CHAOS_GATE {
            return;
        }
        if self.vehicle.engine_on && self.draw() > CHAOS_ENGINE_NAP_GATE {
            self.vehicle.engine_on = false;
            self.vehicle.rpm = 0.0;
            self.emit(MSG_ENGINE_NAP);
            self.roll_fake_fumes();
        }
        self.vehicle.is_floating = self.draw() > CHAOS_FLOAT_GATE;
        self.vehicle.random_bounce = self.draw() > CHAOS_BOUNCE_GATE;
        if !self.vehicle.is_moving && self.draw() > CHAOS_ROLLAWAY_GATE {
            self.vehicle.is_moving = true;
            self.vehicle.movement_direction = self.random_direction();
            self.emit(MSG_PHYSICS_VACATION);
        }
    }

    /// A crow flies past after a minute with no input, then again once the
    /// previous one has left the screen and the operator still hasn't
    /// touched anything.
    pub(crate) fn inactivity_poll(&mut self) {
        let idle = self.now() - self.session.last_action_at;
        if idle >= self.cfg.inactivity_limit_ms && !self.session.crow_visible {
            self.session.crow_visible = true;
            self.emit(MSG_KEY_GOES_WHERE);
            self.defer(self.cfg.crow_flight_ms, Task::HideCrow);
        }
    }

    /// Occasionally swap the gas and brake labels. The message reflects
    /// the value before the flip.
    pub(crate) fn label_tick(&mut self) {
        if self.draw() > LABEL_SWAP_GATE {
            let was_swapped = self.session.labels_swapped;
            self.session.labels_swapped = !was_swapped;
            if was_swapped {
                self.emit(MSG_LABELS_NORMAL);
            } else {
                self.emit(MSG_LABELS_CONFUSED);
            }
        }
    }

    /// Scroll the road while moving; wobble the speedometer either way.
    /// A lagging `Stopped` direction while `is_moving` scrolls backwards,
    /// same as reverse.
    pub(crate) fn road_tick(&mut self) {
        if self.vehicle.is_moving {
            let step = self.cfg.road_step;
            let wrap = self.cfg.road_wrap;
            self.vehicle.road_position = match self.vehicle.movement_direction {
                MovementDirection::Forward => (self.vehicle.road_position + step) % wrap,
                _ => (self.vehicle.road_position - step + wrap) % wrap,
            };
            self.vehicle.speed = (self.draw() * 120.0 + 10.0) as f32;
        } else {
            // Speedometer noise while parked is intentional.
            self.vehicle.speed = (self.draw() * 20.0) as f32;
        }
    }
}
