//! Operator controls. Every handler is total: pressing any control in any
//! state is legal and produces a defined, possibly nonsensical, outcome.
//! The broken branch logic below is the product contract, reproduced
//! threshold for threshold; do not straighten it out.
use crate::engine::{Engine, Task};
use crate::messages::SARCASTIC_MESSAGES;
use crate::rng::unit_to_index;
use crate::state::Gear;

const BRAKE_TURBO_GATE: f64 = 0.6;
const GEAR_LURCH_GATE: f64 = 0.5;
const GEAR_LURCH_FLOAT_GATE: f64 = 0.7;
const HANDBRAKE_ROLL_GATE: f64 = 0.7;
const WIPER_SURGE_GATE: f64 = 0.6;
const WIPER_CRY_GATE: f64 = 0.7;

const MSG_FIRST_TIME: &str = "First time driving huh?";
const MSG_CLUTCH_BRRR: &str = "Clutch makes everything go BRRRRR! 🚗💨";
const MSG_NO_ENGINE_NEEDED: &str = "Brilliant! Who needs an engine anyway?";
const MSG_NOWHERE_TO_GO: &str = "Easy bro… we got nowhere to go.";
const MSG_ENGINE_WENT_HOME: &str = "Engine said 'nope' and went home! 🏠";
const MSG_DRAG_STRIP: &str = "Why racing? This ain't a drag strip.";
const MSG_TURBO_BRAKE: &str = "Brake pedal is actually a turbo button! 🚀";
const MSG_SLAMMED_BRAKES: &str = "Why bro why u slammed the brakes??";
const MSG_CLUTCH_FOR_SHOW: &str = "Clutch is for show huh?";
const MSG_PRESS_BRAKE_FIRST: &str = "Press brake first! Or don't. I'm not your mom. 🤷";
const MSG_BRAKES_NEW_CLUTCH: &str = "Brakes are the new clutch. Science!";
const MSG_ENGINE_BORING: &str = "Engine started normally... BORING! 😴";
const MSG_ENGINE_QUIET: &str = "Engine off. Finally some peace and quiet! 🤫";
const MSG_CHAOS_MODE: &str = "Handbrake off. Chaos mode: ACTIVATED! 😈";
const MSG_HANDBRAKE_WORKS: &str = "Handbrake engaged! The ONLY thing that works! 🎉";
const MSG_RAIN_CAME: &str = "Hey! Rain came because you turned on the wipers! 🌧️☔";
const MSG_RAIN_GODS: &str = "Wipers summoned the rain gods! Car goes WHOOSH! 🌊🚗";
const MSG_FEARED_RAIN: &str = "Why? Because you feared the rain huh? 😱💧";
const MSG_RAIN_SAD: &str = "Wipers off! Rain is sad now... 😢☔";
const MSG_CAR_CRYING: &str = "Car is crying because no more rain dance! 😭";

impl Engine {
    /// Clutch doubles as the ignition, and moves the car in a random
    /// direction when the engine is already running.
    pub fn press_clutch(&mut self) {
        self.touch();
        self.vehicle.clutch_pressed = true;
        self.vehicle.is_shaking = true;
        if !self.vehicle.engine_on {
            self.vehicle.engine_on = true;
            self.vehicle.rpm = (1000.0 + self.draw() * 500.0) as f32;
            self.emit(MSG_FIRST_TIME);
        } else {
            self.vehicle.rpm = (self.draw() * 4000.0) as f32;
            let direction = self.random_direction();
            self.vehicle.is_moving = true;
            self.vehicle.movement_direction = direction;
            self.emit(MSG_CLUTCH_BRRR);
        }
        self.defer(self.cfg.clutch_release_ms, Task::ClutchRelease);
        self.publish();
    }

    /// Accelerating with the engine off moves the car anyway; in any other
    /// gear than neutral it kills the engine instead.
    pub fn press_accelerator(&mut self) {
        self.touch();
        if !self.vehicle.engine_on {
            let direction = self.random_direction();
            self.vehicle.is_moving = true;
            self.vehicle.movement_direction = direction;
            self.vehicle.rpm = (self.draw() * 1000.0) as f32;
            self.vehicle.is_floating = true;
            self.emit(MSG_NO_ENGINE_NEEDED);
        } else if self.vehicle.gear == Gear::Neutral {
            self.warn_high_rpm();
            self.emit(MSG_NOWHERE_TO_GO);
            self.vehicle.rpm = (3000.0 + self.draw() * 1000.0) as f32;
            self.vehicle.is_shaking = true;
            self.defer(self.cfg.rev_settle_ms, Task::RevSettle);
        } else {
            self.vehicle.engine_on = false;
            self.vehicle.rpm = 0.0;
            self.vehicle.stop_movement();
            self.emit(MSG_ENGINE_WENT_HOME);
            self.roll_fake_fumes();
        }
        self.defer(self.cfg.float_settle_ms, Task::FloatSettle);
        self.publish();
    }

    /// The brake is a turbo button two draws in five.
    pub fn press_brake(&mut self) {
        self.touch();
        self.vehicle.brake_pressed = true;
        self.vehicle.is_shaking = true;
        if self.vehicle.engine_on
            && self.vehicle.gear == Gear::Neutral
            && !self.vehicle.is_moving
        {
            self.warn_high_rpm();
            self.emit(MSG_DRAG_STRIP);
            self.vehicle.rpm = (2500.0 + self.draw() * 1500.0) as f32;
        }
        if self.draw() > BRAKE_TURBO_GATE {
            self.vehicle.is_moving = true;
            self.vehicle.movement_direction = self.random_direction();
            self.emit(MSG_TURBO_BRAKE);
        } else if self.vehicle.is_moving {
            self.vehicle.stop_movement();
            self.vehicle.brake_pressed = true;
        }
        self.defer(self.cfg.brake_release_ms, Task::BrakeRelease);
        self.publish();
    }

    /// Gear changes check movement before the brake, so a parked car with
    /// no brake held falls through to the nagging branch untouched.
    pub fn select_gear(&mut self, gear: Gear) {
        self.touch();
        if self.vehicle.is_moving || !self.vehicle.brake_pressed {
            if self.vehicle.is_moving {
                self.vehicle.gear = gear;
                self.vehicle.stop_movement();
                self.vehicle.is_shaking = true;
                self.vehicle.rpm = (self.draw() * 2000.0) as f32;
                self.emit(MSG_SLAMMED_BRAKES);
                self.defer(self.cfg.gear_settle_ms, Task::GearSettle);
            } else {
                self.emit(MSG_PRESS_BRAKE_FIRST);
            }
        } else {
            self.vehicle.gear = gear;
            self.emit(MSG_BRAKES_NEW_CLUTCH);
            // The draw happens even for neutral, which has no wrong
            // direction to lurch into.
            if self.draw() > GEAR_LURCH_GATE && gear != Gear::Neutral {
                self.defer(self.cfg.gear_lurch_ms, Task::GearLurch(gear));
            }
        }
        self.publish();
    }

    pub fn toggle_engine(&mut self) {
        self.touch();
        let turning_on = !self.vehicle.engine_on;
        self.vehicle.engine_on = turning_on;
        self.vehicle.rpm = if turning_on {
            (1000.0 + self.draw() * 200.0) as f32
        } else {
            0.0
        };
        self.vehicle.stop_movement();
        if turning_on {
            self.emit(MSG_ENGINE_BORING);
        } else {
            self.emit(MSG_ENGINE_QUIET);
            self.roll_fake_fumes();
        }
        self.publish();
    }

    /// Engaging always parks the car; releasing leaves movement alone and
    /// sometimes lets the car roll off on its own half a second later.
    pub fn toggle_handbrake(&mut self) {
        self.touch();
        let was_on = self.vehicle.handbrake_on;
        self.vehicle.handbrake_on = !was_on;
        if was_on {
            self.emit(MSG_CHAOS_MODE);
            if self.draw() > HANDBRAKE_ROLL_GATE {
                self.defer(self.cfg.handbrake_roll_ms, Task::HandbrakeRoll);
            }
        } else {
            self.vehicle.stop_movement();
            self.emit(MSG_HANDBRAKE_WORKS);
        }
        self.publish();
    }

    /// Wipers control the weather, obviously.
    pub fn toggle_wiper(&mut self) {
        self.touch();
        if !self.vehicle.wiper_on {
            self.vehicle.wiper_on = true;
            self.emit(MSG_RAIN_CAME);
            if self.draw() > WIPER_SURGE_GATE {
                self.defer(self.cfg.wiper_surge_ms, Task::WiperSurge);
            }
        } else {
            self.vehicle.wiper_on = false;
            if self.vehicle.is_moving {
                self.vehicle.stop_movement();
                self.vehicle.is_shaking = true;
                self.emit(MSG_FEARED_RAIN);
            } else {
                self.emit(MSG_RAIN_SAD);
            }
            self.defer(self.cfg.wiper_settle_ms, Task::WiperSettle);
        }
        self.publish();
    }

    /// Blow up the dashboard. The renderer hides everything while
    /// `destroyed` is set; the respawn task rebuilds the world.
    pub fn self_destruct(&mut self) {
        self.touch();
        self.session.destroyed = true;
        self.defer(self.cfg.respawn_delay_ms, Task::Respawn);
        self.publish();
    }

    pub(crate) fn apply_gear_settle(&mut self) {
        self.emit(MSG_CLUTCH_FOR_SHOW);
        self.vehicle.is_shaking = false;
    }

    /// Fire the delayed wrong-way lurch for a gear change.
    pub(crate) fn apply_gear_lurch(&mut self, gear: Gear) {
        let direction = gear.expected_direction().opposite();
        self.vehicle.is_moving = true;
        self.vehicle.movement_direction = direction;
        self.vehicle.is_floating = self.draw() > GEAR_LURCH_FLOAT_GATE;
        self.emit(&format!("Going {direction} in {gear}? Makes total sense! 🤡"));
    }

    pub(crate) fn apply_handbrake_roll(&mut self) {
        self.vehicle.is_moving = true;
        self.vehicle.movement_direction = self.random_direction();
        let quip = SARCASTIC_MESSAGES[unit_to_index(self.draw(), SARCASTIC_MESSAGES.len())];
        self.emit(quip);
    }

    pub(crate) fn apply_wiper_surge(&mut self) {
        self.vehicle.is_moving = true;
        self.vehicle.movement_direction = self.random_direction();
        self.vehicle.is_shaking = true;
        self.emit(MSG_RAIN_GODS);
    }

    pub(crate) fn apply_wiper_settle(&mut self) {
        self.vehicle.is_shaking = false;
        if self.draw() > WIPER_CRY_GATE {
            self.emit(MSG_CAR_CRYING);
        }
    }
}
