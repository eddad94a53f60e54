//! Transient notification bus: one message and one high-RPM warning slot.
use serde::{Deserialize, Serialize};

use crate::scheduler::TaskId;

/// Fixed pool of quips used when the car decides to move on its own.
pub const SARCASTIC_MESSAGES: [&str; 8] = [
    "Physics is on vacation! 🏖️",
    "Nap time for engine 💤",
    "Car.exe has stopped working",
    "Gravity? Never heard of her",
    "This is fine 🔥",
    "Working as intended™",
    "Have you tried turning it off and on again?",
    "Error 404: Logic not found",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Sarcastic,
    Warning,
}

/// A user-visible popup. Auto-expires; a newer message always wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    #[must_use]
    pub fn sarcastic(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Sarcastic)
    }
}

/// Holds at most one active message plus the independent high-RPM warning
/// flag. Expiry timers are owned by the engine scheduler; the bus only
/// remembers their handles so a newer write can cancel the older timer
/// (last-write-wins, timer restarts).
#[derive(Debug, Default)]
pub struct MessageBus {
    message: Option<Message>,
    message_expiry: Option<TaskId>,
    high_rpm_warning: bool,
    warning_expiry: Option<TaskId>,
}

impl MessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn high_rpm_warning(&self) -> bool {
        self.high_rpm_warning
    }

    /// Install a new message, returning the expiry handle of the one it
    /// pre-empted (if any) so the caller can cancel it.
    pub(crate) fn replace_message(&mut self, message: Message) -> Option<TaskId> {
        self.message = Some(message);
        self.message_expiry.take()
    }

    pub(crate) fn set_message_expiry(&mut self, id: TaskId) {
        self.message_expiry = Some(id);
    }

    pub(crate) fn expire_message(&mut self) {
        self.message = None;
        self.message_expiry = None;
    }

    /// Raise the high-RPM warning, returning the stale expiry handle.
    pub(crate) fn raise_warning(&mut self) -> Option<TaskId> {
        self.high_rpm_warning = true;
        self.warning_expiry.take()
    }

    pub(crate) fn set_warning_expiry(&mut self, id: TaskId) {
        self.warning_expiry = Some(id);
    }

    pub(crate) fn expire_warning(&mut self) {
        self.high_rpm_warning = false;
        self.warning_expiry = None;
    }

    /// Wipe everything, returning any live expiry handles for cancellation.
    /// Used by the self-destruct respawn.
    pub(crate) fn reset(&mut self) -> (Option<TaskId>, Option<TaskId>) {
        self.message = None;
        self.high_rpm_warning = false;
        (self.message_expiry.take(), self.warning_expiry.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;

    #[test]
    fn replace_message_hands_back_stale_timer() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let mut bus = MessageBus::new();

        assert!(bus.replace_message(Message::sarcastic("first")).is_none());
        let first = scheduler.schedule_once(0, 4000, 1);
        bus.set_message_expiry(first);

        let stale = bus.replace_message(Message::sarcastic("second"));
        assert_eq!(stale, Some(first));
        assert_eq!(bus.message().map(|m| m.text.as_str()), Some("second"));
    }

    #[test]
    fn reset_clears_both_slots() {
        let mut bus = MessageBus::new();
        bus.replace_message(Message::sarcastic("boom"));
        bus.raise_warning();
        let (message_timer, warning_timer) = bus.reset();
        assert!(message_timer.is_none());
        assert!(warning_timer.is_none());
        assert!(bus.message().is_none());
        assert!(!bus.high_rpm_warning());
    }
}
