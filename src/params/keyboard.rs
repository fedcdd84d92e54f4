//! Keyboard Parameter Records
//!
//! Regular key events and pure modifier-state updates.

use std::sync::Arc;
use tracing::debug;

use crate::params::sole::Sole;
use crate::params::tracker::{AllocationTracker, Registration};
use crate::params::types::{
    CharCode, CharSet, EventType, Flags, KeyCode, KeyboardType, OrigCharCode, OrigCharSet,
};
use crate::params::{caught_tag, LOG_TARGET};

/// A regular keyboard key event
///
/// `ex_iskeydown` is derived once at construction from the event type, key
/// and flags. Records built without character translation carry zero in all
/// four character fields; use the event type, not the character value, to
/// tell such records apart from a real zero character.
#[derive(Debug)]
pub struct KeyboardEventParams {
    event_type: EventType,
    flags: Flags,
    key: KeyCode,
    char_code: CharCode,
    char_set: CharSet,
    orig_char_code: OrigCharCode,
    orig_char_set: OrigCharSet,
    keyboard_type: KeyboardType,
    repeat: bool,
    ex_iskeydown: bool,
    registration: Registration,
}

impl KeyboardEventParams {
    /// Allocate a key event with character translation
    #[allow(clippy::too_many_arguments)]
    pub fn alloc(
        tracker: &Arc<AllocationTracker>,
        event_type: EventType,
        flags: Flags,
        key: KeyCode,
        char_code: CharCode,
        char_set: CharSet,
        orig_char_code: OrigCharCode,
        orig_char_set: OrigCharSet,
        keyboard_type: KeyboardType,
        repeat: bool,
    ) -> Sole<Self> {
        Sole::new(Self {
            event_type,
            flags,
            key,
            char_code,
            char_set,
            orig_char_code,
            orig_char_set,
            keyboard_type,
            repeat,
            ex_iskeydown: event_type.is_key_down_or_modifier_down(key, flags),
            registration: Registration::new(tracker),
        })
    }

    /// Allocate a key event that carries no character translation
    pub fn alloc_without_chars(
        tracker: &Arc<AllocationTracker>,
        event_type: EventType,
        flags: Flags,
        key: KeyCode,
        keyboard_type: KeyboardType,
        repeat: bool,
    ) -> Sole<Self> {
        Self::alloc(
            tracker,
            event_type,
            flags,
            key,
            CharCode::default(),
            CharSet::default(),
            OrigCharCode::default(),
            OrigCharSet::default(),
            keyboard_type,
            repeat,
        )
    }

    /// Allocate an independent copy registered with the same tracker
    pub fn duplicate(&self) -> Sole<Self> {
        Self::alloc(
            self.registration.tracker(),
            self.event_type,
            self.flags,
            self.key,
            self.char_code,
            self.char_set,
            self.orig_char_code,
            self.orig_char_set,
            self.keyboard_type,
            self.repeat,
        )
    }

    /// Event type
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Active modifier flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Key code
    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// Translated character (zero when absent)
    pub fn char_code(&self) -> CharCode {
        self.char_code
    }

    /// Character set (zero when absent)
    pub fn char_set(&self) -> CharSet {
        self.char_set
    }

    /// Untranslated character (zero when absent)
    pub fn orig_char_code(&self) -> OrigCharCode {
        self.orig_char_code
    }

    /// Untranslated character set (zero when absent)
    pub fn orig_char_set(&self) -> OrigCharSet {
        self.orig_char_set
    }

    /// Keyboard type
    pub fn keyboard_type(&self) -> KeyboardType {
        self.keyboard_type
    }

    /// Auto-repeat flag
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// True when this event presses the key (or the modifier)
    pub fn ex_iskeydown(&self) -> bool {
        self.ex_iskeydown
    }

    /// Build the diagnostic line for a key event
    pub fn format_log(
        is_caught: bool,
        event_type: EventType,
        flags: Flags,
        key: KeyCode,
        keyboard_type: KeyboardType,
        repeat: bool,
    ) -> String {
        format!(
            "KeyboardEventCallback [{:>7}]: eventType {:2}, flags 0x{:08x}, key 0x{:04x}, kbdType {:3}, repeat = {}",
            caught_tag(is_caught),
            event_type.get(),
            flags.get(),
            key.get(),
            keyboard_type.get(),
            u8::from(repeat)
        )
    }

    /// Emit the diagnostic line for a key event
    pub fn log(
        is_caught: bool,
        event_type: EventType,
        flags: Flags,
        key: KeyCode,
        keyboard_type: KeyboardType,
        repeat: bool,
    ) {
        debug!(
            target: LOG_TARGET,
            "{}",
            Self::format_log(is_caught, event_type, flags, key, keyboard_type, repeat)
        );
    }

    /// Emit the diagnostic line for this record
    pub fn log_self(&self, is_caught: bool) {
        Self::log(
            is_caught,
            self.event_type,
            self.flags,
            self.key,
            self.keyboard_type,
            self.repeat,
        );
    }
}

impl PartialEq for KeyboardEventParams {
    fn eq(&self, other: &Self) -> bool {
        self.event_type == other.event_type
            && self.flags == other.flags
            && self.key == other.key
            && self.char_code == other.char_code
            && self.char_set == other.char_set
            && self.orig_char_code == other.orig_char_code
            && self.orig_char_set == other.orig_char_set
            && self.keyboard_type == other.keyboard_type
            && self.repeat == other.repeat
    }
}

/// A modifier-state update with no key attached
#[derive(Debug)]
pub struct FlagsUpdateParams {
    flags: Flags,
    registration: Registration,
}

impl FlagsUpdateParams {
    /// Allocate a flags update
    pub fn alloc(tracker: &Arc<AllocationTracker>, flags: Flags) -> Sole<Self> {
        Sole::new(Self {
            flags,
            registration: Registration::new(tracker),
        })
    }

    /// Allocate an independent copy registered with the same tracker
    pub fn duplicate(&self) -> Sole<Self> {
        Self::alloc(self.registration.tracker(), self.flags)
    }

    /// Active modifier flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Build the diagnostic line for a flags update
    pub fn format_log(is_caught: bool, flags: Flags) -> String {
        format!(
            "UpdateEventFlagsCallback [{:>7}]: flags 0x{:08x}",
            caught_tag(is_caught),
            flags.get()
        )
    }

    /// Emit the diagnostic line for a flags update
    pub fn log(is_caught: bool, flags: Flags) {
        debug!(target: LOG_TARGET, "{}", Self::format_log(is_caught, flags));
    }

    /// Emit the diagnostic line for this record
    pub fn log_self(&self, is_caught: bool) {
        Self::log(is_caught, self.flags);
    }
}

impl PartialEq for FlagsUpdateParams {
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags
    }
}
