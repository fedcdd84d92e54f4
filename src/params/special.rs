//! Consumer Key Parameter Records
//!
//! Media and system keys (volume, brightness, eject, ...), which the host
//! delivers on a separate path from regular keys.

use std::sync::Arc;
use tracing::debug;

use crate::params::sole::Sole;
use crate::params::tracker::{AllocationTracker, Registration};
use crate::params::types::{ConsumerKeyCode, EventType, Flags};
use crate::params::{caught_tag, LOG_TARGET};

/// GUID value meaning "no GUID was supplied"
pub const GUID_UNSET: u64 = u64::MAX;

/// A consumer key event
#[derive(Debug)]
pub struct SpecialKeyEventParams {
    event_type: EventType,
    flags: Flags,
    key: ConsumerKeyCode,
    flavor: u32,
    guid: u64,
    repeat: bool,
    ex_iskeydown: bool,
    registration: Registration,
}

impl SpecialKeyEventParams {
    /// Allocate a consumer key event with explicit flavor and GUID
    pub fn alloc(
        tracker: &Arc<AllocationTracker>,
        event_type: EventType,
        flags: Flags,
        key: ConsumerKeyCode,
        flavor: u32,
        guid: u64,
        repeat: bool,
    ) -> Sole<Self> {
        Sole::new(Self {
            event_type,
            flags,
            key,
            flavor,
            guid,
            repeat,
            ex_iskeydown: event_type == EventType::Down,
            registration: Registration::new(tracker),
        })
    }

    /// Allocate a consumer key event without hardware details
    ///
    /// The flavor is the key code itself and the GUID is [`GUID_UNSET`].
    pub fn alloc_without_guid(
        tracker: &Arc<AllocationTracker>,
        event_type: EventType,
        flags: Flags,
        key: ConsumerKeyCode,
        repeat: bool,
    ) -> Sole<Self> {
        Self::alloc(tracker, event_type, flags, key, key.get(), GUID_UNSET, repeat)
    }

    /// Allocate an independent copy registered with the same tracker
    pub fn duplicate(&self) -> Sole<Self> {
        Self::alloc(
            self.registration.tracker(),
            self.event_type,
            self.flags,
            self.key,
            self.flavor,
            self.guid,
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

    /// Consumer key code
    pub fn key(&self) -> ConsumerKeyCode {
        self.key
    }

    /// Hardware flavor
    pub fn flavor(&self) -> u32 {
        self.flavor
    }

    /// Device GUID, [`GUID_UNSET`] when unknown
    pub fn guid(&self) -> u64 {
        self.guid
    }

    /// True when a GUID was supplied
    pub fn has_guid(&self) -> bool {
        self.guid != GUID_UNSET
    }

    /// Auto-repeat flag
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// True for `Down` events
    pub fn ex_iskeydown(&self) -> bool {
        self.ex_iskeydown
    }

    /// Build the diagnostic line for a consumer key event
    ///
    /// The GUID is printed as a signed value, so [`GUID_UNSET`] shows as -1.
    pub fn format_log(
        is_caught: bool,
        event_type: EventType,
        flags: Flags,
        key: ConsumerKeyCode,
        flavor: u32,
        guid: u64,
        repeat: bool,
    ) -> String {
        format!(
            "KeyboardSpecialEventCallBack [{:>7}]: eventType {:2}, flags 0x{:08x}, key 0x{:04x}, flavor {:4}, guid {}, repeat = {}",
            caught_tag(is_caught),
            event_type.get(),
            flags.get(),
            key.get(),
            flavor,
            guid as i64,
            u8::from(repeat)
        )
    }

    /// Emit the diagnostic line for a consumer key event
    pub fn log(
        is_caught: bool,
        event_type: EventType,
        flags: Flags,
        key: ConsumerKeyCode,
        flavor: u32,
        guid: u64,
        repeat: bool,
    ) {
        debug!(
            target: LOG_TARGET,
            "{}",
            Self::format_log(is_caught, event_type, flags, key, flavor, guid, repeat)
        );
    }

    /// Emit the diagnostic line for this record
    pub fn log_self(&self, is_caught: bool) {
        Self::log(
            is_caught,
            self.event_type,
            self.flags,
            self.key,
            self.flavor,
            self.guid,
            self.repeat,
        );
    }
}

impl PartialEq for SpecialKeyEventParams {
    fn eq(&self, other: &Self) -> bool {
        self.event_type == other.event_type
            && self.flags == other.flags
            && self.key == other.key
            && self.flavor == other.flavor
            && self.guid == other.guid
            && self.repeat == other.repeat
    }
}
