//! Event Parameter Records
//!
//! Immutable, heap-allocated records describing every event the remapping
//! pipeline can deliver, plus the machinery that keeps their lifetimes honest.
//!
//! # Overview
//!
//! - **Records**: one type per event category. Fields are fixed at
//!   construction; derived fields (`ex_iskeydown`) are computed once.
//! - **[`Sole`]**: move-only owner of one boxed record. Records are handed
//!   through the call chain as pointers, never copied onto the stack.
//! - **[`AllocationTracker`]**: counts live records. Every record registers on
//!   construction and deregisters exactly once on drop.
//! - **[`Params`]**: the closed sum of all record kinds, as seen by the output
//!   queue.
//!
//! | Record | Category |
//! |---|---|
//! | [`KeyboardEventParams`] | regular key down / up / modifier change |
//! | [`FlagsUpdateParams`] | modifier mask update |
//! | [`SpecialKeyEventParams`] | consumer (media / system) key |
//! | [`RelativePointerEventParams`] | pointer motion and button transition |
//! | [`ScrollWheelEventParams`] | scroll wheel |
//! | [`WaitParams`] | synthetic pause between replayed records |
//!
//! # Example
//!
//! ```rust
//! use keyshift::params::{
//!     AllocationTracker, EventType, Flags, KeyCode, KeyboardEventParams, KeyboardType, Params,
//!     WaitParams,
//! };
//!
//! let tracker = AllocationTracker::new();
//!
//! let mut down = KeyboardEventParams::alloc_without_chars(
//!     &tracker,
//!     EventType::Down,
//!     Flags::NONE,
//!     KeyCode::A,
//!     KeyboardType::new(40),
//!     false,
//! );
//! assert!(down.ex_iskeydown());
//!
//! // Transfer leaves the source empty
//! let moved = down.take();
//! assert!(down.is_empty());
//!
//! let sequence: Vec<Params> = vec![moved.into(), WaitParams::alloc(&tracker, 50).into()];
//! assert_eq!(tracker.count(), 2);
//!
//! drop(sequence);
//! assert!(tracker.is_balanced());
//! ```
//!
//! # Diagnostics
//!
//! Each record type has a static `log` taking the raw fields and a
//! caught / sending flag. The interception point logs "caught", the output
//! queue logs "sending". Line layouts are fixed so traces compare across runs.

pub mod error;
pub mod keyboard;
pub mod pointing;
pub mod sole;
pub mod special;
pub mod tracker;
pub mod types;
pub mod wait;

pub use error::{ParamsError, Result};
pub use keyboard::{FlagsUpdateParams, KeyboardEventParams};
pub use pointing::{RelativePointerEventParams, ScrollDeltas, ScrollWheelEventParams};
pub use sole::Sole;
pub use special::{SpecialKeyEventParams, GUID_UNSET};
pub use tracker::{AllocationTracker, Registration, TrackerStats};
pub use types::{
    Buttons, CharCode, CharSet, ConsumerKeyCode, EventType, Fixed, Flags, KeyCode, KeyboardType,
    ModifierFlag, OrigCharCode, OrigCharSet, PointingButton,
};
pub use wait::WaitParams;

/// Tracing target for keyboard, flags, consumer key and wait lines
pub const LOG_TARGET: &str = "keyshift::params";

/// Tracing target for pointer and scroll lines
pub const POINTING_LOG_TARGET: &str = "keyshift::params::pointing";

pub(crate) fn caught_tag(is_caught: bool) -> &'static str {
    if is_caught {
        "caught"
    } else {
        "sending"
    }
}

/// Record kind, without the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsKind {
    /// [`KeyboardEventParams`]
    Keyboard,
    /// [`FlagsUpdateParams`]
    FlagsUpdate,
    /// [`SpecialKeyEventParams`]
    SpecialKey,
    /// [`RelativePointerEventParams`]
    RelativePointer,
    /// [`ScrollWheelEventParams`]
    ScrollWheel,
    /// [`WaitParams`]
    Wait,
}

/// Any record, owned
///
/// This is the unit the output queue accepts and replays.
#[derive(Debug)]
pub enum Params {
    /// Regular key event
    Keyboard(Sole<KeyboardEventParams>),
    /// Modifier mask update
    FlagsUpdate(Sole<FlagsUpdateParams>),
    /// Consumer key event
    SpecialKey(Sole<SpecialKeyEventParams>),
    /// Pointer event
    RelativePointer(Sole<RelativePointerEventParams>),
    /// Scroll wheel event
    ScrollWheel(Sole<ScrollWheelEventParams>),
    /// Replay pause
    Wait(Sole<WaitParams>),
}

impl Params {
    /// Record kind
    pub fn kind(&self) -> ParamsKind {
        match self {
            Params::Keyboard(_) => ParamsKind::Keyboard,
            Params::FlagsUpdate(_) => ParamsKind::FlagsUpdate,
            Params::SpecialKey(_) => ParamsKind::SpecialKey,
            Params::RelativePointer(_) => ParamsKind::RelativePointer,
            Params::ScrollWheel(_) => ParamsKind::ScrollWheel,
            Params::Wait(_) => ParamsKind::Wait,
        }
    }

    /// True when the handle inside has been transferred away
    pub fn is_empty(&self) -> bool {
        match self {
            Params::Keyboard(p) => p.is_empty(),
            Params::FlagsUpdate(p) => p.is_empty(),
            Params::SpecialKey(p) => p.is_empty(),
            Params::RelativePointer(p) => p.is_empty(),
            Params::ScrollWheel(p) => p.is_empty(),
            Params::Wait(p) => p.is_empty(),
        }
    }

    /// Allocate an independent copy of the record
    ///
    /// Fails with [`ParamsError::EmptyHandle`] when the handle is empty.
    pub fn duplicate(&self) -> Result<Params> {
        Ok(match self {
            Params::Keyboard(p) => Params::Keyboard(p.try_get()?.duplicate()),
            Params::FlagsUpdate(p) => Params::FlagsUpdate(p.try_get()?.duplicate()),
            Params::SpecialKey(p) => Params::SpecialKey(p.try_get()?.duplicate()),
            Params::RelativePointer(p) => Params::RelativePointer(p.try_get()?.duplicate()),
            Params::ScrollWheel(p) => Params::ScrollWheel(p.try_get()?.duplicate()),
            Params::Wait(p) => Params::Wait(p.try_get()?.duplicate()),
        })
    }

    /// Emit the record's diagnostic line
    ///
    /// Fails with [`ParamsError::EmptyHandle`] when the handle is empty.
    pub fn log(&self, is_caught: bool) -> Result<()> {
        match self {
            Params::Keyboard(p) => p.try_get()?.log_self(is_caught),
            Params::FlagsUpdate(p) => p.try_get()?.log_self(is_caught),
            Params::SpecialKey(p) => p.try_get()?.log_self(is_caught),
            Params::RelativePointer(p) => p.try_get()?.log_self(is_caught),
            Params::ScrollWheel(p) => p.try_get()?.log_self(is_caught),
            Params::Wait(p) => p.try_get()?.log_self(is_caught),
        }
        Ok(())
    }

    /// Wait record, if this is one
    pub fn as_wait(&self) -> Option<&WaitParams> {
        match self {
            Params::Wait(p) => p.get(),
            _ => None,
        }
    }

    /// Keyboard record, if this is one
    pub fn as_keyboard(&self) -> Option<&KeyboardEventParams> {
        match self {
            Params::Keyboard(p) => p.get(),
            _ => None,
        }
    }
}

impl From<Sole<KeyboardEventParams>> for Params {
    fn from(p: Sole<KeyboardEventParams>) -> Self {
        Params::Keyboard(p)
    }
}

impl From<Sole<FlagsUpdateParams>> for Params {
    fn from(p: Sole<FlagsUpdateParams>) -> Self {
        Params::FlagsUpdate(p)
    }
}

impl From<Sole<SpecialKeyEventParams>> for Params {
    fn from(p: Sole<SpecialKeyEventParams>) -> Self {
        Params::SpecialKey(p)
    }
}

impl From<Sole<RelativePointerEventParams>> for Params {
    fn from(p: Sole<RelativePointerEventParams>) -> Self {
        Params::RelativePointer(p)
    }
}

impl From<Sole<ScrollWheelEventParams>> for Params {
    fn from(p: Sole<ScrollWheelEventParams>) -> Self {
        Params::ScrollWheel(p)
    }
}

impl From<Sole<WaitParams>> for Params {
    fn from(p: Sole<WaitParams>) -> Self {
        Params::Wait(p)
    }
}
