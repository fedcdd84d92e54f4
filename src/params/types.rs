//! Event Field Value Types
//!
//! Strongly typed wrappers for the raw values carried by parameter records.
//! Numeric values match the host input system so records can be converted
//! back to driver events without translation tables.

use std::fmt;
use std::ops::{BitAnd, BitOr};

macro_rules! value_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw value
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Raw value
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Keyboard event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventType {
    /// Key pressed
    Down = 10,
    /// Key released
    Up = 11,
    /// Modifier state changed (modifier key pressed or released)
    Modify = 12,
}

impl EventType {
    /// Raw host event code
    pub const fn get(self) -> u32 {
        self as u32
    }

    /// Parse a raw host event code
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            10 => Some(EventType::Down),
            11 => Some(EventType::Up),
            12 => Some(EventType::Modify),
            _ => None,
        }
    }

    /// Whether an event of this type for `key` under `flags` is a press
    ///
    /// `Modify` events carry no direction of their own: the modifier key is
    /// down when its flag is set in `flags`. A `Modify` for a non-modifier key
    /// is never a press.
    pub fn is_key_down_or_modifier_down(self, key: KeyCode, flags: Flags) -> bool {
        match self {
            EventType::Down => true,
            EventType::Up => false,
            EventType::Modify => key
                .modifier_flag()
                .map(|flag| flags.is_on(flag))
                .unwrap_or(false),
        }
    }
}

/// One modifier bit pattern
///
/// Each modifier sets a device-independent bit plus a device-dependent bit
/// identifying the left or right key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierFlag(u32);

impl ModifierFlag {
    /// Caps Lock
    pub const CAPSLOCK: Self = Self(0x0001_0000);
    /// Left Shift
    pub const SHIFT_L: Self = Self(0x0002_0002);
    /// Right Shift
    pub const SHIFT_R: Self = Self(0x0002_0004);
    /// Left Control
    pub const CONTROL_L: Self = Self(0x0004_0001);
    /// Right Control
    pub const CONTROL_R: Self = Self(0x0004_2000);
    /// Left Option
    pub const OPTION_L: Self = Self(0x0008_0020);
    /// Right Option
    pub const OPTION_R: Self = Self(0x0008_0040);
    /// Left Command
    pub const COMMAND_L: Self = Self(0x0010_0008);
    /// Right Command
    pub const COMMAND_R: Self = Self(0x0010_0010);
    /// Key is on the numeric keypad
    pub const NUMPAD: Self = Self(0x0020_0000);
    /// Fn
    pub const FN: Self = Self(0x0080_0000);

    /// Raw mask
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Active modifier mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    /// No modifiers
    pub const NONE: Self = Self(0);

    /// Wrap a raw mask
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw mask
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True when every bit of `flag` is set
    pub fn is_on(self, flag: ModifierFlag) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Mask with `flag` added
    pub fn add(self, flag: ModifierFlag) -> Self {
        Self(self.0 | flag.0)
    }

    /// Mask with every bit of `flag` cleared
    pub fn remove(self, flag: ModifierFlag) -> Self {
        Self(self.0 & !flag.0)
    }
}

impl From<ModifierFlag> for Flags {
    fn from(flag: ModifierFlag) -> Self {
        Self(flag.0)
    }
}

impl BitOr<ModifierFlag> for Flags {
    type Output = Flags;

    fn bitor(self, rhs: ModifierFlag) -> Flags {
        self.add(rhs)
    }
}

impl BitOr for ModifierFlag {
    type Output = Flags;

    fn bitor(self, rhs: ModifierFlag) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

value_type!(
    /// Virtual key code of a regular keyboard key
    KeyCode
);

impl KeyCode {
    /// A
    pub const A: Self = Self(0x00);
    /// S
    pub const S: Self = Self(0x01);
    /// D
    pub const D: Self = Self(0x02);
    /// F
    pub const F: Self = Self(0x03);
    /// H
    pub const H: Self = Self(0x04);
    /// J
    pub const J: Self = Self(0x26);
    /// K
    pub const K: Self = Self(0x28);
    /// L
    pub const L: Self = Self(0x25);
    /// Return
    pub const RETURN: Self = Self(0x24);
    /// Tab
    pub const TAB: Self = Self(0x30);
    /// Space
    pub const SPACE: Self = Self(0x31);
    /// Delete (backspace)
    pub const DELETE: Self = Self(0x33);
    /// Escape
    pub const ESCAPE: Self = Self(0x35);
    /// Right Command
    pub const COMMAND_R: Self = Self(0x36);
    /// Left Command
    pub const COMMAND_L: Self = Self(0x37);
    /// Left Shift
    pub const SHIFT_L: Self = Self(0x38);
    /// Caps Lock
    pub const CAPSLOCK: Self = Self(0x39);
    /// Left Option
    pub const OPTION_L: Self = Self(0x3a);
    /// Left Control
    pub const CONTROL_L: Self = Self(0x3b);
    /// Right Shift
    pub const SHIFT_R: Self = Self(0x3c);
    /// Right Option
    pub const OPTION_R: Self = Self(0x3d);
    /// Right Control
    pub const CONTROL_R: Self = Self(0x3e);
    /// Fn
    pub const FN: Self = Self(0x3f);

    /// Modifier flag held while this key is down, if it is a modifier key
    pub fn modifier_flag(self) -> Option<ModifierFlag> {
        match self {
            KeyCode::CAPSLOCK => Some(ModifierFlag::CAPSLOCK),
            KeyCode::SHIFT_L => Some(ModifierFlag::SHIFT_L),
            KeyCode::SHIFT_R => Some(ModifierFlag::SHIFT_R),
            KeyCode::CONTROL_L => Some(ModifierFlag::CONTROL_L),
            KeyCode::CONTROL_R => Some(ModifierFlag::CONTROL_R),
            KeyCode::OPTION_L => Some(ModifierFlag::OPTION_L),
            KeyCode::OPTION_R => Some(ModifierFlag::OPTION_R),
            KeyCode::COMMAND_L => Some(ModifierFlag::COMMAND_L),
            KeyCode::COMMAND_R => Some(ModifierFlag::COMMAND_R),
            KeyCode::FN => Some(ModifierFlag::FN),
            _ => None,
        }
    }

    /// True for modifier keys
    pub fn is_modifier(self) -> bool {
        self.modifier_flag().is_some()
    }
}

value_type!(
    /// Key code of a consumer (media / system) key
    ConsumerKeyCode
);

impl ConsumerKeyCode {
    /// Volume up
    pub const VOLUME_UP: Self = Self(0);
    /// Volume down
    pub const VOLUME_DOWN: Self = Self(1);
    /// Brightness up
    pub const BRIGHTNESS_UP: Self = Self(2);
    /// Brightness down
    pub const BRIGHTNESS_DOWN: Self = Self(3);
    /// Caps Lock delivered as a consumer key
    pub const CAPSLOCK: Self = Self(4);
    /// Help
    pub const HELP: Self = Self(5);
    /// Power
    pub const POWER: Self = Self(6);
    /// Mute
    pub const VOLUME_MUTE: Self = Self(7);
    /// Num Lock
    pub const NUMLOCK: Self = Self(10);
    /// Eject
    pub const EJECT: Self = Self(14);
    /// Play / pause
    pub const MUSIC_PLAY: Self = Self(16);
    /// Next track
    pub const MUSIC_NEXT: Self = Self(17);
    /// Previous track
    pub const MUSIC_PREV: Self = Self(18);
    /// Fast forward
    pub const MUSIC_FAST: Self = Self(19);
    /// Rewind
    pub const MUSIC_REWIND: Self = Self(20);
    /// Keyboard backlight up
    pub const KEYBOARDLIGHT_HIGH: Self = Self(21);
    /// Keyboard backlight down
    pub const KEYBOARDLIGHT_LOW: Self = Self(22);
    /// Keyboard backlight toggle
    pub const KEYBOARDLIGHT_OFF: Self = Self(23);
}

value_type!(
    /// Translated character
    CharCode
);

value_type!(
    /// Character set of [`CharCode`]
    CharSet
);

value_type!(
    /// Character before dead-key / layout translation
    OrigCharCode
);

value_type!(
    /// Character set of [`OrigCharCode`]
    OrigCharSet
);

value_type!(
    /// Hardware keyboard type identifier
    KeyboardType
);

/// A single pointing-device button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PointingButton(u32);

impl PointingButton {
    /// No button
    pub const NONE: Self = Self(0);
    /// Left
    pub const LEFT: Self = Self(1 << 0);
    /// Right
    pub const RIGHT: Self = Self(1 << 1);
    /// Middle
    pub const MIDDLE: Self = Self(1 << 2);
    /// Button 4
    pub const BUTTON4: Self = Self(1 << 3);
    /// Button 5
    pub const BUTTON5: Self = Self(1 << 4);
    /// Button 6
    pub const BUTTON6: Self = Self(1 << 5);
    /// Button 7
    pub const BUTTON7: Self = Self(1 << 6);
    /// Button 8
    pub const BUTTON8: Self = Self(1 << 7);

    /// Wrap a raw single-bit value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw value
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Button mask of a pointing device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u32);

impl Buttons {
    /// Nothing pressed
    pub const NONE: Self = Self(0);

    /// Wrap a raw mask
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw mask
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True when `button` is pressed
    pub fn is_on(self, button: PointingButton) -> bool {
        button.0 != 0 && (self.0 & button.0) == button.0
    }

    /// Mask with `button` pressed
    pub fn add(self, button: PointingButton) -> Self {
        Self(self.0 | button.0)
    }

    /// Mask with `button` released
    pub fn remove(self, button: PointingButton) -> Self {
        Self(self.0 & !button.0)
    }

    /// Buttons whose state differs from `previous`, lowest bit first
    ///
    /// Each entry is the button and whether it is now pressed.
    pub fn transitions(self, previous: Buttons) -> impl Iterator<Item = (PointingButton, bool)> {
        let changed = self.0 ^ previous.0;
        let current = self.0;
        (0..u32::BITS)
            .map(|bit| 1u32 << bit)
            .filter(move |mask| changed & mask != 0)
            .map(move |mask| (PointingButton(mask), current & mask != 0))
    }
}

impl From<PointingButton> for Buttons {
    fn from(button: PointingButton) -> Self {
        Self(button.0)
    }
}

impl BitOr<PointingButton> for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: PointingButton) -> Buttons {
        self.add(rhs)
    }
}

impl BitAnd<PointingButton> for Buttons {
    type Output = bool;

    fn bitand(self, rhs: PointingButton) -> bool {
        self.is_on(rhs)
    }
}

/// 16.16 fixed-point value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fixed(i32);

impl Fixed {
    /// Fixed-point one
    pub const ONE: Self = Self(1 << 16);

    /// Wrap raw fixed-point bits
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Raw fixed-point bits
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Convert from floating point, saturating at the i32 range
    pub fn from_f64(value: f64) -> Self {
        Self((value * 65536.0).round() as i32)
    }

    /// Convert to floating point
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }
}
