//! Replay Scripts
//!
//! A script is a serialized list of events using plain numeric fields. It is
//! turned into parameter records through the regular factories, so a script
//! run exercises exactly the path live events take.
//!
//! ```json
//! { "events": [
//!     { "type": "key", "event": "down", "key": 0 },
//!     { "type": "wait", "milliseconds": 50 },
//!     { "type": "key", "event": "up", "key": 0 }
//! ] }
//! ```
//!
//! Files ending in `.toml` are parsed as TOML, anything else as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::params::{
    AllocationTracker, Buttons, CharCode, CharSet, ConsumerKeyCode, EventType, Fixed, Flags,
    FlagsUpdateParams, KeyCode, KeyboardEventParams, KeyboardType, OrigCharCode, OrigCharSet,
    Params, PointingButton, RelativePointerEventParams, ScrollDeltas, ScrollWheelEventParams,
    SpecialKeyEventParams, WaitParams, GUID_UNSET,
};

/// Script loading errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid TOML
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Key event direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Press
    Down,
    /// Release
    Up,
    /// Modifier change
    Modify,
}

impl From<KeyAction> for EventType {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::Down => EventType::Down,
            KeyAction::Up => EventType::Up,
            KeyAction::Modify => EventType::Modify,
        }
    }
}

/// Character translation of a key event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptChars {
    /// Translated character
    pub char_code: u32,
    /// Character set
    #[serde(default)]
    pub char_set: u32,
    /// Untranslated character
    #[serde(default)]
    pub orig_char_code: u32,
    /// Untranslated character set
    #[serde(default)]
    pub orig_char_set: u32,
}

/// One scripted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Regular key
    Key {
        /// Direction
        event: KeyAction,
        /// Key code
        key: u32,
        /// Modifier mask
        #[serde(default)]
        flags: u32,
        /// Character translation, absent for pure modifier events
        #[serde(default)]
        chars: Option<ScriptChars>,
        /// Keyboard type
        #[serde(default)]
        keyboard_type: u32,
        /// Auto-repeat
        #[serde(default)]
        repeat: bool,
    },
    /// Modifier mask update
    Flags {
        /// Modifier mask
        flags: u32,
    },
    /// Consumer key
    SpecialKey {
        /// Direction
        event: KeyAction,
        /// Consumer key code
        key: u32,
        /// Modifier mask
        #[serde(default)]
        flags: u32,
        /// Hardware flavor (defaults to the key code)
        #[serde(default)]
        flavor: Option<u32>,
        /// Device GUID (defaults to unset)
        #[serde(default)]
        guid: Option<u64>,
        /// Auto-repeat
        #[serde(default)]
        repeat: bool,
    },
    /// Pointer event with an already resolved transition
    Pointer {
        /// Button mask
        #[serde(default)]
        buttons: u32,
        /// Horizontal delta
        #[serde(default)]
        dx: i32,
        /// Vertical delta
        #[serde(default)]
        dy: i32,
        /// Transition button
        #[serde(default)]
        ex_button: u32,
        /// Transition direction
        #[serde(default)]
        ex_isbuttondown: bool,
    },
    /// Raw hardware pointer event, split into one record per transition
    HardwarePointer {
        /// Button mask before the event
        #[serde(default)]
        previous: u32,
        /// Button mask after the event
        #[serde(default)]
        buttons: u32,
        /// Horizontal delta
        #[serde(default)]
        dx: i32,
        /// Vertical delta
        #[serde(default)]
        dy: i32,
    },
    /// Scroll wheel
    Scroll {
        /// Line deltas
        #[serde(default)]
        delta_axis: [i16; 3],
        /// Fixed-point deltas (raw 16.16 bits)
        #[serde(default)]
        fixed_delta: [i32; 3],
        /// Pixel deltas
        #[serde(default)]
        point_delta: [i32; 3],
        /// Option bits
        #[serde(default)]
        options: i32,
    },
    /// Replay pause
    Wait {
        /// Pause length
        milliseconds: u32,
    },
}

impl ScriptEvent {
    /// Allocate the records this event stands for
    pub fn build(&self, tracker: &Arc<AllocationTracker>) -> Vec<Params> {
        match *self {
            ScriptEvent::Key {
                event,
                key,
                flags,
                chars,
                keyboard_type,
                repeat,
            } => {
                let record = match chars {
                    Some(c) => KeyboardEventParams::alloc(
                        tracker,
                        event.into(),
                        Flags::new(flags),
                        KeyCode::new(key),
                        CharCode::new(c.char_code),
                        CharSet::new(c.char_set),
                        OrigCharCode::new(c.orig_char_code),
                        OrigCharSet::new(c.orig_char_set),
                        KeyboardType::new(keyboard_type),
                        repeat,
                    ),
                    None => KeyboardEventParams::alloc_without_chars(
                        tracker,
                        event.into(),
                        Flags::new(flags),
                        KeyCode::new(key),
                        KeyboardType::new(keyboard_type),
                        repeat,
                    ),
                };
                vec![record.into()]
            }
            ScriptEvent::Flags { flags } => {
                vec![FlagsUpdateParams::alloc(tracker, Flags::new(flags)).into()]
            }
            ScriptEvent::SpecialKey {
                event,
                key,
                flags,
                flavor,
                guid,
                repeat,
            } => {
                let key = ConsumerKeyCode::new(key);
                let record = match (flavor, guid) {
                    (None, None) => SpecialKeyEventParams::alloc_without_guid(
                        tracker,
                        event.into(),
                        Flags::new(flags),
                        key,
                        repeat,
                    ),
                    (flavor, guid) => SpecialKeyEventParams::alloc(
                        tracker,
                        event.into(),
                        Flags::new(flags),
                        key,
                        flavor.unwrap_or(key.get()),
                        guid.unwrap_or(GUID_UNSET),
                        repeat,
                    ),
                };
                vec![record.into()]
            }
            ScriptEvent::Pointer {
                buttons,
                dx,
                dy,
                ex_button,
                ex_isbuttondown,
            } => vec![RelativePointerEventParams::alloc(
                tracker,
                Buttons::new(buttons),
                dx,
                dy,
                PointingButton::new(ex_button),
                ex_isbuttondown,
            )
            .into()],
            ScriptEvent::HardwarePointer {
                previous,
                buttons,
                dx,
                dy,
            } => RelativePointerEventParams::alloc_split(
                tracker,
                Buttons::new(previous),
                Buttons::new(buttons),
                dx,
                dy,
            )
            .into_iter()
            .map(Params::from)
            .collect(),
            ScriptEvent::Scroll {
                delta_axis,
                fixed_delta,
                point_delta,
                options,
            } => {
                let deltas = ScrollDeltas {
                    delta_axis,
                    fixed_delta: fixed_delta.map(Fixed::from_bits),
                    point_delta,
                    options,
                };
                vec![ScrollWheelEventParams::alloc(tracker, deltas).into()]
            }
            ScriptEvent::Wait { milliseconds } => {
                vec![WaitParams::alloc(tracker, milliseconds).into()]
            }
        }
    }
}

/// An ordered list of scripted events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Events, in replay order
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Load a script from a JSON or TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// Built-in sequence: a key tap with a pause, a volume key and a click
    pub fn demo() -> Self {
        Self {
            events: vec![
                ScriptEvent::Key {
                    event: KeyAction::Down,
                    key: KeyCode::A.get(),
                    flags: 0,
                    chars: None,
                    keyboard_type: 40,
                    repeat: false,
                },
                ScriptEvent::Wait { milliseconds: 50 },
                ScriptEvent::Key {
                    event: KeyAction::Up,
                    key: KeyCode::A.get(),
                    flags: 0,
                    chars: None,
                    keyboard_type: 40,
                    repeat: false,
                },
                ScriptEvent::SpecialKey {
                    event: KeyAction::Down,
                    key: ConsumerKeyCode::VOLUME_UP.get(),
                    flags: 0,
                    flavor: None,
                    guid: None,
                    repeat: false,
                },
                ScriptEvent::SpecialKey {
                    event: KeyAction::Up,
                    key: ConsumerKeyCode::VOLUME_UP.get(),
                    flags: 0,
                    flavor: None,
                    guid: None,
                    repeat: false,
                },
                ScriptEvent::HardwarePointer {
                    previous: 0,
                    buttons: PointingButton::LEFT.get(),
                    dx: 3,
                    dy: -2,
                },
                ScriptEvent::HardwarePointer {
                    previous: PointingButton::LEFT.get(),
                    buttons: 0,
                    dx: 0,
                    dy: 0,
                },
                ScriptEvent::Scroll {
                    delta_axis: [-1, 0, 0],
                    fixed_delta: [-65536, 0, 0],
                    point_delta: [-10, 0, 0],
                    options: 0,
                },
            ],
        }
    }

    /// Allocate every record, in order
    pub fn build(&self, tracker: &Arc<AllocationTracker>) -> Vec<Params> {
        self.events
            .iter()
            .flat_map(|event| event.build(tracker))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamsKind;
    use std::io::Write;

    #[test]
    fn test_parse_json() {
        let json = r#"{ "events": [
            { "type": "key", "event": "down", "key": 0, "chars": { "char_code": 97 } },
            { "type": "wait", "milliseconds": 50 },
            { "type": "special_key", "event": "up", "key": 7 },
            { "type": "pointer", "buttons": 1, "dx": 3, "dy": -2, "ex_button": 1, "ex_isbuttondown": true }
        ] }"#;

        let script: Script = serde_json::from_str(json).unwrap();
        assert_eq!(script.events.len(), 4);
        assert_eq!(script.events[1], ScriptEvent::Wait { milliseconds: 50 });

        let tracker = AllocationTracker::new();
        let records = script.build(&tracker);
        assert_eq!(records.len(), 4);

        let key = records[0].as_keyboard().unwrap();
        assert_eq!(key.char_code().get(), 97);
        assert!(key.ex_iskeydown());

        match &records[2] {
            Params::SpecialKey(p) => assert_eq!(p.guid(), GUID_UNSET),
            other => panic!("unexpected record {:?}", other.kind()),
        }
        match &records[3] {
            Params::RelativePointer(p) => {
                assert_eq!(p.ex_button(), PointingButton::LEFT);
                assert_eq!((p.dx(), p.dy()), (3, -2));
            }
            other => panic!("unexpected record {:?}", other.kind()),
        }
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[events]]
type = "flags"
flags = 131074

[[events]]
type = "scroll"
delta_axis = [1, 0, 0]
"#
        )
        .unwrap();

        let script = Script::load(file.path()).unwrap();
        let tracker = AllocationTracker::new();
        let kinds: Vec<_> = script.build(&tracker).iter().map(Params::kind).collect();
        assert_eq!(kinds, vec![ParamsKind::FlagsUpdate, ParamsKind::ScrollWheel]);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(Script::load(file.path()), Err(ScriptError::Json(_))));
    }

    #[test]
    fn test_hardware_pointer_splits() {
        let tracker = AllocationTracker::new();
        let event = ScriptEvent::HardwarePointer {
            previous: 0,
            buttons: 0b11,
            dx: 0,
            dy: 0,
        };
        assert_eq!(event.build(&tracker).len(), 2);
    }

    #[test]
    fn test_demo_builds_and_releases() {
        let tracker = AllocationTracker::new();
        let records = Script::demo().build(&tracker);
        assert!(records.len() >= Script::demo().events.len());
        assert_eq!(tracker.count(), records.len() as i64);

        drop(records);
        assert!(tracker.is_balanced());
    }
}
