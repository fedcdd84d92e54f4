//! Pointing Device Parameter Records
//!
//! Relative pointer motion / button events and scroll wheel events. Their log
//! lines go to the pointing target so motion noise can be filtered on its own.

use std::sync::Arc;
use tracing::debug;

use crate::params::sole::Sole;
use crate::params::tracker::{AllocationTracker, Registration};
use crate::params::types::{Buttons, Fixed, PointingButton};
use crate::params::{caught_tag, POINTING_LOG_TARGET};

/// A relative pointer event
///
/// A hardware pointer event may change several buttons at once. Downstream
/// consumers see one record per change: `ex_button` is the single button that
/// was just pressed or released and `ex_isbuttondown` says which. `buttons`
/// keeps the full current mask. The record carries these values as given and
/// never recomputes them.
#[derive(Debug)]
pub struct RelativePointerEventParams {
    buttons: Buttons,
    dx: i32,
    dy: i32,
    ex_button: PointingButton,
    ex_isbuttondown: bool,
    registration: Registration,
}

impl RelativePointerEventParams {
    /// Allocate a relative pointer event
    pub fn alloc(
        tracker: &Arc<AllocationTracker>,
        buttons: Buttons,
        dx: i32,
        dy: i32,
        ex_button: PointingButton,
        ex_isbuttondown: bool,
    ) -> Sole<Self> {
        Sole::new(Self {
            buttons,
            dx,
            dy,
            ex_button,
            ex_isbuttondown,
            registration: Registration::new(tracker),
        })
    }

    /// Split one hardware event into records with at most one transition each
    ///
    /// Motion comes first as a record with `ex_button == NONE`, followed by one
    /// motionless record per changed button (lowest bit first). A hardware
    /// event with no motion and no change still yields one record.
    pub fn alloc_split(
        tracker: &Arc<AllocationTracker>,
        previous: Buttons,
        buttons: Buttons,
        dx: i32,
        dy: i32,
    ) -> Vec<Sole<Self>> {
        let mut records = Vec::new();

        if dx != 0 || dy != 0 {
            records.push(Self::alloc(
                tracker,
                previous,
                dx,
                dy,
                PointingButton::NONE,
                false,
            ));
        }

        // Each record's mask reflects the transitions applied so far
        let mut current = previous;
        for (button, pressed) in buttons.transitions(previous) {
            current = if pressed {
                current.add(button)
            } else {
                current.remove(button)
            };
            records.push(Self::alloc(tracker, current, 0, 0, button, pressed));
        }

        if records.is_empty() {
            records.push(Self::alloc(
                tracker,
                buttons,
                0,
                0,
                PointingButton::NONE,
                false,
            ));
        }

        records
    }

    /// Allocate an independent copy registered with the same tracker
    pub fn duplicate(&self) -> Sole<Self> {
        Self::alloc(
            self.registration.tracker(),
            self.buttons,
            self.dx,
            self.dy,
            self.ex_button,
            self.ex_isbuttondown,
        )
    }

    /// Full current button mask
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Horizontal delta
    pub fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical delta
    pub fn dy(&self) -> i32 {
        self.dy
    }

    /// Button that changed, `NONE` for pure motion
    pub fn ex_button(&self) -> PointingButton {
        self.ex_button
    }

    /// Whether `ex_button` is now pressed
    pub fn ex_isbuttondown(&self) -> bool {
        self.ex_isbuttondown
    }

    /// Build the diagnostic line for a pointer event
    pub fn format_log(is_caught: bool, buttons: Buttons, dx: i32, dy: i32) -> String {
        format!(
            "RelativePointerEventCallBack [{:>7}]: buttons: 0x{:08x}, dx: {:3}, dy: {:3}",
            caught_tag(is_caught),
            buttons.get(),
            dx,
            dy
        )
    }

    /// Emit the diagnostic line for a pointer event
    pub fn log(is_caught: bool, buttons: Buttons, dx: i32, dy: i32) {
        debug!(
            target: POINTING_LOG_TARGET,
            "{}",
            Self::format_log(is_caught, buttons, dx, dy)
        );
    }

    /// Emit the diagnostic line for this record
    pub fn log_self(&self, is_caught: bool) {
        Self::log(is_caught, self.buttons, self.dx, self.dy);
    }
}

impl PartialEq for RelativePointerEventParams {
    fn eq(&self, other: &Self) -> bool {
        self.buttons == other.buttons
            && self.dx == other.dx
            && self.dy == other.dy
            && self.ex_button == other.ex_button
            && self.ex_isbuttondown == other.ex_isbuttondown
    }
}

/// Raw scroll values of one wheel event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollDeltas {
    /// Line deltas per axis (vertical, horizontal, depth)
    pub delta_axis: [i16; 3],
    /// Fixed-point deltas per axis
    pub fixed_delta: [Fixed; 3],
    /// Pixel deltas per axis
    pub point_delta: [i32; 3],
    /// Option bits (continuous scrolling, momentum phase, ...)
    pub options: i32,
}

impl ScrollDeltas {
    /// Vertical-only scroll of `lines`, with matching fixed and point deltas
    pub fn vertical(lines: i16) -> Self {
        Self {
            delta_axis: [lines, 0, 0],
            fixed_delta: [
                Fixed::from_bits(i32::from(lines) << 16),
                Fixed::default(),
                Fixed::default(),
            ],
            point_delta: [i32::from(lines) * 10, 0, 0],
            options: 0,
        }
    }
}

/// A scroll wheel event
#[derive(Debug)]
pub struct ScrollWheelEventParams {
    deltas: ScrollDeltas,
    registration: Registration,
}

impl ScrollWheelEventParams {
    /// Allocate a scroll wheel event
    pub fn alloc(tracker: &Arc<AllocationTracker>, deltas: ScrollDeltas) -> Sole<Self> {
        Sole::new(Self {
            deltas,
            registration: Registration::new(tracker),
        })
    }

    /// Allocate an independent copy registered with the same tracker
    pub fn duplicate(&self) -> Sole<Self> {
        Self::alloc(self.registration.tracker(), self.deltas)
    }

    /// All scroll values
    pub fn deltas(&self) -> ScrollDeltas {
        self.deltas
    }

    /// Line delta of axis 1 (vertical)
    pub fn delta_axis1(&self) -> i16 {
        self.deltas.delta_axis[0]
    }

    /// Line delta of axis 2 (horizontal)
    pub fn delta_axis2(&self) -> i16 {
        self.deltas.delta_axis[1]
    }

    /// Line delta of axis 3
    pub fn delta_axis3(&self) -> i16 {
        self.deltas.delta_axis[2]
    }

    /// Fixed-point delta of axis 1
    pub fn fixed_delta1(&self) -> Fixed {
        self.deltas.fixed_delta[0]
    }

    /// Fixed-point delta of axis 2
    pub fn fixed_delta2(&self) -> Fixed {
        self.deltas.fixed_delta[1]
    }

    /// Fixed-point delta of axis 3
    pub fn fixed_delta3(&self) -> Fixed {
        self.deltas.fixed_delta[2]
    }

    /// Pixel delta of axis 1
    pub fn point_delta1(&self) -> i32 {
        self.deltas.point_delta[0]
    }

    /// Pixel delta of axis 2
    pub fn point_delta2(&self) -> i32 {
        self.deltas.point_delta[1]
    }

    /// Pixel delta of axis 3
    pub fn point_delta3(&self) -> i32 {
        self.deltas.point_delta[2]
    }

    /// Option bits
    pub fn options(&self) -> i32 {
        self.deltas.options
    }

    /// Build the diagnostic line for a scroll event
    pub fn format_log(is_caught: bool, deltas: &ScrollDeltas) -> String {
        let [a1, a2, a3] = deltas.delta_axis;
        let [f1, f2, f3] = deltas.fixed_delta;
        let [p1, p2, p3] = deltas.point_delta;
        format!(
            "ScrollWheelEventCallback [{:>7}]: deltaAxis({},{},{}), fixedDelta({},{},{}), pointDelta({},{},{}), options: {}",
            caught_tag(is_caught),
            a1,
            a2,
            a3,
            f1.get(),
            f2.get(),
            f3.get(),
            p1,
            p2,
            p3,
            deltas.options
        )
    }

    /// Emit the diagnostic line for a scroll event
    pub fn log(is_caught: bool, deltas: &ScrollDeltas) {
        debug!(
            target: POINTING_LOG_TARGET,
            "{}",
            Self::format_log(is_caught, deltas)
        );
    }

    /// Emit the diagnostic line for this record
    pub fn log_self(&self, is_caught: bool) {
        Self::log(is_caught, &self.deltas);
    }
}

impl PartialEq for ScrollWheelEventParams {
    fn eq(&self, other: &Self) -> bool {
        self.deltas == other.deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_is_pure_carrier() {
        let tracker = AllocationTracker::new();
        let p = RelativePointerEventParams::alloc(
            &tracker,
            Buttons::new(0x01),
            3,
            -2,
            PointingButton::LEFT,
            true,
        );

        assert_eq!(p.buttons().get(), 0x01);
        assert_eq!(p.dx(), 3);
        assert_eq!(p.dy(), -2);
        assert_eq!(p.ex_button(), PointingButton::LEFT);
        assert!(p.ex_isbuttondown());
    }

    #[test]
    fn test_pointer_carries_inconsistent_values_unchanged() {
        let tracker = AllocationTracker::new();
        // Mask says nothing pressed, transition says right pressed: kept as-is
        let p = RelativePointerEventParams::alloc(
            &tracker,
            Buttons::NONE,
            0,
            0,
            PointingButton::RIGHT,
            true,
        );
        assert_eq!(p.buttons(), Buttons::NONE);
        assert_eq!(p.ex_button(), PointingButton::RIGHT);
    }

    #[test]
    fn test_split_motion_and_transitions() {
        let tracker = AllocationTracker::new();
        let previous = Buttons::from(PointingButton::LEFT);
        let current = Buttons::from(PointingButton::RIGHT);

        let records = RelativePointerEventParams::alloc_split(&tracker, previous, current, 5, 1);
        assert_eq!(records.len(), 3);
        assert_eq!(tracker.count(), 3);

        assert_eq!(records[0].ex_button(), PointingButton::NONE);
        assert_eq!((records[0].dx(), records[0].dy()), (5, 1));
        assert_eq!(records[0].buttons(), previous);

        assert_eq!(records[1].ex_button(), PointingButton::LEFT);
        assert!(!records[1].ex_isbuttondown());
        assert_eq!(records[1].buttons(), Buttons::NONE);

        assert_eq!(records[2].ex_button(), PointingButton::RIGHT);
        assert!(records[2].ex_isbuttondown());
        assert_eq!(records[2].buttons(), current);
        assert_eq!((records[2].dx(), records[2].dy()), (0, 0));

        drop(records);
        assert!(tracker.is_balanced());
    }

    #[test]
    fn test_split_without_change_yields_one_record() {
        let tracker = AllocationTracker::new();
        let held = Buttons::from(PointingButton::MIDDLE);
        let records = RelativePointerEventParams::alloc_split(&tracker, held, held, 0, 0);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].buttons(), held);
        assert_eq!(records[0].ex_button(), PointingButton::NONE);
    }

    #[test]
    fn test_pointer_log_format() {
        assert_eq!(
            RelativePointerEventParams::format_log(false, Buttons::new(0x01), 3, -2),
            "RelativePointerEventCallBack [sending]: buttons: 0x00000001, dx:   3, dy:  -2"
        );
        assert_eq!(
            RelativePointerEventParams::format_log(true, Buttons::NONE, 1200, 0),
            "RelativePointerEventCallBack [ caught]: buttons: 0x00000000, dx: 1200, dy:   0"
        );
    }

    #[test]
    fn test_scroll_fields_and_duplicate() {
        let tracker = AllocationTracker::new();
        let deltas = ScrollDeltas {
            delta_axis: [-1, 2, 0],
            fixed_delta: [
                Fixed::from_bits(-65536),
                Fixed::from_bits(131072),
                Fixed::default(),
            ],
            point_delta: [-10, 20, 0],
            options: 3,
        };
        let p = ScrollWheelEventParams::alloc(&tracker, deltas);
        let copy = p.duplicate();
        drop(p);

        assert_eq!(copy.delta_axis1(), -1);
        assert_eq!(copy.delta_axis2(), 2);
        assert_eq!(copy.fixed_delta1().get(), -65536);
        assert_eq!(copy.point_delta2(), 20);
        assert_eq!(copy.options(), 3);
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn test_scroll_log_format() {
        let deltas = ScrollDeltas::vertical(-1);
        assert_eq!(
            ScrollWheelEventParams::format_log(false, &deltas),
            "ScrollWheelEventCallback [sending]: deltaAxis(-1,0,0), fixedDelta(-65536,0,0), pointDelta(-10,0,0), options: 0"
        );
    }
}
