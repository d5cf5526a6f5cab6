//! Outside-interaction detection.
//!
//! The detector is registered once with a boundary and an armed flag. The flag may
//! flip between events without re-registration; a pointer gesture fires at most once
//! even when it arrives as both a mouse-down and a touch-start.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Gesture sequence number; events sharing it are the same gesture.
    pub seq: u64,
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn mouse(seq: u64, x: f64, y: f64) -> Self {
        Self { seq, x, y, kind: PointerKind::Mouse }
    }

    pub fn touch(seq: u64, x: f64, y: f64) -> Self {
        Self { seq, x, y, kind: PointerKind::Touch }
    }
}

/// Region that counts as "inside" for dismissal purposes.
pub trait Boundary {
    fn contains(&self, event: &PointerEvent) -> bool;
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Boundary for Rect {
    fn contains(&self, event: &PointerEvent) -> bool {
        event.x >= self.x
            && event.x <= self.x + self.width
            && event.y >= self.y
            && event.y <= self.y + self.height
    }
}

/// Hit result already decided by the host (e.g. DOM event bubbling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomHit(pub bool);

impl Boundary for DomHit {
    fn contains(&self, _event: &PointerEvent) -> bool {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct OutsideClickDetector {
    armed: bool,
    last_seq: Option<u64>,
}

impl OutsideClickDetector {
    pub fn new(armed: bool) -> Self {
        Self { armed, last_seq: None }
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
    }

    /// Returns true when the outside callback should fire for this event.
    pub fn observe(&mut self, event: &PointerEvent, boundary: &dyn Boundary) -> bool {
        if self.last_seq == Some(event.seq) {
            return false;
        }
        self.last_seq = Some(event.seq);

        self.armed && !boundary.contains(event)
    }
}
