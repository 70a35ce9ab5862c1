//! Pointer drag primitive with a movement threshold and click suppression.
//!
//! The controller is a pure state machine: the host feeds pointer events in
//! surface coordinates and receives the resulting [`DragEvent`]s back.

use std::time::{Duration, Instant};

/// Movement needed before a press turns into a drag.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;
/// Window after a drag during which a trailing click is swallowed.
pub const CLICK_SUPPRESSION: Duration = Duration::from_millis(10);

/// Pointer button of a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Drag lifecycle notifications.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// The threshold was crossed; carries the press position.
    Start { x: f64, y: f64 },
    /// Movement since the previous event plus the absolute position.
    Move { dx: f64, dy: f64, x: f64, y: f64 },
    /// Release or leave after a drag.
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragPhase {
    Idle,
    Pending { origin: (f64, f64) },
    Dragging { last: (f64, f64) },
}

#[derive(Clone, Debug)]
pub struct DragController {
    threshold: f64,
    phase: DragPhase,
    suppress_until: Option<Instant>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragController {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
            phase: DragPhase::Idle,
            suppress_until: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True between the press and its release.
    pub fn is_pressed(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Record a press. Non-primary buttons are ignored; returns whether the
    /// press was accepted.
    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        self.phase = DragPhase::Pending { origin: (x, y) };
        true
    }

    /// Feed a move; yields `Start` then `Move` on the crossing move, `Move`
    /// afterwards, nothing before the threshold.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<DragEvent> {
        match self.phase {
            DragPhase::Idle => Vec::new(),
            DragPhase::Pending { origin } => {
                let (dx, dy) = (x - origin.0, y - origin.1);
                if dx.abs() < self.threshold && dy.abs() < self.threshold {
                    return Vec::new();
                }
                self.phase = DragPhase::Dragging { last: (x, y) };
                vec![
                    DragEvent::Start {
                        x: origin.0,
                        y: origin.1,
                    },
                    DragEvent::Move { dx, dy, x, y },
                ]
            }
            DragPhase::Dragging { last } => {
                self.phase = DragPhase::Dragging { last: (x, y) };
                vec![DragEvent::Move {
                    dx: x - last.0,
                    dy: y - last.1,
                    x,
                    y,
                }]
            }
        }
    }

    /// Release the pointer. Emits `End` only if a drag happened, and then
    /// opens the click-suppression window.
    pub fn pointer_up(&mut self, now: Instant) -> Option<DragEvent> {
        self.finish(now)
    }

    /// The pointer left the surface; behaves like a release.
    pub fn pointer_leave(&mut self, now: Instant) -> Option<DragEvent> {
        self.finish(now)
    }

    /// True if a click arriving at `now` is the tail of a drag.
    pub fn suppresses_click(&self, now: Instant) -> bool {
        self.suppress_until.is_some_and(|until| now <= until)
    }

    /// Forget any press or pending suppression.
    pub fn detach(&mut self) {
        self.phase = DragPhase::Idle;
        self.suppress_until = None;
    }

    fn finish(&mut self, now: Instant) -> Option<DragEvent> {
        let was_dragging = self.is_dragging();
        self.phase = DragPhase::Idle;
        if was_dragging {
            self.suppress_until = Some(now + CLICK_SUPPRESSION);
            Some(DragEvent::End)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_emits_nothing() {
        let now = Instant::now();
        let mut drag = DragController::default();
        assert!(drag.pointer_down(PointerButton::Primary, 10.0, 10.0));
        assert!(drag.pointer_move(14.0, 13.0).is_empty());
        assert_eq!(drag.pointer_up(now), None);
        assert!(!drag.suppresses_click(now));
    }

    #[test]
    fn crossing_threshold_starts_once_then_moves_incrementally() {
        let mut drag = DragController::default();
        drag.pointer_down(PointerButton::Primary, 100.0, 20.0);
        assert_eq!(
            drag.pointer_move(106.0, 20.0),
            vec![
                DragEvent::Start { x: 100.0, y: 20.0 },
                DragEvent::Move {
                    dx: 6.0,
                    dy: 0.0,
                    x: 106.0,
                    y: 20.0
                },
            ]
        );
        assert_eq!(
            drag.pointer_move(110.0, 18.0),
            vec![DragEvent::Move {
                dx: 4.0,
                dy: -2.0,
                x: 110.0,
                y: 18.0
            }]
        );
        assert_eq!(drag.pointer_leave(Instant::now()), Some(DragEvent::End));
        assert_eq!(drag.pointer_up(Instant::now()), None);
    }

    #[test]
    fn vertical_motion_also_crosses_threshold() {
        let mut drag = DragController::new(1.0);
        drag.pointer_down(PointerButton::Primary, 0.0, 0.0);
        assert_eq!(drag.pointer_move(0.0, 1.0).len(), 2);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut drag = DragController::default();
        assert!(!drag.pointer_down(PointerButton::Secondary, 0.0, 0.0));
        assert!(drag.pointer_move(50.0, 0.0).is_empty());
        assert!(!drag.is_pressed());
    }

    #[test]
    fn click_after_drag_is_suppressed_briefly() {
        let now = Instant::now();
        let mut drag = DragController::default();
        drag.pointer_down(PointerButton::Primary, 0.0, 0.0);
        drag.pointer_move(20.0, 0.0);
        assert_eq!(drag.pointer_up(now), Some(DragEvent::End));
        assert!(drag.suppresses_click(now + Duration::from_millis(5)));
        assert!(!drag.suppresses_click(now + Duration::from_millis(11)));
    }

    #[test]
    fn detach_drops_pending_state() {
        let mut drag = DragController::default();
        drag.pointer_down(PointerButton::Primary, 0.0, 0.0);
        drag.pointer_move(20.0, 0.0);
        drag.detach();
        assert!(!drag.is_dragging());
        assert_eq!(drag.pointer_up(Instant::now()), None);
    }
}
