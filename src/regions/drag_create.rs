//! Drag on the empty waveform to draw a new region.

use std::time::Instant;

use super::collection::RegionGeometry;
use super::{Region, RegionId, RegionParams};
use crate::drag::{DEFAULT_DRAG_THRESHOLD, DragController, DragEvent, PointerButton};

/// Initial width of a drag-created region, in pixels.
pub const INITIAL_SIZE_PX: f64 = 5.0;

#[derive(Clone, Debug)]
struct Draft {
    region: Region,
    origin_x: f64,
    origin_time: f64,
}

/// Drag-selection state: template params plus the region being drawn.
#[derive(Clone, Debug)]
pub(crate) struct DragSelection {
    params: RegionParams,
    controller: DragController,
    draft: Option<Draft>,
}

impl DragSelection {
    pub(crate) fn new(params: RegionParams) -> Self {
        Self {
            params,
            controller: DragController::new(DEFAULT_DRAG_THRESHOLD),
            draft: None,
        }
    }

    pub(crate) fn draft(&self) -> Option<&Region> {
        self.draft.as_ref().map(|draft| &draft.region)
    }

    pub(crate) fn is_pressed(&self) -> bool {
        self.controller.is_pressed()
    }

    pub(crate) fn suppresses_click(&self, now: Instant) -> bool {
        self.controller.suppresses_click(now)
    }

    pub(crate) fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        self.draft = None;
        self.controller.pointer_down(button, x, y)
    }

    /// Returns whether the draft changed.
    pub(crate) fn pointer_move(&mut self, x: f64, y: f64, geometry: RegionGeometry) -> bool {
        let Some(duration) = geometry.duration else {
            return false;
        };
        let mut changed = false;
        for event in self.controller.pointer_move(x, y) {
            match event {
                DragEvent::Start { x, .. } => {
                    self.draft = Some(self.start_draft(x, geometry, duration));
                    changed = true;
                }
                DragEvent::Move { x, .. } => {
                    let Some(draft) = self.draft.as_mut() else {
                        continue;
                    };
                    let time = geometry.time_at(x);
                    let (start, end) = if x >= draft.origin_x {
                        (draft.origin_time, time)
                    } else {
                        (time, draft.origin_time)
                    };
                    changed |= draft.region.try_set_bounds(start, end, duration);
                }
                DragEvent::End => {}
            }
        }
        changed
    }

    /// Finish the gesture; yields the region to commit if one was drawn.
    pub(crate) fn pointer_up(&mut self, now: Instant) -> Option<Region> {
        let ended = self.controller.pointer_up(now);
        let draft = self.draft.take();
        ended.and(draft).map(|draft| draft.region)
    }

    pub(crate) fn pointer_leave(&mut self, now: Instant) -> Option<Region> {
        let ended = self.controller.pointer_leave(now);
        let draft = self.draft.take();
        ended.and(draft).map(|draft| draft.region)
    }

    fn start_draft(&self, x: f64, geometry: RegionGeometry, duration: f64) -> Draft {
        let origin_time = geometry.time_at(x);
        let params = RegionParams {
            id: None,
            start: origin_time,
            end: Some(geometry.time_at(x + INITIAL_SIZE_PX)),
            ..self.params.clone()
        };
        tracing::debug!("Drag selection started at {origin_time:.3}s");
        Draft {
            region: Region::from_params(RegionId::generate(), &params, duration),
            origin_x: x,
            origin_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> RegionGeometry {
        RegionGeometry {
            duration: Some(10.0),
            total_width: 1_000.0,
        }
    }

    #[test]
    fn drawing_right_spans_origin_to_pointer() {
        let mut selection = DragSelection::new(RegionParams::default());
        selection.pointer_down(PointerButton::Primary, 100.0, 10.0);
        assert!(selection.pointer_move(150.0, 10.0, geometry()));
        assert!(selection.pointer_move(300.0, 10.0, geometry()));
        let region = selection.pointer_up(Instant::now()).unwrap();
        assert!((region.start() - 1.0).abs() < 1e-9);
        assert!((region.end() - 3.0).abs() < 1e-9);
        assert!(selection.draft().is_none());
    }

    #[test]
    fn drawing_left_moves_the_start() {
        let mut selection = DragSelection::new(RegionParams::default());
        selection.pointer_down(PointerButton::Primary, 500.0, 0.0);
        selection.pointer_move(200.0, 0.0, geometry());
        let region = selection.draft().unwrap();
        assert!((region.start() - 2.0).abs() < 1e-9);
        assert!((region.end() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn click_without_drag_creates_nothing() {
        let mut selection = DragSelection::new(RegionParams::default());
        selection.pointer_down(PointerButton::Primary, 100.0, 0.0);
        assert!(!selection.pointer_move(102.0, 0.0, geometry()));
        assert!(selection.pointer_up(Instant::now()).is_none());
    }

    #[test]
    fn template_constraints_gate_the_draft() {
        let mut selection =
            DragSelection::new(RegionParams::default().with_lengths(None, Some(1.0)));
        selection.pointer_down(PointerButton::Primary, 100.0, 0.0);
        selection.pointer_move(180.0, 0.0, geometry());
        selection.pointer_move(400.0, 0.0, geometry());
        let region = selection.draft().unwrap();
        assert!((region.end() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn nothing_happens_before_duration_is_known() {
        let mut selection = DragSelection::new(RegionParams::default());
        selection.pointer_down(PointerButton::Primary, 100.0, 0.0);
        let unknown = RegionGeometry {
            duration: None,
            total_width: 1_000.0,
        };
        assert!(!selection.pointer_move(300.0, 0.0, unknown));
        assert!(selection.draft().is_none());
    }
}
