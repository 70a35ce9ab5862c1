//! Pointer routing for [`WaveView`].
//!
//! Coordinates are relative to the container's left edge. Regions see content
//! pixels (scroll added); background scrubbing works on container pixels so
//! auto-scroll during the drag keeps the pointer mapping consistent.

use std::time::Instant;

use super::{PointerRoute, ViewEvent, WaveView};
use crate::drag::{DragEvent, PointerButton};
use crate::regions::RegionId;

impl WaveView {
    fn content_x(&self, x: f64) -> f64 {
        x + self.viewport.state().scroll
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) {
        if self.destroyed || !x.is_finite() || !y.is_finite() {
            return;
        }
        let content_x = self.content_x(x);
        self.route = if self.regions.pointer_down(button, content_x, y) {
            PointerRoute::Regions
        } else if self.audio.is_some() && self.scrub.pointer_down(button, x, y) {
            PointerRoute::Scrub
        } else {
            PointerRoute::None
        };
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) {
        if self.destroyed || !x.is_finite() || !y.is_finite() {
            return;
        }
        match self.route {
            PointerRoute::Regions => {
                let content_x = self.content_x(x);
                self.regions.pointer_move(content_x, y);
            }
            PointerRoute::Scrub => {
                for event in self.scrub.pointer_move(x, y) {
                    self.apply_scrub(event, now);
                }
            }
            PointerRoute::None => {
                let content_x = self.content_x(x);
                self.regions.hover(Some(content_x));
            }
        }
    }

    pub fn pointer_up(&mut self, now: Instant) {
        self.release(now, false);
    }

    /// The pointer left the container: ends any gesture and clears hover.
    pub fn pointer_leave(&mut self, now: Instant) {
        self.release(now, true);
        self.regions.hover(None);
    }

    /// A click at container `x`. Seeks and emits [`ViewEvent::Click`] unless
    /// it is the tail of a drag.
    pub fn click(&mut self, x: f64, _y: f64, now: Instant) -> Option<RegionId> {
        if self.destroyed || !x.is_finite() {
            return None;
        }
        if self.scrub.suppresses_click(now) || self.regions.suppresses_click(now) {
            tracing::trace!("Click swallowed after drag");
            return None;
        }
        let region = self.regions.click(self.content_x(x), now);
        if self.audio.is_some() {
            let fraction = self.viewport.state().pointer_to_fraction(x);
            self.events.emit(&ViewEvent::Click { fraction });
            self.seek_to_fraction(fraction, now);
        }
        region
    }

    pub fn double_click(&mut self, x: f64, _y: f64) -> Option<RegionId> {
        if self.destroyed || !x.is_finite() {
            return None;
        }
        self.regions.double_click(self.content_x(x))
    }

    fn release(&mut self, now: Instant, left: bool) {
        match std::mem::take(&mut self.route) {
            PointerRoute::Regions => {
                if left {
                    self.regions.pointer_leave(now);
                } else {
                    self.regions.pointer_up(now);
                }
            }
            PointerRoute::Scrub => {
                let event = if left {
                    self.scrub.pointer_leave(now)
                } else {
                    self.scrub.pointer_up(now)
                };
                if let Some(event) = event {
                    self.apply_scrub(event, now);
                }
            }
            PointerRoute::None => {}
        }
    }

    fn apply_scrub(&mut self, event: DragEvent, now: Instant) {
        match event {
            DragEvent::Start { .. } => self.viewport.set_dragging(true),
            DragEvent::Move { x, .. } => {
                let fraction = self.viewport.state().pointer_to_fraction(x);
                self.events.emit(&ViewEvent::Drag { fraction });
                self.seek_to_fraction(fraction, now);
            }
            DragEvent::End => self.viewport.set_dragging(false),
        }
    }
}
