//! Time-anchored regions: drag/resize with bounds and length constraints,
//! label stacking and the playhead-active subset.

mod active;
mod collection;
mod drag_create;
mod labels;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::options::Color;

pub use active::{ActiveChanges, ActiveTracker, active_at};
pub use collection::{RegionGeometry, RegionState, Regions};
pub use drag_create::INITIAL_SIZE_PX;
pub use labels::{label_projection, overlap_offset};

/// Width of the resize handle at each edge, in pixels.
pub const HANDLE_WIDTH_PX: f64 = 6.0;
/// Drag threshold for moving a whole region.
pub const MOVE_THRESHOLD_PX: f64 = 5.0;
/// Drag threshold for resize handles.
pub const RESIZE_THRESHOLD_PX: f64 = 1.0;
/// Half-width of the clickable area around a point marker.
const MARKER_SLOP_PX: f64 = 3.0;
/// Slack for floating point error in the length constraints.
const LENGTH_EPSILON: f64 = 1e-9;

/// Unique region identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh `region-<uuid>` id.
    pub fn generate() -> Self {
        Self(format!("region-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region edge moved by a resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionEdge {
    Start,
    End,
}

/// Part of a region under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionPart {
    Body,
    Handle(RegionEdge),
}

/// Label content with its measured size in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionLabel {
    pub text: String,
    pub width: f64,
    pub height: f64,
}

impl RegionLabel {
    pub fn new(text: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Parameters for a new region. Unset fields take the documented defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionParams {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    pub start: f64,
    /// End time; a point marker when absent.
    pub end: Option<f64>,
    /// Whole-region dragging; default `true`.
    pub drag: Option<bool>,
    /// Edge resizing; default `true`.
    pub resize: Option<bool>,
    /// Default `0`.
    pub min_length: Option<f64>,
    /// Default unbounded.
    pub max_length: Option<f64>,
    /// Default `rgba(0, 0, 0, 0.1)`.
    pub color: Option<Color>,
    pub label: Option<RegionLabel>,
}

impl RegionParams {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn marker(time: f64) -> Self {
        Self {
            start: time,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: RegionLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_lengths(mut self, min_length: Option<f64>, max_length: Option<f64>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }
}

/// Partial update applied by [`Regions::set_options`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionOptions {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub drag: Option<bool>,
    pub resize: Option<bool>,
    pub min_length: Option<f64>,
    pub max_length: Option<f64>,
    pub color: Option<Color>,
    /// `Some(None)` removes the label.
    pub label: Option<Option<RegionLabel>>,
}

/// Events published by the region collection.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionsEvent {
    Created(Region),
    /// Accepted move or resize frame.
    Update(Region),
    /// A drag or resize finished, or options changed.
    Updated(Region),
    Removed(Region),
    /// The playhead entered the region.
    In(Region),
    /// The playhead left the region.
    Out(Region),
    Clicked(Region),
    DoubleClicked(Region),
    /// The pointer started hovering the region.
    Over(Region),
    Leave(Region),
    Play(Region),
}

/// A time interval (or point marker) on the waveform.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    id: RegionId,
    start: f64,
    end: f64,
    drag: bool,
    resize: bool,
    min_length: f64,
    max_length: f64,
    color: Color,
    label: Option<RegionLabel>,
    label_offset: f64,
}

impl Region {
    /// Build a region from `params`, fitted inside `[0, duration]` and the
    /// length constraints.
    pub(crate) fn from_params(id: RegionId, params: &RegionParams, duration: f64) -> Self {
        let min_length = finite_or(params.min_length, 0.0).max(0.0);
        let max_length = params
            .max_length
            .filter(|v| !v.is_nan())
            .unwrap_or(f64::INFINITY)
            .max(min_length);
        let mut region = Self {
            id,
            start: 0.0,
            end: 0.0,
            drag: params.drag.unwrap_or(true),
            resize: params.resize.unwrap_or(true),
            min_length,
            max_length,
            color: params.color.unwrap_or_else(default_region_color),
            label: params.label.clone(),
            label_offset: 0.0,
        };
        region.fit_bounds(params.start, params.end.unwrap_or(params.start), duration);
        region
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_marker(&self) -> bool {
        self.start == self.end
    }

    pub fn is_draggable(&self) -> bool {
        self.drag
    }

    pub fn is_resizable(&self) -> bool {
        self.resize
    }

    pub fn min_length(&self) -> f64 {
        self.min_length
    }

    pub fn max_length(&self) -> f64 {
        self.max_length
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn label(&self) -> Option<&RegionLabel> {
        self.label.as_ref()
    }

    /// Vertical label offset from overlap avoidance.
    pub fn label_offset(&self) -> f64 {
        self.label_offset
    }

    /// Inclusive on both ends, so a marker is active only at its own instant.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    /// The validity predicate every mutation must pass.
    pub fn accepts(&self, start: f64, end: f64, duration: f64) -> bool {
        let length = end - start;
        start.is_finite()
            && end.is_finite()
            && start >= 0.0
            && end <= duration
            && start <= end
            && length >= self.min_length - LENGTH_EPSILON
            && length <= self.max_length + LENGTH_EPSILON
    }

    /// Shift by `delta` seconds if the result is valid.
    pub(crate) fn try_move(&mut self, delta: f64, duration: f64) -> bool {
        self.try_set_bounds(self.start + delta, self.end + delta, duration)
    }

    /// Move one edge by `delta` seconds if the result is valid.
    pub(crate) fn try_resize(&mut self, edge: RegionEdge, delta: f64, duration: f64) -> bool {
        match edge {
            RegionEdge::Start => self.try_set_bounds(self.start + delta, self.end, duration),
            RegionEdge::End => self.try_set_bounds(self.start, self.end + delta, duration),
        }
    }

    pub(crate) fn try_set_bounds(&mut self, start: f64, end: f64, duration: f64) -> bool {
        if !self.accepts(start, end, duration) {
            return false;
        }
        self.start = start;
        self.end = end;
        true
    }

    /// Apply a partial update; bounds are refitted to the constraints.
    pub(crate) fn apply_options(&mut self, options: &RegionOptions, duration: f64) {
        if let Some(drag) = options.drag {
            self.drag = drag;
        }
        if let Some(resize) = options.resize {
            self.resize = resize;
        }
        if let Some(color) = options.color {
            self.color = color;
        }
        if let Some(label) = &options.label {
            self.label = label.clone();
        }
        if let Some(min_length) = options.min_length.filter(|v| v.is_finite()) {
            self.min_length = min_length.max(0.0);
        }
        if let Some(max_length) = options.max_length.filter(|v| !v.is_nan()) {
            self.max_length = max_length;
        }
        self.max_length = self.max_length.max(self.min_length);
        let start = options.start.unwrap_or(self.start);
        let end = options.end.unwrap_or(self.end);
        self.fit_bounds(start, end, duration);
    }

    /// Refit the current bounds after the track duration changed.
    pub(crate) fn refit(&mut self, duration: f64) -> bool {
        let before = (self.start, self.end);
        self.fit_bounds(self.start, self.end, duration);
        before != (self.start, self.end)
    }

    pub(crate) fn set_label_offset(&mut self, offset: f64) {
        self.label_offset = offset;
    }

    /// Left edge and width in content pixels.
    pub fn pixel_span(&self, total_width: f64, duration: f64) -> (f64, f64) {
        if duration <= 0.0 {
            return (0.0, 0.0);
        }
        let scale = total_width / duration;
        (self.start * scale, self.length() * scale)
    }

    /// Which part of the region sits under content pixel `x`, if any.
    pub fn hit_test(&self, x: f64, total_width: f64, duration: f64) -> Option<RegionPart> {
        let (left, width) = self.pixel_span(total_width, duration);
        let right = left + width;
        if self.is_marker() {
            return ((x - left).abs() <= MARKER_SLOP_PX).then_some(RegionPart::Body);
        }
        if x < left || x > right {
            return None;
        }
        if self.resize {
            let from_left = x - left;
            let from_right = right - x;
            if from_left <= HANDLE_WIDTH_PX && from_left <= from_right {
                return Some(RegionPart::Handle(RegionEdge::Start));
            }
            if from_right <= HANDLE_WIDTH_PX {
                return Some(RegionPart::Handle(RegionEdge::End));
            }
        }
        Some(RegionPart::Body)
    }

    fn fit_bounds(&mut self, start: f64, end: f64, duration: f64) {
        let duration = duration.max(0.0);
        // A track shorter than the minimum caps the minimum at the track.
        self.min_length = self.min_length.min(duration);
        self.max_length = self.max_length.max(self.min_length);
        let clamp = |t: f64| if t.is_finite() { t.clamp(0.0, duration) } else { 0.0 };
        let (mut start, mut end) = (clamp(start), clamp(end));
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        if end - start < self.min_length {
            end = (start + self.min_length).min(duration);
            start = (end - self.min_length).max(0.0);
        }
        if end - start > self.max_length {
            end = start + self.max_length;
        }
        self.start = start;
        self.end = end;
    }
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

fn default_region_color() -> Color {
    Color::from_rgba(0, 0, 0, 26)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn region(start: f64, end: f64) -> Region {
        Region::from_params(RegionId::new("r"), &RegionParams::new(start, end), 10.0)
    }

    fn holds_invariants(region: &Region, duration: f64) -> bool {
        let length = region.length();
        region.start() >= 0.0
            && region.start() <= region.end()
            && region.end() <= duration
            && length >= region.min_length() - LENGTH_EPSILON
            && length <= region.max_length() + LENGTH_EPSILON
    }

    #[test]
    fn defaults_match_documented_values() {
        let region = Region::from_params(RegionId::generate(), &RegionParams::marker(2.0), 10.0);
        assert!(region.id().as_str().starts_with("region-"));
        assert!(region.is_marker());
        assert!(region.is_draggable() && region.is_resizable());
        assert_eq!(region.min_length(), 0.0);
        assert_eq!(region.max_length(), f64::INFINITY);
        assert_eq!(region.color(), Color::from_rgba(0, 0, 0, 26));
    }

    #[test]
    fn construction_clamps_to_duration_and_lengths() {
        let clamped = region(-3.0, 12.0);
        assert_eq!((clamped.start(), clamped.end()), (0.0, 10.0));
        let swapped = region(5.0, 4.0);
        assert_eq!((swapped.start(), swapped.end()), (4.0, 5.0));
        let grown = Region::from_params(
            RegionId::new("g"),
            &RegionParams::new(9.5, 9.6).with_lengths(Some(2.0), None),
            10.0,
        );
        assert_eq!((grown.start(), grown.end()), (8.0, 10.0));
    }

    #[test]
    fn minimum_longer_than_the_track_is_capped() {
        let mut region = Region::from_params(
            RegionId::new("long"),
            &RegionParams::new(1.0, 2.0).with_lengths(Some(20.0), None),
            10.0,
        );
        assert_eq!((region.start(), region.end()), (0.0, 10.0));
        assert_eq!(region.min_length(), 10.0);
        assert!(holds_invariants(&region, 10.0));
        region.apply_options(
            &RegionOptions {
                min_length: Some(30.0),
                max_length: Some(5.0),
                ..RegionOptions::default()
            },
            10.0,
        );
        assert!(holds_invariants(&region, 10.0), "{region:?}");
    }

    #[test]
    fn refit_pulls_bounds_into_a_shorter_track() {
        let mut region = region(6.0, 9.0);
        assert!(region.refit(3.0));
        assert_eq!((region.start(), region.end()), (3.0, 3.0));
        assert!(holds_invariants(&region, 3.0));
        let mut sized = Region::from_params(
            RegionId::new("s"),
            &RegionParams::new(6.0, 9.0).with_lengths(Some(2.0), None),
            10.0,
        );
        assert!(sized.refit(3.0));
        assert_eq!((sized.start(), sized.end()), (1.0, 3.0));
        assert!(!sized.refit(3.0));
    }

    #[test]
    fn moves_past_the_edges_are_dropped() {
        let mut region = region(2.0, 5.0);
        assert!(region.try_move(1.0, 10.0));
        assert_eq!((region.start(), region.end()), (3.0, 6.0));
        assert!(!region.try_move(4.5, 10.0));
        assert_eq!((region.start(), region.end()), (3.0, 6.0));
        assert!(!region.try_move(-3.5, 10.0));
    }

    #[test]
    fn resize_respects_length_bounds() {
        let mut region = Region::from_params(
            RegionId::new("r"),
            &RegionParams::new(2.0, 5.0).with_lengths(Some(1.0), Some(4.0)),
            10.0,
        );
        assert!(!region.try_resize(RegionEdge::End, -2.5, 10.0));
        assert!(region.try_resize(RegionEdge::End, 1.0, 10.0));
        assert!(!region.try_resize(RegionEdge::Start, -0.5, 10.0));
        assert!(!region.try_resize(RegionEdge::Start, 3.5, 10.0));
        assert_eq!((region.start(), region.end()), (2.0, 6.0));
    }

    #[test]
    fn random_drags_never_break_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let duration = 10.0;
        for _ in 0..200 {
            let start = rng.random_range(0.0..8.0);
            let params = RegionParams::new(start, start + rng.random_range(0.0..2.0))
                .with_lengths(Some(rng.random_range(0.0..1.0)), Some(rng.random_range(1.0..5.0)));
            let mut region = Region::from_params(RegionId::new("p"), &params, duration);
            assert!(holds_invariants(&region, duration));
            for _ in 0..100 {
                let delta = rng.random_range(-3.0..3.0);
                match rng.random_range(0..3) {
                    0 => region.try_move(delta, duration),
                    1 => region.try_resize(RegionEdge::Start, delta, duration),
                    _ => region.try_resize(RegionEdge::End, delta, duration),
                };
                assert!(holds_invariants(&region, duration), "{region:?}");
            }
        }
    }

    #[test]
    fn hit_test_finds_handles_and_body() {
        let region = region(2.0, 5.0);
        assert_eq!(region.hit_test(199.0, 1_000.0, 10.0), None);
        assert_eq!(
            region.hit_test(203.0, 1_000.0, 10.0),
            Some(RegionPart::Handle(RegionEdge::Start))
        );
        assert_eq!(region.hit_test(350.0, 1_000.0, 10.0), Some(RegionPart::Body));
        assert_eq!(
            region.hit_test(497.0, 1_000.0, 10.0),
            Some(RegionPart::Handle(RegionEdge::End))
        );
        let marker = Region::from_params(RegionId::new("m"), &RegionParams::marker(3.0), 10.0);
        assert_eq!(marker.hit_test(302.0, 1_000.0, 10.0), Some(RegionPart::Body));
    }

    #[test]
    fn options_update_refits_bounds() {
        let mut region = region(2.0, 5.0);
        region.apply_options(
            &RegionOptions {
                end: Some(20.0),
                drag: Some(false),
                label: Some(Some(RegionLabel::new("chorus", 40.0, 12.0))),
                ..RegionOptions::default()
            },
            10.0,
        );
        assert_eq!(region.end(), 10.0);
        assert!(!region.is_draggable());
        assert_eq!(region.label().map(|l| l.text.as_str()), Some("chorus"));
    }
}
