use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use super::active::ActiveTracker;
use super::drag_create::DragSelection;
use super::labels::overlap_offset;
use super::{
    MOVE_THRESHOLD_PX, RESIZE_THRESHOLD_PX, Region, RegionEdge, RegionId, RegionOptions,
    RegionParams, RegionPart, RegionsEvent,
};
use crate::drag::{DragController, DragEvent, PointerButton};
use crate::events::{Emitter, Subscription};
use crate::playback::Playback;
use crate::plugin::{HostInfo, Plugin};

/// Content geometry the regions are laid out against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionGeometry {
    /// Audio duration; `None` until the host is ready.
    pub duration: Option<f64>,
    /// Width of the region layer (the full content width) in pixels.
    pub total_width: f64,
}

impl RegionGeometry {
    /// Time at content pixel `x`, clamped to the track.
    pub fn time_at(&self, x: f64) -> f64 {
        match self.duration {
            Some(duration) if self.total_width > 0.0 => {
                (x / self.total_width).clamp(0.0, 1.0) * duration
            }
            _ => 0.0,
        }
    }

    /// Seconds covered by `dx` pixels.
    pub fn seconds_for(&self, dx: f64) -> f64 {
        match self.duration {
            Some(duration) if self.total_width > 0.0 => dx / self.total_width * duration,
            _ => 0.0,
        }
    }
}

/// Interaction state of one region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionState {
    #[default]
    Idle,
    Moving,
    Resizing(RegionEdge),
}

/// Drag controllers attached to one region.
#[derive(Clone, Debug)]
struct RegionHandles {
    body: DragController,
    start: DragController,
    end: DragController,
    state: RegionState,
}

impl RegionHandles {
    fn new() -> Self {
        Self {
            body: DragController::new(MOVE_THRESHOLD_PX),
            start: DragController::new(RESIZE_THRESHOLD_PX),
            end: DragController::new(RESIZE_THRESHOLD_PX),
            state: RegionState::Idle,
        }
    }

    fn controller(&mut self, part: RegionPart) -> &mut DragController {
        match part {
            RegionPart::Body => &mut self.body,
            RegionPart::Handle(RegionEdge::Start) => &mut self.start,
            RegionPart::Handle(RegionEdge::End) => &mut self.end,
        }
    }

    fn suppresses_click(&self, now: Instant) -> bool {
        [&self.body, &self.start, &self.end]
            .iter()
            .any(|controller| controller.suppresses_click(now))
    }

    fn detach(&mut self) {
        self.body.detach();
        self.start.detach();
        self.end.detach();
        self.state = RegionState::Idle;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Capture {
    id: RegionId,
    part: RegionPart,
}

/// Region collection: committed regions, regions waiting for the duration,
/// the drag-selection draft and the active subset.
pub struct Regions {
    regions: Vec<Region>,
    handles: Vec<RegionHandles>,
    pending: Vec<(RegionId, RegionParams)>,
    geometry: RegionGeometry,
    selection: Rc<RefCell<Option<DragSelection>>>,
    capture: Option<Capture>,
    active: ActiveTracker,
    hovered: Option<RegionId>,
    events: Emitter<RegionsEvent>,
}

impl Default for Regions {
    fn default() -> Self {
        Self::new()
    }
}

impl Regions {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            handles: Vec::new(),
            pending: Vec::new(),
            geometry: RegionGeometry::default(),
            selection: Rc::new(RefCell::new(None)),
            capture: None,
            active: ActiveTracker::default(),
            hovered: None,
            events: Emitter::new(),
        }
    }

    pub fn events(&self) -> &Emitter<RegionsEvent> {
        &self.events
    }

    /// Subscribe to every region event.
    pub fn on(&self, listener: impl FnMut(&RegionsEvent) + 'static) -> Subscription {
        self.events.on(listener)
    }

    /// Committed regions in creation order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.index_of(id).map(|index| &self.regions[index])
    }

    pub fn state(&self, id: &RegionId) -> Option<RegionState> {
        self.index_of(id).map(|index| self.handles[index].state)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Region currently being drawn by drag selection.
    pub fn draft(&self) -> Option<Region> {
        self.selection
            .borrow()
            .as_ref()
            .and_then(|selection| selection.draft().cloned())
    }

    pub fn active(&self) -> &[RegionId] {
        self.active.active()
    }

    pub fn geometry(&self) -> RegionGeometry {
        self.geometry
    }

    /// Update the layout. The first known duration commits pending regions;
    /// a later duration change refits every committed region into the track.
    pub fn set_geometry(&mut self, geometry: RegionGeometry) {
        let previous = self.geometry.duration;
        self.geometry = geometry;
        match (previous, geometry.duration) {
            (None, Some(_)) => self.commit_pending(),
            (Some(old), Some(new)) if old != new => self.refit_all(new),
            _ => {}
        }
    }

    /// Add a region now, or once the duration is known. An explicit id that is
    /// already taken is replaced by a generated one.
    pub fn add_region(&mut self, params: RegionParams) -> RegionId {
        let id = match params.id.as_ref().map(RegionId::new) {
            Some(id) if self.is_taken(&id) => {
                let fresh = RegionId::generate();
                tracing::warn!("Region id {id} is already in use; using {fresh}");
                fresh
            }
            Some(id) => id,
            None => RegionId::generate(),
        };
        match self.geometry.duration {
            Some(duration) => {
                let region = Region::from_params(id.clone(), &params, duration);
                self.save_region(region);
            }
            None => {
                tracing::debug!("Deferring region {id} until the duration is known");
                self.pending.push((id.clone(), params));
            }
        }
        id
    }

    /// Remove a committed or pending region. Returns the committed region.
    pub fn remove_region(&mut self, id: &RegionId) -> Option<Region> {
        if let Some(position) = self.pending.iter().position(|(pending, _)| pending == id) {
            self.pending.remove(position);
            return None;
        }
        let index = self.index_of(id)?;
        let region = self.regions.remove(index);
        let mut handles = self.handles.remove(index);
        handles.detach();
        self.active.forget(id);
        if self.capture.as_ref().is_some_and(|capture| &capture.id == id) {
            self.capture = None;
        }
        if self.hovered.as_ref() == Some(id) {
            self.hovered = None;
        }
        tracing::debug!("Removed region {id}");
        self.events.emit(&RegionsEvent::Removed(region.clone()));
        Some(region)
    }

    /// Remove every committed and pending region.
    pub fn clear_regions(&mut self) {
        self.pending.clear();
        let ids: Vec<RegionId> = self.regions.iter().map(|r| r.id().clone()).collect();
        for id in ids {
            self.remove_region(&id);
        }
    }

    /// Apply a partial update and re-settle the region's label.
    pub fn set_options(&mut self, id: &RegionId, options: &RegionOptions) -> bool {
        let Some(duration) = self.geometry.duration else {
            return false;
        };
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.regions[index].apply_options(options, duration);
        self.settle_label(index);
        self.events
            .emit(&RegionsEvent::Updated(self.regions[index].clone()));
        true
    }

    /// Turn on drag-to-create with `params` as the template. Dropping the
    /// returned handle turns it off again.
    pub fn enable_drag_selection(&mut self, params: RegionParams) -> Subscription {
        *self.selection.borrow_mut() = Some(DragSelection::new(params));
        let weak = Rc::downgrade(&self.selection);
        Subscription::new(move || {
            if let Some(selection) = weak.upgrade() {
                *selection.borrow_mut() = None;
            }
        })
    }

    pub fn is_drag_selection_enabled(&self) -> bool {
        self.selection.borrow().is_some()
    }

    /// Recompute the active subset for playhead `time`; emits `Out` for
    /// regions left, then `In` for regions entered.
    pub fn update_time(&mut self, time: f64) {
        let changes = self.active.update(&self.regions, time);
        for id in &changes.left {
            if let Some(region) = self.region(id) {
                self.events.emit(&RegionsEvent::Out(region.clone()));
            }
        }
        for id in &changes.entered {
            if let Some(region) = self.region(id) {
                self.events.emit(&RegionsEvent::In(region.clone()));
            }
        }
    }

    /// Seek `playback` to the region start and play.
    pub fn play_region(&mut self, id: &RegionId, playback: &mut dyn Playback) -> bool {
        let Some(region) = self.region(id).cloned() else {
            return false;
        };
        playback.set_time(region.start());
        playback.play();
        self.events.emit(&RegionsEvent::Play(region));
        true
    }

    /// Topmost region part under content pixel `x`.
    pub fn hit_test(&self, x: f64) -> Option<(RegionId, RegionPart)> {
        let duration = self.geometry.duration?;
        self.regions.iter().rev().find_map(|region| {
            region
                .hit_test(x, self.geometry.total_width, duration)
                .map(|part| (region.id().clone(), part))
        })
    }

    /// Route a press at content pixel `x`. Returns true when a region or the
    /// drag selection took the pointer.
    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        if let Some((id, part)) = self.hit_test(x)
            && let Some(index) = self.index_of(&id)
        {
            let region = &self.regions[index];
            let enabled = match part {
                RegionPart::Body => region.is_draggable(),
                RegionPart::Handle(_) => region.is_resizable(),
            };
            if enabled {
                self.handles[index].controller(part).pointer_down(button, x, y);
                self.capture = Some(Capture { id, part });
                return true;
            }
        }
        match self.selection.borrow_mut().as_mut() {
            Some(selection) => selection.pointer_down(button, x, y),
            None => false,
        }
    }

    /// Feed a move at content pixel `x`. Returns true when handled here.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if let Some(capture) = self.capture.clone() {
            self.move_captured(&capture, x, y);
            return true;
        }
        let geometry = self.geometry;
        let mut selection = self.selection.borrow_mut();
        match selection.as_mut() {
            Some(selection) if selection.is_pressed() => {
                selection.pointer_move(x, y, geometry);
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, now: Instant) -> bool {
        self.release(now, false)
    }

    pub fn pointer_leave(&mut self, now: Instant) -> bool {
        self.release(now, true)
    }

    /// True if a click at `now` is the tail of a region drag or selection.
    pub fn suppresses_click(&self, now: Instant) -> bool {
        self.handles.iter().any(|handles| handles.suppresses_click(now))
            || self
                .selection
                .borrow()
                .as_ref()
                .is_some_and(|selection| selection.suppresses_click(now))
    }

    /// Emit `Clicked` for the region under `x`.
    pub fn click(&mut self, x: f64, now: Instant) -> Option<RegionId> {
        if self.suppresses_click(now) {
            return None;
        }
        let (id, _) = self.hit_test(x)?;
        let region = self.region(&id)?.clone();
        self.events.emit(&RegionsEvent::Clicked(region));
        Some(id)
    }

    pub fn double_click(&mut self, x: f64) -> Option<RegionId> {
        let (id, _) = self.hit_test(x)?;
        let region = self.region(&id)?.clone();
        self.events.emit(&RegionsEvent::DoubleClicked(region));
        Some(id)
    }

    /// Track the hovered region; `None` means the pointer left the surface.
    pub fn hover(&mut self, x: Option<f64>) {
        let next = x.and_then(|x| self.hit_test(x)).map(|(id, _)| id);
        if next == self.hovered {
            return;
        }
        if let Some(region) = self.hovered.as_ref().and_then(|id| self.region(id)) {
            self.events.emit(&RegionsEvent::Leave(region.clone()));
        }
        if let Some(region) = next.as_ref().and_then(|id| self.region(id)) {
            self.events.emit(&RegionsEvent::Over(region.clone()));
        }
        self.hovered = next;
    }

    fn move_captured(&mut self, capture: &Capture, x: f64, y: f64) {
        let Some(index) = self.index_of(&capture.id) else {
            self.capture = None;
            return;
        };
        let Some(duration) = self.geometry.duration else {
            return;
        };
        let events = self.handles[index].controller(capture.part).pointer_move(x, y);
        for event in events {
            match event {
                DragEvent::Start { .. } => {
                    let state = match capture.part {
                        RegionPart::Body => RegionState::Moving,
                        RegionPart::Handle(edge) => RegionState::Resizing(edge),
                    };
                    self.handles[index].state = state;
                    tracing::debug!("Region {} {:?}", capture.id, state);
                }
                DragEvent::Move { dx, .. } => {
                    let delta = self.geometry.seconds_for(dx);
                    let region = &mut self.regions[index];
                    let accepted = match capture.part {
                        RegionPart::Body => region.try_move(delta, duration),
                        RegionPart::Handle(edge) => region.try_resize(edge, delta, duration),
                    };
                    if accepted {
                        self.events.emit(&RegionsEvent::Update(region.clone()));
                    }
                }
                DragEvent::End => {}
            }
        }
    }

    fn release(&mut self, now: Instant, left_surface: bool) -> bool {
        if let Some(capture) = self.capture.take() {
            let Some(index) = self.index_of(&capture.id) else {
                return true;
            };
            let controller = self.handles[index].controller(capture.part);
            let ended = if left_surface {
                controller.pointer_leave(now)
            } else {
                controller.pointer_up(now)
            };
            if ended.is_some() {
                self.handles[index].state = RegionState::Idle;
                self.settle_label(index);
                tracing::debug!("Region {} settled", capture.id);
                self.events
                    .emit(&RegionsEvent::Updated(self.regions[index].clone()));
            }
            return true;
        }
        let committed = {
            let mut selection = self.selection.borrow_mut();
            match selection.as_mut() {
                Some(selection) if selection.is_pressed() => {
                    if left_surface {
                        Some(selection.pointer_leave(now))
                    } else {
                        Some(selection.pointer_up(now))
                    }
                }
                _ => None,
            }
        };
        match committed {
            Some(Some(region)) => {
                self.save_region(region);
                true
            }
            Some(None) => true,
            None => false,
        }
    }

    fn save_region(&mut self, mut region: Region) {
        if let Some(duration) = self.geometry.duration {
            let offset = overlap_offset(
                &region,
                &self.regions,
                self.geometry.total_width,
                duration,
            );
            region.set_label_offset(offset);
        }
        tracing::debug!(
            "Region {} created [{:.3}, {:.3}]",
            region.id(),
            region.start(),
            region.end()
        );
        self.regions.push(region.clone());
        self.handles.push(RegionHandles::new());
        self.events.emit(&RegionsEvent::Created(region));
    }

    fn settle_label(&mut self, index: usize) {
        let Some(duration) = self.geometry.duration else {
            return;
        };
        let offset = overlap_offset(
            &self.regions[index],
            &self.regions,
            self.geometry.total_width,
            duration,
        );
        self.regions[index].set_label_offset(offset);
    }

    fn commit_pending(&mut self) {
        let Some(duration) = self.geometry.duration else {
            return;
        };
        for (id, params) in std::mem::take(&mut self.pending) {
            let region = Region::from_params(id, &params, duration);
            self.save_region(region);
        }
    }

    fn refit_all(&mut self, duration: f64) {
        tracing::debug!("Refitting {} regions to {duration:.3}s", self.regions.len());
        let moved: Vec<usize> = self
            .regions
            .iter_mut()
            .enumerate()
            .filter_map(|(index, region)| region.refit(duration).then_some(index))
            .collect();
        for index in 0..self.regions.len() {
            self.settle_label(index);
        }
        for index in moved {
            self.events
                .emit(&RegionsEvent::Updated(self.regions[index].clone()));
        }
    }

    fn is_taken(&self, id: &RegionId) -> bool {
        self.index_of(id).is_some() || self.pending.iter().any(|(pending, _)| pending == id)
    }

    fn index_of(&self, id: &RegionId) -> Option<usize> {
        self.regions.iter().position(|region| region.id() == id)
    }
}

impl Plugin for Regions {
    fn name(&self) -> &'static str {
        "regions"
    }

    fn init(&mut self, host: &HostInfo) {
        self.set_geometry(RegionGeometry {
            duration: host.duration,
            total_width: host.total_width as f64,
        });
    }

    fn destroy(&mut self) {
        self.pending.clear();
        for handles in &mut self.handles {
            handles.detach();
        }
        self.regions.clear();
        self.handles.clear();
        self.capture = None;
        self.hovered = None;
        self.active.clear();
        *self.selection.borrow_mut() = None;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ClockPlayback;
    use crate::regions::RegionLabel;
    use std::time::Duration;

    fn ready_regions() -> Regions {
        let mut regions = Regions::new();
        regions.set_geometry(RegionGeometry {
            duration: Some(10.0),
            total_width: 1_000.0,
        });
        regions
    }

    fn record(regions: &Regions) -> (Rc<RefCell<Vec<RegionsEvent>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let subscription = regions.on(move |event| sink.borrow_mut().push(event.clone()));
        (log, subscription)
    }

    fn names(log: &Rc<RefCell<Vec<RegionsEvent>>>) -> Vec<&'static str> {
        log.borrow()
            .iter()
            .map(|event| match event {
                RegionsEvent::Created(_) => "created",
                RegionsEvent::Update(_) => "update",
                RegionsEvent::Updated(_) => "updated",
                RegionsEvent::Removed(_) => "removed",
                RegionsEvent::In(_) => "in",
                RegionsEvent::Out(_) => "out",
                RegionsEvent::Clicked(_) => "clicked",
                RegionsEvent::DoubleClicked(_) => "double-clicked",
                RegionsEvent::Over(_) => "over",
                RegionsEvent::Leave(_) => "leave",
                RegionsEvent::Play(_) => "play",
            })
            .collect()
    }

    #[test]
    fn regions_added_early_wait_for_duration() {
        let mut regions = Regions::new();
        let (log, _sub) = record(&regions);
        let id = regions.add_region(RegionParams::new(1.0, 2.0).with_id("early"));
        assert_eq!(id, RegionId::new("early"));
        assert!(regions.regions().is_empty());
        assert_eq!(regions.pending_count(), 1);
        regions.set_geometry(RegionGeometry {
            duration: Some(10.0),
            total_width: 500.0,
        });
        assert_eq!(regions.regions().len(), 1);
        assert_eq!(regions.pending_count(), 0);
        assert_eq!(names(&log), vec!["created"]);
    }

    #[test]
    fn dragging_body_moves_and_settles() {
        let mut regions = ready_regions();
        let id = regions.add_region(RegionParams::new(2.0, 5.0));
        let (log, _sub) = record(&regions);
        let now = Instant::now();
        assert!(regions.pointer_down(PointerButton::Primary, 300.0, 10.0));
        regions.pointer_move(302.0, 10.0);
        assert_eq!(regions.state(&id), Some(RegionState::Idle));
        regions.pointer_move(350.0, 10.0);
        assert_eq!(regions.state(&id), Some(RegionState::Moving));
        let region = regions.region(&id).unwrap();
        assert!((region.start() - 2.5).abs() < 1e-9);
        assert!((region.end() - 5.5).abs() < 1e-9);
        regions.pointer_move(900.0, 10.0);
        assert!((regions.region(&id).unwrap().end() - 5.5).abs() < 1e-9);
        assert!(regions.pointer_up(now));
        assert_eq!(regions.state(&id), Some(RegionState::Idle));
        assert_eq!(names(&log), vec!["update", "updated"]);
        assert!(regions.suppresses_click(now + Duration::from_millis(2)));
        assert_eq!(regions.click(350.0, now + Duration::from_millis(2)), None);
    }

    #[test]
    fn handle_drag_resizes_one_edge() {
        let mut regions = ready_regions();
        let id = regions.add_region(RegionParams::new(2.0, 5.0));
        assert!(regions.pointer_down(PointerButton::Primary, 498.0, 0.0));
        regions.pointer_move(499.0, 0.0);
        regions.pointer_move(598.0, 0.0);
        assert_eq!(regions.state(&id), Some(RegionState::Resizing(RegionEdge::End)));
        regions.pointer_up(Instant::now());
        let region = regions.region(&id).unwrap();
        assert_eq!(region.start(), 2.0);
        assert!((region.end() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_regions_leave_the_pointer_to_the_background() {
        let mut regions = ready_regions();
        regions.add_region(RegionParams {
            drag: Some(false),
            resize: Some(false),
            ..RegionParams::new(2.0, 5.0)
        });
        assert!(!regions.pointer_down(PointerButton::Primary, 300.0, 0.0));
    }

    #[test]
    fn drag_selection_creates_and_disposes() {
        let mut regions = ready_regions();
        let (log, _sub) = record(&regions);
        let handle = regions.enable_drag_selection(RegionParams::default());
        assert!(regions.pointer_down(PointerButton::Primary, 100.0, 0.0));
        regions.pointer_move(300.0, 0.0);
        assert!(regions.draft().is_some());
        assert!(regions.regions().is_empty());
        regions.pointer_up(Instant::now());
        assert_eq!(regions.regions().len(), 1);
        let created = &regions.regions()[0];
        assert!((created.start() - 1.0).abs() < 1e-9);
        assert!((created.end() - 3.0).abs() < 1e-9);
        assert_eq!(names(&log), vec!["created"]);
        drop(handle);
        assert!(!regions.is_drag_selection_enabled());
        assert!(!regions.pointer_down(PointerButton::Primary, 700.0, 0.0));
    }

    #[test]
    fn labels_stack_when_committed() {
        let mut regions = ready_regions();
        let first = regions.add_region(
            RegionParams::new(1.0, 3.0).with_label(RegionLabel::new("a", 50.0, 20.0)),
        );
        let second = regions.add_region(
            RegionParams::new(2.0, 4.0).with_label(RegionLabel::new("b", 50.0, 15.0)),
        );
        assert_eq!(regions.region(&first).unwrap().label_offset(), 0.0);
        assert!(regions.region(&second).unwrap().label_offset() >= 20.0);
    }

    #[test]
    fn time_updates_fire_in_then_out() {
        let mut regions = ready_regions();
        regions.add_region(RegionParams::new(2.0, 5.0));
        let (log, _sub) = record(&regions);
        regions.update_time(3.0);
        assert_eq!(names(&log), vec!["in"]);
        regions.update_time(6.0);
        assert_eq!(names(&log), vec!["in", "out"]);
    }

    #[test]
    fn removal_during_emission_is_safe() {
        let mut regions = ready_regions();
        let id = regions.add_region(RegionParams::new(0.0, 1.0));
        regions.add_region(RegionParams::new(0.5, 2.0));
        let (log, _sub) = record(&regions);
        let _late = regions.on(|_| {});
        regions.update_time(0.7);
        regions.remove_region(&id);
        regions.clear_regions();
        assert!(regions.regions().is_empty());
        assert_eq!(names(&log), vec!["in", "in", "removed", "removed"]);
        assert!(regions.active().is_empty());
    }

    #[test]
    fn clicks_hover_and_play() {
        let mut regions = ready_regions();
        let id = regions.add_region(RegionParams::new(2.0, 5.0));
        let (log, _sub) = record(&regions);
        let now = Instant::now();
        assert_eq!(regions.click(300.0, now), Some(id.clone()));
        assert_eq!(regions.double_click(300.0), Some(id.clone()));
        assert_eq!(regions.click(800.0, now), None);
        regions.hover(Some(300.0));
        regions.hover(Some(310.0));
        regions.hover(None);
        let mut playback = ClockPlayback::new(10.0);
        assert!(regions.play_region(&id, &mut playback));
        assert!(playback.is_playing());
        playback.pause();
        assert!((2.0..2.5).contains(&playback.current_time()));
        assert_eq!(
            names(&log),
            vec!["clicked", "double-clicked", "over", "leave", "play"]
        );
    }

    #[test]
    fn set_options_revalidates_and_reports() {
        let mut regions = ready_regions();
        let id = regions.add_region(RegionParams::new(2.0, 5.0));
        let (log, _sub) = record(&regions);
        assert!(regions.set_options(
            &id,
            &RegionOptions {
                start: Some(-4.0),
                ..RegionOptions::default()
            }
        ));
        assert_eq!(regions.region(&id).unwrap().start(), 0.0);
        assert!(!regions.set_options(&RegionId::new("missing"), &RegionOptions::default()));
        assert_eq!(names(&log), vec!["updated"]);
    }

    #[test]
    fn taken_ids_are_replaced() {
        let mut regions = ready_regions();
        let first = regions.add_region(RegionParams::new(1.0, 2.0).with_id("dup"));
        let second = regions.add_region(RegionParams::new(6.0, 8.0).with_id("dup"));
        assert_eq!(first, RegionId::new("dup"));
        assert_ne!(first, second);
        assert!(regions.pointer_down(PointerButton::Primary, 700.0, 0.0));
        regions.pointer_move(750.0, 0.0);
        regions.pointer_up(Instant::now());
        let moved = regions.region(&second).unwrap();
        assert!((moved.start() - 6.5).abs() < 1e-9);
        assert!((moved.end() - 8.5).abs() < 1e-9);
        let still = regions.region(&first).unwrap();
        assert_eq!((still.start(), still.end()), (1.0, 2.0));

        let mut waiting = Regions::new();
        let early = waiting.add_region(RegionParams::new(1.0, 2.0).with_id("early"));
        let late = waiting.add_region(RegionParams::new(3.0, 4.0).with_id("early"));
        assert_ne!(early, late);
    }

    #[test]
    fn shorter_track_refits_committed_regions() {
        let mut regions = ready_regions();
        let inside = regions.add_region(RegionParams::new(1.0, 2.0));
        let past = regions.add_region(RegionParams::new(6.0, 9.0).with_lengths(Some(1.0), None));
        let (log, _sub) = record(&regions);
        regions.set_geometry(RegionGeometry {
            duration: Some(3.0),
            total_width: 300.0,
        });
        assert_eq!(names(&log), vec!["updated"]);
        let refitted = regions.region(&past).unwrap();
        assert_eq!((refitted.start(), refitted.end()), (2.0, 3.0));
        let untouched = regions.region(&inside).unwrap();
        assert_eq!((untouched.start(), untouched.end()), (1.0, 2.0));

        assert!(regions.pointer_down(PointerButton::Primary, 150.0, 0.0));
        regions.pointer_move(140.0, 0.0);
        regions.pointer_move(100.0, 0.0);
        regions.pointer_up(Instant::now());
        let moved = regions.region(&inside).unwrap();
        assert!((moved.start() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn destroy_drops_everything() {
        let mut regions = ready_regions();
        regions.add_region(RegionParams::new(2.0, 5.0));
        let _selection = regions.enable_drag_selection(RegionParams::default());
        let (log, _sub) = record(&regions);
        regions.destroy();
        assert!(regions.regions().is_empty());
        assert!(!regions.is_drag_selection_enabled());
        assert_eq!(regions.events().listener_count(), 0);
        regions.update_time(3.0);
        assert!(log.borrow().is_empty());
    }
}
