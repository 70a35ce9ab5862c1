//! Segmented renderer: rasterizes bounded-width segments of the waveform,
//! drawing the visible ones synchronously and growing outward lazily.

mod bars;
mod composite;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use egui::{Color32, ColorImage};

use super::segments::{DrawingSegment, SegmentLayout};
use super::style::{Lane, lanes_height, resolve_lanes};
use super::{NormalizedPeaks, RenderError};
use crate::debounce::{Debouncer, SEGMENT_GROWTH_DELAY};
use crate::options::WaveOptions;

pub use composite::progress_crop_px;

/// Pixel budget for one segment image.
pub const MAX_SEGMENT_PIXELS: usize = 4000 * 2048;

/// The part of the content the host currently shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewWindow {
    /// Scroll offset in content pixels.
    pub scroll: f64,
    /// Container width in pixels.
    pub width: f64,
    /// Full content width in pixels.
    pub total_width: u32,
}

/// A rasterized segment: base image plus the recolored progress overlay.
#[derive(Clone, Debug)]
pub struct RenderedSegment {
    pub segment: DrawingSegment,
    pub base: Arc<ColorImage>,
    pub progress: Arc<ColorImage>,
    /// Pass that produced the images.
    pub generation: u64,
}

/// Summary of a synchronous render step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderPass {
    pub generation: u64,
    pub segment_count: usize,
    pub drawn: usize,
    pub skipped: usize,
}

pub struct SegmentedRenderer {
    peaks: Option<NormalizedPeaks>,
    lanes: Vec<Lane>,
    layout: Option<SegmentLayout>,
    drawn: BTreeMap<usize, RenderedSegment>,
    skipped: BTreeSet<usize>,
    generation: u64,
    growth: Debouncer,
    growth_generation: u64,
    pixel_budget: usize,
    destroyed: bool,
}

impl Default for SegmentedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentedRenderer {
    pub fn new() -> Self {
        Self {
            peaks: None,
            lanes: Vec::new(),
            layout: None,
            drawn: BTreeMap::new(),
            skipped: BTreeSet::new(),
            generation: 0,
            growth: Debouncer::new(SEGMENT_GROWTH_DELAY),
            growth_generation: 0,
            pixel_budget: MAX_SEGMENT_PIXELS,
            destroyed: false,
        }
    }

    /// Override the per-segment pixel budget.
    pub fn with_pixel_budget(mut self, pixel_budget: usize) -> Self {
        self.pixel_budget = pixel_budget;
        self
    }

    /// Replace the audio being drawn. Call [`render`](Self::render) afterwards.
    pub fn set_audio(&mut self, peaks: NormalizedPeaks, options: &WaveOptions) {
        self.lanes = resolve_lanes(options, peaks.channels.len());
        self.peaks = Some(peaks);
        self.destroyed = false;
        self.invalidate();
    }

    /// Re-resolve lane styles after an option change.
    pub fn set_style(&mut self, options: &WaveOptions) {
        let channels = self.peaks.as_ref().map_or(1, |p| p.channels.len());
        self.lanes = resolve_lanes(options, channels);
        self.invalidate();
    }

    /// Normalized channels currently drawn.
    pub fn peaks(&self) -> Option<&NormalizedPeaks> {
        self.peaks.as_ref()
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn image_height(&self) -> u32 {
        lanes_height(&self.lanes)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> Option<&SegmentLayout> {
        self.layout.as_ref()
    }

    /// Segments drawn so far, left to right.
    pub fn segments(&self) -> impl Iterator<Item = &RenderedSegment> {
        self.drawn.values()
    }

    pub fn segment(&self, index: usize) -> Option<&RenderedSegment> {
        self.drawn.get(&index)
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    /// True once every segment of the current pass is drawn or skipped.
    pub fn is_complete(&self) -> bool {
        self.layout.is_none_or(|layout| {
            self.drawn.len() + self.skipped.len() >= layout.segment_count()
        })
    }

    pub fn is_growth_pending(&self) -> bool {
        self.growth.is_pending()
    }

    /// Start a new pass: drop every segment, draw the visible ones now and
    /// schedule outward growth.
    pub fn render(&mut self, window: ViewWindow, now: Instant) -> RenderPass {
        self.invalidate();
        let Some(peaks) = self.peaks.as_ref() else {
            return RenderPass {
                generation: self.generation,
                ..RenderPass::default()
            };
        };
        if self.destroyed {
            return RenderPass::default();
        }
        let layout = SegmentLayout::new(
            window.total_width,
            window.width.max(0.0).floor() as u32,
            peaks.frame_count(),
        );
        self.layout = Some(layout);
        let (drawn, skipped) = self.draw_visible(window);
        self.schedule_growth(now);
        tracing::debug!(
            "Render pass {}: {} segments of {} px, {} drawn, {} skipped",
            self.generation,
            layout.segment_count(),
            layout.segment_width(),
            drawn,
            skipped
        );
        RenderPass {
            generation: self.generation,
            segment_count: layout.segment_count(),
            drawn,
            skipped,
        }
    }

    /// Draw any undrawn segment intersecting `window` right away.
    pub fn ensure_visible(&mut self, window: ViewWindow, now: Instant) -> usize {
        if self.destroyed || self.layout.is_none() {
            return 0;
        }
        let (drawn, _) = self.draw_visible(window);
        self.schedule_growth(now);
        drawn
    }

    /// Run one growth step if its debounce elapsed. Returns segments drawn.
    pub fn tick(&mut self, window: ViewWindow, now: Instant) -> usize {
        if !self.growth.fire_if_due(now) || self.growth_generation != self.generation {
            return 0;
        }
        let drawn = self.grow_step(window);
        self.schedule_growth(now);
        drawn
    }

    /// Stop all pending work and release every image.
    pub fn destroy(&mut self) {
        self.invalidate();
        self.peaks = None;
        self.destroyed = true;
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.drawn.clear();
        self.skipped.clear();
        self.layout = None;
        self.growth.cancel();
    }

    fn schedule_growth(&mut self, now: Instant) {
        if self.is_complete() {
            self.growth.cancel();
        } else {
            self.growth_generation = self.generation;
            self.growth.trigger(now);
        }
    }

    fn draw_visible(&mut self, window: ViewWindow) -> (usize, usize) {
        let Some(layout) = self.layout else {
            return (0, 0);
        };
        let (mut drawn, mut skipped) = (0, 0);
        for index in layout.visible_indices(window.scroll, window.width) {
            match self.draw_index(index) {
                Some(true) => drawn += 1,
                Some(false) => skipped += 1,
                None => {}
            }
        }
        (drawn, skipped)
    }

    /// Draw the nearest undrawn segment on each side of the visible window.
    fn grow_step(&mut self, window: ViewWindow) -> usize {
        let Some(layout) = self.layout else {
            return 0;
        };
        let visible = layout.visible_indices(window.scroll, window.width);
        let is_open = |index: &usize| !self.drawn.contains_key(index) && !self.skipped.contains(index);
        let left = (0..visible.start).rev().find(is_open);
        let right = (visible.start..layout.segment_count()).find(is_open);
        [left, right]
            .into_iter()
            .flatten()
            .filter(|&index| self.draw_index(index) == Some(true))
            .count()
    }

    /// `Some(true)` when drawn, `Some(false)` when skipped, `None` if already
    /// handled or out of range.
    fn draw_index(&mut self, index: usize) -> Option<bool> {
        if self.drawn.contains_key(&index) || self.skipped.contains(&index) {
            return None;
        }
        let segment = self.layout?.segment(index)?;
        match self.rasterize(segment) {
            Ok(rendered) => {
                self.drawn.insert(index, rendered);
                Some(true)
            }
            Err(err) => {
                tracing::warn!("Skipping waveform segment: {err}");
                self.skipped.insert(index);
                Some(false)
            }
        }
    }

    fn rasterize(&self, segment: DrawingSegment) -> Result<RenderedSegment, RenderError> {
        let width = segment.pixel_width;
        let height = self.image_height();
        let pixels = width as usize * height as usize;
        if pixels > self.pixel_budget {
            return Err(RenderError::SegmentTooLarge {
                index: segment.index,
                width,
                height,
                budget: self.pixel_budget,
            });
        }
        let mut base = alloc_pixels(segment.index, pixels)?;
        base.resize(pixels, Color32::TRANSPARENT);
        if let Some(peaks) = self.peaks.as_ref() {
            for lane in &self.lanes {
                bars::rasterize_lane(
                    &mut base,
                    width as usize,
                    lane,
                    &peaks.channels,
                    segment.sample_range(),
                    peaks.peak_scale,
                );
            }
        }
        let mut progress = alloc_pixels(segment.index, pixels)?;
        composite::source_in(&base, &mut progress, width as usize, &self.lanes);
        let size = [width as usize, height as usize];
        Ok(RenderedSegment {
            segment,
            base: Arc::new(ColorImage::new(size, base)),
            progress: Arc::new(ColorImage::new(size, progress)),
            generation: self.generation,
        })
    }
}

fn alloc_pixels(index: usize, pixels: usize) -> Result<Vec<Color32>, RenderError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(pixels)
        .map_err(|_| RenderError::Allocation { index, pixels })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NormalizeReference;
    use crate::waveform::PeakNormalizer;
    use std::time::Duration;

    fn sine_peaks(frames: usize) -> NormalizedPeaks {
        let samples: Vec<f32> = (0..frames).map(|i| (i as f32 * 0.01).sin() * 0.8).collect();
        PeakNormalizer::new(false, NormalizeReference::AllChannels).apply(&[Arc::from(samples)])
    }

    fn options() -> WaveOptions {
        WaveOptions {
            height: 32,
            ..WaveOptions::default()
        }
    }

    fn window(scroll: f64, width: f64, total_width: u32) -> ViewWindow {
        ViewWindow {
            scroll,
            width,
            total_width,
        }
    }

    #[test]
    fn visible_segments_draw_synchronously() {
        let mut renderer = SegmentedRenderer::new();
        renderer.set_audio(sine_peaks(50_000), &options());
        let pass = renderer.render(window(2_500.0, 1_000.0, 10_000), Instant::now());
        assert_eq!(pass.segment_count, 10);
        assert_eq!(pass.drawn, 2);
        let drawn: Vec<usize> = renderer.segments().map(|s| s.segment.index).collect();
        assert_eq!(drawn, vec![2, 3]);
        assert!(renderer.is_growth_pending());
    }

    #[test]
    fn growth_expands_outward_one_per_side_per_step() {
        let start = Instant::now();
        let view = window(4_000.0, 1_000.0, 10_000);
        let mut renderer = SegmentedRenderer::new();
        renderer.set_audio(sine_peaks(50_000), &options());
        renderer.render(view, start);
        assert_eq!(renderer.drawn_count(), 1);
        assert_eq!(renderer.tick(view, start + Duration::from_millis(5)), 0);
        assert_eq!(renderer.tick(view, start + Duration::from_millis(10)), 2);
        let drawn: Vec<usize> = renderer.segments().map(|s| s.segment.index).collect();
        assert_eq!(drawn, vec![3, 4, 5]);
        let mut now = start + Duration::from_millis(10);
        while !renderer.is_complete() {
            now += SEGMENT_GROWTH_DELAY;
            renderer.tick(view, now);
        }
        assert_eq!(renderer.drawn_count(), 10);
        assert!(!renderer.is_growth_pending());
    }

    #[test]
    fn new_pass_cancels_stale_growth() {
        let start = Instant::now();
        let view = window(0.0, 1_000.0, 10_000);
        let mut renderer = SegmentedRenderer::new();
        renderer.set_audio(sine_peaks(10_000), &options());
        let first = renderer.render(view, start);
        let second = renderer.render(view, start + Duration::from_millis(8));
        assert!(second.generation > first.generation);
        assert_eq!(renderer.tick(view, start + Duration::from_millis(12)), 0);
        assert_eq!(renderer.tick(view, start + Duration::from_millis(18)), 1);
        assert!(renderer.segments().all(|s| s.generation == second.generation));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let view = window(1_200.0, 900.0, 7_777);
        let mut renderer = SegmentedRenderer::new();
        renderer.set_audio(sine_peaks(33_333), &options());
        let now = Instant::now();
        renderer.render(view, now);
        let first: Vec<(DrawingSegment, Arc<ColorImage>)> = renderer
            .segments()
            .map(|s| (s.segment, Arc::clone(&s.base)))
            .collect();
        renderer.render(view, now);
        let second: Vec<(DrawingSegment, Arc<ColorImage>)> = renderer
            .segments()
            .map(|s| (s.segment, Arc::clone(&s.base)))
            .collect();
        assert_eq!(first.len(), second.len());
        for ((seg_a, img_a), (seg_b, img_b)) in first.iter().zip(&second) {
            assert_eq!(seg_a, seg_b);
            assert_eq!(img_a.pixels, img_b.pixels);
        }
    }

    #[test]
    fn oversized_segment_is_skipped_not_fatal() {
        let mut renderer = SegmentedRenderer::new().with_pixel_budget(10);
        renderer.set_audio(sine_peaks(1_000), &options());
        let pass = renderer.render(window(0.0, 100.0, 100), Instant::now());
        assert_eq!(pass.drawn, 0);
        assert_eq!(pass.skipped, 1);
        assert!(renderer.is_complete());
        assert!(!renderer.is_growth_pending());
    }

    #[test]
    fn ensure_visible_draws_after_a_jump() {
        let now = Instant::now();
        let mut renderer = SegmentedRenderer::new();
        renderer.set_audio(sine_peaks(50_000), &options());
        renderer.render(window(0.0, 1_000.0, 10_000), now);
        assert!(renderer.segment(8).is_none());
        assert_eq!(renderer.ensure_visible(window(8_000.0, 1_000.0, 10_000), now), 1);
        assert!(renderer.segment(8).is_some());
    }

    #[test]
    fn destroy_stops_growth() {
        let now = Instant::now();
        let view = window(0.0, 1_000.0, 10_000);
        let mut renderer = SegmentedRenderer::new();
        renderer.set_audio(sine_peaks(10_000), &options());
        renderer.render(view, now);
        renderer.destroy();
        assert!(!renderer.is_growth_pending());
        assert_eq!(renderer.tick(view, now + Duration::from_secs(1)), 0);
        assert_eq!(renderer.drawn_count(), 0);
        assert_eq!(renderer.render(view, now).drawn, 0);
    }

    #[test]
    fn progress_image_recolors_base_coverage() {
        let mut renderer = SegmentedRenderer::new();
        let options = options();
        renderer.set_audio(sine_peaks(2_000), &options);
        renderer.render(window(0.0, 200.0, 200), Instant::now());
        let seg = renderer.segment(0).unwrap();
        let progress_color = options.progress_color.to_color32();
        for (base, progress) in seg.base.pixels.iter().zip(&seg.progress.pixels) {
            if base.a() == 0 {
                assert_eq!(*progress, Color32::TRANSPARENT);
            } else {
                assert_eq!(*progress, progress_color);
            }
        }
    }
}
