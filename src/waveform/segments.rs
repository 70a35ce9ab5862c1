use std::ops::Range;

/// Widest segment a single rasterization call may produce.
pub const MAX_SEGMENT_WIDTH: u32 = 4000;

/// One bounded-width slice of the rendered waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawingSegment {
    pub index: usize,
    /// First sample index covered (inclusive).
    pub start_sample: usize,
    /// Sample index where the next segment starts (exclusive).
    pub end_sample: usize,
    pub pixel_left: u32,
    pub pixel_width: u32,
}

impl DrawingSegment {
    pub fn pixel_right(&self) -> u32 {
        self.pixel_left + self.pixel_width
    }

    pub fn sample_range(&self) -> Range<usize> {
        self.start_sample..self.end_sample
    }
}

/// Splits `[0, total_width)` into equal segments and maps pixels to samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentLayout {
    segment_width: u32,
    total_width: u32,
    sample_count: usize,
}

impl SegmentLayout {
    pub fn new(total_width: u32, container_width: u32, sample_count: usize) -> Self {
        let segment_width = MAX_SEGMENT_WIDTH
            .min(container_width.max(1))
            .min(total_width)
            .max(1);
        Self {
            segment_width,
            total_width,
            sample_count,
        }
    }

    pub fn segment_width(&self) -> u32 {
        self.segment_width
    }

    pub fn total_width(&self) -> u32 {
        self.total_width
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn segment_count(&self) -> usize {
        self.total_width.div_ceil(self.segment_width) as usize
    }

    /// Sample index at pixel boundary `px`; `total_width` maps to the sample count.
    pub fn sample_at_px(&self, px: u32) -> usize {
        if self.total_width == 0 {
            return 0;
        }
        let px = px.min(self.total_width) as f64;
        let index = (px / self.total_width as f64 * self.sample_count as f64).floor() as usize;
        index.min(self.sample_count)
    }

    pub fn segment(&self, index: usize) -> Option<DrawingSegment> {
        if index >= self.segment_count() {
            return None;
        }
        let left = index as u32 * self.segment_width;
        let right = (left + self.segment_width).min(self.total_width);
        Some(DrawingSegment {
            index,
            start_sample: self.sample_at_px(left),
            end_sample: self.sample_at_px(right),
            pixel_left: left,
            pixel_width: right - left,
        })
    }

    /// Segment containing content pixel `px`, clamped to the last segment.
    pub fn index_at_px(&self, px: f64) -> usize {
        let count = self.segment_count();
        if count == 0 {
            return 0;
        }
        let index = (px.max(0.0) / self.segment_width as f64).floor() as usize;
        index.min(count - 1)
    }

    /// Indices of segments intersecting `[scroll, scroll + view_width)`.
    pub fn visible_indices(&self, scroll: f64, view_width: f64) -> Range<usize> {
        let count = self.segment_count();
        if count == 0 {
            return 0..0;
        }
        let first = self.index_at_px(scroll);
        let end_px = (scroll + view_width.max(0.0)).min(self.total_width as f64);
        let last = (end_px / self.segment_width as f64).ceil() as usize;
        first..last.clamp(first + 1, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_width_is_bounded() {
        assert_eq!(SegmentLayout::new(20_000, 12_000, 1).segment_width(), MAX_SEGMENT_WIDTH);
        assert_eq!(SegmentLayout::new(20_000, 800, 1).segment_width(), 800);
        assert_eq!(SegmentLayout::new(300, 800, 1).segment_width(), 300);
    }

    #[test]
    fn segments_tile_every_window_exactly() {
        for (total, container, samples) in [
            (1000, 300, 44_100),
            (9_001, 4_500, 123_457),
            (7, 3, 2),
            (5_000, 5_000, 10),
            (12_345, 1_000, 12_345),
        ] {
            let layout = SegmentLayout::new(total, container, samples);
            let mut next_px = 0;
            let mut next_sample = 0;
            for index in 0..layout.segment_count() {
                let seg = layout.segment(index).unwrap();
                assert!(seg.pixel_width <= MAX_SEGMENT_WIDTH);
                assert_eq!(seg.pixel_left, next_px);
                assert_eq!(seg.start_sample, next_sample);
                assert!(seg.end_sample >= seg.start_sample);
                next_px = seg.pixel_right();
                next_sample = seg.end_sample;
            }
            assert_eq!(next_px, total);
            assert_eq!(next_sample, samples);
            assert!(layout.segment(layout.segment_count()).is_none());
        }
    }

    #[test]
    fn visible_indices_cover_the_window() {
        let layout = SegmentLayout::new(10_000, 1_000, 100);
        assert_eq!(layout.visible_indices(0.0, 1_000.0), 0..1);
        assert_eq!(layout.visible_indices(2_500.0, 1_000.0), 2..4);
        assert_eq!(layout.visible_indices(9_500.0, 1_000.0), 9..10);
        assert_eq!(layout.index_at_px(1e9), 9);
    }

    #[test]
    fn empty_width_has_no_segments() {
        let layout = SegmentLayout::new(0, 500, 100);
        assert_eq!(layout.segment_count(), 0);
        assert_eq!(layout.visible_indices(0.0, 500.0), 0..0);
    }
}
