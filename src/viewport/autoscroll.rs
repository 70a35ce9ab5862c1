//! Playhead following while the transport runs.

use super::ViewportState;

/// Margin kept between the playhead and the window edge while dragging.
pub const DRAG_FOLLOW_MARGIN: f64 = 10.0;
/// Recentering moves at most `half width / CENTER_STEP_DIVISOR` per tick.
pub const CENTER_STEP_DIVISOR: f64 = 20.0;

/// How the viewport should track the playhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FollowPolicy {
    pub auto_center: bool,
    pub is_playing: bool,
}

/// New scroll offset that keeps the playhead at `playhead_px` in view, or
/// `None` when the current offset is fine.
pub fn follow_playhead(state: &ViewportState, playhead_px: f64, policy: FollowPolicy) -> Option<f64> {
    let width = state.container_width;
    if width <= 0.0 || !playhead_px.is_finite() {
        return None;
    }
    let start = state.scroll;
    let end = start + width;
    let half = width / 2.0;

    let target = if state.is_dragging {
        if playhead_px + DRAG_FOLLOW_MARGIN > end {
            start + (playhead_px + DRAG_FOLLOW_MARGIN - end)
        } else if playhead_px - DRAG_FOLLOW_MARGIN < start {
            playhead_px - DRAG_FOLLOW_MARGIN
        } else {
            return None;
        }
    } else if playhead_px < start || playhead_px > end {
        playhead_px - if policy.auto_center { half } else { 0.0 }
    } else if policy.auto_center && policy.is_playing {
        let past_center = playhead_px - start - half;
        if past_center <= 0.0 {
            return None;
        }
        start + past_center.min((half / CENTER_STEP_DIVISOR).max(1.0))
    } else {
        return None;
    };

    let clamped = target.clamp(0.0, state.max_scroll());
    ((clamped - start).abs() > f64::EPSILON).then_some(clamped)
}
