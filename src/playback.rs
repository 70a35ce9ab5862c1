//! Transport seam: the view reads time from and seeks through [`Playback`].

use std::time::Instant;

/// Media transport driven by the waveform view.
pub trait Playback {
    /// Total duration in seconds.
    fn duration(&self) -> f64;
    /// Current playhead position in seconds.
    fn current_time(&self) -> f64;
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Seek to `time` seconds.
    fn set_time(&mut self, time: f64);
}

/// Silent transport that advances with the wall clock.
///
/// Used by the viewer, which draws without an audio output.
#[derive(Clone, Debug)]
pub struct ClockPlayback {
    duration: f64,
    position: f64,
    started: Option<Instant>,
}

impl ClockPlayback {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            position: 0.0,
            started: None,
        }
    }

    /// Playhead at `now`; playback stops once the end is reached.
    pub fn time_at(&mut self, now: Instant) -> f64 {
        if let Some(started) = self.started {
            let elapsed = now.saturating_duration_since(started).as_secs_f64();
            if self.position + elapsed >= self.duration {
                self.position = self.duration;
                self.started = None;
            }
        }
        self.position_at(now)
    }

    fn position_at(&self, now: Instant) -> f64 {
        let elapsed = self
            .started
            .map_or(0.0, |started| now.saturating_duration_since(started).as_secs_f64());
        (self.position + elapsed).min(self.duration)
    }
}

impl Playback for ClockPlayback {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn current_time(&self) -> f64 {
        self.position_at(Instant::now())
    }

    fn is_playing(&self) -> bool {
        self.started.is_some()
    }

    fn play(&mut self) {
        if self.started.is_none() && self.position < self.duration {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let now = Instant::now();
        self.position = self.position_at(now);
        self.started = None;
    }

    fn set_time(&mut self, time: f64) {
        let time = if time.is_finite() { time } else { 0.0 };
        self.position = time.clamp(0.0, self.duration);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn seeks_are_clamped() {
        let mut clock = ClockPlayback::new(4.0);
        clock.set_time(9.0);
        assert_eq!(clock.current_time(), 4.0);
        clock.set_time(-1.0);
        assert_eq!(clock.current_time(), 0.0);
        clock.set_time(f64::NAN);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn playing_advances_and_stops_at_the_end() {
        let mut clock = ClockPlayback::new(1.0);
        clock.play();
        assert!(clock.is_playing());
        let later = Instant::now() + Duration::from_secs(5);
        assert_eq!(clock.time_at(later), 1.0);
        assert!(!clock.is_playing());
        clock.play();
        assert!(!clock.is_playing());
    }

    #[test]
    fn pause_keeps_the_position() {
        let mut clock = ClockPlayback::new(10.0);
        clock.set_time(3.0);
        clock.play();
        clock.pause();
        assert!(!clock.is_playing());
        let paused = clock.current_time();
        assert!((3.0..3.5).contains(&paused));
    }
}
