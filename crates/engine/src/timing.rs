use lumen_common::TimeDelta;

/// Millisecond timestamps the cycle loop keeps between phases.
///
/// `current_time` never moves backwards, so the elapsed time handed to
/// simulations is never negative even if the clock is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTiming {
    pub last_update: u64,
    pub last_render: u64,
    pub current_time: u64,
}

impl FrameTiming {
    /// Forget the previous update and render.
    pub fn reset(&mut self) {
        self.last_update = 0;
        self.last_render = 0;
    }

    /// Record the clock reading for this update and return the time since
    /// the last completed one.
    pub fn sample(&mut self, now: u64) -> TimeDelta {
        self.current_time = self.current_time.max(now);
        TimeDelta::between(self.last_update, self.current_time)
    }

    pub fn mark_updated(&mut self) {
        self.last_update = self.current_time;
    }

    pub fn mark_rendered(&mut self) {
        self.last_render = self.current_time;
    }
}

/// Rendered frames per second, recomputed once per second of cycle time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fps {
    window_start: u64,
    frames: u32,
    fps: u32,
}

impl Fps {
    pub fn count_cycle(&mut self, now: u64) {
        self.frames += 1;
        if now.saturating_sub(self.window_start) >= 1000 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
        }
    }

    /// Frames in the last complete one-second window.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
