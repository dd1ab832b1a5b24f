use std::time::{Duration, Instant};

/// Fixed-cadence frame clock for the headless loop.
pub struct FrameTiming {
    frame: u32,
    frame_ms: f64,
    started: Instant,
    last_report: Instant,
    frames_since_report: u32,
}

impl FrameTiming {
    pub fn new(frame_ms: f64) -> Self {
        let now = Instant::now();
        Self {
            frame: 0,
            frame_ms,
            started: now,
            last_report: now,
            frames_since_report: 0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Simulated time of the current frame, as a display-refresh callback would see it.
    pub fn now_ms(&self) -> f64 {
        self.frame as f64 * self.frame_ms
    }

    pub fn advance(&mut self) {
        self.frame = self.frame.saturating_add(1);
        self.frames_since_report = self.frames_since_report.saturating_add(1);

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_report);
        if elapsed >= Duration::from_millis(500) {
            let fps = self.frames_since_report as f32 / elapsed.as_secs_f32();
            log::debug!("frame {} ({:.1} simulated frames/s)", self.frame, fps);
            self.frames_since_report = 0;
            self.last_report = now;
        }
    }

    pub fn wall_time(&self) -> Duration {
        self.started.elapsed()
    }
}
