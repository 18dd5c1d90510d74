//! Fixed-timestep bookkeeping for the outer frame loop.
//!
//! Frames arrive at whatever rate the display drives; simulation ticks run
//! at the configured fixed rate. `begin_frame` banks real elapsed time into
//! an accumulator and `should_step` drains it one fixed step at a time, so
//! a fast display runs zero-step frames and a slow one catches up with
//! several steps per frame without changing what the simulation computes.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: if fixed_dt > 0.0 { 1.0 / fixed_dt } else { 0.0 },
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_accumulator_yields_the_expected_step_count() {
        let mut time = TimeState::new(1.0 / 60.0);
        // Simulate a frame that banked three and a half fixed steps.
        time.accumulator = 3.5 * time.fixed_dt;

        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }

        assert_eq!(steps, 3);
        assert_eq!(time.fixed_step_count, 3);
        assert_eq!(time.steps_this_frame, 3);
        // Half a step stays banked for the next frame.
        assert!((time.accumulator - 0.5 * time.fixed_dt).abs() < 1e-9);
    }

    #[test]
    fn empty_accumulator_never_steps() {
        let mut time = TimeState::new(1.0 / 60.0);
        assert!(!time.should_step());
        assert_eq!(time.fixed_step_count, 0);
    }

    #[test]
    fn total_time_advances_by_whole_steps_only() {
        let mut time = TimeState::new(1.0 / 120.0);
        time.accumulator = 5.25 * time.fixed_dt;
        while time.should_step() {}
        assert!((time.total_time - 5.0 * time.fixed_dt).abs() < 1e-9);
    }
}
