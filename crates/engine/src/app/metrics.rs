use std::time::Duration;

use serde::Serialize;

use crate::sim::TickOutcome;

/// Rates over one reporting interval, measured in simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunMetricsSnapshot {
    pub tps: f32,
    pub frame_time_ms: f32,
    pub clamped_frames: u32,
    pub skipped_ticks: u32,
    pub obstacles: usize,
    pub speed: f32,
}

#[derive(Debug)]
pub(crate) struct RunMetricsAccumulator {
    interval_start: Duration,
    interval: Duration,
    frames: u32,
    ticks: u32,
    clamped_frames: u32,
    skipped_ticks: u32,
    frame_time_sum: Duration,
}

impl RunMetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Duration::ZERO,
            interval,
            frames: 0,
            ticks: 0,
            clamped_frames: 0,
            skipped_ticks: 0,
            frame_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, was_clamped: bool) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        if was_clamped {
            self.clamped_frames = self.clamped_frames.saturating_add(1);
        }
    }

    pub(crate) fn record_outcome(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Advanced | TickOutcome::GameOver { .. } => {
                self.ticks = self.ticks.saturating_add(1);
            }
            TickOutcome::Skipped => {
                self.skipped_ticks = self.skipped_ticks.saturating_add(1);
            }
            TickOutcome::Inactive(_) | TickOutcome::NoOp => {}
        }
    }

    pub(crate) fn restart(&mut self, now: Duration) {
        *self = Self::new(self.interval);
        self.interval_start = now;
    }

    pub(crate) fn maybe_snapshot(
        &mut self,
        now: Duration,
        obstacles: usize,
        speed: f32,
    ) -> Option<RunMetricsSnapshot> {
        let elapsed = now.saturating_sub(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = RunMetricsSnapshot {
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            clamped_frames: self.clamped_frames,
            skipped_ticks: self.skipped_ticks,
            obstacles,
            speed,
        };

        self.restart(now);
        Some(snapshot)
    }
}
