use std::time::Duration;

use tracing::{debug, info};

use crate::replay::{ReplayLog, ReplayRecorder};
use crate::sim::{GameState, Session, SessionEvent, TickOutcome, TransitionError};
use crate::tuning::CharacterVariant;

use super::input::{InputAction, InputCollector, KeyState};
use super::metrics::{RunMetricsAccumulator, RunMetricsSnapshot};
use super::snapshot::SnapshotHandle;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub max_frame_delta: Duration,
    pub metrics_interval: Duration,
    pub record_replay: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: Duration::from_millis(250),
            metrics_interval: Duration::from_secs(1),
            record_replay: false,
        }
    }
}

/// What one host frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub outcome: TickOutcome,
    pub events: Vec<SessionEvent>,
    pub metrics: Option<RunMetricsSnapshot>,
}

/// Drives a session from host frames: one tick per frame with a clamped delta,
/// input sampled once per tick, and the snapshot republished afterwards.
#[derive(Debug)]
pub struct FrameDriver {
    session: Session,
    input: InputCollector,
    snapshots: SnapshotHandle,
    metrics: RunMetricsAccumulator,
    recorder: Option<ReplayRecorder>,
    max_frame_delta: Duration,
    record_replay: bool,
    sim_time: Duration,
}

impl FrameDriver {
    pub fn new(session: Session, config: LoopConfig) -> Self {
        let max_frame_delta =
            normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
        let metrics_interval =
            normalize_non_zero_duration(config.metrics_interval, Duration::from_secs(1));
        let driver = Self {
            session,
            input: InputCollector::default(),
            snapshots: SnapshotHandle::default(),
            metrics: RunMetricsAccumulator::new(metrics_interval),
            recorder: None,
            max_frame_delta,
            record_replay: config.record_replay,
            sim_time: Duration::ZERO,
        };
        driver.publish();
        driver
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle for readers on the UI side. Clones share the same slot.
    pub fn snapshots(&self) -> SnapshotHandle {
        self.snapshots.clone()
    }

    pub fn sim_time(&self) -> Duration {
        self.sim_time
    }

    pub fn handle_key(&mut self, action: InputAction, state: KeyState) {
        self.input.handle_key(action, state);
    }

    pub fn start(&mut self, character: CharacterVariant) -> Result<(), TransitionError> {
        let seed = self.session.next_run_seed();
        self.session.start_game(character)?;
        self.input.release_all();
        self.metrics.restart(self.sim_time);
        if self.record_replay {
            self.recorder = Some(ReplayRecorder::new(seed, character));
        }
        self.publish();
        Ok(())
    }

    pub fn restart(&mut self) {
        self.session.restart_game();
        self.input.release_all();
        if let Some(recorder) = self.recorder.take() {
            if !recorder.is_empty() {
                debug!(frames = recorder.len(), "replay_discarded");
            }
        }
        self.publish();
    }

    pub fn frame(&mut self, raw_frame_dt: Duration) -> FrameReport {
        let frame_dt = clamp_frame_delta(raw_frame_dt, self.max_frame_delta);
        let was_clamped = frame_dt < raw_frame_dt;
        if was_clamped {
            debug!(
                raw_ms = raw_frame_dt.as_millis() as u64,
                clamped_ms = frame_dt.as_millis() as u64,
                "frame_delta_clamped"
            );
        }
        self.sim_time = self.sim_time.saturating_add(frame_dt);

        let dt = frame_dt.as_secs_f32();
        let input = self.input.snapshot_for_tick();
        if self.session.state() == GameState::Playing {
            if let Some(recorder) = self.recorder.as_mut() {
                recorder.record(dt, input);
            }
        }
        input.apply(&mut self.session);
        let outcome = self.session.tick(dt);
        self.publish();

        self.metrics.record_frame(frame_dt, was_clamped);
        self.metrics.record_outcome(&outcome);
        let metrics = self.metrics.maybe_snapshot(
            self.sim_time,
            self.session.obstacles().len(),
            self.session.speed(),
        );
        if let Some(snapshot) = &metrics {
            info!(
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                clamped_frames = snapshot.clamped_frames,
                skipped_ticks = snapshot.skipped_ticks,
                obstacles = snapshot.obstacles,
                speed = snapshot.speed,
                score = self.session.score(),
                "run_metrics"
            );
        }

        FrameReport {
            outcome,
            events: self.session.drain_events(),
            metrics,
        }
    }

    /// Hands over the inputs recorded since the last start, if recording is on.
    pub fn take_replay(&mut self) -> Option<ReplayLog> {
        self.recorder.take().map(ReplayRecorder::finish)
    }

    fn publish(&self) {
        self.snapshots.publish(self.session.snapshot());
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
