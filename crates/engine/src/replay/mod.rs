mod atomic_io;
mod digest;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::InputSnapshot;
use crate::sim::{
    GameState, LaneDirection, LaneInput, RenderView, Session, SessionSnapshot, TickOutcome,
    TransitionError,
};
use crate::tuning::{CharacterVariant, Tuning, TuningError};

use self::atomic_io::write_text_atomic;
use self::digest::RunDigest;

pub const REPLAY_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub dt: f32,
    #[serde(default)]
    pub lane: LaneInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<LaneDirection>,
    #[serde(default)]
    pub jump: bool,
}

impl ReplayFrame {
    pub fn input(&self) -> InputSnapshot {
        InputSnapshot {
            lane: self.lane,
            lane_tap: self.tap,
            jump_pressed: self.jump,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayLog {
    pub format_version: u32,
    pub seed: u64,
    pub character: CharacterVariant,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to access replay file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode replay data: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode replay {path} at {field}: {message}")]
    Decode {
        path: PathBuf,
        field: String,
        message: String,
    },
    #[error("replay format version {found} is not supported (expected {})", REPLAY_FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error("replay could not start a run: {0}")]
    Start(#[from] TransitionError),
}

impl ReplayLog {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let raw = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut deserializer = serde_json::Deserializer::from_str(&raw);
        let log: ReplayLog = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |error| ReplayError::Decode {
                path: path.to_path_buf(),
                field: error.path().to_string(),
                message: error.into_inner().to_string(),
            },
        )?;
        if log.format_version != REPLAY_FORMAT_VERSION {
            return Err(ReplayError::UnsupportedVersion {
                found: log.format_version,
            });
        }
        Ok(log)
    }

    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self).map_err(ReplayError::Encode)?;
        write_text_atomic(path, &json).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            frames = self.frames.len(),
            "replay_saved"
        );
        Ok(())
    }
}

/// Captures the exact per-tick inputs a session received.
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    log: ReplayLog,
}

impl ReplayRecorder {
    pub fn new(seed: u64, character: CharacterVariant) -> Self {
        Self {
            log: ReplayLog {
                format_version: REPLAY_FORMAT_VERSION,
                seed,
                character,
                frames: Vec::new(),
            },
        }
    }

    pub fn record(&mut self, dt: f32, input: InputSnapshot) {
        self.log.frames.push(ReplayFrame {
            dt,
            lane: input.lane,
            tap: input.lane_tap,
            jump: input.jump_pressed,
        });
    }

    pub fn len(&self) -> usize {
        self.log.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.frames.is_empty()
    }

    pub fn finish(self) -> ReplayLog {
        self.log
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub ticks: usize,
    pub game_over_at: Option<usize>,
    pub final_snapshot: SessionSnapshot,
    pub digest: String,
}

#[derive(Serialize)]
struct TickRecord<'a> {
    snapshot: &'a SessionSnapshot,
    view: &'a RenderView,
}

/// Re-simulates a recorded run and hashes every tick's observable state.
pub fn run(log: &ReplayLog, tuning: &Tuning) -> Result<ReplayOutcome, ReplayError> {
    let mut session = Session::new(tuning.clone(), log.seed)?;
    session.start_game(log.character)?;

    let mut digest = RunDigest::default();
    let mut game_over_at = None;
    for (index, frame) in log.frames.iter().enumerate() {
        frame.input().apply(&mut session);
        if let TickOutcome::GameOver { .. } = session.tick(frame.dt) {
            game_over_at.get_or_insert(index);
        }
        session.drain_events();

        let snapshot = session.snapshot();
        let view = session.render_view();
        digest
            .push(&TickRecord {
                snapshot: &snapshot,
                view: &view,
            })
            .map_err(ReplayError::Encode)?;
    }

    let final_snapshot = session.snapshot();
    debug!(
        ticks = digest.records(),
        ended = final_snapshot.game_state == GameState::GameOver,
        "replay_finished"
    );
    Ok(ReplayOutcome {
        ticks: log.frames.len(),
        game_over_at,
        final_snapshot,
        digest: digest.finish_hex(),
    })
}
