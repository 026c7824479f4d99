use std::process::ExitCode;

use engine::{
    replay, CharacterVariant, FrameDriver, GameState, LoopConfig, Session, SessionEvent,
    TickOutcome, Tuning,
};
use serde::Serialize;
use tracing::{error, info, warn};

use super::autopilot::Autopilot;
use super::bootstrap::{AppWiring, HostConfig};
use super::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) character: CharacterVariant,
    pub(crate) seed: u64,
    pub(crate) final_state: GameState,
    pub(crate) score: u32,
    pub(crate) elapsed_seconds: f32,
    pub(crate) ticks: u64,
    pub(crate) lane_changes: u32,
    pub(crate) jumps: u32,
    pub(crate) rejected_jumps: u32,
    pub(crate) obstacles_spawned: u32,
    pub(crate) replay_digest: Option<String>,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_headless(&app.config, &app.tuning) {
        Ok(summary) => match serde_json::to_string(&summary) {
            Ok(json) => {
                info!(summary = %json, "run_summary");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(error = %AppError::Summary(err), "run_failed");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!(error = %err, "run_failed");
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn run_headless(config: &HostConfig, tuning: &Tuning) -> Result<RunSummary, AppError> {
    let session = Session::new(tuning.clone(), config.seed)?;
    let mut driver = FrameDriver::new(
        session,
        LoopConfig {
            record_replay: config.replay_out.is_some(),
            ..LoopConfig::default()
        },
    );
    let mut pilot = Autopilot::new(tuning.lane_count);
    let mut summary = RunSummary {
        character: config.character,
        seed: config.seed,
        final_state: GameState::Idle,
        score: 0,
        elapsed_seconds: 0.0,
        ticks: 0,
        lane_changes: 0,
        jumps: 0,
        rejected_jumps: 0,
        obstacles_spawned: 0,
        replay_digest: None,
    };

    driver.start(config.character)?;
    while driver.sim_time() < config.run_duration {
        let view = driver.session().render_view();
        let charges = driver.session().jump_resource().charges();
        for (action, state) in pilot.plan(&view, charges) {
            driver.handle_key(action, state);
        }

        let report = driver.frame(config.frame);
        tally_events(&mut summary, &report.events);
        if let TickOutcome::GameOver { .. } = report.outcome {
            break;
        }
    }

    let session = driver.session();
    summary.final_state = session.state();
    summary.score = session.score();
    summary.elapsed_seconds = session.elapsed_seconds();
    summary.ticks = session.ticks();

    if let Some(path) = &config.replay_out {
        if let Some(log) = driver.take_replay() {
            log.save(path)?;
            let outcome = replay::run(&log, tuning)?;
            if outcome.final_snapshot == driver.session().snapshot() {
                info!(digest = %outcome.digest, ticks = outcome.ticks, "replay_verified");
            } else {
                warn!(digest = %outcome.digest, "replay_diverged");
            }
            summary.replay_digest = Some(outcome.digest);
        }
    }

    Ok(summary)
}

fn tally_events(summary: &mut RunSummary, events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::LaneChanged(_) => summary.lane_changes += 1,
            SessionEvent::Jumped { .. } => summary.jumps += 1,
            SessionEvent::JumpRejected => summary.rejected_jumps += 1,
            SessionEvent::ObstacleSpawned { .. } => summary.obstacles_spawned += 1,
            _ => {}
        }
    }
}
