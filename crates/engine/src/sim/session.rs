use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::math::Vec3;
use crate::tuning::{CharacterProfile, CharacterVariant, Tuning, TuningError};

use super::camera::CameraRig;
use super::collision::{check_collision, player_volume};
use super::events::{EventBus, JumpResourceView, SessionEvent, SessionSnapshot};
use super::jump::JumpResource;
use super::lane::{LaneDirection, LaneInput, LaneModel};
use super::obstacles::{Obstacle, ObstacleId, ObstacleKind, ObstaclePool};
use super::spawner::ObstacleSpawner;
use super::world::{WorldScroller, WorldSegment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Idle,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub lane: u32,
    pub lateral_offset: f32,
    /// Height above the road; zero while grounded.
    pub vertical_offset: f32,
    pub vertical_velocity: f32,
    pub is_airborne: bool,
    pub world_z: f32,
}

impl PlayerState {
    pub fn spawn(tuning: &Tuning) -> Self {
        let lane = tuning.center_lane();
        Self {
            lane,
            lateral_offset: tuning.lane_center_x(lane),
            vertical_offset: 0.0,
            vertical_velocity: 0.0,
            is_airborne: false,
            world_z: 0.0,
        }
    }

    fn is_finite(&self) -> bool {
        self.lateral_offset.is_finite()
            && self.vertical_offset.is_finite()
            && self.vertical_velocity.is_finite()
            && self.world_z.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a run is already in progress")]
    AlreadyPlaying,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not playing; nothing moved.
    Inactive(GameState),
    /// Non-positive or non-finite delta.
    NoOp,
    /// State was not finite; the tick was dropped.
    Skipped,
    Advanced,
    GameOver { score: u32, obstacle: ObstacleId },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub lane: u32,
    pub position: Vec3,
}

/// Read-only picture of the world for whoever draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderView {
    pub game_state: GameState,
    pub character: CharacterVariant,
    pub lane: u32,
    pub player: Vec3,
    pub is_airborne: bool,
    pub camera: Vec3,
    pub segments: [WorldSegment; 2],
    pub obstacles: Vec<ObstacleView>,
}

#[derive(Debug)]
pub struct Session {
    tuning: Tuning,
    character: CharacterVariant,
    profile: CharacterProfile,
    state: GameState,
    elapsed: f32,
    speed: f32,
    score: u32,
    ticks: u64,
    player: PlayerState,
    lanes: LaneModel,
    jump_requested: bool,
    jump: JumpResource,
    spawner: ObstacleSpawner,
    obstacles: ObstaclePool,
    world: WorldScroller,
    camera: CameraRig,
    events: EventBus,
    seed: u64,
    runs_started: u64,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let character = CharacterVariant::default();
        Ok(Self {
            character,
            profile: character.profile(),
            state: GameState::Idle,
            elapsed: 0.0,
            speed: tuning.base_speed,
            score: 0,
            ticks: 0,
            player: PlayerState::spawn(&tuning),
            lanes: LaneModel::default(),
            jump_requested: false,
            jump: JumpResource::new(&tuning),
            spawner: ObstacleSpawner::new(&tuning, seed),
            obstacles: ObstaclePool::default(),
            world: WorldScroller::new(tuning.segment_length),
            camera: CameraRig::new(&tuning),
            events: EventBus::default(),
            seed,
            runs_started: 0,
            tuning,
        })
    }

    /// Seed the spawner will use for the next started run. The first run uses
    /// the construction seed, so a recorded run can be replayed from it.
    pub fn next_run_seed(&self) -> u64 {
        self.seed.wrapping_add(self.runs_started)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn character(&self) -> CharacterVariant {
        self.character
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn jump_resource(&self) -> &JumpResource {
        &self.jump
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn obstacles(&self) -> &ObstaclePool {
        &self.obstacles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    pub fn start_game(&mut self, character: CharacterVariant) -> Result<(), TransitionError> {
        match self.state {
            GameState::Playing => return Err(TransitionError::AlreadyPlaying),
            GameState::Idle | GameState::GameOver => {}
        }
        self.reset_run();
        self.runs_started = self.runs_started.saturating_add(1);
        self.character = character;
        self.profile = character.profile();
        self.state = GameState::Playing;
        self.events.emit(SessionEvent::Started { character });
        self.emit_jump_resource();
        self.emit_score();
        info!(
            character = %character,
            lanes = self.tuning.lane_count,
            "session_started"
        );
        Ok(())
    }

    /// Back to Idle with every piece of run state cleared.
    pub fn restart_game(&mut self) {
        let previous = self.state;
        self.reset_run();
        self.state = GameState::Idle;
        self.events.emit(SessionEvent::Restarted);
        self.emit_jump_resource();
        self.emit_score();
        info!(previous = ?previous, "session_restarted");
    }

    pub fn set_lane_input(&mut self, input: LaneInput) {
        if self.state != GameState::Playing {
            return;
        }
        self.lanes.set_input(input);
    }

    pub fn request_lane_change(&mut self, direction: LaneDirection) {
        self.set_lane_input(direction.into());
    }

    /// Queues a jump for the next tick. Rejections are reported as events there.
    pub fn request_jump(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.jump_requested = true;
    }

    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if self.state != GameState::Playing {
            return TickOutcome::Inactive(self.state);
        }
        if !dt.is_finite() || dt <= 0.0 {
            debug!(dt, "tick_ignored");
            return TickOutcome::NoOp;
        }
        if let Some(reason) = self.non_finite_state() {
            warn!(tick = self.ticks, reason, "tick_skipped");
            return TickOutcome::Skipped;
        }

        self.ticks += 1;
        self.elapsed += dt;
        self.speed = self.tuning.speed_at(self.elapsed);
        if self.jump.tick(dt) {
            self.emit_jump_resource();
        }

        self.resolve_lane(dt);
        self.integrate_vertical(dt);
        self.player.world_z -= self.speed * dt;
        self.camera.follow(
            self.player.lateral_offset,
            self.player.world_z,
            &self.tuning,
            dt,
        );
        self.world.tick(self.camera.position.z);
        self.spawn_obstacle(dt);
        self.advance_obstacles(dt);

        let volume = player_volume(&self.player, &self.profile);
        let Some(hit) = check_collision(&volume, &self.obstacles).map(|obstacle| obstacle.id)
        else {
            return TickOutcome::Advanced;
        };
        self.state = GameState::GameOver;
        self.events.emit(SessionEvent::GameOver {
            score: self.score,
            obstacle: hit,
        });
        info!(
            score = self.score,
            obstacle = hit.0,
            elapsed_seconds = self.elapsed,
            "game_over"
        );
        TickOutcome::GameOver {
            score: self.score,
            obstacle: hit,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game_state: self.state,
            score: self.score,
            jump: self.jump_view(),
        }
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            game_state: self.state,
            character: self.character,
            lane: self.player.lane,
            player: Vec3::new(
                self.player.lateral_offset,
                self.profile.ground_height + self.player.vertical_offset,
                self.player.world_z,
            ),
            is_airborne: self.player.is_airborne,
            camera: self.camera.position,
            segments: *self.world.segments(),
            obstacles: self
                .obstacles
                .iter()
                .map(|obstacle| ObstacleView {
                    id: obstacle.id,
                    kind: obstacle.kind,
                    lane: obstacle.lane,
                    position: obstacle.position,
                })
                .collect(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    fn reset_run(&mut self) {
        self.elapsed = 0.0;
        self.speed = self.tuning.base_speed;
        self.score = 0;
        self.ticks = 0;
        self.player = PlayerState::spawn(&self.tuning);
        self.lanes.reset();
        self.jump_requested = false;
        self.jump.reset();
        self.spawner.reset(&self.tuning, self.next_run_seed());
        self.obstacles.clear();
        self.world.reset();
        self.camera.reset(&self.tuning);
        self.events.clear();
    }

    fn resolve_lane(&mut self, dt: f32) {
        if let Some(change) = self.lanes.resolve(&mut self.player, &self.tuning) {
            debug!(from = change.from, to = change.to, "lane_changed");
            self.events.emit(SessionEvent::LaneChanged(change));
        }
        LaneModel::smooth_offset(
            &mut self.player,
            &self.tuning,
            self.profile.lane_change_rate,
            dt,
        );
    }

    fn integrate_vertical(&mut self, dt: f32) {
        if std::mem::take(&mut self.jump_requested) && !self.player.is_airborne {
            if self.jump.request_jump() {
                self.player.vertical_velocity = self.profile.launch_velocity();
                self.player.is_airborne = true;
                self.events.emit(SessionEvent::Jumped {
                    charges_left: self.jump.charges(),
                });
                self.emit_jump_resource();
            } else {
                debug!(
                    cooldown_remaining = self.jump.cooldown_remaining(),
                    "jump_rejected"
                );
                self.events.emit(SessionEvent::JumpRejected);
            }
        }

        if !self.player.is_airborne {
            return;
        }
        self.player.vertical_velocity -= self.profile.gravity * dt;
        self.player.vertical_offset += self.player.vertical_velocity * dt;
        if self.player.vertical_offset <= 0.0 {
            self.player.vertical_offset = 0.0;
            self.player.vertical_velocity = 0.0;
            self.player.is_airborne = false;
        }
    }

    fn spawn_obstacle(&mut self, dt: f32) {
        let Some(request) =
            self.spawner
                .tick(dt, self.elapsed, self.player.world_z, &self.tuning)
        else {
            return;
        };
        let id = self
            .obstacles
            .spawn(request.kind, request.lane, request.position);
        debug!(
            id = id.0,
            kind = ?request.kind,
            lane = request.lane,
            z = request.position.z,
            "obstacle_spawned"
        );
        self.events.emit(SessionEvent::ObstacleSpawned {
            id,
            kind: request.kind,
            lane: request.lane,
        });
    }

    fn advance_obstacles(&mut self, dt: f32) {
        self.obstacles
            .advance(self.speed * dt * self.tuning.obstacle_speed_multiplier);
        let pruned = self
            .obstacles
            .prune_behind(self.camera.position.z, self.tuning.prune_margin);
        let increment = pruned.score_increment();
        if increment == 0 {
            return;
        }
        self.score = self.score.saturating_add(increment);
        debug!(
            score = self.score,
            pruned = pruned.scored.len(),
            remaining = pruned.remaining,
            "obstacles_pruned"
        );
        self.emit_score();
    }

    fn non_finite_state(&self) -> Option<&'static str> {
        if !self.player.is_finite() {
            return Some("player");
        }
        if !self.camera.position.is_finite() {
            return Some("camera");
        }
        if !self.obstacles.all_finite() {
            return Some("obstacle");
        }
        if !self.world.all_finite() {
            return Some("world");
        }
        None
    }

    fn jump_view(&self) -> JumpResourceView {
        JumpResourceView {
            charges: self.jump.charges(),
            cooldown_remaining: self.jump.cooldown_remaining(),
        }
    }

    fn emit_jump_resource(&mut self) {
        let view = self.jump_view();
        self.events.emit(SessionEvent::JumpResourceChanged(view));
    }

    fn emit_score(&mut self) {
        self.events.emit(SessionEvent::ScoreChanged { score: self.score });
    }

    #[cfg(test)]
    pub(crate) fn insert_obstacle_for_test(
        &mut self,
        kind: ObstacleKind,
        lane: u32,
        z: f32,
    ) -> ObstacleId {
        let position = Vec3::new(self.tuning.lane_center_x(lane), 0.0, z);
        self.obstacles.spawn(kind, lane, position)
    }
}
