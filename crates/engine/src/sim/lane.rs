use serde::{Deserialize, Serialize};

use crate::math::smooth_toward;
use crate::tuning::Tuning;

use super::session::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneDirection {
    Left,
    Right,
}

/// Held lateral input as reported by the host each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneInput {
    #[default]
    None,
    Left,
    Right,
}

impl LaneInput {
    pub fn direction(self) -> Option<LaneDirection> {
        match self {
            Self::None => None,
            Self::Left => Some(LaneDirection::Left),
            Self::Right => Some(LaneDirection::Right),
        }
    }
}

impl From<LaneDirection> for LaneInput {
    fn from(direction: LaneDirection) -> Self {
        match direction {
            LaneDirection::Left => Self::Left,
            LaneDirection::Right => Self::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneChange {
    pub from: u32,
    pub to: u32,
}

/// Latches a lane request while the key is held and commits it on release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneModel {
    held: LaneInput,
    pending: Option<LaneDirection>,
}

impl LaneModel {
    pub fn set_input(&mut self, input: LaneInput) {
        self.held = input;
        if let Some(direction) = input.direction() {
            self.pending = Some(direction);
        }
    }

    pub fn request_lane_change(&mut self, direction: LaneDirection) {
        self.set_input(direction.into());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Commits the latched request once nothing is held. Returns the change only
    /// when the lane index actually moved.
    pub fn resolve(&mut self, player: &mut PlayerState, tuning: &Tuning) -> Option<LaneChange> {
        if self.held != LaneInput::None {
            return None;
        }
        let direction = self.pending.take()?;
        let from = player.lane;
        let to = match direction {
            LaneDirection::Left => from.saturating_sub(1),
            LaneDirection::Right => from.saturating_add(1).min(tuning.max_lane()),
        };
        if to == from {
            return None;
        }
        player.lane = to;
        Some(LaneChange { from, to })
    }

    pub fn smooth_offset(player: &mut PlayerState, tuning: &Tuning, rate: f32, dt: f32) {
        let target = tuning.lane_center_x(player.lane);
        player.lateral_offset = smooth_toward(player.lateral_offset, target, rate, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_player(tuning: &Tuning) -> PlayerState {
        PlayerState::spawn(tuning)
    }

    #[test]
    fn held_request_commits_only_on_release() {
        let tuning = Tuning::default();
        let mut player = centered_player(&tuning);
        let mut lanes = LaneModel::default();

        lanes.set_input(LaneInput::Right);
        assert_eq!(lanes.resolve(&mut player, &tuning), None);
        assert_eq!(lanes.resolve(&mut player, &tuning), None);
        assert_eq!(player.lane, 1);

        lanes.set_input(LaneInput::None);
        assert_eq!(
            lanes.resolve(&mut player, &tuning),
            Some(LaneChange { from: 1, to: 2 })
        );
        assert_eq!(player.lane, 2);
        assert_eq!(lanes.resolve(&mut player, &tuning), None);
    }

    #[test]
    fn tap_between_ticks_is_not_lost() {
        let tuning = Tuning::default();
        let mut player = centered_player(&tuning);
        let mut lanes = LaneModel::default();

        lanes.request_lane_change(LaneDirection::Left);
        lanes.set_input(LaneInput::None);

        assert_eq!(
            lanes.resolve(&mut player, &tuning),
            Some(LaneChange { from: 1, to: 0 })
        );
    }

    #[test]
    fn last_held_direction_wins_and_moves_exactly_one_lane() {
        let tuning = Tuning::default();
        let mut player = centered_player(&tuning);
        let mut lanes = LaneModel::default();

        lanes.set_input(LaneInput::Right);
        lanes.resolve(&mut player, &tuning);
        lanes.set_input(LaneInput::Left);
        lanes.resolve(&mut player, &tuning);
        lanes.set_input(LaneInput::None);

        assert_eq!(
            lanes.resolve(&mut player, &tuning),
            Some(LaneChange { from: 1, to: 0 })
        );
        assert_eq!(lanes.resolve(&mut player, &tuning), None);
    }

    #[test]
    fn boundary_lane_requests_are_clamped_silently() {
        let tuning = Tuning::default();
        let mut player = centered_player(&tuning);
        let mut lanes = LaneModel::default();

        for _ in 0..5 {
            lanes.request_lane_change(LaneDirection::Right);
            lanes.set_input(LaneInput::None);
            lanes.resolve(&mut player, &tuning);
        }
        assert_eq!(player.lane, tuning.max_lane());

        for _ in 0..5 {
            lanes.request_lane_change(LaneDirection::Left);
            lanes.set_input(LaneInput::None);
            lanes.resolve(&mut player, &tuning);
        }
        assert_eq!(player.lane, 0);
    }

    #[test]
    fn single_lane_track_never_moves() {
        let tuning = Tuning {
            lane_count: 1,
            ..Tuning::default()
        };
        let mut player = centered_player(&tuning);
        let mut lanes = LaneModel::default();
        lanes.request_lane_change(LaneDirection::Right);
        lanes.set_input(LaneInput::None);
        assert_eq!(lanes.resolve(&mut player, &tuning), None);
        assert_eq!(player.lane, 0);
    }

    #[test]
    fn offset_approaches_lane_center_without_snapping() {
        let tuning = Tuning::default();
        let mut player = centered_player(&tuning);
        player.lane = 2;

        LaneModel::smooth_offset(&mut player, &tuning, 10.0, 1.0 / 60.0);
        assert!(player.lateral_offset > 0.0);
        assert!(player.lateral_offset < 3.0);

        for _ in 0..120 {
            LaneModel::smooth_offset(&mut player, &tuning, 10.0, 1.0 / 60.0);
        }
        assert!((player.lateral_offset - 3.0).abs() < 0.001);
    }
}
