use crate::sim::{LaneDirection, LaneInput, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

const ACTION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
        }
    }

    const fn lane_direction(self) -> Option<LaneDirection> {
        match self {
            InputAction::MoveLeft => Some(LaneDirection::Left),
            InputAction::MoveRight => Some(LaneDirection::Right),
            InputAction::Jump => None,
        }
    }
}

/// Input as the session sees it for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub lane: LaneInput,
    /// Latest lateral key press since the previous tick, even if already released.
    pub lane_tap: Option<LaneDirection>,
    pub jump_pressed: bool,
}

impl InputSnapshot {
    pub fn apply(self, session: &mut Session) {
        if let Some(direction) = self.lane_tap {
            session.request_lane_change(direction);
        }
        session.set_lane_input(self.lane);
        if self.jump_pressed {
            session.request_jump();
        }
    }
}

/// Collects key transitions between ticks. Lateral keys are level-triggered
/// with their press edges kept so a tap inside one frame still counts.
/// Jump is edge-triggered so holding it never repeats.
#[derive(Debug, Default)]
pub struct InputCollector {
    actions: ActionStates,
    lane_press_edge: Option<LaneDirection>,
    jump_pressed_edge: bool,
}

impl InputCollector {
    pub fn handle_key(&mut self, action: InputAction, state: KeyState) {
        let is_down = state == KeyState::Pressed;
        if is_down && !self.actions.is_down(action) {
            match action.lane_direction() {
                Some(direction) => self.lane_press_edge = Some(direction),
                None => self.jump_pressed_edge = true,
            }
        }
        self.actions.set(action, is_down);
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let lane = if self.actions.is_down(InputAction::MoveRight) {
            LaneInput::Right
        } else if self.actions.is_down(InputAction::MoveLeft) {
            LaneInput::Left
        } else {
            LaneInput::None
        };
        let snapshot = InputSnapshot {
            lane,
            lane_tap: self.lane_press_edge.take(),
            jump_pressed: self.jump_pressed_edge,
        };
        self.jump_pressed_edge = false;
        snapshot
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_press_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::default();
        input.handle_key(InputAction::Jump, KeyState::Pressed);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.jump_pressed);
        assert!(!second.jump_pressed);
    }

    #[test]
    fn held_jump_does_not_spam_press_edges() {
        let mut input = InputCollector::default();

        input.handle_key(InputAction::Jump, KeyState::Pressed);
        let first = input.snapshot_for_tick();

        input.handle_key(InputAction::Jump, KeyState::Pressed);
        let second = input.snapshot_for_tick();

        input.handle_key(InputAction::Jump, KeyState::Released);
        input.handle_key(InputAction::Jump, KeyState::Pressed);
        let third = input.snapshot_for_tick();

        assert!(first.jump_pressed);
        assert!(!second.jump_pressed);
        assert!(third.jump_pressed);
    }

    #[test]
    fn lateral_keys_are_level_triggered_and_right_wins() {
        let mut input = InputCollector::default();
        input.handle_key(InputAction::MoveLeft, KeyState::Pressed);
        assert_eq!(input.snapshot_for_tick().lane, LaneInput::Left);
        assert_eq!(input.snapshot_for_tick().lane, LaneInput::Left);

        input.handle_key(InputAction::MoveRight, KeyState::Pressed);
        assert_eq!(input.snapshot_for_tick().lane, LaneInput::Right);

        input.handle_key(InputAction::MoveRight, KeyState::Released);
        input.handle_key(InputAction::MoveLeft, KeyState::Released);
        assert_eq!(input.snapshot_for_tick().lane, LaneInput::None);
    }

    #[test]
    fn lateral_tap_inside_one_frame_is_kept_for_one_tick() {
        let mut input = InputCollector::default();
        input.handle_key(InputAction::MoveLeft, KeyState::Pressed);
        input.handle_key(InputAction::MoveLeft, KeyState::Released);

        let first = input.snapshot_for_tick();
        assert_eq!(first.lane, LaneInput::None);
        assert_eq!(first.lane_tap, Some(LaneDirection::Left));
        assert_eq!(input.snapshot_for_tick().lane_tap, None);
    }

    #[test]
    fn held_lateral_key_reports_a_single_press_edge() {
        let mut input = InputCollector::default();
        input.handle_key(InputAction::MoveRight, KeyState::Pressed);
        let first = input.snapshot_for_tick();

        input.handle_key(InputAction::MoveRight, KeyState::Pressed);
        let second = input.snapshot_for_tick();

        assert_eq!(first.lane_tap, Some(LaneDirection::Right));
        assert_eq!(second.lane_tap, None);
        assert_eq!(second.lane, LaneInput::Right);
    }

    #[test]
    fn release_all_drops_pending_edges() {
        let mut input = InputCollector::default();
        input.handle_key(InputAction::Jump, KeyState::Pressed);
        input.handle_key(InputAction::MoveLeft, KeyState::Pressed);
        input.release_all();

        assert_eq!(input.snapshot_for_tick(), InputSnapshot::default());
        assert!(!input.is_down(InputAction::MoveLeft));
    }
}
