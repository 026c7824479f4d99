use engine::{InputAction, KeyState, LaneDirection, RenderView};

const LOOKAHEAD_UNITS: f32 = 45.0;
const REAR_CLEARANCE_UNITS: f32 = 4.0;
const JUMP_TRIGGER_UNITS: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Cruising,
    HoldingLane(LaneDirection),
    HoldingJump,
}

/// Scripted player for the headless host. It dodges into a free neighbouring
/// lane when something is coming and jumps when boxed in.
#[derive(Debug)]
pub(crate) struct Autopilot {
    lane_count: u32,
    phase: Phase,
}

impl Autopilot {
    pub(crate) fn new(lane_count: u32) -> Self {
        Self {
            lane_count,
            phase: Phase::Cruising,
        }
    }

    /// Key transitions to feed the driver before the next frame.
    pub(crate) fn plan(&mut self, view: &RenderView, charges: u32) -> Vec<(InputAction, KeyState)> {
        match self.phase {
            Phase::HoldingLane(direction) => {
                self.phase = Phase::Cruising;
                return vec![(lane_action(direction), KeyState::Released)];
            }
            Phase::HoldingJump => {
                self.phase = Phase::Cruising;
                return vec![(InputAction::Jump, KeyState::Released)];
            }
            Phase::Cruising => {}
        }

        let Some(distance) = nearest_threat(view, view.lane) else {
            return Vec::new();
        };

        if let Some(direction) = self.free_neighbour(view) {
            self.phase = Phase::HoldingLane(direction);
            return vec![(lane_action(direction), KeyState::Pressed)];
        }

        if distance <= JUMP_TRIGGER_UNITS && !view.is_airborne && charges > 0 {
            self.phase = Phase::HoldingJump;
            return vec![(InputAction::Jump, KeyState::Pressed)];
        }
        Vec::new()
    }

    fn free_neighbour(&self, view: &RenderView) -> Option<LaneDirection> {
        let mut candidates = Vec::with_capacity(2);
        if view.lane > 0 {
            candidates.push((LaneDirection::Left, view.lane - 1));
        }
        if view.lane + 1 < self.lane_count {
            candidates.push((LaneDirection::Right, view.lane + 1));
        }
        candidates
            .into_iter()
            .find(|(_, lane)| nearest_threat(view, *lane).is_none())
            .map(|(direction, _)| direction)
    }
}

fn lane_action(direction: LaneDirection) -> InputAction {
    match direction {
        LaneDirection::Left => InputAction::MoveLeft,
        LaneDirection::Right => InputAction::MoveRight,
    }
}

/// Distance to the closest obstacle in `lane` inside the danger window.
fn nearest_threat(view: &RenderView, lane: u32) -> Option<f32> {
    let player_z = view.player.z;
    view.obstacles
        .iter()
        .filter(|obstacle| obstacle.lane == lane)
        .map(|obstacle| player_z - obstacle.position.z)
        .filter(|distance| *distance <= LOOKAHEAD_UNITS && *distance >= -REAR_CLEARANCE_UNITS)
        .min_by(|a, b| a.total_cmp(b))
}
