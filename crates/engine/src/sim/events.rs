use serde::Serialize;

use crate::tuning::CharacterVariant;

use super::lane::LaneChange;
use super::obstacles::{ObstacleId, ObstacleKind};
use super::session::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JumpResourceView {
    pub charges: u32,
    pub cooldown_remaining: f32,
}

/// What the UI layer is allowed to see. Pushed one way after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub game_state: GameState,
    pub score: u32,
    pub jump: JumpResourceView,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started {
        character: CharacterVariant,
    },
    LaneChanged(LaneChange),
    Jumped {
        charges_left: u32,
    },
    JumpRejected,
    JumpResourceChanged(JumpResourceView),
    ObstacleSpawned {
        id: ObstacleId,
        kind: ObstacleKind,
        lane: u32,
    },
    ScoreChanged {
        score: u32,
    },
    GameOver {
        score: u32,
        obstacle: ObstacleId,
    },
    Restarted,
}

#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<SessionEvent>,
}

impl EventBus {
    pub fn emit(&mut self, event: SessionEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
