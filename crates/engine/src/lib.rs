pub mod app;
pub mod math;
pub mod replay;
pub mod sim;
pub mod tuning;

pub use app::{
    FrameDriver, FrameReport, InputAction, InputCollector, InputSnapshot, KeyState, LoopConfig,
    RunMetricsSnapshot, SnapshotHandle,
};
pub use math::{Aabb, Vec3};
pub use replay::{ReplayError, ReplayFrame, ReplayLog, ReplayOutcome, ReplayRecorder};
pub use sim::{
    GameState, JumpResourceView, LaneDirection, LaneInput, ObstacleId, ObstacleKind, ObstacleView,
    RenderView, Session, SessionEvent, SessionSnapshot, TickOutcome, TransitionError,
};
pub use tuning::{CharacterProfile, CharacterVariant, Tuning, TuningError, UnknownCharacter};
