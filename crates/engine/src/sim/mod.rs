mod camera;
mod collision;
mod events;
mod jump;
mod lane;
mod obstacles;
mod session;
mod spawner;
mod world;

pub use camera::CameraRig;
pub use collision::{check_collision, player_volume};
pub use events::{EventBus, JumpResourceView, SessionEvent, SessionSnapshot};
pub use jump::JumpResource;
pub use lane::{LaneChange, LaneDirection, LaneInput, LaneModel};
pub use obstacles::{
    Obstacle, ObstacleDims, ObstacleId, ObstacleIdAllocator, ObstacleKind, ObstaclePool,
    PruneOutcome, ALL_OBSTACLE_KINDS,
};
pub use session::{
    GameState, ObstacleView, PlayerState, RenderView, Session, TickOutcome, TransitionError,
};
pub use spawner::{ObstacleSpawner, SpawnRequest};
pub use world::{WorldScroller, WorldSegment};
