mod input;
mod loop_runner;
mod metrics;
mod snapshot;

pub use input::{InputAction, InputCollector, InputSnapshot, KeyState};
pub use loop_runner::{FrameDriver, FrameReport, LoopConfig};
pub use metrics::RunMetricsSnapshot;
pub use snapshot::SnapshotHandle;
