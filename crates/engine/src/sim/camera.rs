use crate::math::{smooth_toward, Vec3};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
}

impl CameraRig {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: Vec3::new(0.0, tuning.camera_height, tuning.camera_follow_distance),
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Lateral follow is smoothed; height and trailing distance are rigid.
    pub fn follow(&mut self, player_x: f32, player_z: f32, tuning: &Tuning, dt: f32) {
        self.position.x = smooth_toward(self.position.x, player_x, tuning.camera_lateral_rate, dt);
        self.position.y = tuning.camera_height;
        self.position.z = player_z + tuning.camera_follow_distance;
    }
}
