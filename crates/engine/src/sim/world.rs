use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldSegment {
    pub origin_z: f32,
}

/// Two road segments leapfrogging each other along the travel axis.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldScroller {
    segments: [WorldSegment; 2],
    segment_length: f32,
}

impl WorldScroller {
    pub fn new(segment_length: f32) -> Self {
        Self {
            segments: initial_segments(segment_length),
            segment_length,
        }
    }

    pub fn segments(&self) -> &[WorldSegment; 2] {
        &self.segments
    }

    pub fn reset(&mut self) {
        self.segments = initial_segments(self.segment_length);
    }

    /// Moves every segment that is fully behind the camera ahead of the other one.
    /// Returns how many segments were recycled.
    pub fn tick(&mut self, camera_z: f32) -> usize {
        let half = self.segment_length * 0.5;
        let mut recycled = 0;
        for segment in &mut self.segments {
            if segment.origin_z > camera_z + half {
                segment.origin_z -= 2.0 * self.segment_length;
                recycled += 1;
            }
        }
        recycled
    }

    pub fn all_finite(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| segment.origin_z.is_finite())
    }
}

fn initial_segments(segment_length: f32) -> [WorldSegment; 2] {
    [
        WorldSegment { origin_z: 0.0 },
        WorldSegment {
            origin_z: -segment_length,
        },
    ]
}
