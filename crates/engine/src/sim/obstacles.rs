use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

#[derive(Debug, Default)]
pub struct ObstacleIdAllocator {
    next: u64,
}

impl ObstacleIdAllocator {
    pub fn allocate(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Sedan,
    Suv,
    Truck,
}

pub const ALL_OBSTACLE_KINDS: [ObstacleKind; 3] =
    [ObstacleKind::Sedan, ObstacleKind::Suv, ObstacleKind::Truck];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleDims {
    pub half_width: f32,
    pub height: f32,
    pub half_length: f32,
}

impl ObstacleKind {
    pub fn dims(self) -> ObstacleDims {
        match self {
            Self::Sedan => ObstacleDims {
                half_width: 0.8,
                height: 1.04,
                half_length: 1.25,
            },
            Self::Suv => ObstacleDims {
                half_width: 0.9,
                height: 1.39,
                half_length: 1.75,
            },
            Self::Truck => ObstacleDims {
                half_width: 1.1,
                height: 1.2,
                half_length: 2.5,
            },
        }
    }
}

/// An oncoming car. Its lane and lateral position are fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub lane: u32,
    pub position: Vec3,
}

impl Obstacle {
    pub fn bounding_volume(&self) -> Aabb {
        let dims = self.kind.dims();
        Aabb::from_footprint(
            self.position.x,
            self.position.y,
            self.position.z,
            dims.half_width,
            dims.height,
            dims.half_length,
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PruneOutcome {
    pub scored: Vec<Obstacle>,
    pub remaining: usize,
}

impl PruneOutcome {
    /// A prune pass awards at most one point regardless of how many cars left.
    pub fn score_increment(&self) -> u32 {
        u32::from(!self.scored.is_empty())
    }
}

/// Active obstacles in insertion order. Ids are allocated monotonically, so the
/// backing list stays sorted by id.
#[derive(Debug, Default)]
pub struct ObstaclePool {
    allocator: ObstacleIdAllocator,
    obstacles: Vec<Obstacle>,
}

impl ObstaclePool {
    pub fn spawn(&mut self, kind: ObstacleKind, lane: u32, position: Vec3) -> ObstacleId {
        let id = self.allocator.allocate();
        self.obstacles.push(Obstacle {
            id,
            kind,
            lane,
            position,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles
            .binary_search_by_key(&id, |obstacle| obstacle.id)
            .ok()
            .map(|index| &self.obstacles[index])
    }

    pub fn advance(&mut self, distance: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.position.z += distance;
        }
    }

    pub fn prune_behind(&mut self, camera_z: f32, margin: f32) -> PruneOutcome {
        let limit = camera_z + margin;
        let mut scored = Vec::new();
        self.obstacles.retain(|obstacle| {
            if obstacle.position.z > limit {
                scored.push(*obstacle);
                false
            } else {
                true
            }
        });
        PruneOutcome {
            scored,
            remaining: self.obstacles.len(),
        }
    }

    pub fn all_finite(&self) -> bool {
        self.obstacles
            .iter()
            .all(|obstacle| obstacle.position.is_finite())
    }

    /// Drops every obstacle and restarts id allocation.
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.allocator.reset();
    }
}
