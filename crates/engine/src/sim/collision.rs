use crate::math::Aabb;
use crate::tuning::CharacterProfile;

use super::obstacles::{Obstacle, ObstaclePool};
use super::session::PlayerState;

pub fn player_volume(player: &PlayerState, profile: &CharacterProfile) -> Aabb {
    Aabb::from_footprint(
        player.lateral_offset,
        player.vertical_offset,
        player.world_z,
        profile.half_width,
        profile.body_height,
        profile.half_depth,
    )
}

/// First obstacle, in insertion order, that the player box hits. A player whose
/// feet are at or above the roof of a car clears it even when the boxes touch.
pub fn check_collision<'a>(player: &Aabb, obstacles: &'a ObstaclePool) -> Option<&'a Obstacle> {
    obstacles.iter().find(|obstacle| {
        let volume = obstacle.bounding_volume();
        player.intersects(&volume) && player.min.y < volume.max.y
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::sim::obstacles::ObstacleKind;
    use crate::tuning::{CharacterVariant, Tuning};

    fn grounded_player_at(z: f32) -> PlayerState {
        let mut player = PlayerState::spawn(&Tuning::default());
        player.world_z = z;
        player
    }

    fn profile() -> CharacterProfile {
        CharacterVariant::FuturoBot.profile()
    }

    #[test]
    fn same_lane_same_depth_collides() {
        let mut pool = ObstaclePool::default();
        let id = pool.spawn(ObstacleKind::Sedan, 1, Vec3::new(0.0, 0.0, -20.0));
        let player = grounded_player_at(-20.0);

        let hit = check_collision(&player_volume(&player, &profile()), &pool);
        assert_eq!(hit.map(|obstacle| obstacle.id), Some(id));
    }

    #[test]
    fn adjacent_lane_does_not_collide() {
        let mut pool = ObstaclePool::default();
        pool.spawn(ObstacleKind::Truck, 0, Vec3::new(-3.0, 0.0, -20.0));
        let player = grounded_player_at(-20.0);

        assert!(check_collision(&player_volume(&player, &profile()), &pool).is_none());
    }

    #[test]
    fn player_mid_lane_change_can_clip_a_neighbour() {
        let mut pool = ObstaclePool::default();
        let id = pool.spawn(ObstacleKind::Truck, 2, Vec3::new(3.0, 0.0, -20.0));
        let mut player = grounded_player_at(-20.0);
        player.lateral_offset = 1.2;

        let hit = check_collision(&player_volume(&player, &profile()), &pool);
        assert_eq!(hit.map(|obstacle| obstacle.id), Some(id));
    }

    #[test]
    fn player_above_the_roof_is_not_a_collision() {
        let mut pool = ObstaclePool::default();
        pool.spawn(ObstacleKind::Suv, 1, Vec3::new(0.0, 0.0, -20.0));
        let mut player = grounded_player_at(-20.0);

        player.vertical_offset = 1.39;
        assert!(check_collision(&player_volume(&player, &profile()), &pool).is_none());

        player.vertical_offset = 1.3;
        assert!(check_collision(&player_volume(&player, &profile()), &pool).is_some());
    }

    #[test]
    fn depth_separation_prevents_collision() {
        let mut pool = ObstaclePool::default();
        pool.spawn(ObstacleKind::Sedan, 1, Vec3::new(0.0, 0.0, -30.0));
        let player = grounded_player_at(-20.0);
        assert!(check_collision(&player_volume(&player, &profile()), &pool).is_none());
    }

    #[test]
    fn ties_resolve_to_the_oldest_obstacle() {
        let mut pool = ObstaclePool::default();
        let first = pool.spawn(ObstacleKind::Sedan, 1, Vec3::new(0.0, 0.0, -20.5));
        pool.spawn(ObstacleKind::Truck, 1, Vec3::new(0.0, 0.0, -20.0));
        let player = grounded_player_at(-20.0);

        let hit = check_collision(&player_volume(&player, &profile()), &pool);
        assert_eq!(hit.map(|obstacle| obstacle.id), Some(first));
    }
}
