use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::math::Vec3;
use crate::tuning::Tuning;

use super::obstacles::{ObstacleKind, ALL_OBSTACLE_KINDS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: ObstacleKind,
    pub lane: u32,
    pub position: Vec3,
}

/// Countdown-driven obstacle spawner. The interval shrinks with elapsed play
/// time down to a floor, plus a uniform jitter.
#[derive(Debug)]
pub struct ObstacleSpawner {
    countdown: f32,
    rng: StdRng,
}

impl ObstacleSpawner {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            countdown: tuning.initial_spawn_delay,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn reset(&mut self, tuning: &Tuning, seed: u64) {
        self.countdown = tuning.initial_spawn_delay;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn tick(
        &mut self,
        dt: f32,
        elapsed_seconds: f32,
        player_z: f32,
        tuning: &Tuning,
    ) -> Option<SpawnRequest> {
        self.countdown -= dt;
        if self.countdown > 0.0 {
            return None;
        }

        let lane = self.rng.gen_range(0..tuning.lane_count);
        let kind = ALL_OBSTACLE_KINDS[self.rng.gen_range(0..ALL_OBSTACLE_KINDS.len())];
        let jitter = (self.rng.gen::<f32>() - 0.5) * tuning.spawn_jitter;
        self.countdown = tuning.spawn_interval_at(elapsed_seconds) + jitter;

        Some(SpawnRequest {
            kind,
            lane,
            position: Vec3::new(
                tuning.lane_center_x(lane),
                0.0,
                player_z - tuning.spawn_distance,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_first_spawn(spawner: &mut ObstacleSpawner, tuning: &Tuning) -> (u32, SpawnRequest) {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if let Some(request) = spawner.tick(0.1, 0.0, 0.0, tuning) {
                return (ticks, request);
            }
            assert!(ticks < 1_000, "spawner never fired");
        }
    }

    #[test]
    fn first_spawn_waits_for_initial_delay() {
        let tuning = Tuning::default();
        let mut spawner = ObstacleSpawner::new(&tuning, 7);
        let (ticks, request) = drain_first_spawn(&mut spawner, &tuning);
        assert!((24..=26).contains(&ticks), "fired after {ticks} ticks");
        assert!((request.position.z + 150.0).abs() < 0.0001);
        assert!(request.lane < tuning.lane_count);
        assert!((request.position.x - tuning.lane_center_x(request.lane)).abs() < 0.0001);
    }

    #[test]
    fn reset_interval_stays_within_jitter_band() {
        let tuning = Tuning::default();
        let mut spawner = ObstacleSpawner::new(&tuning, 11);
        for _ in 0..200 {
            let fired = spawner.tick(10.0, 0.0, 0.0, &tuning);
            assert!(fired.is_some());
            let countdown = spawner.countdown();
            assert!(countdown >= 2.0 - 0.4 && countdown < 2.0 + 0.4, "{countdown}");
        }
    }

    #[test]
    fn late_game_interval_is_floored() {
        let tuning = Tuning::default();
        let mut spawner = ObstacleSpawner::new(&tuning, 3);
        for _ in 0..200 {
            spawner.tick(10.0, 10_000.0, 0.0, &tuning);
            let countdown = spawner.countdown();
            assert!(countdown >= 0.5 - 0.4 && countdown < 0.5 + 0.4, "{countdown}");
        }
    }

    #[test]
    fn spawn_is_relative_to_player_position() {
        let tuning = Tuning::default();
        let mut spawner = ObstacleSpawner::new(&tuning, 5);
        let request = spawner
            .tick(5.0, 0.0, -400.0, &tuning)
            .expect("countdown elapsed");
        assert!((request.position.z + 550.0).abs() < 0.0001);
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let tuning = Tuning::default();
        let mut a = ObstacleSpawner::new(&tuning, 42);
        let mut b = ObstacleSpawner::new(&tuning, 42);
        for step in 0..100 {
            let elapsed = step as f32;
            assert_eq!(
                a.tick(3.0, elapsed, 0.0, &tuning),
                b.tick(3.0, elapsed, 0.0, &tuning)
            );
        }
    }

    #[test]
    fn reset_with_same_seed_replays_the_sequence() {
        let tuning = Tuning::default();
        let mut spawner = ObstacleSpawner::new(&tuning, 8);
        let first: Vec<_> = (0..20)
            .map(|_| spawner.tick(3.0, 0.0, 0.0, &tuning))
            .collect();
        spawner.reset(&tuning, 8);
        assert!((spawner.countdown() - 2.5).abs() < 0.0001);
        let second: Vec<_> = (0..20)
            .map(|_| spawner.tick(3.0, 0.0, 0.0, &tuning))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn every_lane_and_kind_eventually_appears() {
        let tuning = Tuning::default();
        let mut spawner = ObstacleSpawner::new(&tuning, 99);
        let mut lanes = [false; 3];
        let mut kinds = [false; 3];
        for _ in 0..300 {
            if let Some(request) = spawner.tick(10.0, 0.0, 0.0, &tuning) {
                lanes[request.lane as usize] = true;
                let kind_index = ALL_OBSTACLE_KINDS
                    .iter()
                    .position(|kind| *kind == request.kind)
                    .expect("known kind");
                kinds[kind_index] = true;
            }
        }
        assert!(lanes.iter().all(|seen| *seen));
        assert!(kinds.iter().all(|seen| *seen));
    }
}
