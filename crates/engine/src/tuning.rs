use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LANE_COUNT: u32 = 3;
pub const DEFAULT_LANE_WIDTH: f32 = 3.0;
pub const DEFAULT_MAX_JUMP_CHARGES: u32 = 2;
pub const DEFAULT_JUMP_COOLDOWN_SECONDS: f32 = 120.0;
pub const DEFAULT_BASE_SPEED: f32 = 8.0;
pub const DEFAULT_SPEED_RAMP: f32 = 0.1;
pub const DEFAULT_OBSTACLE_SPEED_MULTIPLIER: f32 = 1.5;
pub const DEFAULT_SPAWN_DISTANCE: f32 = 150.0;
pub const DEFAULT_INITIAL_SPAWN_DELAY: f32 = 2.5;
pub const DEFAULT_BASE_SPAWN_INTERVAL: f32 = 2.0;
pub const DEFAULT_MIN_SPAWN_INTERVAL: f32 = 0.5;
pub const DEFAULT_SPAWN_INTERVAL_RAMP: f32 = 0.02;
pub const DEFAULT_SPAWN_JITTER: f32 = 0.8;
pub const DEFAULT_SEGMENT_LENGTH: f32 = 200.0;
pub const DEFAULT_CAMERA_HEIGHT: f32 = 5.0;
pub const DEFAULT_CAMERA_FOLLOW_DISTANCE: f32 = 10.0;
pub const DEFAULT_CAMERA_LATERAL_RATE: f32 = 2.0;
pub const DEFAULT_PRUNE_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub lane_count: u32,
    pub lane_width: f32,
    pub max_jump_charges: u32,
    pub jump_cooldown_seconds: f32,
    pub base_speed: f32,
    pub speed_ramp: f32,
    pub obstacle_speed_multiplier: f32,
    pub spawn_distance: f32,
    pub initial_spawn_delay: f32,
    pub base_spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub spawn_interval_ramp: f32,
    pub spawn_jitter: f32,
    pub segment_length: f32,
    pub camera_height: f32,
    pub camera_follow_distance: f32,
    pub camera_lateral_rate: f32,
    pub prune_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            lane_width: DEFAULT_LANE_WIDTH,
            max_jump_charges: DEFAULT_MAX_JUMP_CHARGES,
            jump_cooldown_seconds: DEFAULT_JUMP_COOLDOWN_SECONDS,
            base_speed: DEFAULT_BASE_SPEED,
            speed_ramp: DEFAULT_SPEED_RAMP,
            obstacle_speed_multiplier: DEFAULT_OBSTACLE_SPEED_MULTIPLIER,
            spawn_distance: DEFAULT_SPAWN_DISTANCE,
            initial_spawn_delay: DEFAULT_INITIAL_SPAWN_DELAY,
            base_spawn_interval: DEFAULT_BASE_SPAWN_INTERVAL,
            min_spawn_interval: DEFAULT_MIN_SPAWN_INTERVAL,
            spawn_interval_ramp: DEFAULT_SPAWN_INTERVAL_RAMP,
            spawn_jitter: DEFAULT_SPAWN_JITTER,
            segment_length: DEFAULT_SEGMENT_LENGTH,
            camera_height: DEFAULT_CAMERA_HEIGHT,
            camera_follow_distance: DEFAULT_CAMERA_FOLLOW_DISTANCE,
            camera_lateral_rate: DEFAULT_CAMERA_LATERAL_RATE,
            prune_margin: DEFAULT_PRUNE_MARGIN,
        }
    }
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning json{}: {message}", format_parse_path(.path))]
    Parse { path: String, message: String },
    #[error("invalid tuning at {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

fn format_parse_path(path: &str) -> String {
    if path.is_empty() || path == "." {
        String::new()
    } else {
        format!(" at {path}")
    }
}

impl Tuning {
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let raw = fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TuningError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let tuning = serde_path_to_error::deserialize::<_, Tuning>(&mut deserializer).map_err(
            |error| {
                let path = error.path().to_string();
                TuningError::Parse {
                    path,
                    message: error.into_inner().to_string(),
                }
            },
        )?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(invalid("lane_count", "expected at least 1 lane"));
        }
        if self.max_jump_charges == 0 {
            return Err(invalid("max_jump_charges", "expected at least 1 charge"));
        }

        let positive_fields = [
            ("lane_width", self.lane_width),
            ("jump_cooldown_seconds", self.jump_cooldown_seconds),
            ("base_speed", self.base_speed),
            ("speed_ramp", self.speed_ramp),
            ("obstacle_speed_multiplier", self.obstacle_speed_multiplier),
            ("spawn_distance", self.spawn_distance),
            ("base_spawn_interval", self.base_spawn_interval),
            ("min_spawn_interval", self.min_spawn_interval),
            ("segment_length", self.segment_length),
            ("camera_lateral_rate", self.camera_lateral_rate),
        ];
        for (field, value) in positive_fields {
            require_finite(field, value)?;
            if value <= 0.0 {
                return Err(invalid(field, format!("expected a positive number, got {value}")));
            }
        }

        let non_negative_fields = [
            ("initial_spawn_delay", self.initial_spawn_delay),
            ("spawn_interval_ramp", self.spawn_interval_ramp),
            ("spawn_jitter", self.spawn_jitter),
            ("camera_follow_distance", self.camera_follow_distance),
            ("prune_margin", self.prune_margin),
        ];
        for (field, value) in non_negative_fields {
            require_finite(field, value)?;
            if value < 0.0 {
                return Err(invalid(field, format!("expected >= 0, got {value}")));
            }
        }
        require_finite("camera_height", self.camera_height)?;

        if self.min_spawn_interval > self.base_spawn_interval {
            return Err(invalid(
                "min_spawn_interval",
                format!(
                    "expected <= base_spawn_interval ({}), got {}",
                    self.base_spawn_interval, self.min_spawn_interval
                ),
            ));
        }
        if self.spawn_jitter >= 2.0 * self.min_spawn_interval {
            return Err(invalid(
                "spawn_jitter",
                format!(
                    "expected < 2 * min_spawn_interval ({}), got {}",
                    2.0 * self.min_spawn_interval,
                    self.spawn_jitter
                ),
            ));
        }
        Ok(())
    }

    pub fn center_lane(&self) -> u32 {
        self.lane_count / 2
    }

    pub fn max_lane(&self) -> u32 {
        self.lane_count.saturating_sub(1)
    }

    pub fn lane_center_x(&self, lane: u32) -> f32 {
        (lane as f32 - self.center_lane() as f32) * self.lane_width
    }

    /// Unbounded linear ramp.
    pub fn speed_at(&self, elapsed_seconds: f32) -> f32 {
        self.base_speed + elapsed_seconds * self.speed_ramp
    }

    /// Spawn interval before jitter.
    pub fn spawn_interval_at(&self, elapsed_seconds: f32) -> f32 {
        self.min_spawn_interval
            .max(self.base_spawn_interval - elapsed_seconds * self.spawn_interval_ramp)
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("expected finite number, got {value}")))
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterVariant {
    #[default]
    FuturoBot,
    CyraFeline,
    MechaPounce,
}

pub const ALL_CHARACTERS: [CharacterVariant; 3] = [
    CharacterVariant::FuturoBot,
    CharacterVariant::CyraFeline,
    CharacterVariant::MechaPounce,
];

/// Per-character tunables. Only the numbers differ between variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterProfile {
    pub display_name: &'static str,
    pub jump_height: f32,
    pub gravity: f32,
    pub lane_change_rate: f32,
    pub ground_height: f32,
    pub half_width: f32,
    pub body_height: f32,
    pub half_depth: f32,
}

impl CharacterProfile {
    pub fn launch_velocity(&self) -> f32 {
        (2.0 * self.gravity * self.jump_height).sqrt()
    }
}

impl CharacterVariant {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::FuturoBot => "futuro-bot",
            Self::CyraFeline => "cyra-feline",
            Self::MechaPounce => "mecha-pounce",
        }
    }

    pub fn profile(self) -> CharacterProfile {
        match self {
            Self::FuturoBot => CharacterProfile {
                display_name: "Futuro-Bot",
                jump_height: 4.0,
                gravity: 15.0,
                lane_change_rate: 10.0,
                ground_height: 1.2,
                half_width: 0.8,
                body_height: 3.0,
                half_depth: 0.4,
            },
            Self::CyraFeline => CharacterProfile {
                display_name: "Cyra-Feline",
                jump_height: 4.5,
                gravity: 15.0,
                lane_change_rate: 12.0,
                ground_height: 1.1,
                half_width: 0.7,
                body_height: 2.7,
                half_depth: 0.35,
            },
            Self::MechaPounce => CharacterProfile {
                display_name: "Mecha-Pounce",
                jump_height: 5.0,
                gravity: 20.0,
                lane_change_rate: 15.0,
                ground_height: 0.6,
                half_width: 0.45,
                body_height: 1.3,
                half_depth: 1.0,
            },
        }
    }
}

impl fmt::Display for CharacterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown character '{0}'; expected futuro-bot, cyra-feline, or mecha-pounce")]
pub struct UnknownCharacter(pub String);

impl FromStr for CharacterVariant {
    type Err = UnknownCharacter;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        ALL_CHARACTERS
            .into_iter()
            .find(|variant| variant.as_token() == normalized)
            .ok_or_else(|| UnknownCharacter(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Tuning::default().validate().expect("default tuning");
    }

    #[test]
    fn empty_json_yields_defaults() {
        let tuning = Tuning::from_json_str("{}").expect("parse");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let tuning =
            Tuning::from_json_str(r#"{ "base_speed": 12.0, "lane_count": 5 }"#).expect("parse");
        assert_eq!(tuning.lane_count, 5);
        assert!((tuning.base_speed - 12.0).abs() < 0.0001);
        assert!((tuning.lane_width - DEFAULT_LANE_WIDTH).abs() < 0.0001);
    }

    #[test]
    fn parse_error_reports_field_path() {
        let error = Tuning::from_json_str(r#"{ "spawn_jitter": "lots" }"#).expect_err("bad type");
        match error {
            TuningError::Parse { path, .. } => assert_eq!(path, "spawn_jitter"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Tuning::from_json_str(r#"{ "max_speed": 30.0 }"#).expect_err("unknown");
        assert!(matches!(error, TuningError::Parse { .. }));
    }

    #[test]
    fn validation_rejects_inverted_spawn_intervals() {
        let tuning = Tuning {
            min_spawn_interval: 3.0,
            base_spawn_interval: 2.0,
            spawn_jitter: 0.5,
            ..Tuning::default()
        };
        let error = tuning.validate().expect_err("inverted");
        assert!(matches!(
            error,
            TuningError::Invalid {
                field: "min_spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn validation_rejects_jitter_that_could_zero_the_countdown() {
        let tuning = Tuning {
            spawn_jitter: 1.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid {
                field: "spawn_jitter",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_zero_lanes_and_non_positive_speed() {
        let zero_lanes = Tuning {
            lane_count: 0,
            ..Tuning::default()
        };
        assert!(zero_lanes.validate().is_err());

        let stopped = Tuning {
            base_speed: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(
            stopped.validate(),
            Err(TuningError::Invalid {
                field: "base_speed",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_a_flat_speed_ramp() {
        let flat = Tuning {
            speed_ramp: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(
            flat.validate(),
            Err(TuningError::Invalid {
                field: "speed_ramp",
                ..
            })
        ));
        assert!(Tuning::from_json_str(r#"{"speed_ramp": 0.0}"#).is_err());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("tuning.json");
        fs::write(&path, r#"{ "segment_length": 150.0 }"#).expect("write");

        let tuning = Tuning::load(&path).expect("load");
        assert!((tuning.segment_length - 150.0).abs() < 0.0001);

        let missing = Tuning::load(&temp.path().join("missing.json")).expect_err("missing");
        assert!(matches!(missing, TuningError::Read { .. }));
    }

    #[test]
    fn lane_centers_are_symmetric_around_center_lane() {
        let tuning = Tuning::default();
        assert_eq!(tuning.center_lane(), 1);
        assert!((tuning.lane_center_x(0) + 3.0).abs() < 0.0001);
        assert!(tuning.lane_center_x(1).abs() < 0.0001);
        assert!((tuning.lane_center_x(2) - 3.0).abs() < 0.0001);
    }

    #[test]
    fn speed_ramp_is_strictly_increasing_and_uncapped() {
        let tuning = Tuning::default();
        let mut previous = tuning.speed_at(0.0);
        for step in 1..=1000 {
            let speed = tuning.speed_at(step as f32 * 0.5);
            assert!(speed > previous);
            previous = speed;
        }
        assert!((tuning.speed_at(1000.0) - 108.0).abs() < 0.001);
    }

    #[test]
    fn spawn_interval_is_non_increasing_down_to_floor() {
        let tuning = Tuning::default();
        let mut previous = tuning.spawn_interval_at(0.0);
        assert!((previous - 2.0).abs() < 0.0001);
        for step in 1..=400 {
            let interval = tuning.spawn_interval_at(step as f32 * 0.5);
            assert!(interval <= previous);
            assert!(interval >= tuning.min_spawn_interval);
            previous = interval;
        }
        assert!((tuning.spawn_interval_at(500.0) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn character_tokens_round_trip_through_from_str() {
        for variant in ALL_CHARACTERS {
            let parsed: CharacterVariant = variant.as_token().parse().expect("parse");
            assert_eq!(parsed, variant);
        }
        assert_eq!(
            "Mecha_Pounce".parse::<CharacterVariant>(),
            Ok(CharacterVariant::MechaPounce)
        );
        assert!("robot".parse::<CharacterVariant>().is_err());
    }

    #[test]
    fn launch_velocity_reaches_jump_height() {
        let profile = CharacterVariant::FuturoBot.profile();
        let v = profile.launch_velocity();
        let apex = v * v / (2.0 * profile.gravity);
        assert!((apex - profile.jump_height).abs() < 0.0001);
    }
}
