use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use engine::{CharacterVariant, Tuning};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::AppError;

const TUNING_ENV_VAR: &str = "SKATE_TITANS_TUNING";
const CHARACTER_ENV_VAR: &str = "SKATE_TITANS_CHARACTER";
const SEED_ENV_VAR: &str = "SKATE_TITANS_SEED";
const RUN_SECONDS_ENV_VAR: &str = "SKATE_TITANS_RUN_SECONDS";
const FRAME_MS_ENV_VAR: &str = "SKATE_TITANS_FRAME_MS";
const REPLAY_OUT_ENV_VAR: &str = "SKATE_TITANS_REPLAY_OUT";

const DEFAULT_SEED: u64 = 0x5EED_7174;
const DEFAULT_RUN_SECONDS: u32 = 60;
const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HostConfig {
    pub(crate) tuning_path: Option<PathBuf>,
    pub(crate) character: CharacterVariant,
    pub(crate) seed: u64,
    pub(crate) run_duration: Duration,
    pub(crate) frame: Duration,
    pub(crate) replay_out: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tuning_path: None,
            character: CharacterVariant::default(),
            seed: DEFAULT_SEED,
            run_duration: Duration::from_secs(u64::from(DEFAULT_RUN_SECONDS)),
            frame: Duration::from_millis(DEFAULT_FRAME_MS),
            replay_out: None,
        }
    }
}

impl HostConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let run_seconds = parse_or_default(
            RUN_SECONDS_ENV_VAR,
            lookup(RUN_SECONDS_ENV_VAR),
            DEFAULT_RUN_SECONDS,
        );
        let frame_ms = match parse_or_default(
            FRAME_MS_ENV_VAR,
            lookup(FRAME_MS_ENV_VAR),
            DEFAULT_FRAME_MS,
        ) {
            0 => {
                warn!(
                    var = FRAME_MS_ENV_VAR,
                    fallback = DEFAULT_FRAME_MS,
                    "config_zero_frame_using_default"
                );
                DEFAULT_FRAME_MS
            }
            value => value,
        };

        Self {
            tuning_path: non_empty_path(lookup(TUNING_ENV_VAR)),
            character: parse_or_default(
                CHARACTER_ENV_VAR,
                lookup(CHARACTER_ENV_VAR),
                CharacterVariant::default(),
            ),
            seed: parse_or_default(SEED_ENV_VAR, lookup(SEED_ENV_VAR), DEFAULT_SEED),
            run_duration: Duration::from_secs(u64::from(run_seconds)),
            frame: Duration::from_millis(frame_ms),
            replay_out: non_empty_path(lookup(REPLAY_OUT_ENV_VAR)),
        }
    }
}

pub(crate) struct AppWiring {
    pub(crate) config: HostConfig,
    pub(crate) tuning: Tuning,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Skate Titans Startup ===");

    let config = HostConfig::from_env();
    let tuning = match &config.tuning_path {
        Some(path) => {
            let tuning = Tuning::load(path)?;
            info!(path = %path.display(), "tuning_loaded");
            tuning
        }
        None => Tuning::default(),
    };
    info!(
        character = %config.character,
        seed = config.seed,
        run_seconds = config.run_duration.as_secs(),
        frame_ms = config.frame.as_millis() as u64,
        recording = config.replay_out.is_some(),
        "host_configured"
    );

    Ok(AppWiring { config, tuning })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or_default<T>(var: &'static str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    let Some(value) = raw else {
        return default;
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(var, value = %value, fallback = %default, "config_invalid_value_using_default");
            default
        }
    }
}

fn non_empty_path(raw: Option<String>) -> Option<PathBuf> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
