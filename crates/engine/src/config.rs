//! Engine configuration from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use emberhold_domain::{DEFAULT_RESPAWN_DELAY_SECS, MAX_RESPAWN_DELAY_SECS};

const DEFAULT_DUMMY_HEALTH: u32 = 100;
const DEFAULT_REQUEST_BUFFER: usize = 256;
const DEFAULT_NOTIFY_BUFFER: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Snapshot directory; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Delay before a destroyed destructible dummy comes back.
    pub respawn_delay: Duration,
    /// Max health of a freshly created destructible dummy.
    pub dummy_health: u32,
    pub request_buffer: usize,
    pub notify_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            respawn_delay: Duration::from_secs(DEFAULT_RESPAWN_DELAY_SECS),
            dummy_health: DEFAULT_DUMMY_HEALTH,
            request_buffer: DEFAULT_REQUEST_BUFFER,
            notify_buffer: DEFAULT_NOTIFY_BUFFER,
        }
    }
}

impl EngineConfig {
    /// Read the process environment. Call `load_dotenv_from_repo_root`
    /// first so `.env` values are visible.
    ///
    /// Supported environment variables:
    /// - EMBERHOLD_DATA_DIR: JSON snapshot directory (unset = in-memory)
    /// - EMBERHOLD_RESPAWN_DELAY_SECS: respawn delay for destructible objects (<= 86400)
    /// - EMBERHOLD_DUMMY_HEALTH: max health of a new destructible dummy (>= 1)
    /// - EMBERHOLD_REQUEST_BUFFER: world request queue capacity (>= 1)
    /// - EMBERHOLD_NOTIFY_BUFFER: notification channel capacity (>= 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_dir = lookup("EMBERHOLD_DATA_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let respawn_secs = parse_var(
            &lookup,
            "EMBERHOLD_RESPAWN_DELAY_SECS",
            defaults.respawn_delay.as_secs(),
            |v| *v <= MAX_RESPAWN_DELAY_SECS,
        );

        Self {
            data_dir,
            respawn_delay: Duration::from_secs(respawn_secs),
            dummy_health: parse_var(
                &lookup,
                "EMBERHOLD_DUMMY_HEALTH",
                defaults.dummy_health,
                |v| *v >= 1,
            ),
            request_buffer: parse_var(
                &lookup,
                "EMBERHOLD_REQUEST_BUFFER",
                defaults.request_buffer,
                |v| *v >= 1,
            ),
            notify_buffer: parse_var(
                &lookup,
                "EMBERHOLD_NOTIFY_BUFFER",
                defaults.notify_buffer,
                |v| *v >= 1,
            ),
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        Ok(value) => {
            tracing::warn!(key, %value, %default, "Value out of range, using default");
            default
        }
        Err(_) => {
            tracing::warn!(key, value = %raw, %default, "Not a valid number, using default");
            default
        }
    }
}

/// Load `.env.local` then `.env` from the workspace root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
