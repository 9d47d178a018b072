//! Scheduler configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_MAX_PARALLELISM;

/// Environment variable holding the slot count (a number or `auto`).
pub const ENV_MAX_PARALLELISM: &str = "OCTO_MAX_PARALLELISM";
/// Environment variable holding the optional round limit.
pub const ENV_MAX_ROUNDS: &str = "OCTO_MAX_ROUNDS";
/// Environment variable holding the optional audit buffer size.
pub const ENV_AUDIT_CAPACITY: &str = "OCTO_AUDIT_CAPACITY";

/// Configuration for one event loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of slots running concurrently.
    pub max_parallelism: usize,
    /// Optional round limit; `None` waits for every confirmation forever.
    pub max_rounds: Option<u64>,
    /// Size of the in-memory audit buffer; `None` disables auditing.
    pub audit_capacity: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_parallelism: DEFAULT_MAX_PARALLELISM,
            max_rounds: None,
            audit_capacity: None,
        }
    }
}

impl SchedulerConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slot count.
    #[must_use]
    pub const fn with_max_parallelism(mut self, max_parallelism: usize) -> Self {
        self.max_parallelism = max_parallelism;
        self
    }

    /// Use one slot per logical CPU.
    #[must_use]
    pub fn with_available_parallelism(self) -> Self {
        self.with_max_parallelism(num_cpus::get())
    }

    /// Set the round limit.
    #[must_use]
    pub const fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Enable the in-memory audit buffer.
    #[must_use]
    pub const fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = Some(capacity);
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_parallelism == 0 {
            return Err("max_parallelism must be greater than 0".into());
        }
        if self.max_rounds == Some(0) {
            return Err("max_rounds must be greater than 0 when set".into());
        }
        if self.audit_capacity == Some(0) {
            return Err("audit_capacity must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read configuration from the environment (after loading `.env` if
    /// present) and validate. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` uses the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_MAX_PARALLELISM) {
            cfg.max_parallelism = if raw.trim().eq_ignore_ascii_case("auto") {
                num_cpus::get()
            } else {
                parse_var(ENV_MAX_PARALLELISM, &raw)?
            };
        }
        if let Some(raw) = lookup(ENV_MAX_ROUNDS) {
            cfg.max_rounds = Some(parse_var(ENV_MAX_ROUNDS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_AUDIT_CAPACITY) {
            cfg.audit_capacity = Some(parse_var(ENV_AUDIT_CAPACITY, &raw)?);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| format!("{key}: cannot parse `{raw}`: {e}"))
}
