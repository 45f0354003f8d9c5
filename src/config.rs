use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub claim: ClaimConfig,
    #[serde(default)]
    pub delay: DelayConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_endpoint() -> String {
    "https://addplus.org/api/trpc/users.claimPoints?batch=1".to_string()
}

fn default_origin() -> String {
    "https://addplus.org".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 10)".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_retry() -> u32 {
    3
}

fn default_delay_min_s() -> u64 {
    3
}

fn default_delay_max_s() -> u64 {
    5
}

fn default_delay_on_error_s() -> u64 {
    3
}

fn default_delay_retry_s() -> u64 {
    3
}

fn default_pending_path() -> PathBuf {
    PathBuf::from("usernames.txt")
}

fn default_used_path() -> PathBuf {
    PathBuf::from("usernames_used.txt")
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub credential: CredentialRef,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,
}

/// Where the session cookie comes from. The credential is supplied
/// externally and resolved exactly once at startup; nothing in the run ever
/// derives or refreshes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CredentialRef {
    Env { var: String },
    Inline { cookie: String },
}

impl CredentialRef {
    pub fn resolve(&self) -> Result<String> {
        match self {
            CredentialRef::Env { var } => env::var(var)
                .map_err(|_| anyhow!("missing credential environment variable {var}")),
            CredentialRef::Inline { cookie } => {
                if cookie.trim().is_empty() {
                    return Err(anyhow!("inline credential cookie cannot be empty"));
                }
                Ok(cookie.clone())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Inter-identity wait bounds, inclusive, in whole seconds.
    #[serde(default = "default_delay_min_s")]
    pub min_s: u64,
    #[serde(default = "default_delay_max_s")]
    pub max_s: u64,
    /// Cooldown after a terminal error.
    #[serde(default = "default_delay_on_error_s")]
    pub on_error_s: u64,
    /// Cooldown before re-issuing a retryable attempt.
    #[serde(default = "default_delay_retry_s")]
    pub retry_s: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_s: default_delay_min_s(),
            max_s: default_delay_max_s(),
            on_error_s: default_delay_on_error_s(),
            retry_s: default_delay_retry_s(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_pending_path")]
    pub pending: PathBuf,
    #[serde(default = "default_used_path")]
    pub used: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            pending: default_pending_path(),
            used: default_used_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Config = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        if !config.files.pending.is_absolute() {
            config.files.pending = config_base.join(&config.files.pending);
        }
        if !config.files.used.is_absolute() {
            config.files.used = config_base.join(&config.files.used);
        }
        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.claim.endpoint.trim().is_empty() {
            return Err(anyhow!("claim.endpoint cannot be empty"));
        }
        if self.claim.max_retry == 0 {
            return Err(anyhow!("claim.max_retry must be at least 1"));
        }
        if self.delay.min_s > self.delay.max_s {
            return Err(anyhow!(
                "delay.min_s ({}) cannot exceed delay.max_s ({})",
                self.delay.min_s,
                self.delay.max_s
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(anyhow!("logging.filter cannot be empty"));
        }
        Ok(())
    }
}
