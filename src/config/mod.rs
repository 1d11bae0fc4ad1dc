use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;
use tracing::warn;

use crate::error::{GenerateError, Result};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";

/// Layered key/value configuration: defaults, then a dotenv file, then the process environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: HashMap<String, String>,
    pub dotenv_path: Option<PathBuf>,
}

impl Config {
    /// Load defaults, the first dotenv file found, and the environment.
    ///
    /// An explicit `dotenv` path must parse. An auto-discovered file that fails to parse is skipped as a whole.
    pub fn load(dotenv: Option<&Path>) -> Result<Self> {
        Self::load_with_candidates(dotenv, dotenv_candidates())
    }

    fn load_with_candidates(dotenv: Option<&Path>, candidates: Vec<PathBuf>) -> Result<Self> {
        let mut map = default_map();

        let dotenv_path = match dotenv {
            Some(p) => {
                map.extend(read_dotenv(p)?);
                Some(p.to_path_buf())
            }
            None => match candidates.into_iter().find(|c| c.is_file()) {
                Some(c) => match read_dotenv(&c) {
                    Ok(entries) => {
                        map.extend(entries);
                        Some(c)
                    }
                    Err(e) => {
                        warn!(path = %c.display(), error = %e, "ignoring dotenv file");
                        None
                    }
                },
                None => None,
            },
        };

        // Environment takes precedence over the file
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Ok(Self { inner: map, dotenv_path })
    }

    /// Build a config from explicit pairs on top of the defaults. No file or environment access.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert(k.into(), v.into());
        }
        Self { inner: map, dotenv_path: None }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn get_secs(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|v| {
                v.parse::<f64>()
                    .map_err(|_| GenerateError::config(format!("{key} must be a number of seconds, got {v:?}")))
            })
            .transpose()
    }
}

/// Parse the whole file before anything is applied, so a bad line never leaves it half-merged.
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| GenerateError::config(format!("Failed to read {}: {e}", path.display())))?;
    iter.map(|item| item.map_err(|e| GenerateError::config(format!("Invalid entry in {}: {e}", path.display()))))
        .collect()
}

/// `./.env` first, then `<config dir>/slidegen/.env`.
pub fn dotenv_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        out.push(cwd.join(".env"));
    }
    if let Some(b) = BaseDirs::new() {
        out.push(b.config_dir().join("slidegen").join(".env"));
    }
    out
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "GEMINI_BASE_URL",
        "GEMINI_API_KEY",
        "GEMINI_MODEL",
        "REQUEST_TIMEOUT",
    ];

    KEYS.contains(&k) || k.starts_with("SLIDEGEN_")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("GEMINI_MODEL".into(), DEFAULT_MODEL.into());
    m.insert("SLIDEGEN_POLL_INTERVAL".into(), "1.5".into());
    m.insert("SLIDEGEN_TIMEOUT".into(), "180".into());
    m.insert("REQUEST_TIMEOUT".into(), "120".into());
    m
}

/// Explicit values from the command line; `None` falls through to the config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub poll_interval_secs: Option<f64>,
    pub timeout_secs: Option<f64>,
}

/// Everything the gateway client needs, resolved once.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub request_timeout: Duration,
}

impl GatewaySettings {
    pub fn resolve(cfg: &Config, ov: &Overrides) -> Result<Self> {
        let pick = |o: &Option<String>, key: &str| {
            o.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| cfg.get(key))
        };

        let base_url = pick(&ov.base_url, "GEMINI_BASE_URL")
            .ok_or_else(|| GenerateError::config("Missing GEMINI_BASE_URL (set in .env or pass --base-url)"))?;
        let api_key = pick(&ov.api_key, "GEMINI_API_KEY")
            .ok_or_else(|| GenerateError::config("Missing GEMINI_API_KEY (set in .env or pass --key)"))?;
        let model = pick(&ov.model, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let poll = ov.poll_interval_secs.map_or_else(|| cfg.get_secs("SLIDEGEN_POLL_INTERVAL"), |v| Ok(Some(v)))?;
        let timeout = ov.timeout_secs.map_or_else(|| cfg.get_secs("SLIDEGEN_TIMEOUT"), |v| Ok(Some(v)))?;
        let request = cfg.get_secs("REQUEST_TIMEOUT")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            poll_interval: positive_secs("poll interval", poll.unwrap_or(1.5))?,
            timeout: positive_secs("timeout", timeout.unwrap_or(180.0))?,
            request_timeout: positive_secs("REQUEST_TIMEOUT", request.unwrap_or(120.0))?,
        })
    }
}

fn positive_secs(what: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(GenerateError::config(format!("{what} must be a positive number of seconds, got {secs}")));
    }
    Ok(Duration::from_secs_f64(secs))
}
