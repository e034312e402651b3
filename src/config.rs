use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf, time::Duration};
use tracing::debug;

use crate::delays::{DEFAULT_MAX_DELAY, GeneratorSettings};
use crate::github::ORG_URL;
use crate::utils::merge_json_objects;

pub const CONFIG_ENV_VAR: &str = "TYPED_TOOLKIT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Upper bound in seconds for random delays.
    pub max_delay: f64,
    pub generator: GeneratorConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub count: usize,
    pub interval_ms: u64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubConfig {
    pub org_url_template: String,
    /// JSON document mapping URLs to payloads.
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            max_delay: DEFAULT_MAX_DELAY,
            generator: GeneratorConfig::default(),
            github: GithubConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let settings = GeneratorSettings::default();
        Self {
            count: settings.count,
            interval_ms: settings.interval.as_millis() as u64,
            upper_bound: settings.upper_bound,
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            org_url_template: ORG_URL.to_string(),
            fixtures: None,
        }
    }
}

impl GeneratorConfig {
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            count: self.count,
            interval: Duration::from_millis(self.interval_ms),
            upper_bound: self.upper_bound,
        }
    }
}

impl ToolkitConfig {
    /// Parse a config document, filling anything it omits from the defaults.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let overlay: serde_json::Value = serde_json::from_str(raw)?;
        if !overlay.is_object() {
            return Err(anyhow::anyhow!("config must be a JSON object"));
        }

        let base = serde_json::to_value(Self::default())?;
        let merged = merge_json_objects(base, expand_value(overlay));
        Ok(serde_json::from_value(merged)?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Locate the config file: `$TYPED_TOOLKIT_CONFIG`, then
/// `$XDG_CONFIG_HOME/typed-toolkit/config.json`, then `./typed-toolkit.json`.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(p));
    }

    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let candidate = PathBuf::from(xdg).join("typed-toolkit").join("config.json");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let candidate = PathBuf::from("typed-toolkit.json");
    if candidate.exists() {
        return Some(candidate);
    }

    None
}

/// Load the config from the resolved path, or the defaults when there is none.
pub fn load_config() -> anyhow::Result<ToolkitConfig> {
    match resolve_config_path() {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            ToolkitConfig::load_from(&path)
                .map_err(|e| anyhow::anyhow!("Invalid config `{}`: {}", path.display(), e))
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(ToolkitConfig::default())
        }
    }
}

fn expand_env_vars(input: &str) -> String {
    expand_env_vars_with(input, |name| env::var(name).ok())
}

/// Replace `${NAME}` with `lookup(NAME)`; unknown names are kept verbatim.
fn expand_env_vars_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next(); // consume '{'
            let mut name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
            if let Some(val) = lookup(&name) {
                out.push_str(&val);
            } else {
                out.push_str("${");
                out.push_str(&name);
                out.push('}');
            }
        } else {
            out.push(ch);
        }
    }

    out
}

fn expand_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(expand_env_vars(&s)),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(expand_value).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, expand_value(v))).collect(),
        ),
        other => other,
    }
}
