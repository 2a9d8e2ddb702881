use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::dom::RESULT_OUTPUT;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8090/api/products";

pub const DEFAULT_USER_AGENT: &str = concat!("inventory-console/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "api_base")]
    pub api_base_url: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    pub no_color: Option<bool>,
}

/// Everything a bridge needs at construction. The base URL is injected here
/// so a bridge can be pointed at any backend, a mock one included.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub api_base_url: String,
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
    pub user_agent: String,
    pub output_id: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: None,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_id: RESULT_OUTPUT.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".inventory-console").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    format!(
        r#"# inventory-console config
#
# Location (default):
#   ~/.inventory-console/config.yml

# Product endpoint of the inventory API
api_base_url: {DEFAULT_API_BASE_URL}

# HTTP (optional)
# timeout: 10
# proxy: http://127.0.0.1:8080
# user_agent: inventory-console

# Output styling
no_color: false
"#
    )
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}
