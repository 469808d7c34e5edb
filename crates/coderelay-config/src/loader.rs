//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "coderelay.toml";

const DEFAULT_TEMPLATE: &str = r#"# CodeRelay configuration

[target]
address = "https://example.com/"
input_selector = "input[type='text']"
visible = true

[matching]
kind = "pattern"
pattern = "[A-Z0-9]{6,15}"
# kind = "keyword"
# keyword = "PROMO"

[timing]
poll_interval_seconds = 2.0
repeat_interval_seconds = 1.0
reset_interval_minutes = 15.0
element_timeout_seconds = 5.0
settle_delay_seconds = 2.0

[behavior]
auto_repeat = true
auto_submit_on_inject = false
repeat_policy = "continue"
serialize_driver_calls = true

[capture]
# source = "screen"
# region = [0, 0, 800, 600]
tesseract_path = "tesseract"
language = "eng"
page_segmentation_mode = 6

[browser]
debug_port = 9222
# profile_dir = "~/.coderelay/browser-profile"
"#;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"))
}

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        if let Some(dir) = config.browser.profile_dir.take() {
            config.browser.profile_dir = Some(Self::expand_path(&dir));
        }
        if let Some(bin) = config.browser.chrome_path.take() {
            config.browser.chrome_path = Some(Self::expand_path(&bin));
        }
        config.capture.tesseract_path = Self::expand_path(&config.capture.tesseract_path);
        Ok(config)
    }

    /// Write the commented default configuration to `path`.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.display().to_string()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TEMPLATE)?;
        Ok(())
    }

    /// `~/.coderelay`, the home of logs and the default browser profile.
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coderelay")
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in env_var_pattern().captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.coderelay`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
