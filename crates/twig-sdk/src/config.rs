use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use twig_refs::{validate_branch_name, DEFAULT_BRANCH};
use twig_types::object::HEX_LEN;

use crate::error::{TwigError, TwigResult};

/// Per-repository settings, stored as TOML in `.twig/config.toml`.
///
/// Every key is optional in the file; missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch created by `init`.
    pub default_branch: String,
    /// Hex digits shown for abbreviated ids (the `Merge:` line of `log`).
    pub short_id_len: usize,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Render commit dates in UTC instead of local time.
    pub utc: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: DEFAULT_BRANCH.to_string(),
            short_id_len: 7,
            log: LogConfig::default(),
        }
    }
}

impl RepoConfig {
    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> TwigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| TwigError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> TwigResult<String> {
        toml::to_string_pretty(self).map_err(|e| TwigError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults if the file is missing.
    pub fn load(path: &Path) -> TwigResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> TwigResult<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> TwigResult<()> {
        validate_branch_name(&self.default_branch)
            .map_err(|e| TwigError::Config(format!("default_branch: {e}")))?;
        if self.short_id_len == 0 || self.short_id_len > HEX_LEN {
            return Err(TwigError::Config(format!(
                "short_id_len must be between 1 and {HEX_LEN}, got {}",
                self.short_id_len
            )));
        }
        Ok(())
    }
}
