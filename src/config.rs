//! Tree options with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Options file (TOML), when given
//! 3. Environment variables: `XTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while loading [`TreeOptions`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment: {0}")]
    Environment(#[from] config::ConfigError),

    #[error("invalid option {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Field names used when parsing and projecting nested data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeOptions {
    /// Key holding a node's value (default: `value`)
    pub value_key: String,
    /// Key holding a node's children array (default: `children`)
    pub children_key: String,
    /// Key holding the parent value in flattened output (default: `parentValue`)
    pub parent_key: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            value_key: "value".into(),
            children_key: "children".into(),
            parent_key: "parentValue".into(),
        }
    }
}

/// Raw options for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeOptions {
    pub value_key: Option<String>,
    pub children_key: Option<String>,
    pub parent_key: Option<String>,
}

fn load_raw_options(path: &Path) -> Result<RawTreeOptions, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl TreeOptions {
    /// Overlay wins where it specifies a key.
    pub fn merge(&self, overlay: &RawTreeOptions) -> Self {
        Self {
            value_key: overlay
                .value_key
                .clone()
                .unwrap_or_else(|| self.value_key.clone()),
            children_key: overlay
                .children_key
                .clone()
                .unwrap_or_else(|| self.children_key.clone()),
            parent_key: overlay
                .parent_key
                .clone()
                .unwrap_or_else(|| self.parent_key.clone()),
        }
    }

    /// Load options with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `path`, if given (a missing file is an error)
    /// 3. `XTREE_VALUE_KEY`, `XTREE_CHILDREN_KEY`, `XTREE_PARENT_KEY`
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut current = Self::default();

        if let Some(path) = path {
            let raw = load_raw_options(path)?;
            current = current.merge(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;

        debug!(?current, "loaded tree options");
        Ok(current)
    }

    /// Apply `XTREE_*` environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("XTREE"))
            .build()?;

        let raw = RawTreeOptions {
            value_key: config.get_string("value_key").ok(),
            children_key: config.get_string("children_key").ok(),
            parent_key: config.get_string("parent_key").ok(),
        };
        Ok(settings.merge(&raw))
    }

    /// Keys must be non-empty and the value and children keys must differ.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("value_key", &self.value_key),
            ("children_key", &self.children_key),
            ("parent_key", &self.parent_key),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must not be empty".into(),
                });
            }
        }
        if self.value_key == self.children_key {
            return Err(ConfigError::Invalid {
                key: "children_key",
                reason: format!("must differ from value_key ({})", self.value_key),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TreeOptions::default();
        assert_eq!(options.value_key, "value");
        assert_eq!(options.children_key, "children");
        assert_eq!(options.parent_key, "parentValue");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_unspecified_keys() {
        let overlay = RawTreeOptions {
            value_key: Some("code".into()),
            ..Default::default()
        };
        let merged = TreeOptions::default().merge(&overlay);
        assert_eq!(merged.value_key, "code");
        assert_eq!(merged.children_key, "children");
    }

    #[test]
    fn test_validate_rejects_clashing_keys() {
        let options = TreeOptions {
            children_key: "value".into(),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::Invalid { key: "children_key", .. })
        ));
    }
}
