//! Store configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! toast-id-prefix = "notice"
//!
//! [initial-routes]
//! home = "/"
//! agenda = "/agenda"
//! ```
//!
//! or from `--key=value` arguments (`--toast-prefix=notice`,
//! `--route=agenda=/agenda`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FluxError;
use crate::model::Routes;

pub const DEFAULT_TOAST_ID_PREFIX: &str = "toast";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreConfig {
    /// Prefix for toast ids the store generates (`{prefix}-{n}`).
    #[serde(default = "default_toast_id_prefix")]
    pub toast_id_prefix: String,

    /// Routes present in the state before any action is applied.
    #[serde(default, skip_serializing_if = "Routes::is_empty")]
    pub initial_routes: Routes,
}

fn default_toast_id_prefix() -> String {
    DEFAULT_TOAST_ID_PREFIX.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            toast_id_prefix: default_toast_id_prefix(),
            initial_routes: Routes::new(),
        }
    }
}

impl StoreConfig {
    /// Load config from a TOML file, or the defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, FluxError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, FluxError> {
        let config: StoreConfig =
            toml::from_str(content).map_err(|e| FluxError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Layer `--key=value` overrides on top of this config. A later
    /// `--toast-prefix` wins and routes merge by name. Unrecognised arguments
    /// are ignored so the caller can share one argument list.
    pub fn with_args(mut self, args: &[String]) -> Result<Self, FluxError> {
        for arg in args {
            if let Some(val) = arg.strip_prefix("--toast-prefix=") {
                self.toast_id_prefix = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--route=") {
                let (name, path) = val
                    .split_once('=')
                    .ok_or_else(|| FluxError::Config(format!("expected NAME=PATH, got {val:?}")))?;
                self.initial_routes.insert(name.to_string(), path.to_string());
            }
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), FluxError> {
        if self.toast_id_prefix.is_empty() {
            return Err(FluxError::Config("toast-id-prefix must not be empty".into()));
        }
        Ok(())
    }
}
