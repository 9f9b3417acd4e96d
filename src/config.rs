//! Settings for the `bookworm` binary.
//!
//! Layered lowest to highest: built-in defaults, an optional `bookworm.toml`
//! (or `.json`, `.yaml`, any format `config` recognises) next to the binary,
//! then `BOOKWORM_*` environment variables, e.g. `BOOKWORM_LISTEN_ADDRESS`.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "bookworm";
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_SEED: bool = true;
pub const DEFAULT_EXPIRE_ON_START: bool = false;
pub const DEFAULT_LOG_FILTER: &str = "bookworm=info,tower_http=warn";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Address the HTTP surface binds to.
    pub listen_address: String,
    /// Start from the demonstration collections instead of an empty library.
    pub seed: bool,
    /// Deactivate lapsed memberships once at start-up.
    pub expire_on_start: bool,
    /// `tracing` filter directive, used unless `RUST_LOG` is set.
    pub log_filter: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(file: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("BOOKWORM").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("listen_address", DEFAULT_LISTEN_ADDRESS)?
            .set_default("seed", DEFAULT_SEED)?
            .set_default("expire_on_start", DEFAULT_EXPIRE_ON_START)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            seed: DEFAULT_SEED,
            expire_on_start: DEFAULT_EXPIRE_ON_START,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
