use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

const ENV_PREFIX: &str = "TRIVIA";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_url: String,
}

impl Settings {
    /// Layers defaults, an optional config file and `TRIVIA_*` environment variables.
    ///
    /// Without an explicit path, `trivia.{toml,yaml,json}` in the working directory is
    /// picked up if present.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_sources(config_file)
    }

    fn from_sources(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("trivia").required(false),
        };

        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_url", "sqlite:trivia.db")?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}
