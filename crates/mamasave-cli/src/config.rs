use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the artifact location.
pub const ARTIFACT_ENV: &str = "MAMASAVE_ARTIFACT";
/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServeConfig {
    pub artifact_path: String,
    pub host: String,
    pub port: u16,
    pub cors: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            artifact_path: String::from("risk_model.json"),
            host: String::from("0.0.0.0"),
            port: 8000,
            cors: true,
        }
    }
}

impl ServeConfig {
    /// Read a JSON config, keeping the default for every missing or invalid field.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        let mut config = ServeConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            stringify!($field), config.$field
                        );
                    }
                } else {
                    log::warn!(
                        "Config Missing field '{}', using default: {:?}",
                        stringify!($field), config.$field
                    );
                }
            };
        }

        load_or_default!(artifact_path);
        load_or_default!(host);
        load_or_default!(port);
        load_or_default!(cors);

        Ok(config)
    }

    /// Apply environment overrides; `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(artifact) = lookup(ARTIFACT_ENV) {
            self.artifact_path = artifact;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, port))?;
        }
        Ok(())
    }

    /// Defaults, then the optional config file, then the environment, then CLI flags.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => ServeConfig::from_file(path)?,
            None => ServeConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        if let Some(artifact) = matches.get_one::<PathBuf>("artifact") {
            config.artifact_path = artifact.to_string_lossy().into_owned();
        }
        if let Some(host) = matches.get_one::<String>("host") {
            config.host = host.clone();
        }
        if let Some(port) = matches.get_one::<u16>("port") {
            config.port = *port;
        }
        if matches.get_flag("no_cors") {
            config.cors = false;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
