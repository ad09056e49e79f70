//! Logging setup for binaries and tests embedding the engine.
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! left to the caller.

use anyhow::{Context, Result};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::EngineSettings;

/// Builder for setting up logging.
pub struct TelemetryBuilder {
    service_name: String,
    log_level: String,
    json: bool,
}

impl TelemetryBuilder {
    /// Creates a builder that logs at `info` in human-readable form.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "info".to_string(),
            json: false,
        }
    }

    /// Creates a builder from the logging fields of the engine settings.
    #[must_use]
    pub fn from_settings(service_name: impl Into<String>, settings: &EngineSettings) -> Self {
        Self::new(service_name)
            .with_log_level(settings.log_level.clone())
            .with_json(settings.json_logs)
    }

    /// Sets the level used when `RUST_LOG` is unset.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Switches between JSON and human-readable output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the log level is not a valid filter directive or a
    /// global subscriber is already installed.
    pub fn init(self) -> Result<()> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.log_level)
                .with_context(|| format!("Invalid log level '{}'", self.log_level))?,
        };

        let fmt_layer = if self.json {
            fmt::layer().json().with_target(true).boxed()
        } else {
            fmt::layer().with_target(true).boxed()
        };

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")?;

        tracing::info!(service = %self.service_name, json = self.json, "logging initialised");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_from_settings() {
        let settings = EngineSettings {
            log_level: "debug".to_string(),
            json_logs: true,
            ..EngineSettings::default()
        };
        let builder = TelemetryBuilder::from_settings("changeset", &settings);
        assert_eq!(builder.service_name, "changeset");
        assert_eq!(builder.log_level, "debug");
        assert!(builder.json);
    }

    #[test]
    fn test_invalid_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let result = TelemetryBuilder::new("changeset")
            .with_log_level("changeset=loudest")
            .init();
        assert!(result.is_err());
    }
}
