use crate::error::{LifelineError, Result};
use crate::lifecycle::ShutdownSignal;
use dashmap::DashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const INIT_TIMEOUT_KEY: &str = "LIFELINE_INIT_TIMEOUT_MS";
pub const BOOTSTRAP_TIMEOUT_KEY: &str = "LIFELINE_BOOTSTRAP_TIMEOUT_MS";
pub const SHUTDOWN_TIMEOUT_KEY: &str = "LIFELINE_SHUTDOWN_TIMEOUT_MS";
pub const SHUTDOWN_SIGNALS_KEY: &str = "LIFELINE_SHUTDOWN_SIGNALS";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Snapshot the process environment
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parse the value under `key`; `Ok(None)` when unset or blank
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(key, format!("'{}': {}", raw, e)))
    }
}

fn invalid(key: &str, message: impl Into<String>) -> LifelineError {
    LifelineError::InvalidConfig {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Settings of the application context
///
/// Timeouts bound whole phases; hooks inside a module are never cancelled
/// individually. `shutdown_timeout` applies to each of the three closing
/// phases separately. Unset timeouts mean a phase may run forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub init_timeout: Option<Duration>,
    pub bootstrap_timeout: Option<Duration>,
    pub shutdown_timeout: Option<Duration>,
    pub shutdown_signals: Vec<ShutdownSignal>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            init_timeout: None,
            bootstrap_timeout: None,
            shutdown_timeout: None,
            shutdown_signals: vec![ShutdownSignal::Interrupt, ShutdownSignal::Terminate],
        }
    }
}

impl LifecycleConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ConfigService::new())
    }

    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let millis = |key: &str| -> Result<Option<Duration>> {
            Ok(config.get_parsed::<u64>(key)?.map(Duration::from_millis))
        };

        let mut settings = Self {
            init_timeout: millis(INIT_TIMEOUT_KEY)?,
            bootstrap_timeout: millis(BOOTSTRAP_TIMEOUT_KEY)?,
            shutdown_timeout: millis(SHUTDOWN_TIMEOUT_KEY)?,
            ..Self::default()
        };

        if let Some(raw) = config.get(SHUTDOWN_SIGNALS_KEY) {
            settings.shutdown_signals = parse_signals(&raw)?;
        }

        tracing::debug!(?settings, "Loaded lifecycle configuration");
        Ok(settings)
    }
}

fn parse_signals(raw: &str) -> Result<Vec<ShutdownSignal>> {
    let signals = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<ShutdownSignal>()
                .map_err(|e| invalid(SHUTDOWN_SIGNALS_KEY, format!("'{}': {}", name, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    if signals.is_empty() {
        return Err(invalid(SHUTDOWN_SIGNALS_KEY, "at least one signal is required"));
    }
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = LifecycleConfig::from_config(&ConfigService::default()).unwrap();
        assert_eq!(config, LifecycleConfig::default());
    }

    #[test]
    fn test_reads_timeouts_and_signals() {
        let service = ConfigService::default();
        service.set(BOOTSTRAP_TIMEOUT_KEY, "1500");
        service.set(SHUTDOWN_TIMEOUT_KEY, " 250 ");
        service.set(SHUTDOWN_SIGNALS_KEY, "SIGTERM, sighup");

        let config = LifecycleConfig::from_config(&service).unwrap();
        assert_eq!(config.init_timeout, None);
        assert_eq!(config.bootstrap_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.shutdown_timeout, Some(Duration::from_millis(250)));
        assert_eq!(
            config.shutdown_signals,
            vec![ShutdownSignal::Terminate, ShutdownSignal::Hangup]
        );
    }

    #[test]
    fn test_invalid_values() {
        let service = ConfigService::default();
        service.set(INIT_TIMEOUT_KEY, "soon");
        let err = LifecycleConfig::from_config(&service).unwrap_err();
        assert!(matches!(err, LifelineError::InvalidConfig { ref key, .. } if key == INIT_TIMEOUT_KEY));

        let service = ConfigService::default();
        service.set(SHUTDOWN_SIGNALS_KEY, "SIGTERM,SIGKILL");
        assert!(LifecycleConfig::from_config(&service).is_err());

        service.set(SHUTDOWN_SIGNALS_KEY, " , ");
        assert!(LifecycleConfig::from_config(&service).is_err());
    }
}
