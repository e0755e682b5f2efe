//! Errors raised while running lifecycle hooks

use std::time::Duration;
use thiserror::Error;

/// Failure of a hook, a phase or the context driving them
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A startup hook (`OnModuleInit`, `OnApplicationBootstrap`) gave up,
    /// or the context could not be assembled
    #[error("Startup failed: {0}")]
    Startup(String),

    /// A closing hook gave up, or the shutdown signal could not be observed
    #[error("Closing failed: {0}")]
    Closing(String),

    /// A phase did not settle within its configured limit
    #[error("{phase} did not settle within {limit:?}")]
    Timeout { phase: String, limit: Duration },

    /// The hook of one managed instance failed
    ///
    /// `source` is the error the hook itself returned.
    #[error("{hook} failed for {instance}: {source}")]
    HookFailed {
        hook: String,
        /// Token of the instance the hook ran on
        instance: String,
        #[source]
        source: Box<LifecycleError>,
    },

    /// Anything a hook propagated with `?` from an `anyhow` context
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl LifecycleError {
    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::Startup(msg.into())
    }

    pub fn shutdown_failed(msg: impl Into<String>) -> Self {
        Self::Closing(msg.into())
    }

    pub fn timeout(phase: impl ToString, limit: Duration) -> Self {
        Self::Timeout {
            phase: phase.to_string(),
            limit,
        }
    }

    /// Wrap the error a hook returned with the phase and instance it came from
    pub fn hook_failed(hook: impl ToString, instance: impl ToString, source: LifecycleError) -> Self {
        Self::HookFailed {
            hook: hook.to_string(),
            instance: instance.to_string(),
            source: Box::new(source),
        }
    }

    /// The innermost error when hook failures are nested, or `self`
    pub fn root_cause(&self) -> &LifecycleError {
        match self {
            Self::HookFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_hook_failed_display() {
        let err = LifecycleError::hook_failed(
            "OnApplicationBootstrap",
            "CacheWarmer",
            LifecycleError::init_failed("redis unreachable"),
        );
        assert_eq!(
            err.to_string(),
            "OnApplicationBootstrap failed for CacheWarmer: Startup failed: redis unreachable"
        );
        assert!(matches!(err.root_cause(), LifecycleError::Startup(_)));
    }

    #[test]
    fn test_hook_failure_keeps_source_chain() {
        let hook_error: LifecycleError = anyhow::anyhow!("connection refused")
            .context("warming cache")
            .into();
        let err = LifecycleError::hook_failed("OnApplicationBootstrap", "CacheWarmer", hook_error);

        let source = err.source().expect("hook error is the source");
        assert_eq!(source.to_string(), "warming cache");
        let cause = source.source().expect("anyhow context is preserved");
        assert_eq!(cause.to_string(), "connection refused");
        assert!(matches!(err.root_cause(), LifecycleError::Custom(_)));
    }

    #[test]
    fn test_anyhow_converts_transparently() {
        fn fails() -> Result<()> {
            Err::<(), _>(anyhow::anyhow!("disk full"))?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, LifecycleError::Custom(_)));
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_timeout_display() {
        let err = LifecycleError::timeout("OnModuleDestroy", Duration::from_millis(20));
        assert_eq!(err.to_string(), "OnModuleDestroy did not settle within 20ms");
    }
}
