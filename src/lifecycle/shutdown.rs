//! Graceful Shutdown Handler
//!
//! Waits for OS signals and closes the application context.

use super::{ApplicationContext, LifecycleError, Result};
use futures::future::{BoxFuture, select_all};
use std::io;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumString};

/// OS signals that can trigger a graceful shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum ShutdownSignal {
    #[strum(serialize = "SIGINT")]
    Interrupt,
    #[strum(serialize = "SIGTERM")]
    Terminate,
    #[strum(serialize = "SIGQUIT")]
    Quit,
    #[strum(serialize = "SIGHUP")]
    Hangup,
}

/// Handles graceful shutdown of the application
///
/// Listens for the signals configured in [`LifecycleConfig`](crate::config::LifecycleConfig)
/// and closes the context with the signal that arrived first.
///
/// # Example
///
/// ```rust,ignore
/// use lifeline::lifecycle::ShutdownHandler;
///
/// let context = Arc::new(context);
/// let shutdown_handler = ShutdownHandler::new(Arc::clone(&context));
///
/// tokio::spawn(async move {
///     shutdown_handler.wait_for_shutdown().await.ok();
///     std::process::exit(0);
/// });
/// ```
pub struct ShutdownHandler {
    context: Arc<ApplicationContext>,
    signals: Vec<ShutdownSignal>,
}

impl ShutdownHandler {
    /// Create a handler listening for the context's configured signals
    pub fn new(context: Arc<ApplicationContext>) -> Self {
        let signals = context.config().shutdown_signals.clone();
        Self { context, signals }
    }

    /// Listen for `signals` instead of the configured ones
    pub fn with_signals(mut self, signals: impl Into<Vec<ShutdownSignal>>) -> Self {
        self.signals = signals.into();
        self
    }

    /// Wait for a shutdown signal and close the context
    ///
    /// Returns the signal that triggered the shutdown.
    pub async fn wait_for_shutdown(&self) -> Result<ShutdownSignal> {
        let signal = shutdown_signal(&self.signals).await.map_err(|e| {
            LifecycleError::shutdown_failed(format!("Failed to listen for signals: {}", e))
        })?;

        tracing::info!("Starting graceful shutdown...");
        self.context.close(Some(signal)).await?;
        tracing::info!("Graceful shutdown complete");
        Ok(signal)
    }
}

/// Create a future that completes when one of `signals` is received
///
/// # Example
///
/// ```rust,ignore
/// use lifeline::lifecycle::{shutdown_signal, ShutdownSignal};
///
/// tokio::select! {
///     signal = shutdown_signal(&[ShutdownSignal::Interrupt]) => {
///         println!("Shutdown signal received: {:?}", signal);
///     }
///     _ = server.serve() => {}
/// }
/// ```
pub async fn shutdown_signal(signals: &[ShutdownSignal]) -> io::Result<ShutdownSignal> {
    if signals.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no shutdown signals to listen for",
        ));
    }

    let listeners = signals
        .iter()
        .map(|&signal| listen(signal))
        .collect::<io::Result<Vec<_>>>()?;

    let (received, _, _) = select_all(listeners).await;
    let signal = received?;
    tracing::info!("Received {} signal", signal);
    Ok(signal)
}

#[cfg(unix)]
fn listen(signal: ShutdownSignal) -> io::Result<BoxFuture<'static, io::Result<ShutdownSignal>>> {
    use tokio::signal::unix::{SignalKind, signal as unix_signal};

    let kind = match signal {
        ShutdownSignal::Interrupt => SignalKind::interrupt(),
        ShutdownSignal::Terminate => SignalKind::terminate(),
        ShutdownSignal::Quit => SignalKind::quit(),
        ShutdownSignal::Hangup => SignalKind::hangup(),
    };
    let mut stream = unix_signal(kind)?;
    Ok(Box::pin(async move {
        stream.recv().await;
        Ok(signal)
    }))
}

#[cfg(not(unix))]
fn listen(signal: ShutdownSignal) -> io::Result<BoxFuture<'static, io::Result<ShutdownSignal>>> {
    match signal {
        ShutdownSignal::Interrupt => Ok(Box::pin(async move {
            tokio::signal::ctrl_c().await?;
            Ok(signal)
        })),
        // Only Ctrl+C is observable here.
        _ => Ok(Box::pin(std::future::pending())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(ShutdownSignal::Terminate.to_string(), "SIGTERM");
        assert_eq!("sigint".parse::<ShutdownSignal>().unwrap(), ShutdownSignal::Interrupt);
        assert_eq!("SIGHUP".parse::<ShutdownSignal>().unwrap(), ShutdownSignal::Hangup);
        assert!("SIGKILL".parse::<ShutdownSignal>().is_err());
    }

    #[tokio::test]
    async fn test_no_signals_is_an_error() {
        let err = shutdown_signal(&[]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
