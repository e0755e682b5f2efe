//! Lifecycle Hooks Module
//!
//! This module calls lifecycle hooks on the instances of every module once
//! they have been created, and again when the application closes.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Module instances created by the container
//!    ↓
//! 2. OnModuleInit                      ← deepest module first
//!    ↓
//! 3. OnApplicationBootstrap            ← deepest module first
//!    ↓
//! [Running...]
//!    ↓
//! 4. Shutdown Signal (SIGTERM/SIGINT)
//!    ↓
//! 5. OnModuleDestroy                   ← root module first
//!    ↓
//! 6. BeforeApplicationShutdown         ← root module first
//!    ↓
//! 7. OnApplicationShutdown             ← root module first
//! ```
//!
//! Inside one module each phase calls singleton instances concurrently,
//! then transient instances concurrently, then the module's own instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use lifeline::lifecycle::{OnApplicationBootstrap, LifecycleError};
//! use lifeline::LifecycleHooks;
//! use async_trait::async_trait;
//!
//! #[derive(LifecycleHooks)]
//! #[lifecycle(bootstrap)]
//! pub struct CacheWarmer {
//!     cache: Arc<Cache>,
//! }
//!
//! #[async_trait]
//! impl OnApplicationBootstrap for CacheWarmer {
//!     async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError> {
//!         tracing::info!("Warming cache");
//!         self.cache.load_hot_keys().await?;
//!         Ok(())
//!     }
//! }
//! ```

mod context;
mod error;
mod hook;
mod invoker;
mod shutdown;
mod traits;

pub use context::{ApplicationBuilder, ApplicationContext};
pub use error::{LifecycleError, Result};
pub use hook::LifecycleHook;
pub use invoker::{
    call_app_shutdown_hook, call_before_app_shutdown_hook, call_module_bootstrap_hook,
    call_module_destroy_hook, call_module_init_hook,
};
pub use shutdown::{ShutdownHandler, ShutdownSignal, shutdown_signal};
pub use traits::{
    BeforeApplicationShutdown, LifecycleHooks, OnApplicationBootstrap, OnApplicationShutdown,
    OnModuleDestroy, OnModuleInit,
};
