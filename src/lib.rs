//! # Lifeline
//!
//! Ordered lifecycle hooks for the modules of a dependency-injected application.
//!
//! Once a container has created a module's providers, controllers and
//! enhancers, lifeline calls their optional hooks (`OnModuleInit`,
//! `OnApplicationBootstrap`, and the closing hooks) in a fixed order:
//! singleton instances concurrently, then transient instances concurrently,
//! then the module's own instance.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lifeline::prelude::*;
//!
//! // 1. Declare which hooks a service supports
//! #[derive(LifecycleHooks)]
//! #[lifecycle(bootstrap)]
//! pub struct CacheWarmer;
//!
//! #[async_trait]
//! impl OnApplicationBootstrap for CacheWarmer {
//!     async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError> {
//!         tracing::info!("warming cache");
//!         Ok(())
//!     }
//! }
//!
//! #[derive(LifecycleHooks)]
//! pub struct AppModule;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LifelineError> {
//!     // 2. Hand the instantiated modules over
//!     let mut module = Module::of(AppModule);
//!     module.add_provider(InstanceWrapper::singleton("CacheWarmer", shared(CacheWarmer)))?;
//!
//!     let mut modules = ModuleRegistry::new();
//!     modules.add_module(module)?;
//!
//!     // 3. Run OnModuleInit and OnApplicationBootstrap
//!     let context = Arc::new(
//!         ApplicationContext::builder()
//!             .modules(modules)
//!             .config(LifecycleConfig::from_env()?)
//!             .build()
//!             .await?,
//!     );
//!
//!     // 4. Close on SIGINT/SIGTERM
//!     context.spawn_shutdown_handler().await.ok();
//!     Ok(())
//! }
//! ```

extern crate self as lifeline;

pub mod config;
pub mod di;
pub mod error;
pub mod lifecycle;
pub mod module;

// Re-export core types
pub use config::{ConfigService, LifecycleConfig};
pub use di::{InjectionToken, InstanceWrapper, Scope, SharedInstance, shared};
pub use error::{LifelineError, Result};
pub use lifecycle::{ApplicationContext, LifecycleError, LifecycleHooks};
pub use module::{Module, ModuleRegistry};

// Re-export macros
pub use lifeline_macro::LifecycleHooks;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use lifeline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, LifecycleConfig};
    pub use crate::di::{InjectionToken, InstanceWrapper, Scope, SharedInstance, shared};
    pub use crate::error::LifelineError;
    pub use crate::lifecycle::{
        ApplicationBuilder, ApplicationContext, BeforeApplicationShutdown, LifecycleError,
        LifecycleHooks, OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy,
        OnModuleInit, ShutdownHandler, ShutdownSignal, call_module_bootstrap_hook,
        shutdown_signal,
    };
    pub use crate::module::{Module, ModuleRegistry};
    pub use async_trait::async_trait;
    pub use lifeline_macro::LifecycleHooks;
    pub use std::sync::Arc;
}
