//! Per-module hook invocation
//!
//! Every phase runs the same way for a single module:
//!
//! ```text
//! controllers + providers (minus the module itself) + injectables
//!    ↓ partition_by_transience
//! non-transient batch   (concurrent, all must settle)
//!    ↓
//! transient batch       (concurrent, all must settle)
//!    ↓
//! module instance       (alone, last)
//! ```
//!
//! A batch is driven on the calling task. Every hook of a batch that has
//! started runs to completion even when a sibling fails. The batch then
//! reports the first failure to settle, and later batches and the module's
//! own hook never start.

use super::{LifecycleError, LifecycleHook, Result, ShutdownSignal};
use crate::di::{HookTarget, InjectionToken, InstanceWrapper, SharedInstance, partition_by_transience};
use crate::module::Module;
use futures::stream::{FuturesUnordered, StreamExt};

/// Call `OnModuleInit` on the module's instances
pub async fn call_module_init_hook(module: &Module) -> Result<()> {
    call_module_hook(module, LifecycleHook::ModuleInit).await
}

/// Call `OnApplicationBootstrap` on the module's instances
///
/// Non-transient instances run first, then transient ones, then the
/// module's own instance. Instances that were never created or that do not
/// implement the hook are skipped.
pub async fn call_module_bootstrap_hook(module: &Module) -> Result<()> {
    call_module_hook(module, LifecycleHook::ApplicationBootstrap).await
}

/// Call `OnModuleDestroy` on the module's instances
pub async fn call_module_destroy_hook(module: &Module) -> Result<()> {
    call_module_hook(module, LifecycleHook::ModuleDestroy).await
}

/// Call `BeforeApplicationShutdown` on the module's instances
pub async fn call_before_app_shutdown_hook(
    module: &Module,
    signal: Option<ShutdownSignal>,
) -> Result<()> {
    call_module_hook(module, LifecycleHook::BeforeApplicationShutdown(signal)).await
}

/// Call `OnApplicationShutdown` on the module's instances
pub async fn call_app_shutdown_hook(module: &Module, signal: Option<ShutdownSignal>) -> Result<()> {
    call_module_hook(module, LifecycleHook::ApplicationShutdown(signal)).await
}

pub(crate) async fn call_module_hook(module: &Module, hook: LifecycleHook) -> Result<()> {
    let (module_wrapper, providers) = module.split_providers();
    let wrappers: Vec<&InstanceWrapper> = module
        .controllers()
        .chain(providers)
        .chain(module.injectables())
        .collect();

    let (non_transient, transient) = partition_by_transience(&wrappers);

    let mut called = call_batch(non_transient, hook).await?;
    called += call_batch(transient, hook).await?;

    if let Some(instance) = module_wrapper.instance() {
        if call_instance(module_wrapper.token(), instance, hook).await? {
            called += 1;
        }
    }

    tracing::debug!(
        module = %module.name(),
        id = %module.id(),
        hook = %hook,
        called,
        "Module hooks settled"
    );
    Ok(())
}

/// Run the hook on every present instance of the batch and wait for all of them
async fn call_batch(targets: Vec<HookTarget<'_>>, hook: LifecycleHook) -> Result<usize> {
    let mut calls: FuturesUnordered<_> = targets
        .into_iter()
        .filter_map(|target| {
            target
                .instance
                .map(|instance| call_instance(target.token, instance, hook))
        })
        .collect();

    let mut called = 0;
    let mut first_error = None;
    while let Some(result) = calls.next().await {
        match result {
            Ok(true) => called += 1,
            Ok(false) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(called),
    }
}

/// Returns whether the instance implemented the hook
async fn call_instance(
    token: &InjectionToken,
    instance: &SharedInstance,
    hook: LifecycleHook,
) -> Result<bool> {
    let mut guard = instance.write().await;
    let Some(call) = hook.call(&mut *guard) else {
        return Ok(false);
    };

    tracing::debug!(hook = %hook, instance = %token, "Calling hook");
    call.await.map_err(|e| {
        tracing::error!("{} failed for {}: {}", hook, token, e);
        LifecycleError::hook_failed(hook, token, e)
    })?;
    Ok(true)
}
