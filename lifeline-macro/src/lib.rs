use proc_macro::TokenStream;

mod hooks;

/// Derive macro implementing `LifecycleHooks` from a list of supported hooks
///
/// Each flag exposes one hook trait, which the type must implement itself:
///
/// | flag              | trait                       |
/// |-------------------|-----------------------------|
/// | `init`            | `OnModuleInit`              |
/// | `bootstrap`       | `OnApplicationBootstrap`    |
/// | `destroy`         | `OnModuleDestroy`           |
/// | `before_shutdown` | `BeforeApplicationShutdown` |
/// | `shutdown`        | `OnApplicationShutdown`     |
///
/// # Example
/// ```ignore
/// use lifeline::LifecycleHooks;
///
/// #[derive(LifecycleHooks)]
/// #[lifecycle(init, shutdown)]
/// pub struct DatabaseService {
///     pool: Pool,
/// }
/// ```
///
/// Without a `#[lifecycle]` attribute the type takes part in no phase.
#[proc_macro_derive(LifecycleHooks, attributes(lifecycle))]
pub fn derive_lifecycle_hooks(input: TokenStream) -> TokenStream {
    hooks::derive_lifecycle_hooks(input)
}
