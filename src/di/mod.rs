mod instance;
mod scope;
mod token;
mod transient;

pub use instance::{InstanceWrapper, SharedInstance, shared};
pub use scope::Scope;
pub use token::InjectionToken;
pub use transient::{
    HookTarget, non_transient_instances, partition_by_transience, transient_instances,
};
