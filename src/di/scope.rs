use strum_macros::{AsRefStr, Display};

/// Lifetime of the instances behind a wrapper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Scope {
    /// One instance shared for the whole application
    #[default]
    Singleton,
    /// A fresh instance for every consumer
    Transient,
    /// A fresh instance per request; never receives lifecycle hooks
    Request,
}
