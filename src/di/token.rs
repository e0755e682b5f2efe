use std::any::TypeId;
use std::fmt;

/// Key under which a module stores an instance wrapper
///
/// Either the concrete type that was registered, or a free-form string for
/// value and factory providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectionToken {
    Type { id: TypeId, name: &'static str },
    Name(String),
}

impl InjectionToken {
    pub fn of<T: 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Human readable name, used in logs and errors
    pub fn name(&self) -> &str {
        match self {
            Self::Type { name, .. } => short_type_name(name),
            Self::Name(name) => name,
        }
    }
}

/// Strip the module path from `std::any::type_name` output, keeping generics intact.
fn short_type_name(full: &str) -> &str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

impl fmt::Display for InjectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for InjectionToken {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for InjectionToken {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
