use super::Module;
use crate::di::InjectionToken;
use crate::error::{LifelineError, Result};
use indexmap::IndexMap;

/// Instantiated modules of an application, in registration order
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: IndexMap<InjectionToken, Module>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Module) -> Result<&mut Module> {
        let token = module.token().clone();
        if self.modules.contains_key(&token) {
            return Err(LifelineError::DuplicateModule {
                module: token.to_string(),
            });
        }
        tracing::debug!(module = %token, id = %module.id(), "Registered module");
        let (index, _) = self.modules.insert_full(token, module);
        Ok(&mut self.modules[index])
    }

    pub fn get(&self, token: &InjectionToken) -> Result<&Module> {
        self.modules
            .get(token)
            .ok_or_else(|| LifelineError::ModuleNotFound {
                module: token.to_string(),
            })
    }

    pub fn get_mut(&mut self, token: &InjectionToken) -> Result<&mut Module> {
        self.modules
            .get_mut(token)
            .ok_or_else(|| LifelineError::ModuleNotFound {
                module: token.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Modules furthest from the root first; ties keep registration order
    pub fn sorted_by_distance(&self) -> Vec<&Module> {
        let mut modules: Vec<&Module> = self.modules.values().collect();
        modules.sort_by(|a, b| b.distance().cmp(&a.distance()));
        modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
