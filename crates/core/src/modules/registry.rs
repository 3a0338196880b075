//! Capability module registry

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::ports::CapabilityModule;

/// Owns the capability modules of one marketplace connection
///
/// Registration happens during connection setup through `&mut self`;
/// afterwards the registry is read-only and can be shared behind an `Arc`.
/// Registering a capability twice keeps only the latest module.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Box<dyn CapabilityModule>>,
}

impl ModuleRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under `name`, returning the module it replaced
    pub fn register(
        &mut self,
        name: impl Into<String>,
        module: Box<dyn CapabilityModule>,
    ) -> Option<Box<dyn CapabilityModule>> {
        let name = name.into();
        let descriptor = module.descriptor();
        let replaced = self.modules.insert(name.clone(), module);
        debug!(
            capability = %name,
            api_version = %descriptor.api_version,
            replaced = replaced.is_some(),
            "registered capability module"
        );
        replaced
    }

    /// Register under the module's own capability name
    pub fn register_module(
        &mut self,
        module: Box<dyn CapabilityModule>,
    ) -> Option<Box<dyn CapabilityModule>> {
        let name = module.descriptor().capability_name;
        self.register(name, module)
    }

    /// Borrow the module registered under `name`.
    ///
    /// # Panics
    ///
    /// Panics if nothing is registered under `name`. Asking for a capability
    /// that was never set up is a programming error; use
    /// [`try_get`](Self::try_get) when absence is expected.
    pub fn get(&self, name: &str) -> &dyn CapabilityModule {
        match self.try_get(name) {
            Some(module) => module,
            None => panic!("capability module '{name}' is not registered"),
        }
    }

    /// Look up a module without panicking
    pub fn try_get(&self, name: &str) -> Option<&dyn CapabilityModule> {
        self.modules.get(name).map(|module| module.as_ref())
    }

    /// Borrow the module under `name` as its concrete type
    pub fn get_typed<M: CapabilityModule>(&self, name: &str) -> Option<&M> {
        self.try_get(name).and_then(|module| module.as_any().downcast_ref::<M>())
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered capability names, sorted
    pub fn capabilities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Unregister `name`, returning the module
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn CapabilityModule>> {
        self.modules.remove(name)
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry").field("capabilities", &self.capabilities()).finish()
    }
}
