//! In-process module registry.
//!
//! Maps module paths to `AgentModule`s. Paths starting with `process:` are
//! not looked up; they are handed to `ProcessModule` and spawned on demand.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::builtin::{PassiveModule, RandomModule};
use super::process::{ProcessModule, PROCESS_PREFIX};
use super::traits::{AgentModule, ModuleResolver};
use crate::core::AgentError;

/// Registry of agent modules by path.
///
/// ## Example
///
/// ```
/// use monopoly_arena::agents::{ModuleRegistry, ModuleResolver};
///
/// let registry = ModuleRegistry::with_builtins();
/// let module = registry.resolve("builtin:random").unwrap();
/// assert_eq!(module.abi_version(), 1);
/// assert!(registry.resolve("builtin:missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: FxHashMap<String, Arc<dyn AgentModule>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the reference strategies.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("builtin:passive", PassiveModule);
        registry.register("builtin:random", RandomModule);
        registry
    }

    /// Register a module under a path, replacing any previous entry.
    pub fn register(&mut self, path: impl Into<String>, module: impl AgentModule + 'static) {
        self.modules.insert(path.into(), Arc::new(module));
    }

    /// Check if a path is registered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(&self, path: &str) -> Result<Arc<dyn AgentModule>, AgentError> {
        if let Some(module) = self.modules.get(path) {
            return Ok(Arc::clone(module));
        }
        if path.starts_with(PROCESS_PREFIX) {
            return Ok(Arc::new(ProcessModule::connect(path)?));
        }
        Err(AgentError::UnknownModule(path.to_string()))
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<&String> = self.modules.keys().collect();
        paths.sort();
        f.debug_struct("ModuleRegistry").field("modules", &paths).finish()
    }
}
