//! Binding registry.

use std::hash::BuildHasherDefault;
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use tracing::debug;

use crate::{Binding, Error, Result, BINDING_EXTENSION};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Source of bindings by table name.
pub trait SchemaProvider {
    /// Look up the binding registered under `name`.
    ///
    /// Fails with [`Error::SchemaNotFound`] if there is none.
    fn lookup(&self, name: &str) -> Result<Arc<Binding>>;
}

/// In-memory set of bindings keyed by name.
#[derive(Debug, Default, Clone)]
pub struct BindingRegistry {
    bindings: FxHashMap<String, Arc<Binding>>,
}

impl BindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every binding file in `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Register a binding, returning the one it replaced, if any.
    pub fn register(&mut self, binding: Binding) -> Option<Arc<Binding>> {
        self.bindings
            .insert(binding.name().to_string(), Arc::new(binding))
    }

    /// Load every `*.txt` binding file in `dir`. Returns the number loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            BINDING_EXTENSION
        );

        let mut loaded = 0;
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            let binding = Binding::from_file(&path)?;
            debug!(
                binding = binding.name(),
                fields = binding.field_count(),
                record_size = binding.record_size(),
                "loaded binding"
            );
            self.register(binding);
            loaded += 1;
        }

        debug!(dir = %dir.display(), loaded, "loaded binding directory");
        Ok(loaded)
    }

    /// Get a binding by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Binding>> {
        self.bindings.get(name)
    }

    /// Iterate over the registered binding names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl SchemaProvider for BindingRegistry {
    fn lookup(&self, name: &str) -> Result<Arc<Binding>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| Error::SchemaNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindingField, BindingType};

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BindingRegistry::new();
        let binding = Binding::new(
            "Spell",
            vec![BindingField::new("ID", BindingType::UInt)],
        )
        .unwrap();

        assert!(registry.register(binding.clone()).is_none());
        assert!(registry.register(binding).is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("Spell").unwrap().field_count(), 1);
    }

    #[test]
    fn test_lookup_missing() {
        let registry = BindingRegistry::new();
        match registry.lookup("Nope") {
            Err(Error::SchemaNotFound(name)) => assert_eq!(name, "Nope"),
            other => panic!("expected SchemaNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ItemSubClass.txt"), "uint Class\nuint subClass\n").unwrap();
        std::fs::write(dir.path().join("SpellIcon.txt"), "uint ID\nstring Name\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a binding").unwrap();

        let registry = BindingRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);

        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["ItemSubClass", "SpellIcon"]);
    }

    #[test]
    fn test_load_dir_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.txt"), "uint\n").unwrap();

        assert!(matches!(
            BindingRegistry::from_dir(dir.path()),
            Err(Error::Parse { line: 1, .. })
        ));
    }
}
