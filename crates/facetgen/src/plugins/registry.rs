//! Plugin registration and discovery.
//!
//! Each plugin role (extraction method, pre-processor, post-processor) has
//! its own registry with type-safe registration and lookup. Process-wide
//! singletons are populated with the built-in implementations on first use
//! and are expected to be fully populated before extraction starts and
//! never mutated afterward; during runs they are only read.

use crate::plugins::{ExtractionMethod, PostProcessor, PreProcessor};
use crate::{FacetgenError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Validate a plugin name before registration.
///
/// # Rules
///
/// - Name cannot be empty
/// - Name cannot contain whitespace
///
/// # Errors
///
/// Returns `Validation` if the name is invalid.
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FacetgenError::validation("plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(FacetgenError::validation(format!(
            "plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

macro_rules! registry_impl {
    ($registry:ident, $trait:ident) => {
        impl $registry {
            /// Register a plugin under its own name.
            ///
            /// Validates the name and calls `initialize()`; the plugin is
            /// not registered if either fails. Re-registering a name
            /// replaces the previous implementation.
            pub fn register(&mut self, plugin: Arc<dyn $trait>) -> Result<()> {
                let name = plugin.name().to_string();

                validate_plugin_name(&name)?;

                plugin.initialize()?;

                self.entries.insert(name, plugin);
                Ok(())
            }

            /// Look up a plugin by name.
            pub fn get(&self, name: &str) -> Option<Arc<dyn $trait>> {
                self.entries.get(name).cloned()
            }

            /// List all registered plugin names.
            pub fn list(&self) -> Vec<String> {
                self.entries.keys().cloned().collect()
            }

            /// Remove a plugin from the registry.
            ///
            /// Calls `shutdown()` on the plugin before removing. Removing
            /// an unknown name is a no-op.
            pub fn remove(&mut self, name: &str) -> Result<()> {
                if let Some(plugin) = self.entries.remove(name) {
                    plugin.shutdown()?;
                }
                Ok(())
            }

            /// Shutdown all plugins and clear the registry.
            pub fn shutdown_all(&mut self) -> Result<()> {
                let names: Vec<_> = self.entries.keys().cloned().collect();
                for name in names {
                    self.remove(&name)?;
                }
                Ok(())
            }
        }

        impl Default for $registry {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Registry for extraction method plugins.
///
/// # Thread Safety
///
/// The registry itself is plain data; the global singleton wraps it in an
/// `RwLock` so extraction runs take read locks only.
pub struct ExtractionMethodRegistry {
    entries: HashMap<String, Arc<dyn ExtractionMethod>>,
}

impl ExtractionMethodRegistry {
    /// Create a registry pre-populated with the built-in methods
    /// (`regex`, `header`).
    pub fn new() -> Self {
        let mut registry = Self::new_empty();

        let builtins: Vec<Arc<dyn ExtractionMethod>> = vec![
            Arc::new(crate::methods::RegexExtract),
            Arc::new(crate::methods::HeaderExtract),
        ];
        for method in builtins {
            let _ = registry.register(method);
        }

        registry
    }

    /// Create an empty registry without built-ins, for tests or full
    /// caller control over registration.
    pub fn new_empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

registry_impl!(ExtractionMethodRegistry, ExtractionMethod);

/// Registry for pre-processor plugins.
pub struct PreProcessorRegistry {
    entries: HashMap<String, Arc<dyn PreProcessor>>,
}

impl PreProcessorRegistry {
    /// Create a registry pre-populated with the built-in pre-processors
    /// (`filename_reducer`, `strip_extension`).
    pub fn new() -> Self {
        let mut registry = Self::new_empty();

        let builtins: Vec<Arc<dyn PreProcessor>> = vec![
            Arc::new(crate::processors::pre::FilenameReducer),
            Arc::new(crate::processors::pre::StripExtension),
        ];
        for processor in builtins {
            let _ = registry.register(processor);
        }

        registry
    }

    /// Create an empty registry without built-ins.
    pub fn new_empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

registry_impl!(PreProcessorRegistry, PreProcessor);

/// Registry for post-processor plugins.
pub struct PostProcessorRegistry {
    entries: HashMap<String, Arc<dyn PostProcessor>>,
}

impl PostProcessorRegistry {
    /// Create a registry pre-populated with the built-in post-processors
    /// (`facet_map`, `iso_date`, `bbox`).
    pub fn new() -> Self {
        let mut registry = Self::new_empty();

        let builtins: Vec<Arc<dyn PostProcessor>> = vec![
            Arc::new(crate::processors::post::FacetMapProcessor),
            Arc::new(crate::processors::post::IsoDateProcessor),
            Arc::new(crate::processors::post::BboxProcessor),
        ];
        for processor in builtins {
            let _ = registry.register(processor);
        }

        registry
    }

    /// Create an empty registry without built-ins.
    pub fn new_empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

registry_impl!(PostProcessorRegistry, PostProcessor);

/// Global extraction method registry singleton.
pub static EXTRACTION_METHOD_REGISTRY: Lazy<Arc<RwLock<ExtractionMethodRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(ExtractionMethodRegistry::new())));

/// Global pre-processor registry singleton.
pub static PRE_PROCESSOR_REGISTRY: Lazy<Arc<RwLock<PreProcessorRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(PreProcessorRegistry::new())));

/// Global post-processor registry singleton.
pub static POST_PROCESSOR_REGISTRY: Lazy<Arc<RwLock<PostProcessorRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(PostProcessorRegistry::new())));

/// Get the global extraction method registry.
pub fn get_extraction_method_registry() -> Arc<RwLock<ExtractionMethodRegistry>> {
    EXTRACTION_METHOD_REGISTRY.clone()
}

/// Get the global pre-processor registry.
pub fn get_pre_processor_registry() -> Arc<RwLock<PreProcessorRegistry>> {
    PRE_PROCESSOR_REGISTRY.clone()
}

/// Get the global post-processor registry.
pub fn get_post_processor_registry() -> Arc<RwLock<PostProcessorRegistry>> {
    POST_PROCESSOR_REGISTRY.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::Plugin;
    use serde_json::Value;

    struct MockPre {
        name: String,
    }

    impl Plugin for MockPre {
        fn name(&self) -> &str {
            &self.name
        }
    }

    impl PreProcessor for MockPre {
        fn apply(&self, input: &str, _config: &Value) -> Result<String> {
            Ok(input.to_uppercase())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = PreProcessorRegistry::new_empty();
        registry
            .register(Arc::new(MockPre {
                name: "upper".to_string(),
            }))
            .unwrap();

        let plugin = registry.get("upper").unwrap();
        assert_eq!(plugin.name(), "upper");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_list_and_remove() {
        let mut registry = PreProcessorRegistry::new_empty();
        registry
            .register(Arc::new(MockPre {
                name: "upper".to_string(),
            }))
            .unwrap();

        assert_eq!(registry.list(), vec!["upper".to_string()]);

        registry.remove("upper").unwrap();
        assert!(registry.get("upper").is_none());

        // removing an unknown name is a no-op
        registry.remove("upper").unwrap();
    }

    #[test]
    fn test_shutdown_all() {
        let mut registry = PreProcessorRegistry::new_empty();
        registry
            .register(Arc::new(MockPre {
                name: "a".to_string(),
            }))
            .unwrap();
        registry
            .register(Arc::new(MockPre {
                name: "b".to_string(),
            }))
            .unwrap();

        assert_eq!(registry.list().len(), 2);
        registry.shutdown_all().unwrap();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_invalid_name_empty() {
        let mut registry = PreProcessorRegistry::new_empty();
        let result = registry.register(Arc::new(MockPre { name: String::new() }));
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_invalid_name_whitespace() {
        let mut registry = PreProcessorRegistry::new_empty();
        let result = registry.register(Arc::new(MockPre {
            name: "my processor".to_string(),
        }));
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_default_builtins_present() {
        let methods = ExtractionMethodRegistry::new();
        assert!(methods.get("regex").is_some());
        assert!(methods.get("header").is_some());

        let pre = PreProcessorRegistry::new();
        assert!(pre.get("filename_reducer").is_some());
        assert!(pre.get("strip_extension").is_some());

        let post = PostProcessorRegistry::new();
        assert!(post.get("facet_map").is_some());
        assert!(post.get("iso_date").is_some());
        assert!(post.get("bbox").is_some());
    }

    #[test]
    fn test_global_registry_access() {
        let methods = get_extraction_method_registry();
        assert!(
            methods
                .read()
                .expect("method registry lock poisoned in test")
                .get("regex")
                .is_some()
        );

        let pre = get_pre_processor_registry();
        assert!(
            pre.read()
                .expect("pre-processor registry lock poisoned in test")
                .get("filename_reducer")
                .is_some()
        );

        let post = get_post_processor_registry();
        assert!(
            post.read()
                .expect("post-processor registry lock poisoned in test")
                .get("iso_date")
                .is_some()
        );
    }
}
