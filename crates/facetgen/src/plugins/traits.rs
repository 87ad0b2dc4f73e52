//! Base plugin trait definition.
//!
//! Every pluggable unit (extraction method, pre-processor, post-processor)
//! implements [`Plugin`], which provides identification and lifecycle hooks.

use crate::Result;

/// Base trait that all plugins must implement.
///
/// # Thread Safety
///
/// All plugins must be `Send + Sync`; registries hand out `Arc<dyn …>`
/// handles that may be used concurrently from multiple files' runs.
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin, used in facet definitions.
    ///
    /// Names are lowercase with underscores (e.g. `"filename_reducer"`)
    /// and must not contain whitespace.
    fn name(&self) -> &str;

    /// Semantic version of this plugin (`MAJOR.MINOR.PATCH`).
    fn version(&self) -> String {
        "1.0.0".to_string()
    }

    /// Initialize the plugin.
    ///
    /// Called once at registration. The plugin is not registered if this
    /// fails. Takes `&self` to work with `Arc<dyn Plugin>`; plugins needing
    /// mutable initialization state should use interior mutability.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Shutdown the plugin, called on removal from a registry.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Optional human-readable description for diagnostics.
    fn description(&self) -> &str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct TestPlugin {
        initialized: AtomicBool,
    }

    impl Plugin for TestPlugin {
        fn name(&self) -> &str {
            "test-plugin"
        }

        fn initialize(&self) -> Result<()> {
            self.initialized.store(true, Ordering::Release);
            Ok(())
        }

        fn shutdown(&self) -> Result<()> {
            self.initialized.store(false, Ordering::Release);
            Ok(())
        }

        fn description(&self) -> &str {
            "A test plugin"
        }
    }

    #[test]
    fn test_plugin_metadata() {
        let plugin = TestPlugin {
            initialized: AtomicBool::new(false),
        };
        assert_eq!(plugin.name(), "test-plugin");
        assert_eq!(plugin.version(), "1.0.0");
        assert_eq!(plugin.description(), "A test plugin");
    }

    #[test]
    fn test_plugin_lifecycle() {
        let plugin = TestPlugin {
            initialized: AtomicBool::new(false),
        };

        plugin.initialize().unwrap();
        assert!(plugin.initialized.load(Ordering::Acquire));

        plugin.shutdown().unwrap();
        assert!(!plugin.initialized.load(Ordering::Acquire));
    }
}
