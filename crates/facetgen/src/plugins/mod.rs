//! Plugin system for extending facetgen.
//!
//! The plugin system is the crate's primary extension contract: additional
//! extraction methods, pre-processors, and post-processors can be added to
//! the registries by name without modifying the orchestrator.
//!
//! # Plugin Types
//!
//! - [`Plugin`] - Base trait that all plugins must implement
//! - [`ExtractionMethod`] - Produces raw facet values from a file
//! - [`PreProcessor`] - Transforms the extraction input before a method runs
//! - [`PostProcessor`] - Transforms an extracted value before merging
//!
//! # Lifecycle Pattern
//!
//! Plugins are stored in `Arc<dyn Trait>` for thread-safe shared access.
//! The global registries are populated with the built-ins on first use;
//! custom plugins should be registered at process start, before any file
//! is processed:
//!
//! ```rust
//! use facetgen::plugins::registry::get_pre_processor_registry;
//! use facetgen::plugins::{Plugin, PreProcessor};
//! use std::sync::Arc;
//!
//! struct Uppercase;
//!
//! impl Plugin for Uppercase {
//!     fn name(&self) -> &str {
//!         "uppercase"
//!     }
//! }
//!
//! impl PreProcessor for Uppercase {
//!     fn apply(&self, input: &str, _config: &serde_json::Value) -> facetgen::Result<String> {
//!         Ok(input.to_uppercase())
//!     }
//! }
//!
//! # fn main() -> facetgen::Result<()> {
//! let registry = get_pre_processor_registry();
//! registry
//!     .write()
//!     .map_err(|e| facetgen::FacetgenError::LockPoisoned(e.to_string()))?
//!     .register(Arc::new(Uppercase))?;
//! # Ok(())
//! # }
//! ```

pub mod method;
pub mod processor;
pub mod registry;
pub mod traits;

pub use method::ExtractionMethod;
pub use processor::{parse_config, value_type_name, PostProcessor, PreProcessor, ValueShape};
pub use traits::Plugin;
