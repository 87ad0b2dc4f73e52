//! Facetgen - Configurable Facet Extraction Pipeline
//!
//! Facetgen derives structured metadata facets from data files using
//! declarative configuration: each facet names an extraction method plus
//! ordered pre- and post-processor chains, and the engine runs them over
//! files to produce item records.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use facetgen::{ExtractorConfig, FacetExtractor};
//!
//! # fn main() -> facetgen::Result<()> {
//! let config = ExtractorConfig::from_yaml_file("facets.yaml")?;
//! let extractor = FacetExtractor::new(&config)?;
//! let outcome = extractor.process_file("data/satellite_2005-01-15T10-30-00_sensorX.dat")?;
//! for (facet, value) in &outcome.record {
//!     println!("{facet}: {value}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): configuration loading, chain resolution,
//!   and the per-file extraction orchestrator
//! - **Plugin System** (`plugins`): registries and traits for extraction
//!   methods, pre-processors, and post-processors
//! - **Methods** (`methods`): built-in `regex` and `header` extraction
//! - **Processors** (`processors`): built-in `filename_reducer`,
//!   `strip_extension`, `facet_map`, `iso_date`, and `bbox`
//!
//! # Features
//!
//! - All resolution and validation happens when the extractor is built,
//!   so configuration mistakes surface before any file is touched
//! - Best-effort error handling by default: one bad facet never costs
//!   the rest of the record
//! - Concurrent batch processing with bounded parallelism
//! - Custom methods and processors register through the same global
//!   registries the built-ins use

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod methods;
pub mod plugins;
pub mod processors;
pub mod types;

pub use error::{FacetgenError, Result};
pub use types::{ExtractionContext, ExtractionOutcome, FacetError, FacetErrorKind, ItemRecord};

pub use core::config::{ErrorPolicy, ExtractorConfig, FacetDefinition, MethodSpec, ProcessorSpec};
pub use core::extractor::{batch_process_files, batch_process_files_sync, FacetExtractor};

pub use plugins::registry::{
    get_extraction_method_registry, get_post_processor_registry, get_pre_processor_registry,
};
pub use plugins::{ExtractionMethod, PostProcessor, PreProcessor, ValueShape};
