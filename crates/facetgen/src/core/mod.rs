//! Core orchestration: configuration, chain resolution, and the
//! per-file extraction pipeline.

pub mod chain;
pub mod config;
pub mod extractor;

pub use chain::{ResolvedPostChain, ResolvedPreChain};
pub use config::{ErrorPolicy, ExtractorConfig, FacetDefinition, MethodSpec, ProcessorSpec};
pub use extractor::{batch_process_files, batch_process_files_sync, FacetExtractor};
