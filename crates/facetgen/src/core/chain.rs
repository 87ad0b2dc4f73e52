//! Processor chain resolution and execution.
//!
//! A chain is resolved once, against the global registries, when the
//! orchestrator is built: unknown names, rejected option mappings, and
//! shape mismatches between adjacent post-processors all fail at that
//! point, before any file is processed. Running a resolved chain folds a
//! value through the entries left-to-right; an empty chain returns its
//! input unchanged.

use crate::core::config::ProcessorSpec;
use crate::plugins::registry::{get_post_processor_registry, get_pre_processor_registry};
use crate::plugins::{PostProcessor, PreProcessor};
use crate::{FacetgenError, Result};
use serde_json::Value;
use std::sync::Arc;

/// A resolved pre-processor chain for one facet definition.
pub struct ResolvedPreChain {
    entries: Vec<(Arc<dyn PreProcessor>, Value)>,
}

impl std::fmt::Debug for ResolvedPreChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedPreChain")
            .field(
                "entries",
                &self.entries.iter().map(|(p, _)| p.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResolvedPreChain {
    /// Resolve the specs against the global pre-processor registry.
    ///
    /// # Errors
    ///
    /// `UnknownProcessor` for an unregistered name, `Validation` when a
    /// processor rejects its option mapping.
    pub fn resolve(specs: &[ProcessorSpec], facet: &str) -> Result<Self> {
        let registry = get_pre_processor_registry();
        let registry = registry
            .read()
            .map_err(|e| FacetgenError::LockPoisoned(format!("pre-processor registry: {}", e)))?;

        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let processor = registry.get(&spec.name).ok_or_else(|| FacetgenError::UnknownProcessor {
                name: spec.name.clone(),
                facet: facet.to_string(),
            })?;
            processor.validate_config(&spec.config)?;
            entries.push((processor, spec.config.clone()));
        }

        Ok(Self { entries })
    }

    /// Fold the extraction input through the chain.
    pub fn run(&self, input: &str) -> Result<String> {
        let mut current = input.to_string();
        for (processor, config) in &self.entries {
            current = processor.apply(&current, config)?;
        }
        Ok(current)
    }

    /// Whether the facet definition declared no pre-processors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved post-processor chain for one facet definition.
pub struct ResolvedPostChain {
    entries: Vec<(Arc<dyn PostProcessor>, Value)>,
}

impl std::fmt::Debug for ResolvedPostChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedPostChain")
            .field(
                "entries",
                &self.entries.iter().map(|(p, _)| p.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResolvedPostChain {
    /// Resolve the specs against the global post-processor registry.
    ///
    /// Besides name and option validation, checks that each processor's
    /// output shape is accepted by its successor's input shape.
    ///
    /// # Errors
    ///
    /// `UnknownProcessor`, `Validation`, or `ChainMismatch`.
    pub fn resolve(specs: &[ProcessorSpec], facet: &str) -> Result<Self> {
        let registry = get_post_processor_registry();
        let registry = registry
            .read()
            .map_err(|e| FacetgenError::LockPoisoned(format!("post-processor registry: {}", e)))?;

        let mut entries: Vec<(Arc<dyn PostProcessor>, Value)> = Vec::with_capacity(specs.len());
        for spec in specs {
            let processor = registry.get(&spec.name).ok_or_else(|| FacetgenError::UnknownProcessor {
                name: spec.name.clone(),
                facet: facet.to_string(),
            })?;
            processor.validate_config(&spec.config)?;

            if let Some((previous, _)) = entries.last() {
                let produced = previous.output_shape();
                let expected = processor.input_shape();
                if !expected.accepts(produced) {
                    return Err(FacetgenError::ChainMismatch {
                        facet: facet.to_string(),
                        message: format!(
                            "'{}' outputs {} but '{}' expects {}",
                            previous.name(),
                            produced,
                            processor.name(),
                            expected
                        ),
                    });
                }
            }

            entries.push((processor, spec.config.clone()));
        }

        Ok(Self { entries })
    }

    /// Fold an extracted value through the chain.
    pub fn run(&self, value: Value) -> Result<Value> {
        let mut current = value;
        for (processor, config) in &self.entries {
            current = processor.apply(current, config)?;
        }
        Ok(current)
    }

    /// Whether the facet definition declared no post-processors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
