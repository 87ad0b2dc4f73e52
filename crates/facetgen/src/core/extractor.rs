//! Facet extraction orchestration.
//!
//! [`FacetExtractor`] owns the per-file lifecycle: it resolves every facet
//! definition's extraction method and processor chains up front, then for
//! each file runs pre-processing, extraction, and post-processing per
//! facet in declared order, merging the results into one item record.
//!
//! Processing one file is synchronous; [`batch_process_files`] processes
//! independent files concurrently, which is safe because the only shared
//! state is the read-only plugin registries.

use crate::core::chain::{ResolvedPostChain, ResolvedPreChain};
use crate::core::config::{ErrorPolicy, ExtractorConfig, FacetDefinition};
use crate::plugins::registry::get_extraction_method_registry;
use crate::plugins::ExtractionMethod;
use crate::types::{ExtractionContext, ExtractionOutcome, FacetError};
use crate::{FacetgenError, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Global Tokio runtime backing the synchronous batch wrapper.
///
/// Lazily initialized on first use and shared across all sync calls.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create global Tokio runtime - system may be out of resources")
});

/// One facet definition with its method and chains resolved.
struct ResolvedFacet {
    key: String,
    required: bool,
    method: Arc<dyn ExtractionMethod>,
    method_config: Value,
    pre: ResolvedPreChain,
    post: ResolvedPostChain,
}

impl ResolvedFacet {
    fn resolve(definition: &FacetDefinition) -> Result<Self> {
        let registry = get_extraction_method_registry();
        let registry = registry
            .read()
            .map_err(|e| FacetgenError::LockPoisoned(format!("extraction method registry: {}", e)))?;

        let method = registry
            .get(&definition.method.name)
            .ok_or_else(|| FacetgenError::UnknownProcessor {
                name: definition.method.name.clone(),
                facet: definition.facet_key.clone(),
            })?;
        method.validate_config(&definition.method.config)?;

        Ok(Self {
            key: definition.facet_key.clone(),
            required: definition.required,
            method,
            method_config: definition.method.config.clone(),
            pre: ResolvedPreChain::resolve(&definition.pre_processors, &definition.facet_key)?,
            post: ResolvedPostChain::resolve(&definition.post_processors, &definition.facet_key)?,
        })
    }
}

/// The facet extraction orchestrator.
///
/// Built once per job from an [`ExtractorConfig`]; construction performs
/// all registry lookups and option validation, so configuration errors
/// (unknown processors, malformed chains) surface before any file is
/// processed. The built extractor is immutable and can be shared across
/// threads for batch processing.
///
/// # Example
///
/// ```rust,no_run
/// use facetgen::core::config::ExtractorConfig;
/// use facetgen::core::extractor::FacetExtractor;
///
/// # fn main() -> facetgen::Result<()> {
/// let config = ExtractorConfig::from_yaml_file("facets.yaml")?;
/// let extractor = FacetExtractor::new(&config)?;
/// let outcome = extractor.process_file("data/satellite_2005-01-15.dat")?;
/// println!("{} facets extracted", outcome.record.len());
/// # Ok(())
/// # }
/// ```
pub struct FacetExtractor {
    facets: Vec<ResolvedFacet>,
    policy: ErrorPolicy,
    max_concurrent_files: Option<usize>,
}

impl std::fmt::Debug for FacetExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetExtractor")
            .field(
                "facets",
                &self.facets.iter().map(|fa| &fa.key).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .field("max_concurrent_files", &self.max_concurrent_files)
            .finish()
    }
}

impl FacetExtractor {
    /// Build an extractor, resolving every facet definition.
    ///
    /// # Errors
    ///
    /// `UnknownProcessor`, `ChainMismatch`, or `Validation` when any facet
    /// definition cannot be resolved against the registries.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let facets = config
            .facets
            .iter()
            .map(ResolvedFacet::resolve)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            facets,
            policy: config.error_policy,
            max_concurrent_files: config.max_concurrent_files,
        })
    }

    /// The configured facet-failure policy.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Process one file, producing its item record.
    ///
    /// For each facet definition in declared order: the pre-processor
    /// chain transforms the file path into the extraction input, the
    /// extraction method runs, and each yielded value is folded through
    /// the post-processor chain and merged under the facet key. A facet
    /// whose method yields no value writes no key (unless marked
    /// required). A later definition writing an existing key overwrites
    /// it (last-declared-wins).
    ///
    /// # Errors
    ///
    /// Under `ErrorPolicy::FailFast`, the first facet failure aborts the
    /// file. Under `BestEffort` (default), facet failures are recorded in
    /// the outcome and processing continues. A read failure surfacing
    /// mid-extraction is a facet failure like any other: under best-effort
    /// the partial record survives alongside an `Io`-kind facet error.
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<ExtractionOutcome> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FacetgenError::validation(format!(
                "file does not exist or is not a regular file: {}",
                path.display()
            )));
        }

        let ctx = ExtractionContext::new(path);
        let mut outcome = ExtractionOutcome::default();

        for facet in &self.facets {
            debug!(facet = %facet.key, file = %path.display(), "extracting facet");

            match self.run_facet(facet, &ctx) {
                Ok(values) => {
                    for value in values {
                        outcome.record.insert(facet.key.clone(), value);
                    }
                }
                Err(err) => match self.policy {
                    ErrorPolicy::FailFast => return Err(err),
                    ErrorPolicy::BestEffort => {
                        warn!(facet = %facet.key, error = %err, "facet failed, continuing");
                        outcome.errors.push(FacetError::new(&facet.key, &err));
                    }
                },
            }
        }

        Ok(outcome)
    }

    /// Run one facet's pre → extract → post sequence.
    fn run_facet(&self, facet: &ResolvedFacet, ctx: &ExtractionContext) -> Result<Vec<Value>> {
        let input = facet.pre.run(&ctx.path_str())?;

        let raw_values = facet.method.extract(&input, ctx, &facet.method_config)?;
        if raw_values.is_empty() {
            if facet.required {
                return Err(FacetgenError::MissingField {
                    field: facet.key.clone(),
                });
            }
            return Ok(vec![]);
        }

        raw_values.into_iter().map(|value| facet.post.run(value)).collect()
    }
}

/// Process multiple independent files concurrently.
///
/// Concurrency is capped at `ExtractorConfig::max_concurrent_files`
/// (default `num_cpus * 2`); per-file processing runs on the blocking
/// thread pool. Results come back in input order; each file's result is
/// isolated, so one file's failure never blocks the others.
pub async fn batch_process_files(
    extractor: Arc<FacetExtractor>,
    paths: Vec<PathBuf>,
) -> Result<Vec<Result<ExtractionOutcome>>> {
    use tokio::sync::Semaphore;
    use tokio::task::JoinSet;

    if paths.is_empty() {
        return Ok(vec![]);
    }

    let max_concurrent = extractor
        .max_concurrent_files
        .unwrap_or_else(|| num_cpus::get() * 2)
        .max(1);
    let semaphore = Arc::new(Semaphore::new(max_concurrent));

    let mut tasks = JoinSet::new();

    for (index, path) in paths.into_iter().enumerate() {
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let result = match semaphore.acquire().await {
                Ok(_permit) => tokio::task::spawn_blocking(move || extractor.process_file(&path))
                    .await
                    .unwrap_or_else(|e| Err(FacetgenError::Other(format!("file task panicked: {}", e)))),
                Err(e) => Err(FacetgenError::Other(format!("batch semaphore closed: {}", e))),
            };
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<ExtractionOutcome>>> = Vec::new();
    results.resize_with(tasks.len(), || None);

    while let Some(task_result) = tasks.join_next().await {
        let (index, result) = task_result.map_err(|e| FacetgenError::Other(format!("batch task panicked: {}", e)))?;
        results[index] = Some(result);
    }

    Ok(results
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(FacetgenError::Other("batch slot never filled".to_string()))))
        .collect())
}

/// Synchronous wrapper around [`batch_process_files`], driven by a shared
/// global runtime.
pub fn batch_process_files_sync(
    extractor: Arc<FacetExtractor>,
    paths: Vec<PathBuf>,
) -> Result<Vec<Result<ExtractionOutcome>>> {
    GLOBAL_RUNTIME.block_on(batch_process_files(extractor, paths))
}
