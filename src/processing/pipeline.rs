use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::MATCH_THRESHOLD;
use crate::domain::category::CategoryId;
use crate::domain::document::CatalogDocument;
use crate::domain::product::{BatchItem, Product, UnmatchedItem};
use crate::models::config::MatcherConfig;
use crate::processing::canonical::canonical_name_of;
use crate::processing::category::{
    IdComparison, candidate_category, has_category, merge_category,
};
use crate::processing::index::{CollisionPolicy, IndexError, build_index};
use crate::processing::matcher::{MatchKind, find_match};
use crate::processing::normalize::{normalize_name_in_place, normalize_names_in_place};
use crate::repository::errors::RepositoryError;
use crate::repository::{BatchReader, CatalogReader};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load catalog: {0}")]
    Catalog(#[source] RepositoryError),
    #[error("no data to process: none of {files} batch files yielded products")]
    NoData { files: usize },
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeOptions {
    pub threshold: f64,
    pub collision_policy: CollisionPolicy,
    pub id_comparison: IdComparison,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
            collision_policy: CollisionPolicy::default(),
            id_comparison: IdComparison::default(),
        }
    }
}

impl From<&MatcherConfig> for MergeOptions {
    fn from(config: &MatcherConfig) -> Self {
        Self {
            threshold: config.threshold,
            collision_policy: config.collision_policy,
            id_comparison: config.id_comparison,
        }
    }
}

/// Counters collected over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub catalog_products: usize,
    pub catalog_names_normalized: usize,
    pub indexed: usize,
    pub collisions: usize,
    pub batch_files_loaded: usize,
    pub batch_files_skipped: usize,
    /// Batch items processed.
    pub total: usize,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    /// Items matched to a product with a complete candidate category.
    pub matched: usize,
    pub unmatched: usize,
    pub categories_added: usize,
    pub categories_already_present: usize,
    /// Items matched to a product but carrying an incomplete category.
    pub skipped_missing_category: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeReport {
    pub unmatched: Vec<UnmatchedItem>,
    pub stats: MatchStats,
}

/// Result of a full catalog merge run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// The updated catalog, ready to be persisted.
    pub catalog: CatalogDocument,
    pub unmatched: Vec<UnmatchedItem>,
    pub stats: MatchStats,
}

impl RunOutcome {
    pub fn matched_count(&self) -> usize {
        self.stats.matched
    }

    pub fn total_count(&self) -> usize {
        self.stats.total
    }
}

/// Merges the candidate categories of `batch` into the matching `catalog`
/// products.
///
/// Names of both collections are whitespace-normalized in place first. The
/// index is built once; category merges never change a product's name, so it
/// stays valid for the whole pass. Re-running with the same batch leaves the
/// catalog unchanged.
pub fn merge_batch(
    catalog: &mut [Product],
    batch: &mut [BatchItem],
    options: &MergeOptions,
) -> Result<MergeReport, IndexError> {
    let mut report = MergeReport::default();
    let stats = &mut report.stats;
    stats.catalog_products = catalog.len();
    stats.total = batch.len();

    stats.catalog_names_normalized = normalize_names_in_place(catalog);
    let index = build_index(catalog, options.collision_policy)?;
    stats.indexed = index.len();
    stats.collisions = index.collisions();

    for (item_idx, item) in batch.iter_mut().enumerate() {
        normalize_name_in_place(&mut item.name);
        let canonical_name = canonical_name_of(&item.name);
        log::debug!("Processing batch item {}: {}", item_idx + 1, item.name);

        let Some(found) = find_match(&canonical_name, &index, options.threshold) else {
            log::debug!("No suitable match found for '{canonical_name}'");
            stats.unmatched += 1;
            report.unmatched.push(UnmatchedItem::from(&*item));
            continue;
        };

        let category = match candidate_category(item) {
            Ok(category) => category,
            Err(e) => {
                log::warn!(
                    "Missing category information for product {}: {e}; skipping category addition",
                    item.name
                );
                stats.skipped_missing_category += 1;
                continue;
            }
        };

        match found.kind {
            MatchKind::Exact => stats.exact_matches += 1,
            MatchKind::Fuzzy => stats.fuzzy_matches += 1,
        }
        stats.matched += 1;

        let product = &mut catalog[found.position];
        let existing = product.categories();
        if has_category(existing, &category, options.id_comparison) {
            stats.categories_already_present += 1;
        } else {
            log::info!(
                "Added category '{}' (ID: {}) to product {}",
                category.name_str().unwrap_or_default(),
                category.id.as_ref().map(CategoryId::as_key).unwrap_or_default(),
                product.name()
            );
            stats.categories_added += 1;
        }
        let merged = merge_category(existing, &category, options.id_comparison);
        product.set_categories(merged);
    }

    Ok(report)
}

fn load_batches<R>(repo: &R, batch_paths: &[PathBuf], stats: &mut MatchStats) -> Vec<BatchItem>
where
    R: BatchReader,
{
    let mut items = Vec::new();
    for path in batch_paths {
        match repo.load_batch(path) {
            Ok(batch) => {
                log::info!(
                    "Aggregated {} products from '{}'",
                    batch.len(),
                    path.display()
                );
                stats.batch_files_loaded += 1;
                items.extend(batch);
            }
            Err(e) => {
                log::warn!("Skipping batch file: {e}");
                stats.batch_files_skipped += 1;
            }
        }
    }
    items
}

/// Loads the catalog and every batch file, then merges them.
///
/// Unusable batch files are logged and skipped; the run fails only when the
/// catalog cannot be loaded or no batch file yields any products. Nothing is
/// written; persisting the outcome is left to the caller.
pub fn run<R>(
    repo: &R,
    catalog_path: &Path,
    batch_paths: &[PathBuf],
    options: &MergeOptions,
) -> Result<RunOutcome, PipelineError>
where
    R: CatalogReader + BatchReader,
{
    log::info!("Starting catalog merge for '{}'", catalog_path.display());

    let mut file_stats = MatchStats::default();
    let mut batch = load_batches(repo, batch_paths, &mut file_stats);
    if batch.is_empty() {
        return Err(PipelineError::NoData {
            files: batch_paths.len(),
        });
    }
    log::info!("Total aggregated batch products: {}", batch.len());

    let catalog = repo
        .load_catalog(catalog_path)
        .map_err(PipelineError::Catalog)?;
    let (mut products, layout) = catalog.into_parts();

    let report = merge_batch(&mut products, &mut batch, options)?;
    let stats = MatchStats {
        batch_files_loaded: file_stats.batch_files_loaded,
        batch_files_skipped: file_stats.batch_files_skipped,
        ..report.stats
    };

    log::info!(
        "Finished catalog merge: catalog_products={}, names_normalized={}, indexed={}, collisions={}, batch_files_loaded={}, batch_files_skipped={}, total={}, matched={}, exact={}, fuzzy={}, unmatched={}, categories_added={}, categories_already_present={}, skipped_missing_category={}",
        stats.catalog_products,
        stats.catalog_names_normalized,
        stats.indexed,
        stats.collisions,
        stats.batch_files_loaded,
        stats.batch_files_skipped,
        stats.total,
        stats.matched,
        stats.exact_matches,
        stats.fuzzy_matches,
        stats.unmatched,
        stats.categories_added,
        stats.categories_already_present,
        stats.skipped_missing_category
    );
    if stats.batch_files_skipped > 0 || stats.skipped_missing_category > 0 || stats.collisions > 0
    {
        log::warn!(
            "Catalog merge had skipped input: batch_files_skipped={}, missing_category={}, name_collisions={}",
            stats.batch_files_skipped,
            stats.skipped_missing_category,
            stats.collisions
        );
    }

    Ok(RunOutcome {
        catalog: CatalogDocument::from_parts(products, layout),
        unmatched: report.unmatched,
        stats,
    })
}
