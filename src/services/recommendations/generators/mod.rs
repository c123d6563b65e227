//! Candidate generation strategies.
//!
//! Each generator turns the cycle's watch-history snapshot and genre weights
//! into scored recommendations from one angle. Generators only read the
//! context, so the same inputs always give the same output.

use crate::{
    error::AppResult,
    models::{GenreWeights, Recommendation, WatchRecord},
    services::providers::CatalogProvider,
};

mod genre;
mod similar;
mod trending;

pub use genre::GenreGenerator;
pub use similar::SimilarContentGenerator;
pub use trending::TrendingGenerator;

/// Read-only inputs shared by every generator in one recommendation cycle
pub struct CycleContext<'a> {
    /// Every watch record, taken once at the start of the cycle
    pub records: &'a [WatchRecord],
    pub weights: &'a GenreWeights,
    pub catalog: &'a dyn CatalogProvider,
    pub image_base_url: &'a str,
}

#[async_trait::async_trait]
pub trait CandidateGenerator: Send + Sync {
    /// Produces scored recommendations. `limit` is this generator's share of
    /// the final list; see each implementation for how it is applied.
    async fn generate(&self, ctx: &CycleContext<'_>, limit: usize) -> Vec<Recommendation>;

    /// Generator name for logging
    fn name(&self) -> &'static str;
}

/// Unwraps a catalog result, logging a failure and substituting an empty value
pub(crate) fn or_empty<T: Default>(
    result: AppResult<T>,
    catalog: &dyn CatalogProvider,
    call: &str,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                provider = catalog.name(),
                call = %call,
                error = %e,
                "Catalog call failed, continuing without its results"
            );
            T::default()
        }
    }
}
