use crate::core::columns::{ColumnLayout, ResolvedColumns};
use crate::core::delimited::read_headers;
use crate::core::etl::EnrichEngine;
use crate::core::pipeline::GeoEnrichPipeline;
use crate::core::{EnrichOutcome, FieldSelector, GeocodingGateway, SkipReason, Storage};
use crate::utils::error::Result;

/// Geocode every row of `path` and rewrite it with latitude/longitude columns.
///
/// Returns [`EnrichOutcome::Skipped`] without touching the file when no field
/// is selected, the file is empty, or none of the selected indexes parse.
/// A column index outside the header aborts the run before anything is written.
pub async fn enrich<S: Storage, G: GeocodingGateway>(
    storage: S,
    gateway: G,
    path: &str,
    selector: &FieldSelector,
) -> Result<EnrichOutcome> {
    if selector.is_empty() {
        tracing::info!("No geocoding column selected, {} left as is", path);
        return Ok(EnrichOutcome::Skipped(SkipReason::NoFieldsSelected));
    }

    if storage.file_size(path).await? == 0 {
        tracing::warn!("{} is empty, nothing to geocode", path);
        return Ok(EnrichOutcome::Skipped(SkipReason::EmptyFile));
    }

    let plan = preview(&storage, path, selector).await?;
    if plan.columns.is_empty() {
        tracing::warn!(
            "No selected column index could be parsed ({:?}), {} left as is",
            selector,
            path
        );
        return Ok(EnrichOutcome::Skipped(SkipReason::NoColumnResolved));
    }

    let pipeline = GeoEnrichPipeline::new(storage, gateway, path.to_string(), selector.clone());
    let report = EnrichEngine::new(pipeline).run().await?;

    Ok(EnrichOutcome::Completed(report))
}

/// What a run would do with this file, without calling the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub layout: ColumnLayout,
    pub columns: ResolvedColumns,
}

pub async fn preview<S: Storage>(
    storage: &S,
    path: &str,
    selector: &FieldSelector,
) -> Result<ColumnPlan> {
    let data = storage.read_file(path).await?;
    let headers = read_headers(&data)?;

    Ok(ColumnPlan {
        layout: ColumnLayout::from_headers(&headers),
        columns: ResolvedColumns::resolve(selector, &headers)?,
    })
}
