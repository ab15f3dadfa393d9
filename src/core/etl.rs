use crate::core::{EnrichReport, Pipeline};
use crate::utils::error::Result;

pub struct EnrichEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EnrichEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EnrichReport> {
        tracing::info!("Starting geocoding run");

        // 擷取
        let table = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} records", table.records.len());

        // 轉換
        let result = self.pipeline.transform(table).await?;
        let rows = result.records.len();
        let matched = result.matched;
        let unmatched = result.unmatched;
        tracing::info!(
            "Geocoded {} of {} records ({} without match)",
            matched,
            rows,
            unmatched
        );

        // 載入
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(EnrichReport {
            output_path,
            rows,
            matched,
            unmatched,
        })
    }
}
