use crate::domain::model::{Coordinates, FieldSelector, GeocodeQuery, Table, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn file_size(&self, path: &str) -> impl std::future::Future<Output = Result<u64>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn input_path(&self) -> &str;
    fn selector(&self) -> &FieldSelector;
}

/// A single remote lookup. Failures are absorbed by the implementation:
/// `None` covers both "no match" and "service unavailable".
#[async_trait]
pub trait GeocodingGateway: Send + Sync {
    async fn lookup(&self, query: &GeocodeQuery) -> Option<Coordinates>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
