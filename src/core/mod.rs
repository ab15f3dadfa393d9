pub mod columns;
pub mod delimited;
pub mod enrich;
pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{
    Coordinates, EnrichOutcome, EnrichReport, FieldSelector, GeocodeQuery, Record, SkipReason,
    Table, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, GeocodingGateway, Pipeline, Storage};
pub use crate::utils::error::Result;
