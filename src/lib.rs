pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::Settings;

pub use adapters::{AdresseApiClient, LocalStorage};
pub use core::{
    enrich::{enrich, preview},
    etl::EnrichEngine,
    pipeline::GeoEnrichPipeline,
};
pub use domain::model::{Coordinates, EnrichOutcome, EnrichReport, FieldSelector, SkipReason};
pub use domain::services::Geocoder;
pub use utils::error::{EnrichError, Result};
