use crate::domain::model::{Coordinates, GeocodeQuery};
use crate::domain::ports::GeocodingGateway;

/// Fallback cascade over a [`GeocodingGateway`]: street with postcode,
/// street without postcode, then city alone.
pub struct Geocoder<G: GeocodingGateway> {
    gateway: G,
}

impl<G: GeocodingGateway> Geocoder<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Candidate queries, most specific first.
    pub fn candidates(address: &str, zipcode: &str, city: &str) -> [GeocodeQuery; 3] {
        let street = format!("{} {}", address, city);
        [
            GeocodeQuery::new(&street, Some(zipcode)),
            GeocodeQuery::new(&street, None),
            GeocodeQuery::new(city, None),
        ]
    }

    pub async fn resolve(&self, address: &str, zipcode: &str, city: &str) -> Option<Coordinates> {
        for query in Self::candidates(address, zipcode, city) {
            if query.is_blank() {
                tracing::debug!("Skipping blank geocoding candidate");
                continue;
            }

            if let Some(coordinates) = self.gateway.lookup(&query).await {
                tracing::debug!("Geocoded {} -> {:?}", query, coordinates);
                return Some(coordinates);
            }
        }

        tracing::debug!(
            "No match for address='{}' zipcode='{}' city='{}'",
            address,
            zipcode,
            city
        );
        None
    }
}
