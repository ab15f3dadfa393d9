use crate::core::columns::{ColumnLayout, ResolvedColumns};
use crate::core::delimited::{read_table, write_table};
use crate::core::{
    Coordinates, FieldSelector, GeocodingGateway, Pipeline, Storage, Table, TransformResult,
};
use crate::domain::model::LogicalField;
use crate::domain::services::Geocoder;
use crate::utils::error::Result;

/// Rewrites one `;`-separated file with latitude/longitude columns.
pub struct GeoEnrichPipeline<S: Storage, G: GeocodingGateway> {
    pub(crate) storage: S,
    pub(crate) geocoder: Geocoder<G>,
    pub(crate) input_path: String,
    pub(crate) selector: FieldSelector,
}

impl<S: Storage, G: GeocodingGateway> GeoEnrichPipeline<S, G> {
    pub fn new(storage: S, gateway: G, input_path: String, selector: FieldSelector) -> Self {
        Self {
            storage,
            geocoder: Geocoder::new(gateway),
            input_path,
            selector,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, G: GeocodingGateway> Pipeline for GeoEnrichPipeline<S, G> {
    async fn extract(&self) -> Result<Table> {
        tracing::debug!("Reading {}", self.input_path);
        let data = self.storage.read_file(&self.input_path).await?;
        let table = read_table(&data)?;

        tracing::info!("Length of file : {}", table.records.len());
        Ok(table)
    }

    async fn transform(&self, table: Table) -> Result<TransformResult> {
        // 欄位解析必須在任何寫入之前完成
        let layout = ColumnLayout::from_headers(&table.headers);
        let columns = ResolvedColumns::resolve(&self.selector, &table.headers)?;
        let latitude = layout.latitude_position();
        let longitude = layout.longitude_position();

        let mut records = Vec::with_capacity(table.records.len());
        let mut matched = 0;
        let mut unmatched = 0;

        for (row, record) in table.records.into_iter().enumerate() {
            // 標頭是第 1 行
            let mut record = layout.align(record, row + 2)?;

            let address = format!(
                "{} {}",
                columns.value(LogicalField::Address, &record),
                columns.value(LogicalField::Addition, &record)
            );
            let zipcode = columns.value(LogicalField::Zipcode, &record).into_owned();
            let city = columns.value(LogicalField::City, &record).into_owned();

            match self.geocoder.resolve(&address, &zipcode, &city).await {
                Some(coordinates) => {
                    record.set(latitude, &Coordinates::format_degrees(coordinates.latitude));
                    record.set(longitude, &Coordinates::format_degrees(coordinates.longitude));
                    matched += 1;
                }
                None => unmatched += 1,
            }

            records.push(record);
        }

        tracing::debug!("Geocoded {} rows, {} without match", matched, unmatched);

        Ok(TransformResult {
            headers: layout.output_headers,
            records,
            matched,
            unmatched,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let data = write_table(&result.headers, &result.records)?;

        tracing::debug!("Writing {} bytes to {}", data.len(), self.input_path);
        self.storage.write_file(&self.input_path, &data).await?;

        Ok(self.input_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeocodeQuery, Record};
    use crate::utils::error::EnrichError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: impl AsRef<[u8]>) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), content.as_ref().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            self.get_bytes(path)
                .await
                .map(|data| String::from_utf8_lossy(&data).into_owned())
        }

        async fn get_bytes(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EnrichError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn file_size(&self, path: &str) -> Result<u64> {
            Ok(self.read_file(path).await?.len() as u64)
        }
    }

    /// Looks coordinates up by query text, ignoring the postcode.
    #[derive(Clone, Default)]
    struct TownGateway {
        towns: HashMap<String, Coordinates>,
    }

    impl TownGateway {
        fn with(town: &str, coordinates: Coordinates) -> Self {
            let mut towns = HashMap::new();
            towns.insert(town.to_string(), coordinates);
            Self { towns }
        }
    }

    #[async_trait]
    impl GeocodingGateway for TownGateway {
        async fn lookup(&self, query: &GeocodeQuery) -> Option<Coordinates> {
            self.towns.get(&query.text).copied()
        }
    }

    fn selector(address: &str, addition: &str, zipcode: &str, city: &str) -> FieldSelector {
        FieldSelector {
            address: address.to_string(),
            addition: addition.to_string(),
            zipcode: zipcode.to_string(),
            city: city.to_string(),
        }
    }

    const INPUT: &str = "name;street;zip;town\n\
                         Louvre;Rue de Rivoli;75001;Paris\n\
                         Unknown;;;Atlantis\n\
                         Bellecour;Place Bellecour;69002;Lyon\n";

    #[tokio::test]
    async fn test_extract_reads_all_rows() {
        let storage = MockStorage::with_file("in.csv", INPUT);
        let pipeline = GeoEnrichPipeline::new(
            storage,
            TownGateway::default(),
            "in.csv".to_string(),
            selector("2", "", "3", "4"),
        );

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.headers.to_text(), vec!["name", "street", "zip", "town"]);
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.records[2].get(0), "Bellecour");
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_file("other.csv", INPUT);
        let pipeline = GeoEnrichPipeline::new(
            storage,
            TownGateway::default(),
            "in.csv".to_string(),
            selector("2", "", "3", "4"),
        );

        assert!(matches!(
            pipeline.extract().await,
            Err(EnrichError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_transform_keeps_row_count_and_order() {
        let storage = MockStorage::with_file("in.csv", INPUT);
        let gateway = TownGateway::with("Lyon", Coordinates::new(45.7578, 4.832));
        let pipeline = GeoEnrichPipeline::new(
            storage,
            gateway,
            "in.csv".to_string(),
            selector("2", "", "3", "4"),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(
            result.headers.to_text(),
            vec!["name", "street", "zip", "town", "latitude", "longitude"]
        );
        assert_eq!(result.records.len(), 3);
        assert_eq!(result.matched, 1);
        assert_eq!(result.unmatched, 2);

        let names: Vec<String> = result.records.iter().map(|r| r.get(0).into_owned()).collect();
        assert_eq!(names, vec!["Louvre", "Unknown", "Bellecour"]);

        assert_eq!(result.records[0].get(4), "");
        assert_eq!(result.records[0].get(5), "");
        assert_eq!(
            result.records[2].to_text(),
            vec!["Bellecour", "Place Bellecour", "69002", "Lyon", "45.7578", "4.832"]
        );
    }

    #[tokio::test]
    async fn test_transform_combines_address_and_addition() {
        let storage = MockStorage::with_file(
            "in.csv",
            "street;extra;town\n12 rue Oberkampf;Bat B;Paris\n",
        );
        let gateway = TownGateway::with("12 rue Oberkampf Bat B Paris", Coordinates::new(48.86, 2.37));
        let pipeline = GeoEnrichPipeline::new(
            storage,
            gateway,
            "in.csv".to_string(),
            selector("1", "2", "", "3"),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(result.matched, 1);
        assert_eq!(result.records[0].get(3), "48.86");
        assert_eq!(result.records[0].get(4), "2.37");
    }

    #[tokio::test]
    async fn test_transform_out_of_range_index_fails_before_writing() {
        let storage = MockStorage::with_file("in.csv", INPUT);
        let pipeline = GeoEnrichPipeline::new(
            storage.clone(),
            TownGateway::default(),
            "in.csv".to_string(),
            selector("2", "", "3", "12"),
        );

        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();

        assert!(matches!(err, EnrichError::ColumnIndexOutOfRange { index: 12, .. }));
        assert_eq!(storage.get_file("in.csv").await.unwrap(), INPUT);
    }

    #[tokio::test]
    async fn test_transform_keeps_previous_coordinates_on_miss() {
        let storage = MockStorage::with_file(
            "in.csv",
            "town;latitude;longitude\nAtlantis;1.5;2.5\nLyon;;\n",
        );
        let gateway = TownGateway::with("Lyon", Coordinates::new(45.7578, 4.832));
        let pipeline = GeoEnrichPipeline::new(
            storage,
            gateway,
            "in.csv".to_string(),
            selector("", "", "", "1"),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(result.headers.to_text(), vec!["town", "latitude", "longitude"]);
        assert_eq!(result.records[0].to_text(), vec!["Atlantis", "1.5", "2.5"]);
        assert_eq!(result.records[1].to_text(), vec!["Lyon", "45.7578", "4.832"]);
    }

    #[tokio::test]
    async fn test_transform_writes_whole_degrees_with_fraction() {
        let storage = MockStorage::with_file("in.csv", "town\nNowhere\n");
        let gateway = TownGateway::with("Nowhere", Coordinates::from_lon_lat(&[2.0, 48.0]).unwrap());
        let pipeline = GeoEnrichPipeline::new(
            storage,
            gateway,
            "in.csv".to_string(),
            selector("", "", "", "1"),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(result.records[0].to_text(), vec!["Nowhere", "48.0", "2.0"]);
    }

    #[tokio::test]
    async fn test_latin1_row_is_rewritten_unchanged() {
        let input: &[u8] = b"name;street;zip;town\nH\xF4tel de Ville;1 place;75004;Paris\n";
        let storage = MockStorage::with_file("in.csv", input);
        let gateway = TownGateway::with("Paris", Coordinates::new(48.8566, 2.3522));
        let pipeline = GeoEnrichPipeline::new(
            storage.clone(),
            gateway,
            "in.csv".to_string(),
            selector("2", "", "3", "4"),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        assert_eq!(result.matched, 1);
        pipeline.load(result).await.unwrap();

        assert_eq!(
            storage.get_bytes("in.csv").await.unwrap(),
            b"name;street;zip;town;latitude;longitude\n\
              H\xF4tel de Ville;1 place;75004;Paris;48.8566;2.3522\n"
                .to_vec()
        );
    }

    #[tokio::test]
    async fn test_transform_rejects_overlong_row() {
        let storage = MockStorage::with_file("in.csv", "street;town\na;b;c\n");
        let pipeline = GeoEnrichPipeline::new(
            storage,
            TownGateway::default(),
            "in.csv".to_string(),
            selector("1", "", "", "2"),
        );

        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();

        assert!(err.to_string().contains("row 2 has 3 fields"));
    }

    #[tokio::test]
    async fn test_load_writes_back_to_input_path() {
        let storage = MockStorage::with_file("in.csv", INPUT);
        let pipeline = GeoEnrichPipeline::new(
            storage.clone(),
            TownGateway::default(),
            "in.csv".to_string(),
            selector("2", "", "3", "4"),
        );

        let result = TransformResult {
            headers: Record::from_fields(["town", "latitude", "longitude"]),
            records: vec![Record::from_fields(["Paris", "48.85", "2.35"])],
            matched: 1,
            unmatched: 0,
        };

        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "in.csv");
        assert_eq!(
            storage.get_file("in.csv").await.unwrap(),
            "town;latitude;longitude\nParis;48.85;2.35\n"
        );
    }
}
