use crate::domain::model::{Record, Table};
use crate::utils::error::{EnrichError, Result};
use csv::{ReaderBuilder, WriterBuilder};

pub const DELIMITER: u8 = b';';

/// Parse a `;`-separated file whose first line is the header.
/// Fields stay as bytes, so the file does not have to be UTF-8.
pub fn read_table(data: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = Record::from_fields(reader.byte_headers()?.iter());

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        records.push(Record::from_fields(row.iter()));
    }

    Ok(Table { headers, records })
}

/// Header names only, without loading the rows.
pub fn read_headers(data: &[u8]) -> Result<Record> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    Ok(Record::from_fields(reader.byte_headers()?.iter()))
}

pub fn write_table(headers: &Record, records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&headers.fields)?;
    for record in records {
        writer.write_record(&record.fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| EnrichError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))
}
