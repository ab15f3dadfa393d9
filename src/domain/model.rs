use encoding_rs::WINDOWS_1252;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// A geocoding match. A miss is represented by `None` at the call site,
/// so a half-populated pair cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Decimal degrees as written to the file. Whole numbers keep their
    /// fractional part (`48.0`, not `48`).
    pub fn format_degrees(value: f64) -> String {
        format!("{:?}", value)
    }

    /// GeoJSON positions are `[longitude, latitude]`.
    pub fn from_lon_lat(position: &[f64]) -> Option<Self> {
        match position {
            [longitude, latitude, ..] => Some(Self::new(*latitude, *longitude)),
            _ => None,
        }
    }
}

/// One request sent to the geocoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub text: String,
    pub postcode: Option<String>,
}

impl GeocodeQuery {
    /// 正規化空白，空白郵遞區號視為未指定
    pub fn new(text: &str, postcode: Option<&str>) -> Self {
        Self {
            text: normalize_whitespace(text),
            postcode: postcode
                .map(normalize_whitespace)
                .filter(|code| !code.is_empty()),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for GeocodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.postcode {
            Some(code) => write!(f, "'{}' (postcode {})", self.text, code),
            None => write!(f, "'{}'", self.text),
        }
    }
}

fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Address,
    Addition,
    Zipcode,
    City,
}

impl LogicalField {
    pub const ALL: [LogicalField; 4] = [
        LogicalField::Address,
        LogicalField::Addition,
        LogicalField::Zipcode,
        LogicalField::City,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogicalField::Address => "address",
            LogicalField::Addition => "addition",
            LogicalField::Zipcode => "zipcode",
            LogicalField::City => "city",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Maps each logical field to a 1-based column index given as text.
/// An empty string means the field is not used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub addition: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub city: String,
}

impl FieldSelector {
    pub fn get(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::Address => &self.address,
            LogicalField::Addition => &self.addition,
            LogicalField::Zipcode => &self.zipcode,
            LogicalField::City => &self.city,
        }
    }

    /// True when no geocoding instruction was given at all.
    pub fn is_empty(&self) -> bool {
        LogicalField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

/// One line of the input file, kept as raw bytes so columns that are not
/// geocoded are written back exactly as read, whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub fields: Vec<Vec<u8>>,
}

impl Record {
    pub fn new(fields: Vec<Vec<u8>>) -> Self {
        Self { fields }
    }

    pub fn from_fields<I, T>(fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::new(fields.into_iter().map(|field| field.as_ref().to_vec()).collect())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn raw(&self, position: usize) -> &[u8] {
        self.fields.get(position).map(Vec::as_slice).unwrap_or(b"")
    }

    /// Field as text. UTF-8 when valid, otherwise read as Windows-1252
    /// (a superset of Latin-1), the usual encoding of spreadsheet exports.
    pub fn get(&self, position: usize) -> Cow<'_, str> {
        decode_field(self.raw(position))
    }

    pub fn set(&mut self, position: usize, value: &str) {
        self.fields[position] = value.as_bytes().to_vec();
    }

    pub fn to_text(&self) -> Vec<String> {
        (0..self.fields.len())
            .map(|position| self.get(position).into_owned())
            .collect()
    }
}

fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Record,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub headers: Record,
    pub records: Vec<Record>,
    pub matched: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    pub output_path: String,
    pub rows: usize,
    pub matched: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoFieldsSelected,
    NoColumnResolved,
    EmptyFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFieldsSelected => f.write_str("no column selected for geocoding"),
            SkipReason::EmptyFile => f.write_str("file is empty"),
            SkipReason::NoColumnResolved => f.write_str("no selected column index could be parsed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    Skipped(SkipReason),
    Completed(EnrichReport),
}
