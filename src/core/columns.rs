use crate::domain::model::{FieldSelector, LogicalField, Record, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use crate::utils::error::{EnrichError, Result};
use std::borrow::Cow;

/// Parse a 1-based column index. Anything that is not an integer means
/// "field not used" rather than an error.
pub fn parse_column_index(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Output header shape: the input header, plus the coordinate columns
/// unless the file has already been enriched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub input_width: usize,
    pub output_headers: Record,
    pub appends_coordinates: bool,
}

impl ColumnLayout {
    pub fn from_headers(headers: &Record) -> Self {
        let width = headers.len();
        let already_enriched = width >= 2
            && headers.raw(width - 2) == LATITUDE_COLUMN.as_bytes()
            && headers.raw(width - 1) == LONGITUDE_COLUMN.as_bytes();

        let mut output_headers = headers.clone();
        if !already_enriched {
            output_headers.fields.push(LATITUDE_COLUMN.as_bytes().to_vec());
            output_headers.fields.push(LONGITUDE_COLUMN.as_bytes().to_vec());
        }

        Self {
            input_width: headers.len(),
            output_headers,
            appends_coordinates: !already_enriched,
        }
    }

    pub fn latitude_position(&self) -> usize {
        self.output_headers.len() - 2
    }

    pub fn longitude_position(&self) -> usize {
        self.output_headers.len() - 1
    }

    /// Align a parsed row with the output header. Short rows are padded,
    /// rows wider than the header are rejected.
    pub fn align(&self, record: Record, line: usize) -> Result<Record> {
        let mut fields = record.fields;
        if fields.len() > self.input_width {
            return Err(EnrichError::ProcessingError {
                message: format!(
                    "row {} has {} fields but the header has {}",
                    line,
                    fields.len(),
                    self.input_width
                ),
            });
        }

        fields.resize(self.output_headers.len(), Vec::new());
        Ok(Record::new(fields))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub position: usize,
    pub name: String,
}

/// Logical fields mapped onto header columns. `None` means unused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub address: Option<ResolvedColumn>,
    pub addition: Option<ResolvedColumn>,
    pub zipcode: Option<ResolvedColumn>,
    pub city: Option<ResolvedColumn>,
}

impl ResolvedColumns {
    pub fn resolve(selector: &FieldSelector, headers: &Record) -> Result<Self> {
        let mut resolved = ResolvedColumns::default();

        for field in LogicalField::ALL {
            let raw = selector.get(field);
            let column = match parse_column_index(raw) {
                Some(index) => {
                    tracing::debug!("{} index: {}", field, index);
                    Some(resolve_index(field, index, headers)?)
                }
                None => {
                    tracing::debug!("{} index '{}' is unset", field, raw);
                    None
                }
            };

            if let Some(column) = &column {
                tracing::debug!("{} column: {}", field, column.name);
            }
            *resolved.slot_mut(field) = column;
        }

        Ok(resolved)
    }

    /// True when none of the selected indexes parsed.
    pub fn is_empty(&self) -> bool {
        LogicalField::ALL.iter().all(|field| self.get(*field).is_none())
    }

    pub fn get(&self, field: LogicalField) -> Option<&ResolvedColumn> {
        match field {
            LogicalField::Address => self.address.as_ref(),
            LogicalField::Addition => self.addition.as_ref(),
            LogicalField::Zipcode => self.zipcode.as_ref(),
            LogicalField::City => self.city.as_ref(),
        }
    }

    fn slot_mut(&mut self, field: LogicalField) -> &mut Option<ResolvedColumn> {
        match field {
            LogicalField::Address => &mut self.address,
            LogicalField::Addition => &mut self.addition,
            LogicalField::Zipcode => &mut self.zipcode,
            LogicalField::City => &mut self.city,
        }
    }

    /// Value of a logical field in a row, empty when the field is unused.
    pub fn value<'a>(&self, field: LogicalField, record: &'a Record) -> Cow<'a, str> {
        match self.get(field) {
            Some(column) => record.get(column.position),
            None => Cow::Borrowed(""),
        }
    }
}

fn resolve_index(field: LogicalField, index: i64, headers: &Record) -> Result<ResolvedColumn> {
    let width = headers.len();
    let position = usize::try_from(index)
        .ok()
        .and_then(|index| index.checked_sub(1))
        .filter(|position| *position < width)
        .ok_or(EnrichError::ColumnIndexOutOfRange {
            field,
            index,
            width,
        })?;

    Ok(ResolvedColumn {
        position,
        name: headers.get(position).into_owned(),
    })
}
