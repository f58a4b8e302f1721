//! Declarative description of the tables on the status page.
//!
//! A [`Schema`] is plain data: it names each logical table, the heading text
//! that identifies it, and one [`RowSpec`] per field. The assembler interprets
//! it at call time, so an alternate layout only needs a different schema value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfboardError};

/// How the text of a data cell becomes a typed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    #[default]
    Integer,
    /// Parsed as `f64`, so the written scale is not kept: `5.120` reads and
    /// prints as `5.12`.
    Decimal,
    String,
}

/// One labeled data row within a logical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpec {
    /// Field name used in records and graph sources
    pub field: String,
    /// Substring of the row's label cell
    pub header: String,
    /// Cell text is cut at the first occurrence before conversion
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub converter: Converter,
}

impl RowSpec {
    pub fn new(field: &str, header: &str) -> Self {
        Self {
            field: field.to_string(),
            header: header.to_string(),
            delimiter: None,
            converter: Converter::Integer,
        }
    }

    pub fn split(mut self, delimiter: &str) -> Self {
        self.delimiter = Some(delimiter.to_string());
        self
    }

    pub fn convert(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }
}

/// A named section of the page, one column per physical channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalTable {
    pub name: String,
    /// Substring that identifies the table's heading
    pub header: String,
    /// Channels always reported, even when the page shows fewer
    #[serde(default)]
    pub min_columns: usize,
    pub rows: Vec<RowSpec>,
}

impl LogicalTable {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.field.as_str())
    }

    pub fn row(&self, field: &str) -> Option<&RowSpec> {
        self.rows.iter().find(|row| row.field == field)
    }
}

/// Ordered set of logical tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<LogicalTable>,
}

impl Schema {
    /// Layout of the SURFboard `cmSignalData.htm` page.
    pub fn surfboard() -> Self {
        let down = LogicalTable {
            name: "down".to_string(),
            header: "downstream".to_string(),
            min_columns: 4,
            rows: vec![
                RowSpec::new("channel", "channel"),
                RowSpec::new("freq", "frequency").split(" "),
                RowSpec::new("snr", "signal to noise").split(" "),
                RowSpec::new("power", "power level").split(" "),
            ],
        };
        let up = LogicalTable {
            name: "up".to_string(),
            header: "upstream".to_string(),
            min_columns: 3,
            rows: vec![
                RowSpec::new("channel", "channel"),
                RowSpec::new("freq", "frequency").split(" "),
                RowSpec::new("service_id", "service id"),
                RowSpec::new("rate", "symbol rate").split(" ").convert(Converter::Decimal),
                RowSpec::new("power", "power level").split(" "),
                RowSpec::new("status", "ranging status").convert(Converter::String),
            ],
        };
        let stats = LogicalTable {
            name: "stats".to_string(),
            header: "signal stats (codewords)".to_string(),
            min_columns: 4,
            rows: vec![
                RowSpec::new("channel", "channel id"),
                RowSpec::new("unerrored", "total unerrored"),
                RowSpec::new("correctable", "total correctable"),
                RowSpec::new("uncorrectable", "total uncorrectable"),
            ],
        };

        Self {
            tables: vec![down, up, stats],
        }
    }

    /// Parse a JSON schema. Header texts are lowercased to match [`crate::Document`].
    pub fn from_json(json: &str) -> Result<Self> {
        let mut schema: Schema = serde_json::from_str(json)?;
        for table in &mut schema.tables {
            table.header = table.header.to_lowercase();
            for row in &mut table.rows {
                row.header = row.header.to_lowercase();
            }
        }
        Ok(schema)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SurfboardError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn table(&self, name: &str) -> Option<&LogicalTable> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &LogicalTable> {
        self.tables.iter()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::surfboard()
    }
}
