//! Turning per-row value lists into one record per channel.

use std::collections::BTreeMap;

use serde::Serialize;

use super::fields::extract_row;
use super::locate::{Locator, TextLocator};
use super::text::Value;
use crate::document::Document;
use crate::error::{Result, SurfboardError};
use crate::schema::{LogicalTable, Schema};

/// Readings of one channel (one physical column) of a logical table.
///
/// A field that could not be located for this snapshot has no entry; a cell
/// that was found but did not convert is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Option<Value>>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    /// True when the field's row was located, even if this cell did not convert.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// True for padding records with no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_ref()))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Value>)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Option<Value>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Records of `table` in `document`, using [`TextLocator`].
pub fn assemble(document: &Document, table: &LogicalTable) -> Vec<Record> {
    assemble_with(&TextLocator, Some(document), table)
}

/// Extract every row of `table` and transpose the value lists into records.
///
/// The table is located once and every row is read from that same node.
/// Rows that could not be found are left out of the records entirely. A row
/// that was found still bounds the record count even if it has only its label
/// cell. When the located rows disagree on their cell count, only as many
/// records as the shortest row are built. The result is then padded with empty records up to
/// `table.min_columns`. Without a document every table pads from zero.
pub fn assemble_with(
    locator: &dyn Locator,
    document: Option<&Document>,
    table: &LogicalTable,
) -> Vec<Record> {
    let located = document.and_then(|document| locator.find_table(document, &table.header));

    let columns: Vec<(&str, Vec<Option<Value>>)> = table
        .rows
        .iter()
        .filter_map(|spec| Some((spec.field.as_str(), extract_row(locator, located, spec)?)))
        .collect();

    let shortest = columns.iter().map(|(_, values)| values.len()).min().unwrap_or(0);
    let longest = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
    if shortest != longest {
        tracing::warn!(
            table = %table.name,
            shortest,
            longest,
            "rows have unequal cell counts, truncating to the shortest"
        );
    }

    let mut records: Vec<Record> = (0..shortest)
        .map(|i| {
            columns
                .iter()
                .map(|(field, values)| (*field, values[i].clone()))
                .collect()
        })
        .collect();

    if records.len() < table.min_columns {
        records.resize_with(table.min_columns, Record::default);
    }
    records
}

/// One snapshot of the status page together with the schema that reads it.
///
/// The document is `None` when the page could not be loaded; every table then
/// reports only padding records.
#[derive(Debug, Clone)]
pub struct SignalData {
    document: Option<Document>,
    schema: Schema,
}

impl SignalData {
    pub fn new(document: Document, schema: Schema) -> Self {
        Self {
            document: Some(document),
            schema,
        }
    }

    pub fn unavailable(schema: Schema) -> Self {
        Self {
            document: None,
            schema,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn table(&self, name: &str) -> Result<&LogicalTable> {
        self.schema
            .table(name)
            .ok_or_else(|| SurfboardError::UnknownTable(name.to_string()))
    }

    /// Records of the named table, in page column order.
    pub fn columns(&self, table: &str) -> Result<Vec<Record>> {
        let table = self.table(table)?;
        Ok(assemble_with(&TextLocator, self.document(), table))
    }

    /// Raw value list of one field, as read from the page.
    pub fn fields(&self, table: &str, field: &str) -> Result<Vec<Option<Value>>> {
        let table = self.table(table)?;
        let Some(spec) = table.row(field) else {
            return Ok(Vec::new());
        };
        let located = self
            .document()
            .and_then(|document| TextLocator.find_table(document, &table.header));
        Ok(extract_row(&TextLocator, located, spec).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RowSpec;

    fn down() -> LogicalTable {
        LogicalTable {
            name: "down".to_string(),
            header: "downstream".to_string(),
            min_columns: 4,
            rows: vec![
                RowSpec::new("channel", "channel"),
                RowSpec::new("snr", "signal to noise").split(" "),
                RowSpec::new("power", "power level").split(" "),
            ],
        }
    }

    const TWO_CHANNELS: &str = r#"
    <table>
        <tr><th>Downstream</th></tr>
        <tr><td>Channel ID</td><td>144</td><td>141</td></tr>
        <tr><td>Signal to Noise Ratio</td><td>34 dB</td><td>bad</td></tr>
    </table>
    "#;

    #[test]
    fn test_missing_row_leaves_field_out() {
        let document = Document::parse(TWO_CHANNELS);
        let records = assemble(&document, &down());

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].get("channel"), Some(&Value::Integer(144)));
        assert_eq!(records[0].get("snr"), Some(&Value::Integer(34)));
        assert_eq!(records[1].get("channel"), Some(&Value::Integer(141)));
        assert_eq!(records[1].get("snr"), None);
        assert!(records[1].has_field("snr"));
        assert!(!records[0].has_field("power"));
        assert!(records[2].is_empty());
        assert!(records[3].is_empty());
    }

    #[test]
    fn test_shortfall_truncates_to_shortest() {
        let html = r#"
        <table>
            <tr><th>Downstream</th></tr>
            <tr><td>Channel ID</td><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
            <tr><td>Signal to Noise Ratio</td><td>30 dB</td><td>31 dB</td></tr>
        </table>
        "#;
        let document = Document::parse(html);
        let records = assemble(&document, &down());

        assert_eq!(records.len(), 4);
        assert_eq!(records[1].get("snr"), Some(&Value::Integer(31)));
        assert!(records[2].is_empty());

        let mut table = down();
        table.min_columns = 0;
        assert_eq!(assemble(&document, &table).len(), 2);
    }

    #[test]
    fn test_never_truncated_below_min_columns() {
        let mut table = down();
        table.min_columns = 1;
        let html = r#"
        <table>
            <tr><th>Downstream</th></tr>
            <tr><td>Channel ID</td><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
        </table>
        "#;
        let records = assemble(&Document::parse(html), &table);
        assert_eq!(records.len(), 5);
        assert_eq!(records[4].get("channel"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_label_only_row_bounds_records() {
        let html = r#"
        <table>
            <tr><th>Downstream</th></tr>
            <tr><td>Channel ID</td><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
            <tr><td>Power Level</td></tr>
        </table>
        "#;
        let records = assemble(&Document::parse(html), &down());
        assert_eq!(records, vec![Record::default(); 4]);
    }

    #[test]
    fn test_missing_table_pads() {
        let document = Document::parse("<p>Downstream</p>");
        let records = assemble(&document, &down());
        assert_eq!(records, vec![Record::default(); 4]);
    }

    #[test]
    fn test_unavailable_document() {
        let data = SignalData::unavailable(Schema::surfboard());
        for table in data.schema().tables() {
            let records = data.columns(&table.name).unwrap();
            assert_eq!(records.len(), table.min_columns);
            assert!(records.iter().all(Record::is_empty));
        }
        assert!(data.fields("down", "snr").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_table() {
        let data = SignalData::new(Document::parse(TWO_CHANNELS), Schema::surfboard());
        assert!(matches!(
            data.columns("sideways"),
            Err(SurfboardError::UnknownTable(_))
        ));
        assert!(data.fields("down", "nonexistent").unwrap().is_empty());
    }

    #[test]
    fn test_assemble_is_repeatable() {
        let data = SignalData::new(Document::parse(TWO_CHANNELS), Schema::surfboard());
        assert_eq!(data.columns("down").unwrap(), data.columns("down").unwrap());
    }

    #[test]
    fn test_record_serializes_as_map() {
        let record: Record = [
            ("channel", Some(Value::Integer(144))),
            ("status", Some(Value::Text("continue".to_string()))),
            ("rate", None),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"channel": 144, "status": "continue", "rate": null})
        );
    }
}
