//! Extracting the data cells of one labeled row.

use scraper::ElementRef;

use super::locate::{child_elements, leading_text, Locator};
use super::text::{convert, Value};
use crate::schema::{Converter, RowSpec};

/// Converted data cells of the row labeled `header`, left to right.
///
/// The first cell is the row's label and is skipped. An empty vector means
/// the table or the row could not be found; individual cells that fail to
/// convert are `None`.
pub fn extract_fields(
    locator: &dyn Locator,
    table: Option<ElementRef<'_>>,
    header: &str,
    delimiter: Option<&str>,
    converter: Converter,
) -> Vec<Option<Value>> {
    read_row(locator, table, header, delimiter, converter).unwrap_or_default()
}

/// Like [`extract_fields`], but a row that was not found is `None` rather
/// than empty, so it can be told apart from a row with only a label cell.
pub fn extract_row(
    locator: &dyn Locator,
    table: Option<ElementRef<'_>>,
    spec: &RowSpec,
) -> Option<Vec<Option<Value>>> {
    read_row(
        locator,
        table,
        &spec.header,
        spec.delimiter.as_deref(),
        spec.converter,
    )
}

fn read_row(
    locator: &dyn Locator,
    table: Option<ElementRef<'_>>,
    header: &str,
    delimiter: Option<&str>,
    converter: Converter,
) -> Option<Vec<Option<Value>>> {
    let row = locator.find_row(table?, header)?;
    let values = child_elements(row, "td")
        .skip(1)
        .map(|cell| convert(leading_text(cell).as_deref(), converter, delimiter))
        .collect();
    Some(values)
}
