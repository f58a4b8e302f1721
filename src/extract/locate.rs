//! Finding tables and rows by the text of their labels.
//!
//! The status page has no ids or classes worth relying on, so tables are found
//! by a heading substring and rows by the text of their first cell. The lookup
//! strategy sits behind [`Locator`] so the assembler does not depend on it.

use scraper::ElementRef;

use crate::document::Document;

/// Lookup strategy for tables and rows within a [`Document`].
pub trait Locator {
    /// Table whose heading contains `header`.
    fn find_table<'a>(&self, document: &'a Document, header: &str) -> Option<ElementRef<'a>>;

    /// Row of `table` whose label cell contains `header`.
    fn find_row<'a>(&self, table: ElementRef<'a>, header: &str) -> Option<ElementRef<'a>>;
}

/// Substring matching against the text directly inside an element.
///
/// Needles must already be lowercase; [`Document`] lowercases the page once.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLocator;

impl Locator for TextLocator {
    /// Searches the whole document in order for the first element inside a
    /// table whose own text contains `header`, then returns the closest
    /// enclosing table. Layout pages wrap the data tables in decorative
    /// outer tables, which must be skipped.
    fn find_table<'a>(&self, document: &'a Document, header: &str) -> Option<ElementRef<'a>> {
        let table = document
            .html()
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| own_text_contains(*element, header))
            .find_map(closest_table);

        if table.is_none() {
            tracing::debug!(header, "table not found");
        }
        table
    }

    /// Only direct `tbody > tr > td` cells are considered, so tables nested
    /// inside a cell never contribute rows. The first matching cell wins.
    fn find_row<'a>(&self, table: ElementRef<'a>, header: &str) -> Option<ElementRef<'a>> {
        let row = child_elements(table, "tbody")
            .flat_map(|body| child_elements(body, "tr"))
            .find(|row| child_elements(*row, "td").any(|cell| own_text_contains(cell, header)));

        if row.is_none() {
            tracing::debug!(header, "row not found");
        }
        row
    }
}

/// Closest `table` ancestor of `element`, excluding the element itself.
pub fn closest_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
}

/// Direct element children with the given tag name.
pub fn child_elements<'a>(
    element: ElementRef<'a>,
    tag: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}

/// Text before the first child element, `None` when the element starts with markup.
///
/// Text after a `<br>` or inline tag belongs to a different reading and is not
/// glued onto the first one.
pub fn leading_text(element: ElementRef<'_>) -> Option<String> {
    let mut text: Option<String> = None;
    for node in element.children() {
        if node.value().is_element() {
            break;
        }
        if let Some(chunk) = node.value().as_text() {
            text.get_or_insert_with(String::new).push_str(chunk);
        }
    }
    text
}

fn own_text_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
    <html>
    <body>
    <table class="layout">
        <tr><td>
            <p>Menu: Status, Signal, Logs</p>
            <table class="data">
                <tr><th>Downstream</th><th>Bonding Channel Value</th></tr>
                <tr><td>Channel ID</td><td>144</td><td>141</td></tr>
                <tr><td>Power Level
                    <table><tr><td>The Downstream Power Level reading is a snapshot</td></tr></table>
                </td><td>-11 dBmV</td><td>-9 dBmV</td></tr>
            </table>
        </td></tr>
    </table>
    <p>Upstream lives elsewhere</p>
    </body>
    </html>
    "#;

    #[test]
    fn test_find_table_picks_closest() {
        let document = Document::parse(NESTED);
        let table = TextLocator.find_table(&document, "downstream").unwrap();
        assert_eq!(table.value().attr("class"), Some("data"));
    }

    #[test]
    fn test_find_table_requires_table_ancestor() {
        let document = Document::parse(NESTED);
        assert!(TextLocator.find_table(&document, "upstream").is_none());
        assert!(TextLocator.find_table(&document, "codewords").is_none());
    }

    #[test]
    fn test_find_row() {
        let document = Document::parse(NESTED);
        let table = TextLocator.find_table(&document, "downstream").unwrap();

        let row = TextLocator.find_row(table, "channel id").unwrap();
        let label = child_elements(row, "td").next().unwrap();
        assert_eq!(leading_text(label).as_deref(), Some("channel id"));

        // Header row uses <th>, so "channel" lands on the data row
        let row = TextLocator.find_row(table, "channel").unwrap();
        assert_eq!(child_elements(row, "td").count(), 3);

        let power = TextLocator.find_row(table, "power level").unwrap();
        assert_eq!(child_elements(power, "td").count(), 3);

        assert!(TextLocator.find_row(table, "symbol rate").is_none());
    }

    #[test]
    fn test_find_row_ignores_nested_tables() {
        let document = Document::parse(NESTED);
        let table = TextLocator.find_table(&document, "downstream").unwrap();
        // Only appears in the cell of the nested help table
        assert!(TextLocator.find_row(table, "snapshot").is_none());
    }

    #[test]
    fn test_leading_text() {
        let document = Document::parse(
            "<table><tr><td>a<b>b</b>c</td><td></td><td><b>7</b></td></tr></table>",
        );
        let table = TextLocator.find_table(&document, "a").unwrap();
        // Matching still sees every direct text node
        let row = TextLocator.find_row(table, "c").unwrap();
        let cells: Vec<_> = child_elements(row, "td").collect();
        assert_eq!(leading_text(cells[0]).as_deref(), Some("a"));
        assert_eq!(leading_text(cells[1]), None);
        assert_eq!(leading_text(cells[2]), None);
    }
}
