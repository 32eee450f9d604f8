use crate::dom::{Document, NodeId};

const SORT_ASC: &str = "th-sort-asc";
const SORT_DESC: &str = "th-sort-desc";

/// Sorts the first body of `table` by the trimmed text of `column`
/// (zero-based) and marks that column's header with the direction.
///
/// Returns `false` when the table has no body.
pub(crate) fn sort_table(doc: &mut Document, table: NodeId, column: usize, ascending: bool) -> bool {
    let Some(body) = doc.first_by_tag(table, "tbody") else {
        return false;
    };

    let mut rows: Vec<(String, NodeId)> = doc
        .child_elements(body)
        .into_iter()
        .filter(|row| doc.tag(*row) == "tr")
        .map(|row| (cell_text(doc, row, column), row))
        .collect();
    rows.sort_by(|(a, _), (b, _)| if ascending { a.cmp(b) } else { b.cmp(a) });

    for (_, row) in rows {
        doc.append_child(body, row);
    }

    for header in doc.elements_by_tag(table, "th") {
        doc.remove_class(header, SORT_ASC);
        doc.remove_class(header, SORT_DESC);
    }
    if let Some(header) = column_header(doc, table, column) {
        doc.set_class(header, SORT_ASC, ascending);
        doc.set_class(header, SORT_DESC, !ascending);
    }
    true
}

fn cell_text(doc: &Document, row: NodeId, column: usize) -> String {
    doc.child_elements(row)
        .get(column)
        .filter(|cell| doc.tag(**cell) == "td")
        .map(|cell| doc.text_content(*cell).trim().to_string())
        .unwrap_or_default()
}

/// First `th` that is the `column`-th element of its row.
fn column_header(doc: &Document, table: NodeId, column: usize) -> Option<NodeId> {
    doc.elements_by_tag(table, "th").into_iter().find(|header| {
        doc.parent(*header)
            .and_then(|row| doc.child_elements(row).get(column).copied())
            .is_some_and(|cell| cell == *header)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 2]]) -> (Document, NodeId) {
        let mut doc = Document::new("/dashboard");
        let table = doc.create_element("table");
        let body = doc.body();
        doc.append_child(body, table);

        let head = doc.create_element("thead");
        doc.append_child(table, head);
        let header_row = doc.create_element("tr");
        doc.append_child(head, header_row);
        for label in ["受講者", "回答"] {
            let th = doc.create_text_element("th", "", label);
            doc.append_child(header_row, th);
        }

        let tbody = doc.create_element("tbody");
        doc.append_child(table, tbody);
        for cells in rows {
            let row = doc.create_element("tr");
            for text in cells {
                let cell = doc.create_text_element("td", "", text);
                doc.append_child(row, cell);
            }
            doc.append_child(tbody, row);
        }
        (doc, table)
    }

    fn column(doc: &Document, table: NodeId, index: usize) -> Vec<String> {
        let body = doc.first_by_tag(table, "tbody").expect("tbody");
        doc.child_elements(body).into_iter().map(|row| cell_text(doc, row, index)).collect()
    }

    #[test]
    fn sorts_rows_and_marks_header() {
        let (mut doc, table) = table(&[["c", " 2 "], ["a", "3"], ["b", "1"]]);

        assert!(sort_table(&mut doc, table, 1, true));
        assert_eq!(column(&doc, table, 0), vec!["b", "c", "a"]);
        let headers = doc.elements_by_tag(table, "th");
        assert!(doc.has_class(headers[1], SORT_ASC));
        assert!(!doc.has_class(headers[0], SORT_ASC));

        assert!(sort_table(&mut doc, table, 0, false));
        assert_eq!(column(&doc, table, 0), vec!["c", "b", "a"]);
        assert!(doc.has_class(headers[0], SORT_DESC));
        assert!(!doc.has_class(headers[1], SORT_ASC));
    }

    #[test]
    fn table_without_body_is_left_alone() {
        let mut doc = Document::new("/");
        let table = doc.create_element("table");
        assert!(!sort_table(&mut doc, table, 0, true));
    }
}
