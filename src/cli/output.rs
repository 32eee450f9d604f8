use clap::ValueEnum;

use crate::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub(crate) enum OutputFormat {
    /// One line per table row or list item
    #[default]
    Text,
    /// The rendered markup of the region
    Html,
}

/// Plain-text view of a rendered region: table rows as tab-separated cells,
/// otherwise list items, otherwise the region's text.
pub(crate) fn region_lines(doc: &Document, region: NodeId) -> Vec<String> {
    let rows = doc.elements_by_tag(region, "tr");
    if !rows.is_empty() {
        return rows
            .into_iter()
            .map(|row| {
                doc.child_elements(row)
                    .into_iter()
                    .map(|cell| doc.text_content(cell).trim().to_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect();
    }

    let items = doc.elements_by_tag(region, "li");
    if !items.is_empty() {
        return items.into_iter().map(|item| doc.text_content(item).trim().to_string()).collect();
    }

    let text = doc.text_content(region).trim().to_string();
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

pub(crate) fn print_region(doc: &Document, region: NodeId, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for line in region_lines(doc, region) {
                println!("{line}");
            }
        }
        OutputFormat::Html => println!("{}", doc.outer_html(region)),
    }
}

pub(crate) fn print_heading(title: &str, format: OutputFormat) {
    if format == OutputFormat::Text {
        println!("== {title}");
    }
}
