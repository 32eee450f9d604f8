use super::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

pub(super) fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match &doc.nodes[node.0].kind {
        NodeKind::Text(text) => escape_into(text, false, out),
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            if !element.classes.is_empty() {
                write_attr(out, "class", &element.classes.join(" "));
            }
            for (name, value) in &element.attrs {
                write_attr(out, name, value);
            }
            if !element.styles.is_empty() {
                let style = element
                    .styles
                    .iter()
                    .map(|(name, value)| format!("{name}: {value}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                write_attr(out, "style", &style);
            }
            if element.tag == "input" && !element.value.is_empty() {
                write_attr(out, "value", &element.value);
            }
            if element.checked {
                out.push_str(" checked");
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                return;
            }

            if element.tag == "textarea" {
                escape_into(&element.value, false, out);
            }
            for child in &doc.nodes[node.0].children {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
