use crate::dom::Document;

const META_NAME: &str = "_csrf";
const COOKIE_NAME: &str = "XSRF-TOKEN";

/// Anti-forgery token for mutating requests.
///
/// A `<meta name="_csrf">` tag takes precedence over the `XSRF-TOKEN` cookie,
/// even when its content is empty. `None` means the header is left off.
pub(crate) fn read_token(doc: &Document) -> Option<String> {
    let meta = doc.find_first(doc.root(), |doc, node| {
        doc.tag(node) == "meta" && doc.attr(node, "name") == Some(META_NAME)
    });
    if let Some(meta) = meta {
        return doc.attr(meta, "content").filter(|token| !token.is_empty()).map(str::to_string);
    }

    let raw = doc.cookie().split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == COOKIE_NAME && !value.is_empty()).then_some(value)
    })?;

    match urlencoding::decode(raw) {
        Ok(token) => Some(token.into_owned()),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring undecodable XSRF-TOKEN cookie");
            None
        }
    }
}
