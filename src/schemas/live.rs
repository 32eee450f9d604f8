use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Push payload on `/topic/answers/{quizId}`: question id to current answer.
///
/// Entries are ordered the way a browser enumerates object keys: integer-like
/// ids ascending, then the remaining keys in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub(crate) struct AnswerTally {
    entries: Vec<(String, String)>,
}

impl AnswerTally {
    pub(crate) fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl From<Map<String, Value>> for AnswerTally {
    fn from(map: Map<String, Value>) -> Self {
        let mut entries: Vec<(String, String)> =
            map.into_iter().map(|(key, value)| (key, display_value(value))).collect();
        entries.sort_by(|(a, _), (b, _)| key_order(a, b));
        Self { entries }
    }
}

/// Renders a value the way string interpolation does in the page script.
fn display_value(value: Value) -> String {
    match value {
        Value::Array(items) => items.into_iter().map(element_value).collect::<Vec<_>>().join(","),
        other => scalar_value(other),
    }
}

/// Array elements: `null` becomes empty and nested arrays flatten.
fn element_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        other => display_value(other),
    }
}

fn scalar_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => match number.as_f64() {
            Some(float) if !number.is_i64() && !number.is_u64() => float.to_string(),
            _ => number.to_string(),
        },
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}

fn key_order(a: &str, b: &str) -> Ordering {
    match (array_index(a), array_index(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
