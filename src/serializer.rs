//! Mapping from [`ViewSettings`] to the query string sent to the server.
//!
//! Wire format of the default serializer:
//!
//! ```text
//! limit=<n>&begin=<n>&orderBy=<expr>&reverse=true&search=<text|field:value,...>
//! ```
//!
//! Zero `limit`/`begin`, empty expressions and absent groups are omitted.

use std::borrow::Cow;

use serde_json::Value;

use crate::settings::{FilterExpression, ViewSettings};

/// Strategy turning view settings into a query string (without the `?`).
pub trait SettingsSerializer: Send + Sync {
    fn serialize(&self, settings: &ViewSettings) -> String;
}

impl<F> SettingsSerializer for F
where
    F: Fn(&ViewSettings) -> String + Send + Sync,
{
    fn serialize(&self, settings: &ViewSettings) -> String {
        self(settings)
    }
}

/// Default serializer producing `limit`/`begin`/`orderBy`/`reverse`/`search`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringSerializer;

impl SettingsSerializer for QueryStringSerializer {
    fn serialize(&self, settings: &ViewSettings) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(limit_to) = &settings.limit_to {
            if limit_to.limit > 0 {
                parts.push(format!("limit={}", limit_to.limit));
            }
            if limit_to.begin > 0 {
                parts.push(format!("begin={}", limit_to.begin));
            }
        }

        if let Some(order_by) = &settings.order_by {
            if !order_by.expression.is_empty() {
                parts.push(format!("orderBy={}", encode_component(&order_by.expression)));
                if order_by.reverse {
                    parts.push("reverse=true".to_string());
                }
            }
        }

        if let Some(filter) = &settings.filter {
            match &filter.expression {
                FilterExpression::Text(text) if !text.is_empty() => {
                    parts.push(format!("search={}", encode_component(text)));
                }
                FilterExpression::Text(_) => {}
                FilterExpression::Fields(fields) => {
                    let search: Vec<String> = fields
                        .iter()
                        .map(|(field, value)| {
                            format!(
                                "{}:{}",
                                encode_component(field),
                                encode_component(&value_text(value))
                            )
                        })
                        .collect();
                    parts.push(format!("search={}", search.join(",")));
                }
            }
        }

        parts.join("&")
    }
}

/// Appends `query` to `resource_url` with `?`, or `&` if the URL already
/// carries a query.
pub fn append_query(resource_url: &str, query: &str) -> String {
    if query.is_empty() {
        return resource_url.to_string();
    }
    let separator = if resource_url.contains('?') { '&' } else { '?' };
    format!("{resource_url}{separator}{query}")
}

/// Percent-encodes like JavaScript's `encodeURIComponent`.
///
/// `urlencoding` leaves only `A-Za-z0-9-_.~` alone; `encodeURIComponent`
/// additionally keeps `!'()*`, so those escapes are undone. A literal `%`
/// is always emitted as `%25`, which keeps the reversal unambiguous.
pub fn encode_component(input: &str) -> String {
    let encoded = urlencoding::encode(input);
    if !encoded.contains('%') {
        return encoded.into_owned();
    }
    encoded
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Text of a field value as a JavaScript client would print it: strings
/// raw, integral floats without a fraction (`2.0` is `2`), the rest as JSON.
fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                Cow::Owned(format!("{f:.0}"))
            }
            _ => Cow::Owned(n.to_string()),
        },
        other => Cow::Owned(other.to_string()),
    }
}
