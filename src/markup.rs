//! HTML fragments for displaying values. Output is for presentation only and
//! is never parsed back.
//!
//! Every piece of wire text passes through `html_escape` before it reaches
//! the fragment; the only unescaped text is the fixed element scaffolding.
use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::literal::number_text;
use crate::tag::{decode, drop_marker, TaggedScalar};

/// Render `value`. `literal` quotes plain strings, as they would appear
/// inside a collection; children of collections are always rendered with it.
pub fn to_markup(value: &Value, literal: bool) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => num_span(&b.to_string()),
        Value::Number(n) => num_span(&number_text(n)),
        Value::String(s) => string_markup(s, literal),
        Value::Array(items) => list_markup(items),
        Value::Object(entries) => map_markup(entries),
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

fn num_span(text: &str) -> String {
    format!(r#"<span class="moo-num">{}</span>"#, escape(text))
}

fn string_markup(raw: &str, literal: bool) -> String {
    match decode(raw) {
        TaggedScalar::Error(text) => {
            format!(r#"<span class="moo-err">{}</span>"#, escape(text))
        }
        TaggedScalar::ObjectRef(text) => {
            let num = escape(drop_marker(text));
            format!(
                r#"<a rel="object" data-object-number="{num}" class="moo-obj" href="/objects/{num}">{}</a>"#,
                escape(text)
            )
        }
        TaggedScalar::Integer(text) | TaggedScalar::Float(text) => num_span(text),
        TaggedScalar::Quoted(text) | TaggedScalar::Plain(text) => {
            let shown = if literal {
                Cow::Owned(format!("\"{}\"", text.replace('"', "\\\"")))
            } else {
                Cow::Borrowed(text)
            };
            format!(r#"<span class="moo-str">{}</span>"#, escape(&shown))
        }
    }
}

fn list_markup(items: &[Value]) -> String {
    if items.is_empty() {
        return r#"<span class="moo-list">{}</span>"#.to_string();
    }
    let parts: Vec<String> = items.iter().map(|v| to_markup(v, true)).collect();
    format!(r#"<span class="moo-list">{{ {} }}</span>"#, parts.join(", "))
}

fn map_markup(entries: &Map<String, Value>) -> String {
    if entries.is_empty() {
        return r#"<span class="moo-map">[]</span>"#.to_string();
    }
    let parts: Vec<String> = entries
        .iter()
        .map(|(k, v)| format!("{} -&gt; {}", string_markup(k, true), to_markup(v, true)))
        .collect();
    format!(r#"<span class="moo-map">[ {} ]</span>"#, parts.join(", "))
}

// ------------------------------- Tests ------------------------------------ //
