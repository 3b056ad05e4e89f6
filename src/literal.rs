//! Canonical literal text for values (round-trippable, used for editing).
//!
//! Sequences print as `{a, b}`, mappings as `[k -> v]`. Tagged scalars lose
//! their tag; plain and `|str` strings are JSON-quoted.
use serde_json::{Number, Value};

use crate::tag::{decode, TaggedScalar};

const INDENT_STEP: usize = 2;

/// Single-line or indented output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Inline,
    /// Multi-line; `indent` is the column of the closing delimiter.
    Pretty { indent: usize },
}

impl Layout {
    pub fn pretty() -> Self {
        Layout::Pretty { indent: 0 }
    }

    fn nested(self) -> Self {
        match self {
            Layout::Inline => Layout::Inline,
            Layout::Pretty { indent } => Layout::Pretty { indent: indent + INDENT_STEP },
        }
    }
}

/// `None` is the "no value" sentinel for a top-level `null`.
pub fn to_literal(value: &Value, layout: Layout) -> Option<String> {
    match value {
        Value::Null => None,
        _ => Some(render(value, layout)),
    }
}

pub fn to_literal_pretty(value: &Value) -> Option<String> {
    to_literal(value, Layout::pretty())
}

/// Literal text of a bare wire string, as used for mapping keys.
pub fn scalar_literal(raw: &str) -> String {
    match decode(raw) {
        TaggedScalar::Error(text)
        | TaggedScalar::ObjectRef(text)
        | TaggedScalar::Integer(text)
        | TaggedScalar::Float(text) => text.to_string(),
        TaggedScalar::Quoted(text) | TaggedScalar::Plain(text) => quote(text),
    }
}

/// Numbers print the way the server's clients expect: `11.0` is `11`.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => float_text(f),
        _ => n.to_string(),
    }
}

/// Shortest round-trip digits, written plainly while the decimal exponent
/// is in `-7..21` and as `d.ddde±x` outside it.
fn float_text(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{:e}", f.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else { return f.to_string() };
    let Ok(exp) = exp.parse::<i32>() else { return f.to_string() };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;
    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (whole, frac) = digits.split_at(n as usize);
        format!("{whole}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let (lead, tail) = digits.split_at(1);
        let frac = if tail.is_empty() { String::new() } else { format!(".{tail}") };
        let sign = if n > 0 { '+' } else { '-' };
        format!("{lead}{frac}e{sign}{}", (n - 1).unsigned_abs())
    };
    if f < 0.0 { format!("-{body}") } else { body }
}

fn quote(text: &str) -> String {
    // serializing a &str cannot fail
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

fn render(value: &Value, layout: Layout) -> String {
    match value {
        Value::Array(items) => render_sequence(items, layout),
        Value::Object(entries) => render_mapping(entries, layout),
        // nested nulls leave an empty slot
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => scalar_literal(s),
    }
}

fn render_sequence(items: &[Value], layout: Layout) -> String {
    if items.is_empty() {
        return "{}".to_string();
    }
    match layout {
        Layout::Inline => {
            let parts: Vec<String> = items.iter().map(|v| render(v, Layout::Inline)).collect();
            format!("{{{}}}", parts.join(", "))
        }
        Layout::Pretty { indent } => {
            let next = layout.nested();
            let pad = " ".repeat(indent + INDENT_STEP);
            let parts: Vec<String> = items
                .iter()
                .map(|v| format!("{pad}{}", render(v, next)))
                .collect();
            format!("{{\n{}\n{}}}", parts.join(",\n"), " ".repeat(indent))
        }
    }
}

fn render_mapping(entries: &serde_json::Map<String, Value>, layout: Layout) -> String {
    if entries.is_empty() {
        return "[]".to_string();
    }
    match layout {
        Layout::Inline => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{} -> {}", scalar_literal(k), render(v, Layout::Inline)))
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Layout::Pretty { indent } => {
            let next = layout.nested();
            let pad = " ".repeat(indent + INDENT_STEP);
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{pad}{} -> {}", scalar_literal(k), render(v, next)))
                .collect();
            format!("[\n{}\n{}]", parts.join(",\n"), " ".repeat(indent))
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lit(v: Value) -> String {
        to_literal(&v, Layout::Inline).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(lit(json!(11)), "11");
        assert_eq!(lit(json!(11.1)), "11.1");
        assert_eq!(lit(json!(11.0)), "11");
        assert_eq!(lit(json!("11|int")), "11");
        assert_eq!(lit(json!("11.1|float")), "11.1");
        assert_eq!(lit(json!("E_FOO|err")), "E_FOO");
        assert_eq!(lit(json!("#0|obj")), "#0");
        assert_eq!(lit(json!("#0|obj|str")), r##""#0|obj""##);
        assert_eq!(lit(json!("str")), r#""str""#);
    }

    #[test]
    fn floats_switch_to_exponent_form_at_the_edges() {
        assert_eq!(lit(json!(1e21)), "1e+21");
        assert_eq!(lit(json!(1.5e300)), "1.5e+300");
        assert_eq!(lit(json!(1e20)), "100000000000000000000");
        assert_eq!(lit(json!(1e-7)), "1e-7");
        assert_eq!(lit(json!(1.25e-7)), "1.25e-7");
        assert_eq!(lit(json!(1e-6)), "0.000001");
        assert_eq!(lit(json!(0.5)), "0.5");
        assert_eq!(lit(json!(123456.0)), "123456");
        assert_eq!(lit(json!(-2.5)), "-2.5");
        assert_eq!(lit(json!(0.0)), "0");
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(lit(json!(r#"say "hi""#)), r#""say \"hi\"""#);
        assert_eq!(lit(json!("a\\b|str")), r#""a\\b""#);
    }

    #[test]
    fn null_is_no_value() {
        assert_eq!(to_literal(&Value::Null, Layout::Inline), None);
        assert_eq!(to_literal(&json!(""), Layout::Inline).as_deref(), Some(r#""""#));
        assert_eq!(lit(json!([1, null, 3])), "{1, , 3}");
    }

    #[test]
    fn sequences() {
        assert_eq!(lit(json!(["1|int", "2.0|float", "#3|obj"])), "{1, 2.0, #3}");
        assert_eq!(lit(json!(["a", ["b", 2]])), r#"{"a", {"b", 2}}"#);
        assert_eq!(lit(json!([])), "{}");
    }

    #[test]
    fn mappings_keep_key_order() {
        let v = json!({"1|int": "one", "2.0|float": "two", "#3|obj": "three"});
        assert_eq!(lit(v), r#"[1 -> "one", 2.0 -> "two", #3 -> "three"]"#);
        let v = json!({"zeta": 1, "alpha": 2});
        assert_eq!(lit(v), r#"["zeta" -> 1, "alpha" -> 2]"#);
        assert_eq!(lit(json!({})), "[]");
    }

    #[test]
    fn pretty_indents_two_spaces_per_level() {
        let v = json!(["1|int", {"a": ["#2|obj"]}]);
        let expected = "{\n  1,\n  [\n    \"a\" -> {\n      #2\n    }\n  ]\n}";
        assert_eq!(to_literal_pretty(&v).unwrap(), expected);
    }

    #[test]
    fn pretty_respects_starting_indent() {
        let v = json!([1, 2]);
        let out = to_literal(&v, Layout::Pretty { indent: 4 }).unwrap();
        assert_eq!(out, "{\n      1,\n      2\n    }");
    }

    #[test]
    fn pretty_scalars_match_inline() {
        assert_eq!(to_literal_pretty(&json!("x")).unwrap(), r#""x""#);
        assert_eq!(to_literal_pretty(&json!([])).unwrap(), "{}");
    }
}
