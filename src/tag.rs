//! Suffix tags on wire scalars.
//!
//! The server has no out-of-band type channel, so every ambiguous scalar
//! arrives as a string with a trailing tag: `"5|int"`, `"#3|obj"`,
//! `"E_PERM|err"`. A value carries at most one tag; anything after the
//! first recognized suffix is opaque text (`"#0|obj|str"` is the quoted
//! string `#0|obj`).
use serde_json::Value;

// ------------------------------- Vocabulary ------------------------------- //

const TAG_ERR: &str = "|err";
const TAG_OBJ: &str = "|obj";
const TAG_INT: &str = "|int";
const TAG_FLOAT: &str = "|float";
const TAG_STR: &str = "|str";

/// Semantic kind of a scalar after tag inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Error,
    ObjectRef,
    Integer,
    Float,
    /// Explicit `|str`.
    QuotedString,
    /// A string with no recognized tag.
    PlainString,
    /// Anything that is not a string on the wire.
    Number,
}

/// Kind plus the byte length of the suffix to strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub kind: TagKind,
    pub tag_len: usize,
}

impl TagKind {
    /// The literal suffix for tagged kinds.
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            TagKind::Error => Some(TAG_ERR),
            TagKind::ObjectRef => Some(TAG_OBJ),
            TagKind::Integer => Some(TAG_INT),
            TagKind::Float => Some(TAG_FLOAT),
            TagKind::QuotedString => Some(TAG_STR),
            TagKind::PlainString | TagKind::Number => None,
        }
    }
}

pub fn classify_str(raw: &str) -> Classified {
    const ORDERED: [TagKind; 5] = [
        TagKind::Error,
        TagKind::ObjectRef,
        TagKind::Integer,
        TagKind::Float,
        TagKind::QuotedString,
    ];
    for kind in ORDERED {
        // `suffix` is Some for every kind in ORDERED
        let Some(tag) = kind.suffix() else { continue };
        if raw.ends_with(tag) {
            return Classified { kind, tag_len: tag.len() };
        }
    }
    Classified { kind: TagKind::PlainString, tag_len: 0 }
}

/// Non-strings classify as `Number`; the codec dispatches on shape before
/// it ever asks about containers.
pub fn classify(value: &Value) -> Classified {
    match value {
        Value::String(s) => classify_str(s),
        _ => Classified { kind: TagKind::Number, tag_len: 0 },
    }
}

/// Split a wire string into its kind and the untagged payload.
pub fn strip_tag(raw: &str) -> (TagKind, &str) {
    let Classified { kind, tag_len } = classify_str(raw);
    // tags are ASCII, so the cut always lands on a char boundary
    (kind, &raw[..raw.len() - tag_len])
}

// ------------------------------ Decoded form ------------------------------ //

/// A wire string with its tag resolved. Borrows the stripped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggedScalar<'a> {
    Plain(&'a str),
    ObjectRef(&'a str),
    Error(&'a str),
    Integer(&'a str),
    Float(&'a str),
    Quoted(&'a str),
}

pub fn decode(raw: &str) -> TaggedScalar<'_> {
    let (kind, text) = strip_tag(raw);
    match kind {
        TagKind::Error => TaggedScalar::Error(text),
        TagKind::ObjectRef => TaggedScalar::ObjectRef(text),
        TagKind::Integer => TaggedScalar::Integer(text),
        TagKind::Float => TaggedScalar::Float(text),
        TagKind::QuotedString => TaggedScalar::Quoted(text),
        TagKind::PlainString | TagKind::Number => TaggedScalar::Plain(text),
    }
}

impl<'a> TaggedScalar<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            TaggedScalar::Plain(s)
            | TaggedScalar::ObjectRef(s)
            | TaggedScalar::Error(s)
            | TaggedScalar::Integer(s)
            | TaggedScalar::Float(s)
            | TaggedScalar::Quoted(s) => s,
        }
    }
}

/// The numeric id of an object reference: `"#12|obj"` → `"12"`.
pub fn object_number(raw: &str) -> Option<&str> {
    match decode(raw) {
        TaggedScalar::ObjectRef(text) => Some(drop_marker(text)),
        _ => None,
    }
}

pub(crate) fn drop_marker(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.as_str()
}

// ------------------------------- Predicates ------------------------------- //

/// Strings in the domain sense: object references and errors are their own
/// kinds, everything else string-typed (including `|int`) counts.
pub fn is_string(value: &Value) -> bool {
    match value {
        Value::String(s) => !matches!(
            classify_str(s).kind,
            TagKind::ObjectRef | TagKind::Error
        ),
        _ => false,
    }
}

pub fn is_object_ref(value: &Value) -> bool {
    matches!(value, Value::String(s) if classify_str(s).kind == TagKind::ObjectRef)
}

pub fn is_error(value: &Value) -> bool {
    matches!(value, Value::String(s) if classify_str(s).kind == TagKind::Error)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_each_tag_to_its_base_text() {
        assert_eq!(strip_tag("11|int"), (TagKind::Integer, "11"));
        assert_eq!(strip_tag("11.1|float"), (TagKind::Float, "11.1"));
        assert_eq!(strip_tag("E_FOO|err"), (TagKind::Error, "E_FOO"));
        assert_eq!(strip_tag("#0|obj"), (TagKind::ObjectRef, "#0"));
        assert_eq!(strip_tag("hello|str"), (TagKind::QuotedString, "hello"));
        assert_eq!(strip_tag("hello"), (TagKind::PlainString, "hello"));
    }

    #[test]
    fn tag_lengths() {
        assert_eq!(classify_str("1|int").tag_len, 4);
        assert_eq!(classify_str("1.5|float").tag_len, 6);
        assert_eq!(classify_str("plain").tag_len, 0);
    }

    #[test]
    fn only_the_outermost_tag_is_stripped() {
        assert_eq!(decode("#0|obj|str"), TaggedScalar::Quoted("#0|obj"));
    }

    #[test]
    fn unknown_or_malformed_tags_fall_back_to_plain() {
        assert_eq!(strip_tag("x|bool"), (TagKind::PlainString, "x|bool"));
        assert_eq!(strip_tag("x|INT"), (TagKind::PlainString, "x|INT"));
        assert_eq!(strip_tag("|"), (TagKind::PlainString, "|"));
        assert_eq!(strip_tag(""), (TagKind::PlainString, ""));
        assert_eq!(strip_tag("|int"), (TagKind::Integer, ""));
    }

    #[test]
    fn non_strings_are_numbers() {
        assert_eq!(classify(&json!(11)).kind, TagKind::Number);
        assert_eq!(classify(&json!(1.5)).kind, TagKind::Number);
        assert_eq!(classify(&json!("5|int")).kind, TagKind::Integer);
    }

    #[test]
    fn domain_predicates() {
        assert!(is_string(&json!("test")));
        assert!(is_string(&json!("5|int")));
        assert!(!is_string(&json!("#1|obj")));
        assert!(!is_string(&json!("test|err")));
        assert!(!is_string(&json!(5)));

        assert!(is_object_ref(&json!("#-1|obj")));
        assert!(!is_object_ref(&json!("#1")));
        assert!(is_error(&json!("E_PERM|err")));
        assert!(!is_error(&json!(["E_PERM|err"])));
    }

    #[test]
    fn object_numbers() {
        assert_eq!(object_number("#12|obj"), Some("12"));
        assert_eq!(object_number("#-1|obj"), Some("-1"));
        assert_eq!(object_number("#12"), None);
        assert_eq!(object_number("|obj"), Some(""));
    }
}
