//! Optional jq pre-filtering of input documents before they are rendered.
use anyhow::anyhow;
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{Error, Result};

/// Run `filter_src` over `input`, returning each output as a JSON value.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    run(filter_src, input).map_err(|e| Error::Jq(e.to_string()))
}

fn run(filter_src: &str, input: &Value) -> anyhow::Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let v = item.map_err(|e| anyhow!("{e:?}"))?;
        // Val displays as JSON text; reparse so tags and key order survive
        out.push(serde_json::from_str::<Value>(&v.to_string())?);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_a_subtree() {
        let doc = json!({"Values": {"name": {"Value": {"value": "Test"}}}});
        let out = run_jaq(".Values.name.Value.value", &doc).unwrap();
        assert_eq!(out, vec![json!("Test")]);
    }

    #[test]
    fn bad_filters_are_errors() {
        assert!(matches!(run_jaq(".[", &json!({})), Err(Error::Jq(_))));
    }
}
