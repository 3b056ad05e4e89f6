//! Runs the JSON scenarios under `scenarios/` through `ObjectDocument` and
//! reports which path/literal checks hold.
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use moo_values::literal::{to_literal, Layout};
use moo_values::markup::to_markup;
use moo_values::{Collection, ObjectDocument, RecordId};

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    payload: Value,
    #[serde(default)]
    checks: Vec<Check>,
    /// expect `to_json` to equal the payload minus `Meta`
    #[serde(default)]
    round_trip: bool,
}

#[derive(Debug, Deserialize)]
struct Check {
    section: Section,
    id: Value,
    path: String,
    #[serde(default)]
    literal: Option<String>,
    #[serde(default)]
    pretty: Option<String>,
    #[serde(default)]
    markup: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
enum Section {
    Attributes,
    Values,
    Properties,
    Verbs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let pattern = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/*.json").to_string());
    let paths: Vec<PathBuf> = glob::glob(&pattern)?.collect::<Result<_, _>>()?;

    let mut failed = 0usize;
    for path in &paths {
        match run_file(path) {
            Ok(problems) if problems.is_empty() => {}
            Ok(problems) => {
                failed += 1;
                for problem in problems {
                    eprintln!("   {problem}");
                }
            }
            Err(error) => {
                failed += 1;
                eprintln!("❌ {}: {error}", path.display());
            }
        }
    }
    let summary = format!("{} scenario file(s), {failed} failed", paths.len());
    if failed == 0 {
        eprintln!("{}", summary.green());
        Ok(())
    } else {
        eprintln!("{}", summary.red());
        std::process::exit(1);
    }
}

fn run_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let scenarios: Vec<Scenario> = moo_values::path_de::read_json_file(path)?;
    let mut problems = Vec::new();
    for scenario in scenarios {
        let found = run_scenario(&scenario)?;
        if found.is_empty() {
            eprintln!("✅ {}", scenario.name);
        } else {
            eprintln!("❌ {}", scenario.name.red());
        }
        problems.extend(found);
    }
    Ok(problems)
}

fn run_scenario(scenario: &Scenario) -> anyhow::Result<Vec<String>> {
    let doc = ObjectDocument::parse(scenario.payload.clone())?;
    let mut problems = Vec::new();

    for check in &scenario.checks {
        let collection = section(&doc, check.section);
        let id = record_id(&check.id);
        let Some(value) = collection.get(&id).and_then(|r| r.get(&check.path)) else {
            problems.push(format!("{:?}/{id}: `{}` not present", check.section, check.path));
            continue;
        };
        let rendered = [
            ("literal", &check.literal, to_literal(value, Layout::Inline).unwrap_or_default()),
            ("pretty", &check.pretty, to_literal(value, Layout::pretty()).unwrap_or_default()),
            ("markup", &check.markup, to_markup(value, false)),
        ];
        for (kind, expected, actual) in rendered {
            if let Some(expected) = expected {
                if expected != &actual {
                    problems.push(format!(
                        "{:?}/{id} `{}` {kind}: expected {expected:?}, got {actual:?}",
                        check.section, check.path
                    ));
                }
            }
        }
    }

    if scenario.round_trip {
        let mut expected = scenario.payload.clone();
        if let Some(map) = expected.as_object_mut() {
            map.shift_remove("Meta");
        }
        let actual = doc.to_json();
        for key in ["Attributes", "Values", "Properties", "Verbs"] {
            if let Some(sent) = expected.get(key) {
                if sent != &actual[key] {
                    problems.push(format!("{key} did not round-trip: {} vs {}", sent, actual[key]));
                }
            }
        }
    }
    Ok(problems)
}

fn section(doc: &ObjectDocument, section: Section) -> &Collection {
    match section {
        Section::Attributes => &doc.attributes,
        Section::Values => &doc.values,
        Section::Properties => &doc.properties,
        Section::Verbs => &doc.verbs,
    }
}

fn record_id(id: &Value) -> RecordId {
    match id {
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .map(RecordId::Index)
            .unwrap_or_else(|| RecordId::Name(n.to_string())),
        Value::String(s) => RecordId::Name(s.clone()),
        other => RecordId::Name(other.to_string()),
    }
}

// ------------------------------- Tests ------------------------------------ //
