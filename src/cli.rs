//! CLI: render, query and normalize MOO payloads from JSON files.
use std::path::PathBuf;
use clap::{Parser, Subcommand, Args, ValueEnum};
use colored::Colorize;
use serde_json::Value;

use moo_values::collection::{Collection, CollectionShape, Record};
use moo_values::literal::{to_literal, Layout};
use moo_values::markup::to_markup;
use moo_values::object::{record_status, ObjectDocument};
use moo_values::store::NestedStore;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render tagged MOO values as literals or HTML, and inspect object payloads
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print each document as a MOO literal
    Literal(LiteralOut),
    /// print each document as an escaped HTML fragment
    Markup(MarkupOut),
    /// read a dotted path from each document and print its literal
    Get(GetOut),
    /// normalize each document as a record collection and list `id  literal`
    Normalize(NormalizeOut),
    /// parse each document as an object payload and print its records
    Object(ObjectOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /Values/name)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct LiteralOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// multi-line output, two spaces per nesting level
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct MarkupOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// quote top-level strings as they would appear inside a list
    #[arg(long, default_value_t = false)]
    literal: bool,
}

#[derive(clap::Parser, Debug)]
struct GetOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// dotted path, e.g. `Value.value`
    #[arg(long)]
    path: String,

    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// wire shape of the collection
    #[arg(long, value_enum, default_value_t = ShapeArg::Mapped)]
    shape: ShapeArg,

    /// dotted path inside each record to print (whole record if omitted)
    #[arg(long)]
    path: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct ObjectOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print the re-serialized collections instead of the record listing
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ShapeArg {
    Mapped,
    Indexed,
}

impl From<ShapeArg> for CollectionShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Mapped => CollectionShape::Mapped,
            ShapeArg::Indexed => CollectionShape::Indexed,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value)) -> anyhow::Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        for source_path in source_paths {
            tracing::debug!(path = %source_path.display(), "loading input");
            let json_value: Value = moo_values::path_de::read_json_file(&source_path)?;
            let json_value = match self.json_pointer.as_deref() {
                None => json_value,
                Some(pointer) => match json_value.pointer(pointer) {
                    Some(x) => x.clone(),
                    None => {
                        tracing::warn!(pointer, path = %source_path.display(), "JSON pointer matched nothing");
                        continue;
                    }
                },
            };
            match self.jq_expr.as_ref() {
                None => apply(json_value),
                Some(jq_expr) => {
                    for json_value in moo_values::jq_exec::run_jaq(jq_expr, &json_value)? {
                        apply(json_value)
                    }
                }
            }
        }
        Ok(())
    }

    fn emit(&self, text: &str) -> anyhow::Result<()> {
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, text)?;
        } else {
            print!("{text}");
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Literal(target) => {
                let layout = layout(target.pretty);
                let mut buf = String::new();
                target.input_settings.load_process(|value| {
                    push_line(&mut buf, &literal_or_blank(&value, layout));
                })?;
                target.input_settings.emit(&buf)
            }
            Command::Markup(target) => {
                let mut buf = String::new();
                target.input_settings.load_process(|value| {
                    push_line(&mut buf, &to_markup(&value, target.literal));
                })?;
                target.input_settings.emit(&buf)
            }
            Command::Get(target) => {
                let layout = layout(target.pretty);
                let mut buf = String::new();
                target.input_settings.load_process(|value| {
                    let store = NestedStore::from_value(value);
                    match store.get(&target.path) {
                        Some(found) => push_line(&mut buf, &literal_or_blank(found, layout)),
                        None => tracing::info!(path = %target.path, "path not present"),
                    }
                })?;
                target.input_settings.emit(&buf)
            }
            Command::Normalize(target) => {
                let mut buf = String::new();
                target.input_settings.load_process(|value| {
                    let collection = Collection::normalize(value, target.shape.into());
                    for record in collection.iter() {
                        let shown = match target.path.as_deref() {
                            Some(path) => record.get(path).map(|v| literal_or_blank(v, Layout::Inline)),
                            None => Some(literal_or_blank(&record.to_json(), Layout::Inline)),
                        };
                        if let Some(shown) = shown {
                            push_line(&mut buf, &format!("{}\t{shown}", record.id()));
                        }
                    }
                })?;
                target.input_settings.emit(&buf)
            }
            Command::Object(target) => {
                let mut buf = String::new();
                let mut failure = None;
                target.input_settings.load_process(|value| {
                    if failure.is_some() {
                        return;
                    }
                    match ObjectDocument::parse(value) {
                        Ok(doc) if target.json => {
                            push_line(&mut buf, &serde_json::to_string_pretty(&doc.to_json()).unwrap_or_default());
                        }
                        Ok(doc) => render_object(&mut buf, &doc),
                        Err(error) => failure = Some(error),
                    }
                })?;
                if let Some(error) = failure {
                    return Err(error.into());
                }
                target.input_settings.emit(&buf)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn layout(pretty: bool) -> Layout {
    if pretty { Layout::pretty() } else { Layout::Inline }
}

fn literal_or_blank(value: &Value, layout: Layout) -> String {
    to_literal(value, layout).unwrap_or_default()
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

fn render_object(buf: &mut String, doc: &ObjectDocument) {
    let id = doc.id().map(|v| literal_or_blank(v, Layout::Inline)).unwrap_or_else(|| "?".into());
    push_line(buf, &format!("{} {} ({:?})", "object".bold(), id, doc.status()));
    render_section(buf, "Attributes", &doc.attributes, |r| vec![r.get("Value.value")]);
    render_section(buf, "Values", &doc.values, |r| vec![r.get("Value.value")]);
    render_section(buf, "Properties", &doc.properties, |r| {
        vec![r.get("Property.name"), r.get("Property.value")]
    });
    render_section(buf, "Verbs", &doc.verbs, |r| vec![r.get("Verb.names"), r.get("Verb.owner")]);
}

fn render_section<'r>(
    buf: &mut String,
    title: &str,
    collection: &'r Collection,
    columns: impl Fn(&'r Record) -> Vec<Option<&'r Value>>,
) {
    if collection.is_empty() {
        return;
    }
    push_line(buf, &title.cyan().to_string());
    for record in collection.iter() {
        let cells: Vec<String> = columns(record)
            .into_iter()
            .map(|cell| cell.map(|v| literal_or_blank(v, Layout::Inline)).unwrap_or_default())
            .collect();
        let status = record_status(record);
        let line = format!("  {}\t{}", record.id(), cells.join("\t"));
        let line = if status.can_read() { line.normal() } else { line.dimmed() };
        push_line(buf, &line.to_string());
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
