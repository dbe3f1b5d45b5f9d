//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::{CommonFileOptions, GetArgs, GroupsArgs, NodesArgs, OutputFormat};
use cfgtree::{
    CfgTreeError, Document, DocumentLoader, ErrorSeverity, FileResolver, Found, Group,
    LoaderConfig, ResolverConfig, Result, Scalar, ValueType,
};
use log::{debug, error, info, warn};
use regex::Regex;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a command finished, mapped onto the exit status by `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was found
    Success,
    /// At least one file had nothing to report
    Missing,
    /// The request itself was unusable (bad path, failed coercion, ...)
    Failed,
}

/// Report a command error.
///
/// Errors below `High` severity concern the request rather than the inputs;
/// they are logged and become [`Outcome::Failed`]. Anything worse is handed
/// back for `main` to propagate.
pub fn settle_failure(err: CfgTreeError) -> Result<Outcome> {
    match err.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => {
            error!("{}", err);
            Ok(Outcome::Failed)
        }
        severity => {
            debug!("{} error, aborting", severity);
            Err(err)
        }
    }
}

/// Execute the get command
pub fn get_command(args: GetArgs) -> Result<Outcome> {
    debug!("Executing get command with args: {:?}", args);

    let files = resolve_files(&args.files)?;
    if files.is_empty() {
        warn!("No files found to process");
        return Ok(Outcome::Missing);
    }

    let loader = create_loader(&args.files);
    let overrides = parse_overrides(&args.overrides)?;
    let value_type = args.type_.map(ValueType::from);
    let mut results = BTreeMap::new();
    let mut outcome = Outcome::Success;

    for file in &files {
        debug!("Processing file: {}", file.display());

        let mut document = loader.load_file(file)?;
        for (path, value) in &overrides {
            document.set_value(path, value.as_str())?;
        }

        match document.query(&args.path) {
            Ok(found) => {
                let rendered = render_found(&found, value_type)?;
                results.insert(file.to_string_lossy().to_string(), rendered);
            }
            Err(miss) => {
                warn!("{}: {} ({})", file.display(), args.path, miss);
                outcome = Outcome::Missing;
            }
        }
    }

    if results.is_empty() {
        info!("No matching values found");
    } else if files.len() == 1 {
        if let Some(value) = results.values().next() {
            output_value(value, args.format)?;
        }
    } else {
        output_keyed(results, args.format)?;
    }

    Ok(outcome)
}

/// Execute the nodes command
pub fn nodes_command(args: NodesArgs) -> Result<Outcome> {
    debug!("Executing nodes command with filter {}", args.filter);

    let files = resolve_files(&args.files)?;
    let loader = create_loader(&args.files);
    let mut results = BTreeMap::new();

    for file in &files {
        let document = loader.load_file(file)?;
        let labels: Vec<JsonValue> = document
            .get_nodes(&args.filter)
            .into_iter()
            .map(|group| JsonValue::String(group_label(&document, group)))
            .collect();
        if !labels.is_empty() {
            results.insert(file.to_string_lossy().to_string(), JsonValue::Array(labels));
        }
    }

    if results.is_empty() {
        info!("No groups matched {}", args.filter);
        return Ok(Outcome::Missing);
    }
    if files.len() == 1 {
        if let Some(value) = results.values().next() {
            output_value(value, args.format)?;
        }
    } else {
        output_keyed(results, args.format)?;
    }
    Ok(Outcome::Success)
}

/// Execute the groups command
pub fn groups_command(args: GroupsArgs) -> Result<Outcome> {
    debug!("Executing groups command");

    let name_regex = args.name_regex.as_deref().map(Regex::new).transpose()?;
    let files = resolve_files(&args.files)?;
    let loader = create_loader(&args.files);
    let mut results = BTreeMap::new();

    for file in &files {
        let document = loader.load_file(file)?;
        let labels: Vec<JsonValue> = document
            .groups()
            .iter()
            .filter(|group| {
                name_regex
                    .as_ref()
                    .map_or(true, |re| re.is_match(group.identifier()))
            })
            .map(|group| JsonValue::String(group_label(&document, group)))
            .collect();
        results.insert(file.to_string_lossy().to_string(), JsonValue::Array(labels));
    }

    if files.len() == 1 {
        if let Some(value) = results.values().next() {
            output_value(value, args.format)?;
        }
    } else {
        output_keyed(results, args.format)?;
    }
    Ok(Outcome::Success)
}

// Helper functions

fn resolve_files(file_options: &CommonFileOptions) -> Result<Vec<PathBuf>> {
    let mut config = ResolverConfig {
        follow_links: file_options.follow_links,
        max_depth: file_options.max_depth,
        include_hidden: file_options.include_hidden,
        ..Default::default()
    };
    if !file_options.extensions.is_empty() {
        config.include_extensions = file_options
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
    }

    FileResolver::with_config(config).resolve_paths(file_options.files.as_slice())
}

fn create_loader(file_options: &CommonFileOptions) -> DocumentLoader {
    DocumentLoader::with_config(LoaderConfig {
        meta_key: file_options.meta_key.clone(),
        ..Default::default()
    })
}

/// Split `PATH=VALUE` overrides at the first `=`
fn parse_overrides(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|item| {
            item.split_once('=')
                .map(|(path, value)| (path.trim().to_string(), value.to_string()))
                .filter(|(path, _)| !path.is_empty())
                .ok_or_else(|| CfgTreeError::invalid_path(item.as_str(), "expected PATH=VALUE"))
        })
        .collect()
}

/// `identifier`, or `identifier[n]` for groups in a repeated run
fn group_label(document: &Document, group: &Group) -> String {
    if !group.is_repeated() {
        return group.identifier().to_string();
    }
    let offset = document
        .groups()
        .iter()
        .take_while(|g| !std::ptr::eq(*g, group))
        .filter(|g| g.identifier() == group.identifier())
        .count();
    format!("{}[{}]", group.identifier(), offset)
}

fn render_found(found: &Found<'_>, value_type: Option<ValueType>) -> Result<JsonValue> {
    let render_scalar = |scalar: &Scalar| match value_type {
        Some(value_type) => value_type.to_json(scalar),
        None => Ok(JsonValue::String(scalar.to_string())),
    };

    match found {
        Found::Scalar(scalar) => render_scalar(scalar),
        Found::Array(values) => values
            .iter()
            .map(render_scalar)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        Found::Group(group) => Ok(group_summary(group)),
    }
}

fn group_summary(group: &Group) -> JsonValue {
    let metadata: Map<String, JsonValue> = group
        .metadata()
        .iter()
        .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect();
    json!({
        "group": group.identifier(),
        "repeated": group.is_repeated(),
        "metadata": metadata,
        "fields": group.fields().map(|f| f.name()).collect::<Vec<_>>(),
        "children": group.children().iter().map(|c| c.identifier()).collect::<Vec<_>>(),
    })
}

fn text_lines(value: &JsonValue) -> Result<String> {
    Ok(match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(text_lines)
            .collect::<Result<Vec<_>>>()?
            .join("\n"),
        JsonValue::Object(_) => serde_json::to_string_pretty(value)
            .map_err(|e| CfgTreeError::validation(e.to_string()))?,
        other => other.to_string(),
    })
}

fn output_value(value: &JsonValue, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", text_lines(value)?),
        OutputFormat::Json => {
            let output = serde_json::to_string_pretty(value)
                .map_err(|e| CfgTreeError::validation(e.to_string()))?;
            println!("{}", output);
        }
    }
    Ok(())
}

fn output_keyed(results: BTreeMap<String, JsonValue>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (file, value) in &results {
                println!("{}:", file);
                for line in text_lines(value)?.lines() {
                    println!("  {}", line);
                }
            }
        }
        OutputFormat::Json => {
            let object: Map<String, JsonValue> = results.into_iter().collect();
            output_value(&JsonValue::Object(object), format)?;
        }
    }
    Ok(())
}
