//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod check;
pub mod config;
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use formparse_core::{EngineConfig, ExtractionResult, Template, TemplateDefinition, TemplateSet};

/// Output format of extraction results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (field,value)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Load the config from `--config`, the default location, or built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EngineConfig> {
    if let Some(path) = config_path {
        return EngineConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        return Ok(EngineConfig::from_file(&default_path)?);
    }

    Ok(EngineConfig::default())
}

/// Load template files; `.json` files are read as JSON, everything else as YAML.
pub fn load_templates(paths: &[PathBuf], config: &EngineConfig) -> anyhow::Result<TemplateSet> {
    let mut templates = TemplateSet::new();

    for path in paths {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let definition = if is_json {
            TemplateDefinition::from_json_str(&source)
        } else {
            TemplateDefinition::from_yaml_str(&source)
        }
        .with_context(|| format!("Invalid template {}", path.display()))?;

        let template = Template::with_config(definition, config);
        debug!("Loaded template '{}' from {}", template.name(), path.display());
        templates.push(template);
    }

    Ok(templates)
}

/// Read an input text file.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Render an extraction result.
pub fn format_result(
    template: &Template,
    result: &ExtractionResult,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "template": {
                    "id": template.id(),
                    "name": template.name(),
                    "group": template.group(),
                },
                "data": result.data,
                "protocol": result.field_diagnostics,
                "error": result.error.as_ref().map(ToString::to_string),
            });
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Csv => format_result_csv(result),
        OutputFormat::Text => Ok(format_result_text(template, result)),
    }
}

fn format_result_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["field", "value"])?;

    if let Some(data) = &result.data {
        for (key, value) in data {
            wtr.write_record([key.as_str(), &value.to_string()])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_result_text(template: &Template, result: &ExtractionResult) -> String {
    let mut lines = vec![format!("Template: {} ({})", template.name(), template.group())];

    match &result.data {
        Some(data) => {
            let width = data.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in data {
                lines.push(format!("  {:width$}  {}", key, value, width = width));
            }
        }
        None => lines.push(format!(
            "  error: {}",
            result.error.as_ref().map(ToString::to_string).unwrap_or_default()
        )),
    }

    lines.join("\n")
}
