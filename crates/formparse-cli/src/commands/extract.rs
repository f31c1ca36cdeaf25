//! Extract command - pick the accepting template and extract fields from one text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use super::{format_result, load_config, load_templates, read_text, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file (e.g. OCR output)
    #[arg(required = true)]
    input: PathBuf,

    /// Template files (YAML or JSON), tried in order
    #[arg(short, long = "template", required = true, num_args = 1..)]
    templates: Vec<PathBuf>,

    /// Only consider templates of this group
    #[arg(short, long)]
    group: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print template and field diagnostics to stderr
    #[arg(long)]
    show_diagnostics: bool,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let mut templates = load_templates(&args.templates, &config)?;
    let text = read_text(&args.input)?;

    info!("Processing file: {}", args.input.display());

    let template = match &args.group {
        Some(group) => templates.find_accepting_in_group(group, &text),
        None => templates.find_accepting(&text),
    };
    let Some(template) = template else {
        anyhow::bail!("No template accepts {}", args.input.display());
    };

    let result = template.extract(&text);
    if let Some(err) = &result.error {
        anyhow::bail!("Extraction failed: {}", err);
    }

    if args.show_diagnostics {
        for entry in template.diagnostics() {
            eprintln!("{} {}", style("!").red(), entry);
        }
        for (key, entries) in &result.field_diagnostics {
            for entry in entries {
                eprintln!("{} {}: {}", style("!").yellow(), key, entry);
            }
        }
    }

    let missing = result.missing_required(&template.options().required_fields);
    if !missing.is_empty() {
        eprintln!(
            "{} Missing required fields: {}",
            style("⚠").yellow(),
            missing.join(", ")
        );
    }

    let output = format_result(template, &result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
