//! Test command - report which templates accept a text file.

use std::path::PathBuf;

use clap::Args;
use console::style;

use super::{load_config, load_templates, read_text};

/// Arguments for the test command.
#[derive(Args)]
pub struct CheckArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Template files (YAML or JSON)
    #[arg(short, long = "template", required = true, num_args = 1..)]
    templates: Vec<PathBuf>,
}

pub fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut templates = load_templates(&args.templates, &config)?;
    let text = read_text(&args.input)?;

    let mut accepted = 0;
    for template in templates.iter_mut() {
        if template.accepts(&text) {
            accepted += 1;
            println!("{} {} ({})", style("✓").green(), template.name(), template.group());
        } else {
            println!("{} {} ({})", style("✗").red(), template.name(), template.group());
        }

        for entry in template.diagnostics() {
            println!("    {}", style(entry).red());
        }
    }

    println!();
    println!("{} of {} templates accept {}", accepted, templates.len(), args.input.display());

    Ok(())
}
