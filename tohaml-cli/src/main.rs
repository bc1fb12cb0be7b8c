//! tohaml command-line front end.
//!
//! Reads HTML from a file or stdin and writes the converted markup to a file
//! or stdout. Set `TOHAML_LOG` (e.g. `TOHAML_LOG=tohaml=debug`) to see what
//! the converter is doing.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use tohaml::ConvertOptions;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tohaml", version, about = "Convert HTML into HAML-style indented markup")]
struct Cli {
    /// HTML file to convert; reads stdin when absent or `-`
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Column budget for wrapped text, indentation included
    #[arg(short = 'w', long = "width", default_value_t = 80)]
    width: usize,

    /// Treat the input as a snippet: render its top-level nodes without the html/head/body wrapper
    #[arg(long)]
    fragment: bool,
}

fn init_logging() {
    let filter = std::env::var("TOHAML_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(LevelFilter::WARN));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .context("failed to read stdin")?;
            Ok(html)
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let html = read_input(cli.input.as_ref())?;
    tracing::debug!(bytes = html.len(), fragment = cli.fragment, "converting");

    let opts = ConvertOptions::new().with_wrap_width(cli.width);
    let haml = if cli.fragment {
        tohaml::convert_fragment_with_options(&html, &opts)
    } else {
        tohaml::convert_with_options(&html, &opts)
    }
    .context("conversion failed")?;

    match &cli.output {
        Some(path) => std::fs::write(path, &haml)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(haml.as_bytes())
            .context("failed to write stdout")?,
    }
    Ok(())
}
