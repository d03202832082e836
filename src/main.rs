use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use serde_json::Value as JsonValue;

use cpt_panda::{classify_request_body, PlotConfig, SoilProperties};

/// Plot a sounding from saved parse/classify responses.
#[derive(Parser, Debug)]
#[command(name = "cpt-panda", version, about)]
struct Cli {
    /// Saved `parse/cpt` response
    #[arg(long)]
    parse: PathBuf,

    /// Saved `classify/cpt` response
    #[arg(long)]
    classify: Option<PathBuf>,

    /// Where to write the composite SVG figure
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plot configuration (JSON-serialized PlotConfig)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the CPT and layer tabular views
    #[arg(long)]
    print_tables: bool,

    /// Write the classify request body built from the parse response
    #[arg(long, value_name = "PATH")]
    classify_request: Option<PathBuf>,

    /// Print the location reprojected to EPSG:28992 (needs network)
    #[arg(long)]
    reproject: bool,
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let response_parse = read_json(&cli.parse)?;

    if let Some(path) = &cli.classify_request {
        let body = classify_request_body(&response_parse);
        fs::write(path, serde_json::to_string_pretty(&body)?)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote classify request body to {}", path.display());
    }

    let Some(classify_path) = &cli.classify else {
        if cli.output.is_some() || cli.print_tables || cli.reproject {
            bail!("--classify is required to build the soil properties");
        }
        return Ok(());
    };
    let response_classify = read_json(classify_path)?;

    let soil = SoilProperties::from_api_response(&response_parse, &response_classify)
        .context("building soil properties")?;
    log::info!(
        "Loaded {} ({} CPT rows, {} layers)",
        soil.label(),
        soil.cpt_table().len(),
        soil.layer_table().len()
    );

    if cli.print_tables {
        let cpt = soil.cpt_table().tabular_view()?;
        let layers = soil.layer_table().tabular_view()?;
        println!("{}", pretty_format_batches(&[cpt])?);
        println!("{}", pretty_format_batches(&[layers])?);
    }

    if cli.reproject {
        let transformed = soil.location().transform().context("reprojecting location")?;
        println!("{}", serde_json::to_string_pretty(&transformed)?);
    }

    if let Some(output) = &cli.output {
        let config = match &cli.config {
            Some(path) => PlotConfig::from_json_file(path)
                .with_context(|| format!("loading plot config {}", path.display()))?,
            None => PlotConfig::default(),
        };
        let svg = soil.plot(&config)?.to_svg()?;
        fs::write(output, svg).with_context(|| format!("writing {}", output.display()))?;
        println!("Wrote figure to {}", output.display());
    }

    Ok(())
}
