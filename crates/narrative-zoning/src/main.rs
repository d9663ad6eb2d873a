//! Zone one site of a transect collection and print its report as JSON.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use shoreline_core::{
    analyze_site, default_zone_definitions, read_feature_collection, RuleSet, ZoningConfig,
    DEFAULT_MIN_ZONE_LENGTH,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "narrative-zoning",
    about = "Group a site's shoreline transects into narrative zones"
)]
struct Args {
    /// Site to analyse (e.g. aus0001).
    site_id: Option<String>,

    /// GeoJSON FeatureCollection of transects.
    transects_file: Option<PathBuf>,

    /// Runs shorter than this are not reported as zones.
    #[arg(long, default_value_t = DEFAULT_MIN_ZONE_LENGTH)]
    min_zone_length: usize,

    /// JSON file of zone definitions replacing the built-in rule set.
    #[arg(long)]
    zone_definitions: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,

    /// Print the built-in zone definitions and exit.
    #[arg(long)]
    show_default_zones: bool,
}

impl Args {
    fn config(&self) -> Result<ZoningConfig> {
        let rules = match &self.zone_definitions {
            Some(path) => RuleSet::from_json_file(path)
                .with_context(|| format!("loading zone definitions from {}", path.display()))?,
            None => default_zone_definitions(),
        };
        Ok(ZoningConfig::default()
            .with_min_zone_length(self.min_zone_length)
            .with_rules(rules))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    if args.show_default_zones {
        println!("{}", serde_json::to_string_pretty(&default_zone_definitions())?);
        return Ok(());
    }

    let (Some(site_id), Some(transects_file)) = (&args.site_id, &args.transects_file) else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "SITE_ID and TRANSECTS_FILE are required unless --show-default-zones is given",
            )
            .exit();
    };

    let config = args.config()?;
    let transects = read_feature_collection(transects_file)
        .with_context(|| format!("reading transects from {}", transects_file.display()))?;
    tracing::info!(
        site = %site_id,
        loaded = transects.len(),
        min_zone_length = config.min_zone_length,
        "analysing site"
    );

    let report = analyze_site(site_id, &transects, &config);
    if let Some(error) = &report.error {
        tracing::warn!(site = %site_id, "{error}");
    } else {
        tracing::info!(
            site = %site_id,
            transects = report.transect_count,
            zones = report.zone_count,
            "zoning complete"
        );
    }

    let text = report.to_json_string(args.pretty)?;
    match &args.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("report written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
