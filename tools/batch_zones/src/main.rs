//! Zone every site of a transect collection, one report file per site.
//! Output: {output}/{site_id}.json

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use shoreline_core::{
    analyze_sites, read_feature_collection, transects_for_site, Report, RuleSet, ZoningConfig,
    DEFAULT_MIN_ZONE_LENGTH,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "batch_zones", about = "Zone all sites in a transect collection")]
struct Args {
    /// GeoJSON FeatureCollection of transects.
    #[arg(short, long)]
    transects: PathBuf,

    /// Output directory for per-site report files.
    #[arg(short, long, default_value = "data/zones")]
    output: PathBuf,

    /// Runs shorter than this are not reported as zones.
    #[arg(long, default_value_t = DEFAULT_MIN_ZONE_LENGTH)]
    min_zone_length: usize,

    /// JSON file of zone definitions replacing the built-in rule set.
    #[arg(long)]
    zone_definitions: Option<PathBuf>,

    /// Process only this site.
    #[arg(short, long)]
    site: Option<String>,
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

    let mut config = ZoningConfig::default().with_min_zone_length(args.min_zone_length);
    if let Some(path) = &args.zone_definitions {
        config = config.with_rules(
            RuleSet::from_json_file(path)
                .with_context(|| format!("loading zone definitions from {}", path.display()))?,
        );
    }

    let mut transects = read_feature_collection(&args.transects)
        .with_context(|| format!("reading transects from {}", args.transects.display()))?;
    if let Some(site) = &args.site {
        transects = transects_for_site(&transects, site);
        if transects.is_empty() {
            bail!("no transects for site {site}");
        }
    }
    tracing::info!(transects = transects.len(), "zoning collection");

    let reports = analyze_sites(&transects, &config);
    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    tracing::info!("{}", table_header());
    let mut failed = 0usize;
    for report in &reports {
        match write_report(&args.output, report) {
            Ok(path) => {
                tracing::info!("{}", table_row(report));
                tracing::debug!("  -> {}", path.display());
            }
            Err(e) => {
                failed += 1;
                tracing::error!(site = %report.site_id, "{e:#}");
            }
        }
    }

    tracing::info!(
        "Done. {} site reports in {}.",
        reports.len() - failed,
        args.output.display()
    );
    if failed > 0 {
        tracing::warn!("{failed} sites failed");
    }
    Ok(())
}

fn write_report(dir: &Path, report: &Report) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", report.site_id));
    let text = report.to_json_string(true)?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn table_header() -> String {
    format!(
        "{:<16} {:>9} {:>6}  {}",
        "site", "transects", "zones", "distribution"
    )
}

fn table_row(report: &Report) -> String {
    let distribution: Vec<String> = report
        .zone_type_distribution
        .iter()
        .map(|(zone_type, n)| format!("{zone_type}={n}"))
        .collect();
    format!(
        "{:<16} {:>9} {:>6}  {}",
        report.site_id,
        report.transect_count,
        report.zone_count,
        distribution.join(" ")
    )
}
