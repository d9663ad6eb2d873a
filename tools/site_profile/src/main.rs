//! Property profile of one site's transects, for checking data before zoning.

use anyhow::{bail, Context, Result};
use clap::Parser;
use shoreline_core::stats::FieldRange;
use shoreline_core::{profile_site, read_feature_collection, site_ids, transects_for_site, Transect};

#[derive(Parser, Debug)]
#[command(name = "site_profile", about = "Summarise transect properties for one site")]
struct Args {
    /// Site to profile.
    site_id: String,

    /// GeoJSON FeatureCollection of transects.
    transects_file: String,

    /// Print the profile as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

const EDGE: usize = 3;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let all = read_feature_collection(&args.transects_file)
        .with_context(|| format!("reading transects from {}", args.transects_file))?;
    let site = transects_for_site(&all, &args.site_id);
    if site.is_empty() {
        let known = site_ids(&all);
        bail!("no transects for site {} (sites present: {})", args.site_id, known.join(", "));
    }
    tracing::info!(site = %args.site_id, transects = site.len(), "profiling site");

    let profile = profile_site(&site);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("First {EDGE} transects:");
    for t in site.iter().take(EDGE) {
        println!("  {}", transect_line(t));
    }
    println!("Last {EDGE} transects:");
    for t in &site[site.len().saturating_sub(EDGE)..] {
        println!("  {}", transect_line(t));
    }

    println!();
    println!("{:<12} {:>10} {:>10} {:>10}", "property", "min", "max", "avg");
    println!("{}", "-".repeat(45));
    for (name, range) in [
        ("beach_slope", &profile.beach_slope),
        ("trend", &profile.trend),
        ("r2_score", &profile.r2_score),
    ] {
        println!("{}", range_row(name, range));
    }
    println!("{} transects", profile.count);
    Ok(())
}

fn transect_line(t: &Transect) -> String {
    format!(
        "{}  along_dist={:.1}  trend={}  beach_slope={}",
        t.id,
        t.along_dist,
        cell(t.attribute("trend")),
        cell(t.attribute("beach_slope")),
    )
}

fn range_row(name: &str, range: &FieldRange) -> String {
    format!(
        "{:<12} {:>10} {:>10} {:>10}",
        name,
        cell(range.min),
        cell(range.max),
        cell(range.avg)
    )
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_print_as_dash() {
        assert_eq!(cell(None), "-");
        assert_eq!(cell(Some(-0.25)), "-0.250");
    }

    #[test]
    fn transect_line_names_id_and_position() {
        let t = Transect::new("aus0001-0004", "aus0001", 412.0).with_attribute("trend", Some(-1.5));
        assert_eq!(
            transect_line(&t),
            "aus0001-0004  along_dist=412.0  trend=-1.500  beach_slope=-"
        );
    }
}
