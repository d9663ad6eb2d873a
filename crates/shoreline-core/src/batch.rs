//! Zoning every site in a mixed collection.
//!
//! Sites are independent; with the `threading` feature they are zoned in
//! parallel. Output order is by site id either way.

use std::collections::BTreeMap;

use crate::config::ZoningConfig;
use crate::report::{analyze_transects, Report};
use crate::transect::{cmp_by_id, Transect};

/// Split a collection into per-site sequences in transect id order.
pub fn group_by_site(transects: &[Transect]) -> BTreeMap<String, Vec<Transect>> {
    let mut sites: BTreeMap<String, Vec<Transect>> = BTreeMap::new();
    for t in transects {
        sites.entry(t.site_id.clone()).or_default().push(t.clone());
    }
    for site in sites.values_mut() {
        site.sort_by(cmp_by_id);
    }
    sites
}

/// One report per site, ordered by site id.
pub fn analyze_sites(transects: &[Transect], config: &ZoningConfig) -> Vec<Report> {
    let sites: Vec<(String, Vec<Transect>)> = group_by_site(transects).into_iter().collect();
    zone_each(&sites, config)
}

#[cfg(feature = "threading")]
fn zone_each(sites: &[(String, Vec<Transect>)], config: &ZoningConfig) -> Vec<Report> {
    use rayon::prelude::*;
    sites
        .par_iter()
        .map(|(site_id, site)| analyze_transects(site_id, site, config))
        .collect()
}

#[cfg(not(feature = "threading"))]
fn zone_each(sites: &[(String, Vec<Transect>)], config: &ZoningConfig) -> Vec<Report> {
    sites
        .iter()
        .map(|(site_id, site)| analyze_transects(site_id, site, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::analyze_site;

    fn collection() -> Vec<Transect> {
        let mut all = Vec::new();
        for site in ["nzd0002", "aus0001"] {
            for i in (0..4).rev() {
                all.push(
                    Transect::new(format!("{site}-{i:04}"), site, i as f64 * 100.0)
                        .with_attribute("trend", Some(if i < 2 { -1.0 } else { 0.0 })),
                );
            }
        }
        all
    }

    #[test]
    fn groups_are_sorted_by_site_then_id() {
        let groups = group_by_site(&collection());
        let sites: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(sites, ["aus0001", "nzd0002"]);
        let ids: Vec<&str> = groups["aus0001"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["aus0001-0000", "aus0001-0001", "aus0001-0002", "aus0001-0003"]);
    }

    #[test]
    fn batch_matches_per_site_analysis() {
        let all = collection();
        let config = ZoningConfig::default().with_min_zone_length(2);
        let reports = analyze_sites(&all, &config);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], analyze_site("aus0001", &all, &config));
        assert_eq!(reports[1], analyze_site("nzd0002", &all, &config));
    }
}
