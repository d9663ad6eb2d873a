//! Quick property profile of a site, used to eyeball data before zoning.

use serde::Serialize;

use crate::stats::FieldRange;
use crate::transect::Transect;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteProfile {
    pub count: usize,
    pub beach_slope: FieldRange,
    pub trend: FieldRange,
    pub r2_score: FieldRange,
}

pub fn profile_site(transects: &[Transect]) -> SiteProfile {
    SiteProfile {
        count: transects.len(),
        beach_slope: FieldRange::of(transects, "beach_slope"),
        trend: FieldRange::of(transects, "trend"),
        r2_score: FieldRange::of(transects, "r2_score"),
    }
}
