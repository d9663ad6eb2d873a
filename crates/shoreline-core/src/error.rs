//! Error types for shoreline-core.

use thiserror::Error;

/// Result type alias for zoning operations.
pub type Result<T> = std::result::Result<T, ZoningError>;

/// Errors raised while loading rules or transects and while zoning a site.
#[derive(Error, Debug)]
pub enum ZoningError {
    /// Malformed zone definition. Always fatal.
    #[error("invalid zone rule: {0}")]
    InvalidRule(String),

    /// No transects carry the requested site id.
    #[error("No transects found for site")]
    NoTransectsForSite(String),

    /// A narrative template could not be rendered.
    #[error("template render failed: {0}")]
    TemplateRender(String),

    /// A GeoJSON feature lacks a required transect property.
    #[error("feature {index}: {reason}")]
    MalformedFeature { index: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
