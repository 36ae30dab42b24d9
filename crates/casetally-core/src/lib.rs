use serde::Serialize;
use thiserror::Error;

pub mod aggregate;
pub mod backend;
pub mod config;
pub mod config_file;
pub mod features;
pub mod normalize;
pub mod parser;
pub mod patterns;
pub mod regions;
pub mod report_date;
pub mod resolver;
pub mod similarity;

// Re-export for convenience
pub use aggregate::{DatedRecord, RegionSeries, SeriesPoint, aggregate};
pub use backend::{BackendError, PdfBackend};
pub use config::{ListOverride, ParserConfig, ParserConfigBuilder};
pub use features::{Feature, FeatureVector, vectorize};
pub use parser::ReportParser;
pub use patterns::StructuralPattern;
pub use regions::RegionSet;
pub use report_date::report_date;
pub use resolver::{RegionResolver, Resolution, resolve};
pub use similarity::similarity;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("region set is empty")]
    EmptyRegionSet,
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("pattern '{pattern}' has no '{group}' capture group")]
    MissingGroup {
        pattern: String,
        group: &'static str,
    },
}

/// One `(count, place)` occurrence found in report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMatch {
    /// Daily count; always greater than zero.
    pub count: u64,
    /// Place text exactly as captured.
    pub place: String,
    /// Cumulative count printed next to the daily one (summary-table rows).
    pub cumulative: Option<u64>,
    /// Name of the structural pattern that produced the match.
    pub pattern: String,
}

/// An [`ExtractionMatch`] with its canonical region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    #[serde(flatten)]
    pub extraction: ExtractionMatch,
    pub region: String,
    /// Resolver confidence in `[0, 1]`.
    pub confidence: f64,
}
