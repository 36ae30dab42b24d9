use chrono::NaiveDate;
use serde::Serialize;

use crate::ResolvedRecord;

/// A resolved record together with the date of the report it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub record: ResolvedRecord,
}

/// One entry of a region's time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// Days since the region's first record.
    pub days_from_first: i64,
    /// Count reported by this record.
    pub infected: u64,
    /// Running sum of `infected` for the region, including this record.
    pub cumulative: u64,
    /// Place text as it appeared in the report.
    pub place: String,
    pub confidence: f64,
    /// Cumulative count printed in the report itself, when the layout has one.
    pub reported_cumulative: Option<u64>,
    pub pattern: String,
}

/// Chronological series for one canonical region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeries {
    pub region: String,
    pub points: Vec<SeriesPoint>,
}

impl RegionSeries {
    pub fn total(&self) -> u64 {
        self.points.last().map(|p| p.cumulative).unwrap_or(0)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }
}

/// Group records by region and build per-region cumulative series.
///
/// Records are stable-sorted by date first, so records of the same day keep
/// their extraction order. Regions appear in order of their earliest record.
/// No deduplication is done: every record adds to the running sum.
pub fn aggregate(mut records: Vec<DatedRecord>) -> Vec<RegionSeries> {
    records.sort_by_key(|r| r.date);

    let mut series: Vec<RegionSeries> = Vec::new();
    for dated in records {
        let idx = match series.iter().position(|s| s.region == dated.record.region) {
            Some(idx) => idx,
            None => {
                series.push(RegionSeries {
                    region: dated.record.region.clone(),
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        let entry = &mut series[idx];

        let first = entry.first_date().unwrap_or(dated.date);
        let cumulative = entry.total().saturating_add(dated.record.extraction.count);
        let extraction = dated.record.extraction;
        entry.points.push(SeriesPoint {
            date: dated.date,
            days_from_first: (dated.date - first).num_days(),
            infected: extraction.count,
            cumulative,
            place: extraction.place,
            confidence: dated.record.confidence,
            reported_cumulative: extraction.cumulative,
            pattern: extraction.pattern,
        });
    }

    tracing::debug!(regions = series.len(), "aggregated region series");
    series
}
