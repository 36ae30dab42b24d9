use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use casetally_core::RegionSeries;
use serde::Serialize;

use crate::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Csv, ExportFormat::Json]
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::all().iter().copied().find(|f| f.extension() == ext)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown export format '{}' (expected csv or json)", other)),
        }
    }
}

/// One exported row: a series point with its region.
#[derive(Serialize)]
struct Row<'a> {
    region: &'a str,
    #[serde(flatten)]
    point: &'a casetally_core::SeriesPoint,
}

/// Render `series` in `format`.
pub fn render_series(series: &[RegionSeries], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => Ok(export_csv(series)),
        ExportFormat::Json => export_json(series),
    }
}

/// Export `series` to the given path.
pub fn export_series(
    series: &[RegionSeries],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let content = render_series(series, format)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    tracing::info!(path = %path.display(), %format, series = series.len(), "exported series");
    Ok(())
}

fn rows(series: &[RegionSeries]) -> impl Iterator<Item = Row<'_>> {
    series.iter().flat_map(|s| {
        s.points.iter().map(|point| Row {
            region: &s.region,
            point,
        })
    })
}

fn export_json(series: &[RegionSeries]) -> Result<String, ExportError> {
    let rows: Vec<Row<'_>> = rows(series).collect();
    let mut out = serde_json::to_string_pretty(&rows)?;
    out.push('\n');
    Ok(out)
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn export_csv(series: &[RegionSeries]) -> String {
    let mut out = String::from(
        "date,region,place,infected,cumulative,days_from_first,confidence,reported_cumulative,pattern\n",
    );
    for row in rows(series) {
        let p = row.point;
        let reported = p
            .reported_cumulative
            .map(|n| n.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{:.4},{},{}\n",
            p.date.format("%Y-%m-%d"),
            csv_escape(row.region),
            csv_escape(&p.place),
            p.infected,
            p.cumulative,
            p.days_from_first,
            p.confidence,
            reported,
            csv_escape(&p.pattern),
        ));
    }
    out
}
