use std::io::Write;
use std::path::Path;

use casetally_core::{RegionSeries, RegionSet, ResolvedRecord, Resolution};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Counters collected over one `run`.
#[derive(Debug, Default)]
pub struct RunStats {
    pub links: usize,
    pub undated: usize,
    pub failed: usize,
    pub parsed: usize,
    pub records: usize,
    pub below_confidence: usize,
}

/// Print where reports come from and how many were found.
pub fn print_run_header(
    w: &mut dyn Write,
    index_url: &str,
    cache_dir: &Path,
    stats: &RunStats,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Reading report index {}...", index_url)?;
    writeln!(
        w,
        "Found {} report links (cache: {})",
        stats.links - stats.undated,
        cache_dir.display()
    )?;
    if stats.undated > 0 {
        let msg = format!("(Skipped {} links without a date)", stats.undated);
        if color.enabled() {
            writeln!(w, "{}", msg.dimmed())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print every resolved match of one document (dry run).
pub fn print_extraction(
    w: &mut dyn Write,
    file_name: &str,
    date: Option<NaiveDate>,
    records: &[ResolvedRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    let date = date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no date".to_string());

    if color.enabled() {
        writeln!(
            w,
            "{} {} ({}, {} matches)\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            date,
            records.len()
        )?;
    } else {
        writeln!(
            w,
            "DRY RUN: {} ({}, {} matches)\n",
            file_name,
            date,
            records.len()
        )?;
    }

    for (i, record) in records.iter().enumerate() {
        let m = &record.extraction;
        let label = format!("[{}]", i + 1);
        if color.enabled() {
            writeln!(w, "{} {} {}", label.bold().yellow(), m.count, m.place)?;
        } else {
            writeln!(w, "{} {} {}", label, m.count, m.place)?;
        }
        writeln!(w, "  Region:     {}", record.region)?;
        let confidence = format!("{:.3}", record.confidence);
        if color.enabled() && record.confidence < 0.5 {
            writeln!(w, "  Confidence: {}", confidence.red())?;
        } else {
            writeln!(w, "  Confidence: {}", confidence)?;
        }
        if let Some(cumulative) = m.cumulative {
            writeln!(w, "  Cumulative: {}", cumulative)?;
        }
        if color.enabled() {
            writeln!(w, "  Pattern:    {}", m.pattern.dimmed())?;
        } else {
            writeln!(w, "  Pattern:    {}", m.pattern)?;
        }
    }

    writeln!(w)?;
    Ok(())
}

/// Print one line per region: total, days covered and last daily count.
pub fn print_series_summary(
    w: &mut dyn Write,
    series: &[RegionSeries],
    color: ColorMode,
) -> std::io::Result<()> {
    if series.is_empty() {
        writeln!(w, "No case records extracted.")?;
        return Ok(());
    }

    let width = series.iter().map(|s| s.region.len()).max().unwrap_or(0);
    if color.enabled() {
        writeln!(w, "{}", "Cases by region".bold())?;
    } else {
        writeln!(w, "Cases by region")?;
    }
    for s in series {
        let days = s.points.last().map(|p| p.days_from_first).unwrap_or(0);
        let first = s
            .first_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let total = s.total().to_string();
        if color.enabled() {
            writeln!(
                w,
                "  {:<width$}  {:>7}  since {} ({} days)",
                s.region,
                total.green(),
                first,
                days,
                width = width
            )?;
        } else {
            writeln!(
                w,
                "  {:<width$}  {:>7}  since {} ({} days)",
                s.region,
                total,
                first,
                days,
                width = width
            )?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the run counters.
pub fn print_run_stats(w: &mut dyn Write, stats: &RunStats, color: ColorMode) -> std::io::Result<()> {
    writeln!(
        w,
        "Parsed {} reports, {} records",
        stats.parsed, stats.records
    )?;
    if stats.below_confidence > 0 {
        writeln!(
            w,
            "  Dropped {} records below the confidence threshold",
            stats.below_confidence
        )?;
    }
    if stats.failed > 0 {
        let msg = format!("  {} reports could not be downloaded or read", stats.failed);
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    Ok(())
}

pub fn print_resolution(
    w: &mut dyn Write,
    text: &str,
    resolution: &Resolution,
) -> std::io::Result<()> {
    writeln!(
        w,
        "{} -> {} ({:.3})",
        text, resolution.region, resolution.confidence
    )
}

pub fn print_regions(w: &mut dyn Write, regions: &RegionSet) -> std::io::Result<()> {
    for region in regions.iter() {
        writeln!(w, "{}", region)?;
    }
    Ok(())
}
