use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)-(\d+)-(\d+)").unwrap());

/// Last path segment of a URL or file path.
pub fn file_name(link: &str) -> &str {
    link.rsplit(['/', '\\']).next().unwrap_or(link)
}

/// Report date encoded in a link or filename as `<day>-<month>-<year>`.
///
/// Only the final path segment is searched, and the first match wins.
/// Two-digit years are taken as 20yy (`20` is 2020). Returns `None` when no
/// date is present or the numbers do not form a calendar date.
pub fn report_date(link: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(file_name(link))?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
