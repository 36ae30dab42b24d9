//! End-to-end runs of the extraction pipeline over report-shaped text:
//! flatten pages, parse, resolve, date and aggregate.

use casetally_core::regions::{CITY_LABEL, PROVINCE_LABEL};
use casetally_core::{DatedRecord, ReportParser, aggregate, report_date};

const MORNING_REPORT: &[&str] = &[
    "Nuevos casos confirmados\nHoy fueron confirmados 9 nuevos casos.\n\
     Se registraron 4 personas en Ciudad de Buenos Aires, 3 personas\nen Buenos Aires, \
     1 en Co´rdoba, y 1 Tucumán.",
    "Informe diario 15 Informe Covid\n(2) en Chaco\n- Salta   1 | 12\n",
];

const EVENING_REPORT: &[&str] = &[
    "Se confirmaron 6 nuevos casos: 5 en Córdoba, y 1 Chaco.\n\
     - Misiones 0 | 4\n",
];

fn parse_report(link: &str, pages: &[&str]) -> Vec<DatedRecord> {
    let parser = ReportParser::new();
    let date = report_date(link).expect("link carries a date");
    let text = parser.flatten_pages(pages);
    parser
        .parse_resolved(&text)
        .into_iter()
        .map(|record| DatedRecord { date, record })
        .collect()
}

#[test]
fn morning_report_records() {
    let records = parse_report("https://example.org/files/02-04-20-reporte-matutino.pdf", MORNING_REPORT);
    let summary: Vec<(&str, u64)> = records
        .iter()
        .map(|r| (r.record.region.as_str(), r.record.extraction.count))
        .collect();

    assert_eq!(
        summary,
        vec![
            (CITY_LABEL, 4),
            (PROVINCE_LABEL, 3),
            ("Córdoba", 1),
            ("Tucumán", 1),
            ("Chaco", 2),
            ("Salta", 1),
        ]
    );
    assert!(records.iter().all(|r| r.record.confidence > 0.9));
    assert_eq!(records[5].record.extraction.cumulative, Some(12));
}

#[test]
fn header_noise_and_zero_rows_never_surface() {
    let mut all = parse_report("01-04-20.pdf", MORNING_REPORT);
    all.extend(parse_report("02-04-20.pdf", EVENING_REPORT));
    assert!(all.iter().all(|r| r.record.extraction.count > 0));
    assert!(
        all.iter()
            .all(|r| !r.record.extraction.place.to_lowercase().contains("informe"))
    );
    assert!(all.iter().all(|r| r.record.region != "Misiones"));
}

#[test]
fn series_across_reports() {
    // Evening report first: aggregation must order by date, not input order.
    let mut records = parse_report("03-04-20.pdf", EVENING_REPORT);
    records.extend(parse_report("01-04-20.pdf", MORNING_REPORT));

    let series = aggregate(records);
    let cordoba = series.iter().find(|s| s.region == "Córdoba").unwrap();
    let points: Vec<(i64, u64, u64)> = cordoba
        .points
        .iter()
        .map(|p| (p.days_from_first, p.infected, p.cumulative))
        .collect();
    assert_eq!(points, vec![(0, 1, 1), (2, 5, 6)]);

    let chaco = series.iter().find(|s| s.region == "Chaco").unwrap();
    assert_eq!(chaco.total(), 3);

    assert_eq!(series[0].region, CITY_LABEL);
}
