use std::path::PathBuf;

use hotel_intel::export::{
    export_file_stem, to_workbook, Cell, INVENTORY_SHEET, OPERATIONS_SHEET, REVENUE_SHEET, SUMMARY_SHEET,
};
use hotel_intel::intel::gather;
use hotel_intel::metrics::{average_arr, format_growth, month_over_month_growth, peak_capacity};
use hotel_intel::output::{revenue_rows, write_workbook};
use hotel_intel::session::Session;
use hotel_intel::sort::{SortDirection, SortKey};
use hotel_intel::source::FileSource;
use hotel_intel::types::{AppStatus, HotelQuery};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn query() -> HotelQuery {
    HotelQuery::new("Acacia", "Pune").unwrap()
}

#[test]
fn saved_response_yields_report_and_sources() {
    let intel = gather(&FileSource::new(fixture("acacia_response.json")), &query()).unwrap();

    assert_eq!(intel.report.basic_info.hotel_name, "Treebo Acacia Residency");
    assert_eq!(intel.sources.len(), 2);
    assert_eq!(intel.sources[1].title, "https://www.treebo.com/hotels/acacia");
}

#[test]
fn derived_metrics_over_fixture() {
    let intel = gather(&FileSource::new(fixture("acacia_report.json")), &query()).unwrap();
    let report = &intel.report;

    let growth = month_over_month_growth(&report.revenue_insights);
    assert_eq!(growth.len(), 6);
    assert_eq!(growth[0], None);
    assert_eq!(growth[1], None);
    assert_eq!(format_growth(growth[2]), "10.34%");
    assert_eq!(format_growth(growth[3]), "12.50%");
    assert_eq!(growth[4], Some(-100.0));
    assert_eq!(growth[5], None);

    let avg = average_arr(&report.revenue_insights).unwrap();
    assert!((avg - (3150.0 + 2980.0 + 3020.0 + 3240.0 + 0.0 + 3510.0) / 6.0).abs() < 1e-9);

    let halls = &report.banquet_and_conference;
    assert_eq!(peak_capacity(&halls.banquet_halls, &halls.conference_halls), Some(120.0));
}

#[test]
fn export_row_counts_match_report() {
    let intel = gather(&FileSource::new(fixture("acacia_report.json")), &query()).unwrap();
    let report = &intel.report;
    let wb = to_workbook(report);

    let revenue = wb.sheet(REVENUE_SHEET).unwrap();
    assert_eq!(revenue.rows.len() - 1, report.revenue_insights.len());
    let inventory = wb.sheet(INVENTORY_SHEET).unwrap();
    assert_eq!(inventory.rows.len() - 1, report.room_details.categories.len());

    let summary = wb.sheet(SUMMARY_SHEET).unwrap();
    assert_eq!(summary.rows.len(), 12 + report.ota_ratings.len());
    assert_eq!(
        summary.rows[13],
        vec![Cell::text("MAKEMYTRIP"), Cell::Number(3.9), Cell::Number(642.0)]
    );

    let ops = wb.sheet(OPERATIONS_SHEET).unwrap();
    assert_eq!(ops.rows[4][2], Cell::text("DG set, full load"));
    assert_eq!(ops.rows[5][2], Cell::text("Yes"));
}

#[test]
fn screen_and_sheet_agree_on_growth() {
    let intel = gather(&FileSource::new(fixture("acacia_report.json")), &query()).unwrap();
    let report = &intel.report;
    let growth = month_over_month_growth(&report.revenue_insights);
    let screen = revenue_rows(report);
    let sheet = to_workbook(report);
    let sheet_rows = &sheet.sheet(REVENUE_SHEET).unwrap().rows[1..];

    for ((g, screen_row), sheet_row) in growth.iter().zip(&screen).zip(sheet_rows) {
        assert_eq!(sheet_row[3], Cell::text(format_growth(*g)));
        assert_eq!(screen_row.growth == "Baseline", g.is_none());
    }
}

#[test]
fn session_sorts_and_exports_fixture() {
    let mut session = Session::default();
    session
        .search(&FileSource::new(fixture("acacia_response.json")), query())
        .unwrap();
    assert_eq!(session.status, AppStatus::Completed);

    session.request_sort(SortKey::Size);
    let by_size: Vec<&str> = session.sorted_categories().into_iter().map(|c| c.name.as_str()).collect();
    assert_eq!(by_size, ["Maple Suite", "Oak Deluxe", "acacia Premium"]);

    let config = session.request_sort(SortKey::Size);
    assert_eq!(config.direction, SortDirection::Desc);
    let by_size_desc: Vec<&str> = session.sorted_categories().into_iter().map(|c| c.name.as_str()).collect();
    assert_eq!(by_size_desc, ["acacia Premium", "Oak Deluxe", "Maple Suite"]);

    let report = session.report.as_ref().unwrap();
    let stem = export_file_stem(&report.basic_info.hotel_name);
    assert_eq!(stem, "Treebo_Acacia_Residency_Intel_Report");

    let dir = tempfile::tempdir().unwrap();
    let workbook = session.workbook().unwrap();
    let written = write_workbook(dir.path(), &stem, &workbook, session.query.as_ref(), &session.sources).unwrap();
    assert!(written.iter().all(|p| p.exists()));

    let json = std::fs::read_to_string(dir.path().join(format!("{stem}.json"))).unwrap();
    assert!(json.contains("\"hotel_name\": \"Acacia\""));
    assert!(json.contains("makemytrip.com"));
}
