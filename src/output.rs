use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use crate::export::{Sheet, Workbook};
use crate::metrics::{
    average_arr, average_occupancy, describe_room_size, month_over_month_growth, peak_capacity,
    rating_band, PeakCapacity,
};
use crate::schema::{Report, RoomCategory, KNOWN_PLATFORMS};
use crate::types::{FactRow, GroundingSource, HotelQuery, RatingRow, RevenueRow, RoomRow, SourceRow};
use crate::util::{format_int, format_number, or_fallback, yes_no, NOT_AVAILABLE};

/// Write one sheet as CSV. Rows may have different lengths.
pub fn write_sheet_csv(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;
    for row in &sheet.rows {
        wtr.write_record(row.iter().map(|cell| cell.render()))
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush csv file: {}", path.display()))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;
    fs::write(path, s).with_context(|| format!("failed to write json file: {}", path.display()))?;
    Ok(())
}

fn sheet_file_name(index: usize, name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    format!("{:02}_{}.csv", index + 1, slug)
}

#[derive(Serialize)]
struct ExportEnvelope<'a> {
    generated_at: String,
    query: Option<&'a HotelQuery>,
    sources: &'a [GroundingSource],
    workbook: &'a Workbook,
}

/// Write every sheet to `<out_dir>/<stem>/NN_<sheet>.csv` and the whole
/// workbook to `<out_dir>/<stem>.json`. Returns the paths written.
pub fn write_workbook(
    out_dir: &Path,
    stem: &str,
    workbook: &Workbook,
    query: Option<&HotelQuery>,
    sources: &[GroundingSource],
) -> Result<Vec<PathBuf>> {
    let sheet_dir = out_dir.join(stem);
    fs::create_dir_all(&sheet_dir)
        .with_context(|| format!("failed to create directory: {}", sheet_dir.display()))?;

    let mut written = Vec::with_capacity(workbook.sheets.len() + 1);
    for (i, sheet) in workbook.sheets.iter().enumerate() {
        let path = sheet_dir.join(sheet_file_name(i, &sheet.name));
        write_sheet_csv(&path, sheet)?;
        written.push(path);
    }

    let json_path = out_dir.join(format!("{}.json", stem));
    let envelope = ExportEnvelope {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        query,
        sources,
        workbook,
    };
    write_json(&json_path, &envelope)?;
    written.push(json_path);

    info!(files = written.len(), dir = %out_dir.display(), "workbook exported");
    Ok(written)
}

pub fn preview_table_rows<T>(rows: &[T])
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows.to_vec()).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn fact(parameter: &str, value: impl Into<String>) -> FactRow {
    FactRow {
        parameter: parameter.to_string(),
        value: value.into(),
    }
}

fn available_with(available: bool, detail: Option<&str>) -> String {
    match (available, detail.filter(|d| !d.trim().is_empty())) {
        (true, Some(d)) => format!("Yes ({})", d),
        (true, None) => "Yes".to_string(),
        (false, _) => "No".to_string(),
    }
}

pub fn rating_rows(report: &Report) -> Vec<RatingRow> {
    KNOWN_PLATFORMS
        .iter()
        .map(|platform| {
            let rating = report.ota_ratings.get(platform.key);
            let score = rating.and_then(|r| r.score).filter(|s| *s > 0.0);
            RatingRow {
                platform: platform.label.to_string(),
                score: score.map_or_else(
                    || "—".to_string(),
                    |s| format!("{:.1} / {}", s, platform.max_score),
                ),
                reviews: rating.map_or_else(|| "0".to_string(), |r| format_int(r.count)),
                band: rating_band(score, platform.max_score).to_string(),
            }
        })
        .collect()
}

pub fn revenue_rows(report: &Report) -> Vec<RevenueRow> {
    let points = &report.revenue_insights;
    points
        .iter()
        .zip(month_over_month_growth(points))
        .map(|(point, growth)| RevenueRow {
            month: point.month.clone(),
            arr: format!("₹{}", format_number(point.arr, 0)),
            occupancy: format!("{}%", point.occupancy),
            growth: match growth {
                Some(g) if g >= 0.0 => format!("▲ {:.1}% MoM", g.abs()),
                Some(g) => format!("▼ {:.1}% MoM", g.abs()),
                None => "Baseline".to_string(),
            },
        })
        .collect()
}

pub fn room_rows(categories: &[&RoomCategory]) -> Vec<RoomRow> {
    categories
        .iter()
        .map(|cat| RoomRow {
            name: cat.name.clone(),
            size: describe_room_size(cat.size_sqft.as_deref()),
            view: or_fallback(cat.view_type.as_deref(), "Standard").to_string(),
            flooring: or_fallback(cat.flooring_type.as_deref(), NOT_AVAILABLE).to_string(),
            connected: yes_no(cat.connected_rooms).to_string(),
            amenities: cat.amenities.join(", "),
            cancellation: or_fallback(cat.cancellation_policy.as_deref(), "Standard Brand Terms")
                .to_string(),
        })
        .collect()
}

pub fn operational_rows(report: &Report) -> Vec<FactRow> {
    let a = &report.amenities;
    let b = &report.banquet_and_conference;
    let d = &report.dining;
    let s = &report.safety_and_structure;
    let l = &report.location_intelligence;
    let r = &report.room_details;
    vec![
        fact("Infinity Pool", yes_no(a.infinity_pool)),
        fact("Gym", available_with(a.gym.available, a.gym.equipment_quality.as_deref())),
        fact("EV Charging", yes_no(a.ev_charging.available)),
        fact("Power Redundancy", or_fallback(a.power_backup.backup_type.as_deref(), "Standard")),
        fact("Wi-Fi", a.wifi_access.as_str()),
        fact("Recreation", a.recreational_center.as_str()),
        fact("Peak Event Capacity", PeakCapacity(peak_capacity(&b.banquet_halls, &b.conference_halls)).to_string()),
        fact("Conference Halls", b.conference_halls.len().to_string()),
        fact("Banquet Halls", b.banquet_halls.len().to_string()),
        fact("DJ / Live Music", format!("{} / {}", yes_no(b.events.dj_available), yes_no(b.events.live_music))),
        fact("Bonfire", available_with(b.events.bonfire.available, b.events.bonfire.charges.as_deref())),
        fact("Family Rooms", yes_no(r.family_rooms.available)),
        fact("Room Lock", r.room_lock_type.as_str()),
        fact("Extra Mattress", r.extra_mattress_charges.as_str()),
        fact("Pure Veg Kitchen", yes_no(d.pure_veg)),
        fact("Restaurant", d.restaurant_location.as_str()),
        fact("Breakfast Type", or_fallback(d.breakfast_type.as_deref(), "Standard")),
        fact("Liquor Allowed", yes_no(d.liquor_allowed)),
        fact("Happy Hours", available_with(d.happy_hours.available, d.happy_hours.timing.as_deref())),
        fact("Elevator", available_with(s.elevator.available, Some(s.elevator.door_type.as_str()))),
        fact("CCTV (14-day backup)", format!("{} ({})", yes_no(s.cctv.available), yes_no(s.cctv.backup_14_days))),
        fact("Fire Extinguishers", yes_no(s.fire_safety.extinguishers)),
        fact("Sprinklers in Rooms", yes_no(s.fire_safety.sprinklers_in_rooms)),
        fact("24/7 Manned Security", yes_no(s.security.manned_24x7)),
        fact("Doctor on Call", yes_no(s.doctor_on_call)),
        fact("Approach", l.approach_type.as_str()),
        fact("Parking", yes_no(l.parking_available)),
        fact("Airport Transfer", available_with(l.airport_transfer.available, l.airport_transfer.charges.as_deref())),
    ]
}

/// Print the full report to stdout.
pub fn render_report(report: &Report, categories: &[&RoomCategory], sources: &[GroundingSource]) {
    let info = &report.basic_info;
    println!("{} — {}", info.hotel_name, info.city);
    println!(
        "Segment: {} | Micro-market: {} | Style: {} | Built: {}",
        info.segment,
        or_fallback(info.micro_market.as_deref(), NOT_AVAILABLE),
        info.property_style,
        or_fallback(info.year_built.as_deref(), NOT_AVAILABLE),
    );
    println!("{}\n", info.overview_description);

    println!("OTA Ratings");
    preview_table_rows(&rating_rows(report));

    let links = report.external_links.listed();
    if !links.is_empty() {
        println!("Listings");
        for (label, link) in links {
            println!("  {:<8} {}", label, link);
        }
        println!();
    }

    let points = &report.revenue_insights;
    println!("Revenue Intelligence");
    println!(
        "Avg ARR: {} | Avg Occupancy: {}",
        average_arr(points).map_or_else(|| "—".to_string(), |v| format!("₹{}", format_number(v, 0))),
        average_occupancy(points).map_or_else(|| "—".to_string(), |v| format!("{}%", v.round())),
    );
    preview_table_rows(&revenue_rows(report));

    println!("Room Inventory");
    preview_table_rows(&room_rows(categories));

    println!("Operations");
    preview_table_rows(&operational_rows(report));

    let hubs = &report.location_intelligence.business_hubs;
    if !hubs.is_empty() {
        println!("Business Hubs");
        for hub in hubs {
            println!("  {} ({})", hub.name, hub.distance);
        }
        println!();
    }

    if !report.negative_points.is_empty() {
        println!("Critique");
        for point in &report.negative_points {
            println!("  - {}", point);
        }
        println!();
    }

    if !sources.is_empty() {
        println!("Sources");
        let rows: Vec<SourceRow> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| SourceRow {
                index: i + 1,
                title: s.title.clone(),
                uri: s.uri.clone(),
            })
            .collect();
        preview_table_rows(&rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{to_workbook, INVENTORY_SHEET};
    use crate::schema::{OtaRating, OtaRatings, RevenuePoint};

    #[test]
    fn sheet_names_become_file_names() {
        assert_eq!(sheet_file_name(0, "Summary & Ratings"), "01_summary_ratings.csv");
        assert_eq!(sheet_file_name(3, "Operational Specs"), "04_operational_specs.csv");
    }

    #[test]
    fn revenue_rows_share_growth_with_export() {
        let mut report = Report::default();
        report.revenue_insights = vec![
            RevenuePoint {
                month: "Jan".into(),
                arr: 4200.0,
                occupancy: 80.0,
                ..RevenuePoint::default()
            },
            RevenuePoint {
                month: "Feb".into(),
                arr: 3900.0,
                occupancy: 60.0,
                ..RevenuePoint::default()
            },
        ];
        let rows = revenue_rows(&report);
        assert_eq!(rows[0].growth, "Baseline");
        assert_eq!(rows[1].growth, "▼ 25.0% MoM");
        assert_eq!(rows[0].arr, "₹4,200");
    }

    fn rating(score: f64, count: u64) -> OtaRating {
        OtaRating {
            score: Some(score),
            count,
            ..OtaRating::default()
        }
    }

    #[test]
    fn rating_rows_cover_known_platforms() {
        let mut report = Report::default();
        report.ota_ratings = OtaRatings::new(vec![("google".into(), rating(4.4, 1520))]);
        let rows = rating_rows(&report);
        assert_eq!(rows.len(), KNOWN_PLATFORMS.len());
        assert_eq!(rows[0].platform, "Google Business");
        assert_eq!(rows[0].score, "4.4 / 5");
        assert_eq!(rows[0].reviews, "1,520");
        assert_eq!(rows[0].band, "Excellent");
        assert_eq!(rows[1].score, "—");
        assert_eq!(rows[7].platform, "Internal Scan");
    }

    #[test]
    fn ten_point_platforms_are_banded_on_their_own_scale() {
        let mut report = Report::default();
        report.ota_ratings = OtaRatings::new(vec![
            ("booking_com".into(), rating(7.8, 410)),
            ("agoda".into(), rating(4.0, 95)),
            ("yatra".into(), rating(4.0, 12)),
        ]);
        let rows = rating_rows(&report);
        let row = |label: &str| rows.iter().find(|r| r.platform == label).unwrap();

        assert_eq!(row("Booking.com").score, "7.8 / 10");
        assert_eq!(row("Booking.com").band, "Average");
        assert_eq!(row("Agoda").score, "4.0 / 10");
        assert_eq!(row("Agoda").band, "Poor");
        assert_eq!(row("Yatra").score, "4.0 / 5");
        assert_eq!(row("Yatra").band, "Excellent");
    }

    #[test]
    fn workbook_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::default();
        report.room_details.categories = vec![RoomCategory::default(), RoomCategory::default()];
        let wb = to_workbook(&report);

        let written = write_workbook(dir.path(), "Oak_Intel_Report", &wb, None, &[]).unwrap();
        assert_eq!(written.len(), 5);

        let inventory = dir.path().join("Oak_Intel_Report").join("03_inventory_matrix.csv");
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&inventory)
            .unwrap();
        let rows = rdr.records().count();
        assert_eq!(rows, wb.sheet(INVENTORY_SHEET).unwrap().rows.len());

        let json = fs::read_to_string(dir.path().join("Oak_Intel_Report.json")).unwrap();
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("Inventory Matrix"));
    }
}
