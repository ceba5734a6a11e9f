// Flattens a report into the fixed set of spreadsheet sheets.
//
// Only the sheet/row/cell layout lives here; writing it to disk is
// `crate::output`'s job.
use serde::Serialize;

use crate::metrics::{format_growth, month_over_month_growth};
use crate::schema::Report;
use crate::util::{or_fallback, yes_no, NOT_AVAILABLE};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Plain-text rendering used by CSV output.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

pub const SUMMARY_SHEET: &str = "Summary & Ratings";
pub const REVENUE_SHEET: &str = "Revenue Intelligence";
pub const INVENTORY_SHEET: &str = "Inventory Matrix";
pub const OPERATIONS_SHEET: &str = "Operational Specs";

macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$(Cell::from($cell)),*]
    };
}

pub fn to_workbook(report: &Report) -> Workbook {
    Workbook {
        sheets: vec![
            summary_sheet(report),
            revenue_sheet(report),
            inventory_sheet(report),
            operations_sheet(report),
        ],
    }
}

fn summary_sheet(report: &Report) -> Sheet {
    let info = &report.basic_info;
    let mut rows = vec![
        row!["PROPERTY SUMMARY", ""],
        row!["Field", "Value"],
        row!["Hotel Name", info.hotel_name.as_str()],
        row!["City", info.city.as_str()],
        row!["Segment", info.segment.as_str()],
        row!["Micro Market", or_fallback(info.micro_market.as_deref(), NOT_AVAILABLE)],
        row!["Style", info.property_style.as_str()],
        row!["Year Built", or_fallback(info.year_built.as_deref(), NOT_AVAILABLE)],
        row!["Description", info.overview_description.as_str()],
        row!["", ""],
        row!["OTA RATINGS", ""],
        row!["Platform", "Score", "Review Count"],
    ];
    for (platform, rating) in report.ota_ratings.iter() {
        let score = match rating.score {
            Some(s) if s != 0.0 => Cell::Number(s),
            _ => Cell::text(NOT_AVAILABLE),
        };
        rows.push(vec![
            Cell::text(platform.to_uppercase()),
            score,
            Cell::from(rating.count),
        ]);
    }
    Sheet {
        name: SUMMARY_SHEET.to_string(),
        rows,
    }
}

fn revenue_sheet(report: &Report) -> Sheet {
    let points = &report.revenue_insights;
    let growth = month_over_month_growth(points);
    let mut rows = vec![row!["Month", "ARR (INR)", "Occupancy (%)", "MoM Occupancy Growth (%)"]];
    rows.extend(points.iter().zip(growth).map(|(point, g)| {
        row![point.month.as_str(), point.arr, point.occupancy, format_growth(g)]
    }));
    Sheet {
        name: REVENUE_SHEET.to_string(),
        rows,
    }
}

fn inventory_sheet(report: &Report) -> Sheet {
    let mut rows = vec![row![
        "OTA Room Type",
        "Size (Sqft)",
        "View",
        "Flooring",
        "Connected",
        "Amenities",
        "Cancellation Policy",
    ]];
    rows.extend(report.room_details.categories.iter().map(|cat| {
        row![
            cat.name.as_str(),
            or_fallback(cat.size_sqft.as_deref(), NOT_AVAILABLE),
            or_fallback(cat.view_type.as_deref(), "Standard"),
            or_fallback(cat.flooring_type.as_deref(), NOT_AVAILABLE),
            yes_no(cat.connected_rooms),
            cat.amenities.join(", "),
            or_fallback(cat.cancellation_policy.as_deref(), NOT_AVAILABLE),
        ]
    }));
    Sheet {
        name: INVENTORY_SHEET.to_string(),
        rows,
    }
}

fn operations_sheet(report: &Report) -> Sheet {
    let amenities = &report.amenities;
    let rows = vec![
        row!["CATEGORY", "PARAMETER", "STATUS / VALUE"],
        row!["Amenities", "Infinity Pool", yes_no(amenities.infinity_pool)],
        row!["Amenities", "Gym Available", yes_no(amenities.gym.available)],
        row!["Amenities", "EV Charging", yes_no(amenities.ev_charging.available)],
        row![
            "Amenities",
            "Power Backup",
            or_fallback(amenities.power_backup.backup_type.as_deref(), NOT_AVAILABLE),
        ],
        row![
            "Safety",
            "24/7 Manned Security",
            yes_no(report.safety_and_structure.security.manned_24x7),
        ],
        row!["Dining", "Pure Veg", yes_no(report.dining.pure_veg)],
        row!["Critique", "Negative Points Identified", report.negative_points.join(" | ")],
    ];
    Sheet {
        name: OPERATIONS_SHEET.to_string(),
        rows,
    }
}

/// File name stem for an export: whitespace runs become `_`.
pub fn export_file_stem(hotel_name: &str) -> String {
    let mut stem = String::with_capacity(hotel_name.len() + 13);
    let mut in_space = false;
    for c in hotel_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    stem.push_str("_Intel_Report");
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{OtaRating, OtaRatings, RevenuePoint, RoomCategory};
    use pretty_assertions::assert_eq;

    fn sample() -> Report {
        let mut report = Report::default();
        report.basic_info.hotel_name = "Treebo Acacia".into();
        report.ota_ratings = OtaRatings::new(vec![
            (
                "google".into(),
                OtaRating {
                    score: Some(4.2),
                    count: 310,
                    ..OtaRating::default()
                },
            ),
            (
                "agoda".into(),
                OtaRating {
                    score: None,
                    count: 0,
                    ..OtaRating::default()
                },
            ),
        ]);
        report.revenue_insights = vec![
            RevenuePoint {
                month: "Jan".into(),
                arr: 3200.0,
                occupancy: 50.0,
                ..RevenuePoint::default()
            },
            RevenuePoint {
                month: "Feb".into(),
                arr: 3400.0,
                occupancy: 60.0,
                ..RevenuePoint::default()
            },
        ];
        report.room_details.categories = vec![RoomCategory {
            name: "Oak".into(),
            connected_rooms: true,
            amenities: vec!["TV".into(), "Kettle".into()],
            ..RoomCategory::default()
        }];
        report.negative_points = vec!["Thin walls".into(), "Slow lift".into()];
        report
    }

    #[test]
    fn workbook_has_four_sheets_in_order() {
        let names: Vec<String> = to_workbook(&sample()).sheets.into_iter().map(|s| s.name).collect();
        assert_eq!(names, [SUMMARY_SHEET, REVENUE_SHEET, INVENTORY_SHEET, OPERATIONS_SHEET]);
    }

    #[test]
    fn ratings_rows_follow_identity_rows() {
        let wb = to_workbook(&sample());
        let rows = &wb.sheet(SUMMARY_SHEET).unwrap().rows;
        assert_eq!(rows[2], row!["Hotel Name", "Treebo Acacia"]);
        assert_eq!(rows[5], row!["Micro Market", "N/A"]);
        assert_eq!(rows[12], row!["GOOGLE", 4.2, 310u64]);
        assert_eq!(rows[13], row!["AGODA", "N/A", 0u64]);
        assert_eq!(rows.len(), 14);
    }

    #[test]
    fn revenue_rows_use_shared_growth() {
        let wb = to_workbook(&sample());
        let rows = &wb.sheet(REVENUE_SHEET).unwrap().rows;
        assert_eq!(rows[1], row!["Jan", 3200.0, 50.0, "N/A (Baseline)"]);
        assert_eq!(rows[2], row!["Feb", 3400.0, 60.0, "20.00%"]);
    }

    #[test]
    fn inventory_fallbacks() {
        let wb = to_workbook(&sample());
        let rows = &wb.sheet(INVENTORY_SHEET).unwrap().rows;
        assert_eq!(rows[1], row!["Oak", "N/A", "Standard", "N/A", "Yes", "TV, Kettle", "N/A"]);
    }

    #[test]
    fn operations_join_negative_points() {
        let wb = to_workbook(&sample());
        let rows = &wb.sheet(OPERATIONS_SHEET).unwrap().rows;
        assert_eq!(rows[4], row!["Amenities", "Power Backup", "N/A"]);
        assert_eq!(rows[7], row!["Critique", "Negative Points Identified", "Thin walls | Slow lift"]);
    }

    #[test]
    fn file_stem_collapses_whitespace() {
        assert_eq!(export_file_stem("Treebo  Trend\tAcacia"), "Treebo_Trend_Acacia_Intel_Report");
        assert_eq!(export_file_stem("Oak"), "Oak_Intel_Report");
    }
}
