// Figures derived from a normalized report.
//
// Both the console view and the spreadsheet export read these; neither
// recomputes them.
use std::fmt;

use crate::schema::{BanquetHall, ConferenceHall, RevenuePoint};
use crate::util::{average, parse_leading_f64};

/// Square feet to square metres.
pub const SQFT_TO_SQM: f64 = 0.092903;

pub fn average_arr(points: &[RevenuePoint]) -> Option<f64> {
    average(&points.iter().map(|p| p.arr).collect::<Vec<_>>())
}

pub fn average_occupancy(points: &[RevenuePoint]) -> Option<f64> {
    average(&points.iter().map(|p| p.occupancy).collect::<Vec<_>>())
}

/// Occupancy change against the previous month, in percent.
///
/// The first entry is the baseline and has no growth; so does any entry
/// whose predecessor had zero occupancy.
pub fn month_over_month_growth(points: &[RevenuePoint]) -> Vec<Option<f64>> {
    let mut growth = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        let value = match i.checked_sub(1).map(|prev| &points[prev]) {
            Some(prev) if prev.occupancy != 0.0 => {
                Some((point.occupancy - prev.occupancy) / prev.occupancy * 100.0)
            }
            _ => None,
        };
        growth.push(value);
    }
    growth
}

/// Export cell text for a growth value.
pub fn format_growth(growth: Option<f64>) -> String {
    match growth {
        Some(g) => format!("{:.2}%", g),
        None => "N/A (Baseline)".to_string(),
    }
}

/// Largest event space in the property, or `None` when nothing reports a
/// capacity above zero.
pub fn peak_capacity(banquet_halls: &[BanquetHall], conference_halls: &[ConferenceHall]) -> Option<f64> {
    let max = banquet_halls
        .iter()
        .map(|h| h.capacity)
        .chain(conference_halls.iter().map(|h| h.capacity))
        .map(|c| c.filter(|v| v.is_finite()).unwrap_or(0.0))
        .fold(0.0_f64, f64::max);
    if max > 0.0 {
        Some(max)
    } else {
        None
    }
}

pub struct PeakCapacity(pub Option<f64>);

impl fmt::Display for PeakCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(pax) => write!(f, "{} Pax", pax),
            None => f.write_str("N/A"),
        }
    }
}

/// Numeric part of a free-form size such as `"450 sq. ft."`.
///
/// Everything but digits and `.` is dropped; unparseable or missing input is 0.
pub fn extract_numeric_size(size: Option<&str>) -> f64 {
    size.and_then(numeric_size).unwrap_or(0.0)
}

fn numeric_size(size: &str) -> Option<f64> {
    let kept: String = size
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    parse_leading_f64(&kept)
}

pub fn sqft_to_sqm(sqft: f64) -> f64 {
    sqft * SQFT_TO_SQM
}

/// Console rendering of a room size: both units when it parses, the raw text
/// when it does not, `N/A` when there is nothing to show.
pub fn describe_room_size(size: Option<&str>) -> String {
    let raw = match size.map(str::trim) {
        None | Some("") | Some("N/A") | Some("—") => return "N/A".to_string(),
        Some(raw) => raw,
    };
    match numeric_size(raw) {
        Some(sqft) => format!("{} sq. ft. (~{:.1} m²)", sqft, sqft_to_sqm(sqft)),
        None => raw.to_string(),
    }
}

/// Coarse bucket for a rating out of `max`.
pub fn rating_band(score: Option<f64>, max: f64) -> &'static str {
    match score {
        Some(s) if s > 0.0 && s >= max * 0.8 => "Excellent",
        Some(s) if s > 0.0 && s >= max * 0.6 => "Average",
        Some(s) if s > 0.0 => "Poor",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupancy(values: &[f64]) -> Vec<RevenuePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, occ)| RevenuePoint {
                month: format!("M{}", i + 1),
                arr: 3000.0 + i as f64 * 100.0,
                occupancy: *occ,
                ..RevenuePoint::default()
            })
            .collect()
    }

    #[test]
    fn growth_starts_with_baseline() {
        assert_eq!(month_over_month_growth(&occupancy(&[50.0, 60.0])), vec![None, Some(20.0)]);
    }

    #[test]
    fn growth_skips_zero_previous_occupancy() {
        assert_eq!(month_over_month_growth(&occupancy(&[0.0, 10.0])), vec![None, None]);
        assert_eq!(
            month_over_month_growth(&occupancy(&[80.0, 0.0, 40.0])),
            vec![None, Some(-100.0), None]
        );
        assert!(month_over_month_growth(&[]).is_empty());
    }

    #[test]
    fn averages_are_none_for_empty_series() {
        assert_eq!(average_arr(&[]), None);
        assert_eq!(average_occupancy(&[]), None);
        let points = occupancy(&[50.0, 70.0]);
        assert_eq!(average_arr(&points), Some(3050.0));
        assert_eq!(average_occupancy(&points), Some(60.0));
    }

    #[test]
    fn growth_formatting() {
        assert_eq!(format_growth(Some(20.0)), "20.00%");
        assert_eq!(format_growth(Some(-3.456)), "-3.46%");
        assert_eq!(format_growth(None), "N/A (Baseline)");
    }

    #[test]
    fn peak_capacity_sentinel_and_max() {
        assert_eq!(peak_capacity(&[], &[]), None);

        let banquet = vec![BanquetHall {
            capacity: Some(200.0),
            ..BanquetHall::default()
        }];
        let conference = vec![ConferenceHall {
            capacity: Some(0.0),
            ..ConferenceHall::default()
        }];
        assert_eq!(peak_capacity(&banquet, &conference), Some(200.0));
        assert_eq!(PeakCapacity(Some(200.0)).to_string(), "200 Pax");
        assert_eq!(PeakCapacity(None).to_string(), "N/A");
    }

    #[test]
    fn numeric_size_extraction() {
        assert_eq!(extract_numeric_size(Some("450 sq. ft.")), 450.0);
        assert_eq!(extract_numeric_size(Some("1,200 sqft")), 1200.0);
        assert_eq!(extract_numeric_size(Some("N/A")), 0.0);
        assert_eq!(extract_numeric_size(None), 0.0);
    }

    #[test]
    fn room_size_description() {
        assert_eq!(describe_room_size(Some("200 sqft")), "200 sq. ft. (~18.6 m²)");
        assert_eq!(describe_room_size(Some("—")), "N/A");
        assert_eq!(describe_room_size(None), "N/A");
        assert_eq!(describe_room_size(Some("Spacious")), "Spacious");
    }

    #[test]
    fn rating_bands() {
        assert_eq!(rating_band(Some(4.5), 5.0), "Excellent");
        assert_eq!(rating_band(Some(3.2), 5.0), "Average");
        assert_eq!(rating_band(Some(2.0), 5.0), "Poor");
        assert_eq!(rating_band(Some(0.0), 5.0), "");
        assert_eq!(rating_band(None, 5.0), "");
    }
}
