// One search, end to end: fetch, parse, normalize.
use tracing::info;

use crate::error::IntelError;
use crate::normalize::{normalize, parse_payload};
use crate::schema::{default_report, Report};
use crate::source::ReportSource;
use crate::types::{GroundingSource, HotelQuery};

#[derive(Debug, Clone, PartialEq)]
pub struct Intel {
    pub report: Report,
    pub sources: Vec<GroundingSource>,
}

pub fn gather(source: &dyn ReportSource, query: &HotelQuery) -> Result<Intel, IntelError> {
    info!(hotel = %query.hotel_name, city = %query.city, "gathering property intelligence");
    let raw = source.fetch(query)?;
    let payload = parse_payload(&raw.payload)?;
    let report = normalize(&default_report(), &payload, query);
    info!(
        revenue_points = report.revenue_insights.len(),
        room_categories = report.room_details.categories.len(),
        sources = raw.sources.len(),
        "report normalized"
    );
    Ok(Intel {
        report,
        sources: raw.sources,
    })
}
