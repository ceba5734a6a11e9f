use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// What the user asked for: a property name and the city it is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelQuery {
    pub hotel_name: String,
    pub city: String,
}

impl HotelQuery {
    /// Both fields are required; blank input yields `None`.
    pub fn new(hotel_name: &str, city: &str) -> Option<Self> {
        let hotel_name = hotel_name.trim();
        let city = city.trim();
        if hotel_name.is_empty() || city.is_empty() {
            return None;
        }
        Some(Self {
            hotel_name: hotel_name.to_string(),
            city: city.to_string(),
        })
    }
}

/// A citation attached to a search-grounded response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    Idle,
    Searching,
    Completed,
    Error,
}

#[derive(Debug, Tabled, Clone)]
pub struct RatingRow {
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[tabled(rename = "Score")]
    pub score: String,
    #[tabled(rename = "Reviews")]
    pub reviews: String,
    #[tabled(rename = "Band")]
    pub band: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct RevenueRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "ARR (INR)")]
    pub arr: String,
    #[tabled(rename = "Occupancy")]
    pub occupancy: String,
    #[tabled(rename = "MoM")]
    pub growth: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct RoomRow {
    #[tabled(rename = "Room Type")]
    pub name: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "View")]
    pub view: String,
    #[tabled(rename = "Flooring")]
    pub flooring: String,
    #[tabled(rename = "Connected")]
    pub connected: String,
    #[tabled(rename = "Amenities")]
    pub amenities: String,
    #[tabled(rename = "Cancellation")]
    pub cancellation: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct FactRow {
    #[tabled(rename = "Parameter")]
    pub parameter: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SourceRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "URI")]
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_requires_both_fields() {
        assert!(HotelQuery::new("Acacia", " ").is_none());
        assert!(HotelQuery::new("", "Pune").is_none());
        let q = HotelQuery::new("  Acacia ", "Pune ").unwrap();
        assert_eq!(q.hotel_name, "Acacia");
        assert_eq!(q.city, "Pune");
    }
}
