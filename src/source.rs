// Where raw reports come from: the live search-grounded model, or a saved
// response on disk.
use std::path::PathBuf;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::FetchError;
use crate::types::{GroundingSource, HotelQuery};

/// Unparsed model output plus the citations that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIntel {
    pub payload: String,
    pub sources: Vec<GroundingSource>,
}

pub trait ReportSource {
    fn fetch(&self, query: &HotelQuery) -> Result<RawIntel, FetchError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WebChunk {
    title: Option<String>,
    uri: Option<String>,
}

impl GenerateContentResponse {
    fn into_raw_intel(self) -> Result<RawIntel, FetchError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResponse)?;

        let payload: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if payload.trim().is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        let sources = candidate
            .grounding_metadata
            .map(|m| grounding_sources(m.grounding_chunks))
            .unwrap_or_default();
        Ok(RawIntel { payload, sources })
    }
}

/// Web citations only; the title falls back to the URI.
fn grounding_sources(chunks: Vec<GroundingChunk>) -> Vec<GroundingSource> {
    chunks
        .into_iter()
        .filter_map(|chunk| {
            let web = chunk.web?;
            let uri = web.uri.filter(|u| !u.is_empty())?;
            let title = web
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| uri.clone());
            Some(GroundingSource { title, uri })
        })
        .collect()
}

/// Client for the `generateContent` endpoint with search grounding.
pub struct GeminiClient {
    config: ServiceConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: ServiceConfig) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }
}

impl ReportSource for GeminiClient {
    fn fetch(&self, query: &HotelQuery) -> Result<RawIntel, FetchError> {
        let api_key = self.config.require_api_key()?;
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": build_prompt(query) }] }],
            "tools": [{ "google_search": {} }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        debug!(model = %self.config.model, "sending report request");
        let resp = self
            .http
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: resp.text().unwrap_or_default(),
            });
        }

        let parsed: GenerateContentResponse = resp.json()?;
        let intel = parsed.into_raw_intel()?;
        info!(
            payload_bytes = intel.payload.len(),
            sources = intel.sources.len(),
            "report received"
        );
        Ok(intel)
    }
}

/// Replays a response saved to disk. Accepts either a full `generateContent`
/// response or the bare report JSON.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSource for FileSource {
    fn fetch(&self, _query: &HotelQuery) -> Result<RawIntel, FetchError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), "loaded saved response");

        match serde_json::from_str::<GenerateContentResponse>(&text) {
            Ok(resp) if !resp.candidates.is_empty() => resp.into_raw_intel(),
            _ => Ok(RawIntel {
                payload: text,
                sources: Vec::new(),
            }),
        }
    }
}

/// Research instruction sent with every search.
pub fn build_prompt(query: &HotelQuery) -> String {
    format!(
        r#"TASK: Build an exhaustive property intelligence report for "{hotel}" in "{city}", India.

Gather and reconcile data from EVERY platform that lists this hotel: Google Search, MakeMyTrip, Goibibo, Booking.com, Agoda, Treebo.com, EaseMyTrip and Yatra.

REVENUE: For each of the LAST 6 MONTHS, in chronological order, give the ARR (average room rate, INR) and occupancy percentage. Estimate from pricing trends, seasonal demand and listed inventory where figures are not published.

RATINGS: Score and review count for Google and every OTA.
LINKS: Direct listing URLs for each platform found.
AMENITIES: Confirm power backup type, 24/7 security, fire safety measures and elevator type.
ROOMS: Every room category with its size, view and flooring.
NEGATIVE POINTS: Recurring guest complaints or operational weaknesses.

OUTPUT: Return ONLY one JSON object, no preamble, with this structure:
{{
  "basic_info": {{ "hotel_name", "city", "segment", "micro_market", "property_style", "overview_description", "year_built" }},
  "ota_ratings": {{ "google": {{ "score", "count" }}, "makemytrip": {{}}, "goibibo": {{}}, "booking_com": {{}}, "agoda": {{}}, "treebo": {{}}, "easemytrip": {{}}, "yatra": {{}} }},
  "revenue_insights": [ {{ "month": string, "arr": number, "occupancy": number }} ],
  "amenities": {{ "infinity_pool": boolean, "gym": {{ "available": boolean, "open_time", "close_time", "equipment_quality" }}, "ev_charging": {{ "available": boolean, "four_wheeler_count", "two_wheeler_count" }}, "power_backup": {{ "available": boolean, "hours", "type" }}, "wifi_access", "recreational_center", "laundry_service": boolean, "room_service_24h": boolean }},
  "banquet_and_conference": {{ "conference_halls": [ {{ "name", "style", "capacity", "floor", "wifi": boolean, "washroom_available": boolean }} ], "banquet_halls": [ {{ "name", "capacity", "floor", "washroom_gender_separated": boolean, "ac_available": boolean }} ], "events": {{ "dj_available": boolean, "live_music": boolean, "bonfire": {{ "available": boolean, "charges" }}, "candle_light_dinner": {{ "available": boolean, "charges" }} }} }},
  "room_details": {{ "categories": [ {{ "name", "size_sqft", "view_type", "flooring_type", "connected_rooms": boolean, "amenities": [string], "cancellation_policy", "deposit_required": boolean }} ], "family_rooms": {{ "available": boolean, "count", "max_occupancy" }}, "room_lock_type", "extra_mattress_charges", "total_inventory": number }},
  "dining": {{ "pure_veg": boolean, "homemade_food_request": boolean, "restaurant_location", "happy_hours": {{ "available": boolean, "timing", "discount" }}, "liquor_allowed": boolean, "breakfast_type" }},
  "safety_and_structure": {{ "elevator": {{ "available": boolean, "door_type", "access_type" }}, "cctv": {{ "available": boolean, "backup_14_days": boolean, "entrance_cctv": boolean }}, "fire_safety": {{ "extinguishers": boolean, "sprinklers_in_rooms": boolean, "sprinklers_in_common_areas": boolean, "safety_measures_in_rooms": boolean, "fire_exit_plan": boolean }}, "security": {{ "manned_24x7": boolean, "lady_staff": boolean }}, "doctor_on_call": boolean, "first_aid": boolean }},
  "location_intelligence": {{ "business_hubs": [ {{ "name", "distance" }} ], "tourist_spots": [ {{ "name", "distance" }} ], "airport_transfer": {{ "available": boolean, "charges" }}, "approach_type", "parking_available": boolean }},
  "external_links": {{ "treebo_link", "mmt_link", "goibibo_link", "booking_com_link", "agoda_link", "google_listing", "image_gallery", "easemytrip_link", "yatra_link" }},
  "negative_points": [string]
}}"#,
        hotel = query.hotel_name,
        city = query.city,
    )
}
