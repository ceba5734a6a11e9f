// Canonical shape of a hotel intelligence report.
//
// Every struct here decodes leniently: leaves go through the decoders in
// `crate::util`, so a value of the wrong type falls back to the field's
// default instead of failing. The `Default` impls are the single home of
// default values; `default_report` is the merge baseline. Keys a section
// does not know land in its flattened `extra` map and are written back out
// unchanged.
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::{self, not_available};

/// A rating platform the report asks the model about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    /// Key under `ota_ratings`.
    pub key: &'static str,
    pub label: &'static str,
    /// Top of the platform's own scale.
    pub max_score: f64,
}

const fn platform(key: &'static str, label: &'static str, max_score: f64) -> Platform {
    Platform { key, label, max_score }
}

/// Rated platforms in display order. Booking.com and Agoda score out of 10.
pub const KNOWN_PLATFORMS: [Platform; 8] = [
    platform("google", "Google Business", 5.0),
    platform("makemytrip", "MakeMyTrip", 5.0),
    platform("goibibo", "Goibibo", 5.0),
    platform("booking_com", "Booking.com", 10.0),
    platform("agoda", "Agoda", 10.0),
    platform("easemytrip", "EaseMyTrip", 5.0),
    platform("yatra", "Yatra", 5.0),
    platform("treebo", "Internal Scan", 5.0),
];

/// The fully-populated baseline every incoming payload is merged onto.
pub fn default_report() -> Report {
    Report::default()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "util::section")]
    pub basic_info: BasicInfo,
    pub ota_ratings: OtaRatings,
    #[serde(deserialize_with = "util::list")]
    pub revenue_insights: Vec<RevenuePoint>,
    #[serde(deserialize_with = "util::section")]
    pub amenities: Amenities,
    #[serde(deserialize_with = "util::section")]
    pub banquet_and_conference: BanquetAndConference,
    #[serde(deserialize_with = "util::section")]
    pub room_details: RoomDetails,
    #[serde(deserialize_with = "util::section")]
    pub dining: Dining,
    #[serde(deserialize_with = "util::section")]
    pub safety_and_structure: SafetyAndStructure,
    #[serde(deserialize_with = "util::section")]
    pub location_intelligence: LocationIntelligence,
    #[serde(deserialize_with = "util::section")]
    pub external_links: ExternalLinks,
    #[serde(deserialize_with = "util::text_list")]
    pub negative_points: Vec<String>,
    /// Top-level keys the schema does not know about. Carried, never read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    #[serde(deserialize_with = "util::text")]
    pub hotel_name: String,
    #[serde(deserialize_with = "util::text")]
    pub city: String,
    #[serde(deserialize_with = "util::text")]
    pub segment: String,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub micro_market: Option<String>,
    #[serde(deserialize_with = "util::text")]
    pub property_style: String,
    #[serde(deserialize_with = "util::text")]
    pub overview_description: String,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub year_built: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BasicInfo {
    fn default() -> Self {
        Self {
            hotel_name: not_available(),
            city: not_available(),
            segment: not_available(),
            micro_market: None,
            property_style: not_available(),
            overview_description: not_available(),
            year_built: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtaRating {
    #[serde(deserialize_with = "util::opt_number", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "util::count")]
    pub count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-platform ratings keyed by platform id, in the order the source listed
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtaRatings(Vec<(String, OtaRating)>);

impl OtaRatings {
    pub fn new(entries: Vec<(String, OtaRating)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, platform: &str) -> Option<&OtaRating> {
        self.0
            .iter()
            .find(|(key, _)| key == platform)
            .map(|(_, rating)| rating)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OtaRating)> {
        self.0.iter().map(|(key, rating)| (key.as_str(), rating))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for OtaRatings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (platform, rating) in &self.0 {
            map.serialize_entry(platform, rating)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OtaRatings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = match Value::deserialize(deserializer)? {
            Value::Object(map) => map
                .into_iter()
                .map(|(platform, value)| {
                    let rating = match value {
                        // A bare number is read as the score.
                        Value::Number(n) => OtaRating {
                            score: n.as_f64(),
                            ..OtaRating::default()
                        },
                        other => util::decode_or_default(other),
                    };
                    (platform, rating)
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self(entries))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenuePoint {
    #[serde(deserialize_with = "util::text")]
    pub month: String,
    #[serde(deserialize_with = "util::number")]
    pub arr: f64,
    #[serde(deserialize_with = "util::number")]
    pub occupancy: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RevenuePoint {
    fn default() -> Self {
        Self {
            month: not_available(),
            arr: 0.0,
            occupancy: 0.0,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenities {
    #[serde(deserialize_with = "util::flag")]
    pub infinity_pool: bool,
    #[serde(deserialize_with = "util::section")]
    pub gym: Gym,
    #[serde(deserialize_with = "util::section")]
    pub ev_charging: EvCharging,
    #[serde(deserialize_with = "util::section")]
    pub power_backup: PowerBackup,
    #[serde(deserialize_with = "util::text")]
    pub wifi_access: String,
    #[serde(deserialize_with = "util::text")]
    pub recreational_center: String,
    #[serde(deserialize_with = "util::opt_flag", skip_serializing_if = "Option::is_none")]
    pub laundry_service: Option<bool>,
    #[serde(deserialize_with = "util::opt_flag", skip_serializing_if = "Option::is_none")]
    pub room_service_24h: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Amenities {
    fn default() -> Self {
        Self {
            infinity_pool: false,
            gym: Gym::default(),
            ev_charging: EvCharging::default(),
            power_backup: PowerBackup::default(),
            wifi_access: not_available(),
            recreational_center: not_available(),
            laundry_service: None,
            room_service_24h: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gym {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub equipment_quality: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvCharging {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::opt_count", skip_serializing_if = "Option::is_none")]
    pub four_wheeler_count: Option<u64>,
    #[serde(deserialize_with = "util::opt_count", skip_serializing_if = "Option::is_none")]
    pub two_wheeler_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerBackup {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::opt_number", skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(
        rename = "type",
        deserialize_with = "util::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub backup_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanquetAndConference {
    #[serde(deserialize_with = "util::list")]
    pub conference_halls: Vec<ConferenceHall>,
    #[serde(deserialize_with = "util::list")]
    pub banquet_halls: Vec<BanquetHall>,
    #[serde(deserialize_with = "util::section")]
    pub events: Events,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceHall {
    #[serde(deserialize_with = "util::text")]
    pub name: String,
    #[serde(deserialize_with = "util::text")]
    pub style: String,
    #[serde(deserialize_with = "util::opt_number", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(deserialize_with = "util::text")]
    pub floor: String,
    #[serde(deserialize_with = "util::flag")]
    pub wifi: bool,
    #[serde(deserialize_with = "util::flag")]
    pub washroom_available: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ConferenceHall {
    fn default() -> Self {
        Self {
            name: not_available(),
            style: not_available(),
            capacity: None,
            floor: not_available(),
            wifi: false,
            washroom_available: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanquetHall {
    #[serde(deserialize_with = "util::text")]
    pub name: String,
    #[serde(deserialize_with = "util::opt_number", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(deserialize_with = "util::text")]
    pub floor: String,
    #[serde(deserialize_with = "util::flag")]
    pub washroom_gender_separated: bool,
    #[serde(deserialize_with = "util::flag")]
    pub ac_available: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BanquetHall {
    fn default() -> Self {
        Self {
            name: not_available(),
            capacity: None,
            floor: not_available(),
            washroom_gender_separated: false,
            ac_available: false,
            extra: Map::new(),
        }
    }
}

/// Something that is either offered or not, possibly for a fee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeableService {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub charges: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Events {
    #[serde(deserialize_with = "util::flag")]
    pub dj_available: bool,
    #[serde(deserialize_with = "util::flag")]
    pub live_music: bool,
    #[serde(deserialize_with = "util::section")]
    pub bonfire: ChargeableService,
    #[serde(deserialize_with = "util::section")]
    pub candle_light_dinner: ChargeableService,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDetails {
    #[serde(deserialize_with = "util::list")]
    pub categories: Vec<RoomCategory>,
    #[serde(deserialize_with = "util::section")]
    pub family_rooms: FamilyRooms,
    #[serde(deserialize_with = "util::text")]
    pub room_lock_type: String,
    #[serde(deserialize_with = "util::text")]
    pub extra_mattress_charges: String,
    #[serde(deserialize_with = "util::opt_count", skip_serializing_if = "Option::is_none")]
    pub total_inventory: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RoomDetails {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            family_rooms: FamilyRooms::default(),
            room_lock_type: not_available(),
            extra_mattress_charges: not_available(),
            total_inventory: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomCategory {
    #[serde(deserialize_with = "util::text")]
    pub name: String,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub size_sqft: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub flooring_type: Option<String>,
    #[serde(deserialize_with = "util::flag")]
    pub connected_rooms: bool,
    #[serde(deserialize_with = "util::text_list")]
    pub amenities: Vec<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub cancellation_policy: Option<String>,
    #[serde(deserialize_with = "util::opt_flag", skip_serializing_if = "Option::is_none")]
    pub deposit_required: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RoomCategory {
    fn default() -> Self {
        Self {
            name: not_available(),
            size_sqft: None,
            view_type: None,
            flooring_type: None,
            connected_rooms: false,
            amenities: Vec::new(),
            cancellation_policy: None,
            deposit_required: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyRooms {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::opt_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(deserialize_with = "util::opt_count", skip_serializing_if = "Option::is_none")]
    pub max_occupancy: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dining {
    #[serde(deserialize_with = "util::flag")]
    pub pure_veg: bool,
    #[serde(deserialize_with = "util::flag")]
    pub homemade_food_request: bool,
    #[serde(deserialize_with = "util::text")]
    pub restaurant_location: String,
    #[serde(deserialize_with = "util::section")]
    pub happy_hours: HappyHours,
    #[serde(deserialize_with = "util::flag")]
    pub liquor_allowed: bool,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub breakfast_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Dining {
    fn default() -> Self {
        Self {
            pure_veg: false,
            homemade_food_request: false,
            restaurant_location: not_available(),
            happy_hours: HappyHours::default(),
            liquor_allowed: false,
            breakfast_type: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HappyHours {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyAndStructure {
    #[serde(deserialize_with = "util::section")]
    pub elevator: Elevator,
    #[serde(deserialize_with = "util::section")]
    pub cctv: Cctv,
    #[serde(deserialize_with = "util::section")]
    pub fire_safety: FireSafety,
    #[serde(deserialize_with = "util::section")]
    pub security: Security,
    #[serde(deserialize_with = "util::flag")]
    pub doctor_on_call: bool,
    #[serde(deserialize_with = "util::flag")]
    pub first_aid: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elevator {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::text")]
    pub door_type: String,
    #[serde(deserialize_with = "util::text")]
    pub access_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Elevator {
    fn default() -> Self {
        Self {
            available: false,
            door_type: not_available(),
            access_type: not_available(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cctv {
    #[serde(deserialize_with = "util::flag")]
    pub available: bool,
    #[serde(deserialize_with = "util::flag")]
    pub backup_14_days: bool,
    #[serde(deserialize_with = "util::flag")]
    pub entrance_cctv: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireSafety {
    #[serde(deserialize_with = "util::flag")]
    pub extinguishers: bool,
    #[serde(deserialize_with = "util::flag")]
    pub sprinklers_in_rooms: bool,
    #[serde(deserialize_with = "util::flag")]
    pub sprinklers_in_common_areas: bool,
    #[serde(deserialize_with = "util::flag")]
    pub safety_measures_in_rooms: bool,
    #[serde(deserialize_with = "util::flag")]
    pub fire_exit_plan: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Security {
    #[serde(deserialize_with = "util::flag")]
    pub manned_24x7: bool,
    #[serde(deserialize_with = "util::flag")]
    pub lady_staff: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationIntelligence {
    #[serde(deserialize_with = "util::list")]
    pub business_hubs: Vec<Landmark>,
    #[serde(deserialize_with = "util::list")]
    pub tourist_spots: Vec<Landmark>,
    #[serde(deserialize_with = "util::section")]
    pub airport_transfer: ChargeableService,
    #[serde(deserialize_with = "util::text")]
    pub approach_type: String,
    #[serde(deserialize_with = "util::flag")]
    pub parking_available: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LocationIntelligence {
    fn default() -> Self {
        Self {
            business_hubs: Vec::new(),
            tourist_spots: Vec::new(),
            airport_transfer: ChargeableService::default(),
            approach_type: not_available(),
            parking_available: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Landmark {
    #[serde(deserialize_with = "util::text")]
    pub name: String,
    #[serde(deserialize_with = "util::text")]
    pub distance: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            name: not_available(),
            distance: not_available(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinks {
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub treebo_link: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub mmt_link: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub goibibo_link: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub booking_com_link: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub agoda_link: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub google_listing: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub image_gallery: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub easemytrip_link: Option<String>,
    #[serde(deserialize_with = "util::opt_text", skip_serializing_if = "Option::is_none")]
    pub yatra_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExternalLinks {
    /// Listing links in display order, skipping the ones the source left out.
    pub fn listed(&self) -> Vec<(&'static str, &str)> {
        [
            ("MMT", &self.mmt_link),
            ("Goibibo", &self.goibibo_link),
            ("Booking", &self.booking_com_link),
            ("Agoda", &self.agoda_link),
            ("EMT", &self.easemytrip_link),
            ("Yatra", &self.yatra_link),
            ("Google", &self.google_listing),
            ("Treebo", &self.treebo_link),
            ("Gallery", &self.image_gallery),
        ]
        .into_iter()
        .filter_map(|(label, link)| {
            link.as_deref()
                .filter(|l| !l.trim().is_empty())
                .map(|l| (label, l))
        })
        .collect()
    }
}
