use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::PlanError;

/// Login credentials for the booking service
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Authenticated (or not yet authenticated) view of the booking service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub base_url: String,
    pub credentials: Credentials,
    pub token: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>, credentials: Credentials, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

/// Which dates a scrape run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    /// Fridays, Saturdays and Sundays in the planning window
    Weekend,
    /// Every day in the planning window
    All,
    Single(NaiveDate),
}

impl ScrapeMode {
    pub const NAMES: [&'static str; 3] = ["weekend", "all", "single"];

    /// Build a mode from its wire name and the optional date that comes with it
    pub fn from_parts(name: &str, date: Option<NaiveDate>) -> Result<Self, PlanError> {
        match Self::NAMES.iter().position(|known| *known == name) {
            Some(0) => Ok(Self::Weekend),
            Some(1) => Ok(Self::All),
            Some(_) => date.map(Self::Single).ok_or(PlanError::MissingDate),
            None => Err(PlanError::UnknownMode(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        let index = match self {
            Self::Weekend => 0,
            Self::All => 1,
            Self::Single(_) => 2,
        };
        Self::NAMES[index]
    }
}

impl fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(date) => write!(f, "single {}", date),
            other => f.write_str(other.name()),
        }
    }
}

/// Ordered, duplicate-free set of dates to scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSet(Vec<NaiveDate>);

impl DateSet {
    pub(crate) fn from_sorted(dates: Vec<NaiveDate>) -> Self {
        Self(dates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.0
    }
}

/// One remote availability lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityQuery {
    pub category: String,
    pub location_id: u32,
    pub date: NaiveDate,
}

impl FacilityQuery {
    pub fn new(category: &str, location_id: u32, date: NaiveDate) -> Self {
        Self {
            category: category.to_string(),
            location_id,
            date,
        }
    }

    pub fn search_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Classified outcome of a facility query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Success { venues: Vec<Venue> },
    Unauthorized,
    TransportError(String),
}

/// A court (venue) at one location with its slots for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub venue_name: String,
    pub location_name: String,
    pub search_date: NaiveDate,
    #[serde(rename = "location_facility_times")]
    pub time_slots: Vec<Slot>,
    /// Fields the booking service sends that we don't model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One bookable time interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "start_time_value")]
    pub start_time: String,
    #[serde(rename = "end_time_value")]
    pub end_time: String,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<String>,
    #[serde(rename = "slot_available")]
    pub available: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Slot {
    /// Numeric price, zero when the service left it blank
    pub fn price_value(&self) -> f64 {
        self.price
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

// The service sends prices as strings, numbers, null or "".
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("invalid price: {}", other))),
    }
}

/// Terminal status of a scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunSummary {
    Success {
        dates_processed: usize,
        snapshots_saved: usize,
        pairs_skipped: usize,
    },
    Failed {
        reason: String,
    },
}

impl RunSummary {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn venue_json() -> Value {
        json!({
            "venue_name": "COURT 1",
            "location_name": "Arena A",
            "search_date": "2025-06-06",
            "venue_id": 77,
            "location_facility_times": [
                {"start_time_value": "08:00", "end_time_value": "09:00", "price": "20.00", "slot_available": true},
                {"start_time_value": "09:00", "end_time_value": "10:00", "price": 25, "slot_available": false},
                {"start_time_value": "10:00", "end_time_value": "11:00", "price": "", "slot_available": true},
                {"start_time_value": "11:00", "end_time_value": "12:00", "price": null, "slot_available": true}
            ]
        })
    }

    #[test]
    fn test_venue_decodes_prices_in_every_shape() {
        let venue: Venue = serde_json::from_value(venue_json()).unwrap();

        assert_eq!(venue.search_date, NaiveDate::from_ymd_opt(2025, 6, 6).unwrap());
        let prices: Vec<f64> = venue.time_slots.iter().map(Slot::price_value).collect();
        assert_eq!(prices, vec![20.0, 25.0, 0.0, 0.0]);
        assert_eq!(venue.time_slots[2].price, None);
        assert!(!venue.time_slots[1].available);
    }

    #[test]
    fn test_venue_keeps_unknown_fields() {
        let venue: Venue = serde_json::from_value(venue_json()).unwrap();
        assert_eq!(venue.extra.get("venue_id"), Some(&json!(77)));

        let written = serde_json::to_value(&venue).unwrap();
        assert_eq!(written["venue_id"], json!(77));
        assert_eq!(written["location_facility_times"][0]["start_time_value"], json!("08:00"));
    }

    #[test]
    fn test_venue_requires_slots() {
        let mut value = venue_json();
        value.as_object_mut().unwrap().remove("location_facility_times");
        assert!(serde_json::from_value::<Venue>(value).is_err());
    }

    #[test]
    fn test_mode_from_parts() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        assert_eq!(ScrapeMode::from_parts("weekend", None), Ok(ScrapeMode::Weekend));
        assert_eq!(ScrapeMode::from_parts("all", Some(date)), Ok(ScrapeMode::All));
        assert_eq!(ScrapeMode::from_parts("single", Some(date)), Ok(ScrapeMode::Single(date)));
        assert_eq!(ScrapeMode::from_parts("single", None), Err(PlanError::MissingDate));
        assert_eq!(
            ScrapeMode::from_parts("monthly", None),
            Err(PlanError::UnknownMode("monthly".to_string()))
        );
    }

    #[test]
    fn test_mode_names_match_wire_names() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        for name in ScrapeMode::NAMES {
            assert_eq!(ScrapeMode::from_parts(name, Some(date)).unwrap().name(), name);
        }

        let message = PlanError::UnknownMode("monthly".to_string()).to_string();
        assert!(ScrapeMode::NAMES.iter().all(|name| message.contains(name)));
    }

    #[test]
    fn test_run_summary_serializes_with_status_tag() {
        let failed = serde_json::to_value(RunSummary::failed("Authentication failed")).unwrap();
        assert_eq!(failed, json!({"status": "failed", "reason": "Authentication failed"}));

        let ok = serde_json::to_value(RunSummary::Success {
            dates_processed: 9,
            snapshots_saved: 4,
            pairs_skipped: 1,
        })
        .unwrap();
        assert_eq!(ok["status"], json!("success"));
        assert_eq!(ok["dates_processed"], json!(9));
    }

    #[test]
    fn test_session_endpoint_joins_paths() {
        let credentials = Credentials {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        };
        let session = Session::new("https://example.test/api/", credentials, Some("  ".to_string()));
        assert_eq!(session.endpoint("/login"), "https://example.test/api/login");
        assert_eq!(session.token, None);
    }
}
