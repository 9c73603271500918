use chrono::NaiveDate;

use crate::domain::models::Venue;

/// Lower-case a display name and replace spaces with underscores
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Slug for the location reported by a batch of venues
pub fn location_slug(venues: &[Venue]) -> String {
    venues
        .first()
        .map(|v| v.location_name.as_str())
        .filter(|name| !name.trim().is_empty())
        .map(slugify)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Snapshot file name for one (location, court, date) triple
pub fn snapshot_filename(location_slug: &str, court_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.json",
        location_slug,
        slugify(court_name),
        date.format("%Y-%m-%d")
    )
}

/// Find the venue whose name matches a target court, ignoring case
pub fn find_court<'a>(venues: &'a [Venue], court_name: &str) -> Option<&'a Venue> {
    let wanted = court_name.to_uppercase();
    venues
        .iter()
        .find(|v| v.venue_name.trim().to_uppercase() == wanted)
}
