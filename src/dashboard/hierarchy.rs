use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeMap;

use crate::domain::Venue;
use crate::store::SnapshotStore;

/// Courts at one location, sorted by venue name
pub type LocationCourts = BTreeMap<String, Vec<Venue>>;

/// Snapshots grouped date -> location -> courts
///
/// BTreeMaps keep dates ascending and locations alphabetical; courts are
/// inserted in name order, so the result does not depend on read order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    dates: BTreeMap<NaiveDate, LocationCourts>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, venue: Venue) {
        let courts = self
            .dates
            .entry(venue.search_date)
            .or_default()
            .entry(venue.location_name.clone())
            .or_default();
        let at = courts.partition_point(|c| c.venue_name <= venue.venue_name);
        courts.insert(at, venue);
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    pub fn venue_count(&self) -> usize {
        self.dates
            .values()
            .flat_map(|locations| locations.values())
            .map(Vec::len)
            .sum()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&LocationCourts> {
        self.dates.get(date)
    }

    /// Dates in ascending order with their locations
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &LocationCourts)> {
        self.dates.iter()
    }
}

impl FromIterator<Venue> for Hierarchy {
    fn from_iter<I: IntoIterator<Item = Venue>>(iter: I) -> Self {
        let mut hierarchy = Self::new();
        for venue in iter {
            hierarchy.insert(venue);
        }
        hierarchy
    }
}

/// Rebuild the hierarchy from every snapshot currently on disk
pub fn build_hierarchy(store: &SnapshotStore) -> Hierarchy {
    let names = match store.list_snapshots() {
        Ok(names) => names,
        Err(e) => {
            warn!("Failed to list snapshots: {}", e);
            return Hierarchy::new();
        }
    };

    let hierarchy: Hierarchy = names
        .iter()
        .filter_map(|name| match store.load(name) {
            Ok(venue) => Some(venue),
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                None
            }
        })
        .collect();

    info!(
        "  → Grouped {} snapshots into {} dates",
        hierarchy.venue_count(),
        hierarchy.date_count()
    );
    hierarchy
}
