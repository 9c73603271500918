/// Facility locations polled on every run
///
/// IDs are the `location_id` values the booking service uses for its
/// facility search. Every run walks them in this order.
pub const LOCATION_IDS: [u32; 3] = [9, 10, 15];

/// Sub-category searched at each location
pub const CATEGORY: &str = "TENIS";

/// Location used for the token probe query
pub const PROBE_LOCATION_ID: u32 = 9;

/// Court names that get a snapshot when a location reports them
pub fn target_court_names() -> Vec<String> {
    let courts = (1..=10).map(|i| format!("COURT {}", i));
    let gelanggang = (1..=10).map(|i| format!("GELANGGANG {}", i));
    courts.chain(gelanggang).collect()
}
