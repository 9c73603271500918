pub mod env_file;
pub mod locations;
pub mod settings;

pub use env_file::EnvFile;
pub use locations::{CATEGORY, LOCATION_IDS, PROBE_LOCATION_ID, target_court_names};
pub use settings::{AppConfig, BookingSettings};
