pub mod courts;
pub mod dates;
pub mod models;
mod progress;

pub use dates::{PLANNING_HORIZON_DAYS, plan_dates};
pub use models::*;
pub use progress::ScrapeProgress;
