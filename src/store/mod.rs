mod snapshots;

pub use snapshots::{PurgeReport, SnapshotStore};
