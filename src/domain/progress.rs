use log::info;

/// Track progress of the location x date scrape loop
pub struct ScrapeProgress {
    total: usize,
    processed: usize,
    saved: usize,
    skipped: usize,
}

impl ScrapeProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            saved: 0,
            skipped: 0,
        }
    }

    pub fn record_saved(&mut self, snapshots: usize) {
        self.saved += snapshots;
        self.advance();
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
        self.advance();
    }

    pub fn snapshots_saved(&self) -> usize {
        self.saved
    }

    pub fn pairs_skipped(&self) -> usize {
        self.skipped
    }

    fn advance(&mut self) {
        self.processed += 1;
        if should_log(self.processed, self.total) {
            info!(
                "  → Progress: {}/{} pairs ({} snapshots, {} skipped)",
                self.processed, self.total, self.saved, self.skipped
            );
        }
    }
}

fn should_log(current: usize, total: usize) -> bool {
    current % 10 == 0 || current == total
}
