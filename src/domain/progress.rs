use log::info;

/// Track progress of bracket feed fetching
pub struct FetchProgress {
    total: usize,
    fetched: usize,
    cached: usize,
}

impl FetchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fetched: 0,
            cached: 0,
        }
    }

    pub fn increment_fetched(&mut self) {
        self.fetched += 1;
        self.log_progress();
    }

    pub fn increment_cached(&mut self) {
        self.cached += 1;
        self.log_progress();
    }

    pub fn current_count(&self) -> usize {
        self.fetched + self.cached
    }

    fn log_progress(&self) {
        info!(
            "  → Brackets: {}/{} ({} fetched, {} cached)",
            self.current_count(),
            self.total,
            self.fetched,
            self.cached
        );
    }
}
