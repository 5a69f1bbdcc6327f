pub mod attendees;
pub mod bracket_places;
pub mod fetch;
pub mod league;
pub mod match_ingest;
pub mod matchups;
pub mod processing;
pub mod report;
pub mod snapshots;

pub use fetch::FetchService;
pub use match_ingest::IngestReport;
pub use processing::{UpdateService, UpdateSummary};
