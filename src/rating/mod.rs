pub mod attendees;
pub mod ranks;
pub mod score_delta;
pub mod types;

pub use attendees::{placement_bonus, rank_attendees, AttendeeProfile, AttendeeStanding, PlacementEntry};
pub use ranks::{assign_score_ranks, reset_score};
pub use score_delta::{compute_score_delta, compute_score_delta_with, match_deltas};
pub use types::{placement_score, PlayerId, RatingValue, NO_CONTEST};
