pub mod attendees;
pub mod brackets;
pub mod connection;
pub mod matches;
pub mod matchup_types;
pub mod matchups;
pub mod models;
pub mod nights;
pub mod placements;
pub mod players;
pub mod setup;
pub mod snapshots;

pub use connection::{create_pool, get_connection, open_in_memory, DbConn, DbPool};
pub use models::*;
