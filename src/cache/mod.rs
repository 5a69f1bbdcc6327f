mod source;
mod store;

pub use source::BracketSource;
pub use store::Cache;
