pub mod group_source;
pub mod progress;
