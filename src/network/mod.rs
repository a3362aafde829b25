pub mod aggregator;
pub mod display;
pub mod record;
pub mod types;
