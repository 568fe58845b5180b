pub mod config;
pub mod engine;
pub mod quick_range;
pub mod rules;
pub mod venues;
