pub mod cli;
pub mod config;
pub mod display;
pub mod events;
pub mod filter;
pub mod loader;
pub mod tracing;
