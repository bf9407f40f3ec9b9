//! Read-only data sources.

pub mod targets;

pub use targets::TargetsDataSource;
