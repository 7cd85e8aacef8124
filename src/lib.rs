pub mod config;
pub mod dataset;
pub mod figures;
pub mod metrics;
pub mod plots;
pub mod scenarios;
