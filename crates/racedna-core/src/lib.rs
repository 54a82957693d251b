pub mod aggregate;
pub mod calculator_api;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod era;
pub mod errors;
pub mod model;
pub mod racing_stats;
pub mod stats;

pub mod report;
pub mod storage;
