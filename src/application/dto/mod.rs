//! # Data Transfer Objects

pub mod pipeline_config;
pub mod run_report;
