//! Data models: template definitions, engine configuration and extraction results.

pub mod config;
pub mod definition;
pub mod result;
