//! Storage modules: config, cache, favorites, triage

pub mod cache;
pub mod config;
pub mod favorites;
pub mod triage;
