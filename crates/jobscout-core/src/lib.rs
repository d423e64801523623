pub mod adapters;
pub mod cache;
pub mod config;
pub mod matching;
pub mod models;
pub mod orchestration;
pub mod registry;
pub mod scoring;
