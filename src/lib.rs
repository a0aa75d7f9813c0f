pub mod cli;
pub mod error;
pub mod github;
pub mod models;
pub mod scoring;
pub mod server;
pub mod service;
pub mod types;
