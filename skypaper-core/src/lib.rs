pub mod backend;
pub mod changer;
pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod scheduler;
pub mod sources;
